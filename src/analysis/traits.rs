//! Analysis trait abstraction
//!
//! [`Analyzer`] is the seam adopters replace: swap in your own backend
//! without touching the server, ingestion, or report plumbing.

use crate::error::Result;
use crate::types::AnalysisReport;
use std::path::Path;

/// A pluggable audio-analysis backend
pub trait Analyzer: Send + Sync {
    /// Analyze the audio file at `path` with the user's selected option
    /// labels, producing a markdown report and up to three audio artifacts.
    ///
    /// Option labels are meaningful only to the backend; unknown labels
    /// should be ignored.
    fn analyze(&self, path: &Path, options: &[String]) -> Result<AnalysisReport>;

    /// Whether the backend's dependencies are present. When false, requests
    /// get an inline dependency message and the app stays usable.
    fn is_available(&self) -> bool {
        true
    }

    /// Option labels this backend understands, in display order
    fn option_labels(&self) -> Vec<&'static str>;

    /// Get the name of this backend (for logging)
    fn name(&self) -> &'static str;
}
