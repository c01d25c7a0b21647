//! The analysis boundary
//!
//! Exactly one code path runs a user-triggered analysis, and no failure is
//! allowed past it: missing input, an unavailable backend, a vanished file,
//! and backend errors all come back as an error-formatted report. The server
//! process never crashes for a request.

use crate::analysis::Analyzer;
use crate::error::DemoError;
use crate::types::AnalysisReport;
use std::path::Path;
use tracing::{error, info};

/// Run one analysis invocation, converting every failure into a report.
///
/// This is total: it always returns a well-formed [`AnalysisReport`] with
/// the fixed artifact shape.
pub fn run_analysis(
    analyzer: &dyn Analyzer,
    path: Option<&Path>,
    options: &[String],
) -> AnalysisReport {
    let Some(path) = path.filter(|p| !p.as_os_str().is_empty()) else {
        return AnalysisReport::text_only(DemoError::MissingInput.user_message());
    };

    if !analyzer.is_available() {
        let err = DemoError::AnalyzerUnavailable {
            name: analyzer.name(),
            reason: "required dependencies are not installed".to_string(),
        };
        return AnalysisReport::text_only(err.user_message());
    }

    if !path.exists() {
        return AnalysisReport::text_only(
            DemoError::FileNotFound(path.to_path_buf()).user_message(),
        );
    }

    info!(
        "Running {} on {} with options {:?}",
        analyzer.name(),
        path.display(),
        options
    );

    match analyzer.analyze(path, options) {
        Ok(report) => report,
        Err(e) => {
            error!(
                "Analysis failed for {} ({}): {:#?}",
                path.display(),
                analyzer.name(),
                e
            );
            AnalysisReport::text_only(e.user_message())
        }
    }
}
