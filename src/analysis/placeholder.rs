//! Deterministic placeholder backend for tests
//!
//! Touches nothing on disk and reports exactly what it was asked, so
//! handler and boundary behavior can be asserted without decoding audio.

use crate::analysis::Analyzer;
use crate::error::{DemoError, Result};
use crate::types::AnalysisReport;
use std::path::Path;

pub struct PlaceholderAnalyzer {
    available: bool,
    fail_with: Option<String>,
}

impl PlaceholderAnalyzer {
    pub fn new() -> Self {
        Self {
            available: true,
            fail_with: None,
        }
    }

    /// Simulate a backend with missing dependencies
    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    /// Simulate a backend that errors during analysis
    pub fn failing(mut self, reason: impl Into<String>) -> Self {
        self.fail_with = Some(reason.into());
        self
    }
}

impl Default for PlaceholderAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer for PlaceholderAnalyzer {
    fn analyze(&self, path: &Path, options: &[String]) -> Result<AnalysisReport> {
        if let Some(reason) = &self.fail_with {
            return Err(DemoError::analysis_error(path, reason.clone()));
        }

        Ok(AnalysisReport::text_only(format!(
            "# Placeholder Analysis\n\n- **File:** `{}`\n- **Options:** `{}`\n",
            path.display(),
            options.join(", ")
        )))
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn option_labels(&self) -> Vec<&'static str> {
        vec!["Beat Tracking", "Onset Detection", "Tempo Estimation"]
    }

    fn name(&self) -> &'static str {
        "placeholder"
    }
}
