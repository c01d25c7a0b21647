//! Unified error types for demodeck
//!
//! Error strategy:
//! - Request-level errors (missing input, download, analysis): caught at the
//!   handler boundary and rendered as a markdown error report. The server
//!   process never dies for these.
//! - Startup errors (configuration, port binding): fatal, abort launch.
//!
//! All errors include actionable suggestions where possible.

use std::path::PathBuf;
use thiserror::Error;

/// Supported audio formats for helpful error messages
pub const SUPPORTED_FORMATS: &str = "MP3, WAV, FLAC, OGG, M4A, AAC";

/// Top-level error type for demodeck operations
#[derive(Debug, Error)]
pub enum DemoError {
    // =========================================================================
    // Request-level errors - render as error report, keep serving
    // =========================================================================
    #[error("No audio file supplied. Upload a file, pick a sample, or download from a URL first.")]
    MissingInput,

    #[error("File not found: '{0}'\n  Tip: Temp files are pruned by the cleanup sweep; re-upload or re-download the audio")]
    FileNotFound(PathBuf),

    #[error("Failed to decode audio file '{path}': {reason}\n  Supported formats: {SUPPORTED_FORMATS}")]
    DecodeError { path: PathBuf, reason: String },

    #[error("Analysis failed for '{path}': {reason}")]
    AnalysisError { path: PathBuf, reason: String },

    #[error("Analysis backend '{name}' is not available: {reason}")]
    AnalyzerUnavailable { name: &'static str, reason: String },

    #[error("Download failed: {reason}")]
    DownloadError { reason: String },

    #[error("yt-dlp is not installed or not on PATH\n  Tip: Install it with `pip install yt-dlp` (or your package manager) and restart")]
    DownloaderMissing,

    #[error("Cannot write output to '{path}': {reason}\n  Tip: Check write permissions for the temp directory")]
    OutputError { path: PathBuf, reason: String },

    // =========================================================================
    // Startup errors - abort launch
    // =========================================================================
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Port {port} is already in use\n  Tip: Use --auto-port to search for a free port, or pick another with --port <number>")]
    PortInUse { port: u16 },

    #[error("No available port found in range {start}-{end}")]
    NoAvailablePort { start: u16, end: u16 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for demodeck operations
pub type Result<T> = std::result::Result<T, DemoError>;

impl DemoError {
    /// Returns true if this error should abort startup rather than be
    /// rendered as a request-level report
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            DemoError::ConfigError(_)
                | DemoError::PortInUse { .. }
                | DemoError::NoAvailablePort { .. }
        )
    }

    /// Render this error as the markdown report shown in the results panel
    pub fn user_message(&self) -> String {
        format!("# ❌ Error\n\n{}", self)
    }

    /// Create a decode error with context about the issue
    pub fn decode_error(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        DemoError::DecodeError {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an analysis error for a specific file
    pub fn analysis_error(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        DemoError::AnalysisError {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a download error
    pub fn download_error(reason: impl Into<String>) -> Self {
        DemoError::DownloadError {
            reason: reason.into(),
        }
    }

    /// Create an output error, checking for common issues
    pub fn output_error(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        let path = path.into();
        let reason = match err.kind() {
            std::io::ErrorKind::PermissionDenied => {
                format!(
                    "Permission denied. Check that you have write access to {}",
                    path.display()
                )
            }
            std::io::ErrorKind::NotFound => {
                format!(
                    "Directory does not exist: {}",
                    path.parent()
                        .map(|p| p.display().to_string())
                        .unwrap_or_default()
                )
            }
            _ => err.to_string(),
        };
        DemoError::OutputError { path, reason }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startup_errors_are_fatal() {
        assert!(DemoError::ConfigError("bad port".into()).is_fatal());
        assert!(DemoError::PortInUse { port: 7860 }.is_fatal());
        assert!(DemoError::NoAvailablePort {
            start: 7860,
            end: 7960
        }
        .is_fatal());
    }

    #[test]
    fn test_request_errors_are_not_fatal() {
        assert!(!DemoError::MissingInput.is_fatal());
        assert!(!DemoError::download_error("network unreachable").is_fatal());
        assert!(!DemoError::analysis_error("/tmp/x.wav", "boom").is_fatal());
        assert!(!DemoError::DownloaderMissing.is_fatal());
    }

    #[test]
    fn test_user_message_is_markdown_error_report() {
        let msg = DemoError::MissingInput.user_message();
        assert!(msg.starts_with("# ❌ Error"));
        assert!(msg.contains("No audio file supplied"));
    }
}
