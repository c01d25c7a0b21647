//! CLI argument parsing

use clap::Parser;
use std::path::PathBuf;

/// demodeck - Self-hosted web demo for audio analysis
///
/// Serves a browser UI that accepts an uploaded file, a bundled sample, or a
/// YouTube URL, runs the configured analysis backend, and renders a markdown
/// report with up to three click-track artifacts.
#[derive(Parser, Debug)]
#[command(name = "demodeck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Port to run the server on (default: 7860 or $PORT). Must be >= 1024
    #[arg(long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Host to bind to (default: 0.0.0.0 or $HOST)
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// Automatically find an available port if the requested one is occupied
    #[arg(long, default_value = "false")]
    pub auto_port: bool,

    /// Announce the bound address for external tunneling (no tunnel is
    /// provisioned locally)
    #[arg(long, default_value = "false")]
    pub share: bool,

    /// Enable debug mode (verbose request logging)
    #[arg(long, default_value = "false")]
    pub debug: bool,

    /// Directory containing quick-pick audio samples
    /// (default: assets/audio_samples or $SAMPLES_DIR)
    #[arg(long, value_name = "DIR")]
    pub samples_dir: Option<PathBuf>,

    /// Delete temp files older than N days at startup (0 to disable)
    #[arg(long, default_value = "7", value_name = "N")]
    pub cleanup_days: u32,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,
}

impl Cli {
    /// Get the log level based on verbosity flags
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            return tracing::Level::ERROR;
        }
        match self.verbose {
            0 => {
                if self.debug {
                    tracing::Level::DEBUG
                } else {
                    tracing::Level::INFO
                }
            }
            1 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["demodeck"]);
        assert_eq!(cli.port, None);
        assert!(!cli.auto_port);
        assert!(!cli.share);
        assert_eq!(cli.cleanup_days, 7);
    }

    #[test]
    fn test_flags_parse() {
        let cli = Cli::parse_from([
            "demodeck",
            "--port",
            "8080",
            "--auto-port",
            "--share",
            "--samples-dir",
            "/tmp/samples",
            "--cleanup-days",
            "0",
        ]);
        assert_eq!(cli.port, Some(8080));
        assert!(cli.auto_port);
        assert!(cli.share);
        assert_eq!(cli.samples_dir, Some(PathBuf::from("/tmp/samples")));
        assert_eq!(cli.cleanup_days, 0);
    }

    #[test]
    fn test_log_level_mapping() {
        let quiet = Cli::parse_from(["demodeck", "-q"]);
        assert_eq!(quiet.log_level(), tracing::Level::ERROR);

        let debug = Cli::parse_from(["demodeck", "--debug"]);
        assert_eq!(debug.log_level(), tracing::Level::DEBUG);

        let trace = Cli::parse_from(["demodeck", "-vv"]);
        assert_eq!(trace.log_level(), tracing::Level::TRACE);
    }
}
