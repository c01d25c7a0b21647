//! Runtime configuration settings
//!
//! Each setting resolves with a fixed precedence: CLI flag, then environment
//! variable, then built-in default. `TEMP_DIR` is environment-only so the
//! temp location stays a deployment-time decision; `SAMPLES_DIR` can be
//! overridden per run for ad hoc testing.

use crate::error::{DemoError, Result};
use std::path::PathBuf;

/// Default port, matching the conventional demo-server port
pub const DEFAULT_PORT: u16 = 7860;
/// Default bind host
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Default samples directory
pub const DEFAULT_SAMPLES_DIR: &str = "assets/audio_samples";
/// Default temp directory for downloads and analysis artifacts
pub const DEFAULT_TEMP_DIR: &str = "outputs/demo_analysis";

/// Immutable runtime settings, resolved once at startup and passed to every
/// component
#[derive(Debug, Clone)]
pub struct Settings {
    /// Port to bind (before any auto-port probing)
    pub port: u16,
    /// Host to bind
    pub host: String,
    /// Directory of quick-pick samples (read-only inputs)
    pub samples_dir: PathBuf,
    /// Directory for downloads and generated artifacts (read-write)
    pub temp_dir: PathBuf,
    /// Probe ascending ports when the requested one is occupied
    pub auto_port: bool,
    /// Announce the bound address for external tunneling
    pub share: bool,
    /// Debug mode
    pub debug: bool,
    /// Temp files older than this many days are swept at startup (0 disables)
    pub cleanup_days: u32,
}

impl Settings {
    /// Resolve settings from CLI arguments and the process environment
    pub fn resolve(cli: &super::cli::Cli) -> Result<Self> {
        Self::resolve_with(cli, &|key| std::env::var(key).ok())
    }

    /// Resolve settings with an injected environment lookup (for tests)
    pub fn resolve_with(
        cli: &super::cli::Cli,
        env: &dyn Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let port = match cli.port {
            Some(p) => p,
            None => match env("PORT") {
                Some(raw) => raw.parse::<u16>().map_err(|_| {
                    DemoError::ConfigError(format!("PORT must be a number, got '{}'", raw))
                })?,
                None => DEFAULT_PORT,
            },
        };

        if port < 1024 {
            return Err(DemoError::ConfigError(format!(
                "Port {} is a privileged port (requires root). Use a port >= 1024, for example --port 8080",
                port
            )));
        }

        let host = cli
            .host
            .clone()
            .or_else(|| env("HOST"))
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let samples_dir = cli
            .samples_dir
            .clone()
            .or_else(|| env("SAMPLES_DIR").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SAMPLES_DIR));

        // No CLI override for the temp dir, by design
        let temp_dir = env("TEMP_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TEMP_DIR));

        Ok(Self {
            port,
            host,
            samples_dir,
            temp_dir,
            auto_port: cli.auto_port,
            share: cli.share,
            debug: cli.debug,
            cleanup_days: cli.cleanup_days,
        })
    }

    /// Create both configured directories if absent
    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.samples_dir)
            .map_err(|e| DemoError::output_error(self.samples_dir.clone(), e))?;
        std::fs::create_dir_all(&self.temp_dir)
            .map_err(|e| DemoError::output_error(self.temp_dir.clone(), e))?;
        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            host: DEFAULT_HOST.to_string(),
            samples_dir: PathBuf::from(DEFAULT_SAMPLES_DIR),
            temp_dir: PathBuf::from(DEFAULT_TEMP_DIR),
            auto_port: false,
            share: false,
            debug: false,
            cleanup_days: 7,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Cli;
    use clap::Parser;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults_without_cli_or_env() {
        let cli = Cli::parse_from(["demodeck"]);
        let settings = Settings::resolve_with(&cli, &no_env).unwrap();
        assert_eq!(settings.port, DEFAULT_PORT);
        assert_eq!(settings.host, DEFAULT_HOST);
        assert_eq!(settings.samples_dir, PathBuf::from(DEFAULT_SAMPLES_DIR));
        assert_eq!(settings.temp_dir, PathBuf::from(DEFAULT_TEMP_DIR));
    }

    #[test]
    fn test_env_overrides_default() {
        let cli = Cli::parse_from(["demodeck"]);
        let env = |key: &str| match key {
            "PORT" => Some("9000".to_string()),
            "HOST" => Some("127.0.0.1".to_string()),
            "SAMPLES_DIR" => Some("/srv/samples".to_string()),
            "TEMP_DIR" => Some("/srv/tmp".to_string()),
            _ => None,
        };
        let settings = Settings::resolve_with(&cli, &env).unwrap();
        assert_eq!(settings.port, 9000);
        assert_eq!(settings.host, "127.0.0.1");
        assert_eq!(settings.samples_dir, PathBuf::from("/srv/samples"));
        assert_eq!(settings.temp_dir, PathBuf::from("/srv/tmp"));
    }

    #[test]
    fn test_cli_overrides_env() {
        let cli = Cli::parse_from([
            "demodeck",
            "--port",
            "8123",
            "--host",
            "0.0.0.0",
            "--samples-dir",
            "/cli/samples",
        ]);
        let env = |key: &str| match key {
            "PORT" => Some("9000".to_string()),
            "HOST" => Some("127.0.0.1".to_string()),
            "SAMPLES_DIR" => Some("/env/samples".to_string()),
            _ => None,
        };
        let settings = Settings::resolve_with(&cli, &env).unwrap();
        assert_eq!(settings.port, 8123);
        assert_eq!(settings.host, "0.0.0.0");
        assert_eq!(settings.samples_dir, PathBuf::from("/cli/samples"));
    }

    #[test]
    fn test_temp_dir_has_no_cli_override() {
        // TEMP_DIR is intentionally env-only; the flag does not exist
        let parse = Cli::try_parse_from(["demodeck", "--temp-dir", "/x"]);
        assert!(parse.is_err());
    }

    #[test]
    fn test_privileged_port_rejected() {
        let cli = Cli::parse_from(["demodeck", "--port", "80"]);
        let err = Settings::resolve_with(&cli, &no_env).unwrap_err();
        assert!(err.is_fatal());
        assert!(err.to_string().contains("privileged"));
    }

    #[test]
    fn test_garbage_port_env_rejected() {
        let cli = Cli::parse_from(["demodeck"]);
        let env = |key: &str| (key == "PORT").then(|| "not-a-port".to_string());
        let err = Settings::resolve_with(&cli, &env).unwrap_err();
        assert!(err.is_fatal());
    }
}
