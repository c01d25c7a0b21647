//! demodeck - Self-hosted web demo for audio analysis
//!
//! Serves a single-page browser UI over a small JSON API: pick a bundled
//! sample, upload a file, or download audio from a YouTube URL, then run the
//! configured analysis backend and get back a markdown report plus up to
//! three rendered click-track artifacts.
//!
//! # Architecture
//!
//! - `config`: CLI argument parsing and runtime settings
//! - `cleanup`: startup sweep of aged temp files
//! - `samples`: quick-pick sample discovery
//! - `download`: yt-dlp subprocess adapter
//! - `audio`: decoding (symphonia) and click-track rendering
//! - `analysis`: the swappable backend trait, its boundary, and the bundled
//!   energy-based example backend
//! - `server`: axum routes, the rendered page, and port policy
//!
//! # Example
//!
//! ```no_run
//! use demodeck::analysis::ExampleAnalyzer;
//! use demodeck::config::Settings;
//! use demodeck::server::{self, AppState};
//! use std::sync::Arc;
//!
//! # async fn run() -> demodeck::Result<()> {
//! let settings = Settings::default();
//! settings.ensure_directories()?;
//! let samples = demodeck::samples::discover(&settings.samples_dir);
//! let analyzer = Arc::new(ExampleAnalyzer::new(&settings.temp_dir));
//! server::launch(Arc::new(AppState::new(settings, samples, analyzer))).await
//! # }
//! ```

pub mod analysis;
pub mod audio;
pub mod cleanup;
pub mod config;
pub mod download;
pub mod error;
pub mod samples;
pub mod server;
pub mod types;

// Re-export key types at crate root
pub use error::{DemoError, Result};
pub use types::{AnalysisReport, AudioBuffer, DownloadedAudio, SampleEntry};
