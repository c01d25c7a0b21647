//! Core data types for demodeck
//!
//! These types flow between the ingestion, analysis, and server layers.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// Number of audio artifact slots in an analysis result.
///
/// The results panel always shows one markdown report and exactly this many
/// audio players; unused slots stay empty.
pub const ARTIFACT_SLOTS: usize = 3;

// =============================================================================
// Analysis results
// =============================================================================

/// The outcome of one analysis invocation: a markdown report plus up to
/// three derived audio artifacts (click tracks etc.), in fixed order.
#[derive(Debug, Clone, Default)]
pub struct AnalysisReport {
    /// Formatted markdown shown in the results panel
    pub markdown: String,
    /// Paths to generated audio files, one per output player
    pub artifacts: [Option<PathBuf>; ARTIFACT_SLOTS],
}

impl AnalysisReport {
    /// A report with text only and no audio artifacts
    pub fn text_only(markdown: impl Into<String>) -> Self {
        Self {
            markdown: markdown.into(),
            artifacts: Default::default(),
        }
    }
}

// =============================================================================
// Sample library
// =============================================================================

/// A quick-pick audio sample discovered at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleEntry {
    /// Friendly display name derived from the filename
    pub name: String,
    /// Absolute path to the audio file
    pub path: PathBuf,
}

// =============================================================================
// Download results
// =============================================================================

/// A successfully downloaded audio file with source metadata
#[derive(Debug, Clone)]
pub struct DownloadedAudio {
    /// Local path of the downloaded audio
    pub path: PathBuf,
    /// Source video title, if the downloader reported one
    pub title: Option<String>,
    /// Source duration in seconds, if reported
    pub duration_seconds: Option<f64>,
}

// =============================================================================
// Audio buffer
// =============================================================================

/// Decoded audio samples ready for analysis
#[derive(Debug, Clone)]
pub struct AudioBuffer {
    /// Mono samples normalized to [-1.0, 1.0]
    pub samples: Vec<f32>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Duration in seconds
    pub duration: f64,
}

impl AudioBuffer {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        // Guard against division by zero - use 0 duration for invalid sample rate
        let duration = if sample_rate > 0 {
            samples.len() as f64 / sample_rate as f64
        } else {
            0.0
        };
        Self {
            samples,
            sample_rate,
            duration,
        }
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

// =============================================================================
// Supported formats
// =============================================================================

/// Audio formats accepted for upload and sample discovery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Mp3,
    Wav,
    Flac,
    Ogg,
    M4a,
    Aac,
}

impl AudioFormat {
    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "mp3" => Some(AudioFormat::Mp3),
            "wav" => Some(AudioFormat::Wav),
            "flac" => Some(AudioFormat::Flac),
            "ogg" => Some(AudioFormat::Ogg),
            "m4a" => Some(AudioFormat::M4a),
            "aac" => Some(AudioFormat::Aac),
            _ => None,
        }
    }

    /// Check if a path has a supported extension
    pub fn is_supported_path(path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
            .is_some()
    }
}

// =============================================================================
// Collision-resistant output names
// =============================================================================

static ARTIFACT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Build a collision-resistant output stem: `<kind>_<unix-ts>_<seq>`
///
/// The timestamp keeps names human-sortable; the process-wide sequence
/// closes the same-second race between concurrent requests writing into the
/// shared temp directory.
pub fn unique_output_stem(kind: &str) -> String {
    let ts = chrono::Utc::now().timestamp();
    let seq = ARTIFACT_SEQ.fetch_add(1, Ordering::Relaxed);
    format!("{}_{}_{}", kind, ts, seq)
}

/// Build a collision-resistant output filename: `<kind>_<unix-ts>_<seq>.<ext>`
pub fn unique_output_name(kind: &str, ext: &str) -> String {
    format!("{}.{}", unique_output_stem(kind), ext)
}
