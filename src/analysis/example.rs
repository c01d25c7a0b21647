//! Example analysis backend
//!
//! **Replace this module with your own processing.** It exists so the demo
//! works end to end out of the box: a deliberately simple energy-envelope
//! pass that marks beats and onsets and derives a tempo, rendering click
//! tracks for each. Swap in a real MIR library behind the [`Analyzer`]
//! trait for anything beyond demonstration.

use crate::analysis::Analyzer;
use crate::audio;
use crate::error::Result;
use crate::types::{unique_output_name, AnalysisReport, AudioBuffer};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Option label for beat tracking
pub const OPT_BEATS: &str = "Beat Tracking";
/// Option label for onset detection
pub const OPT_ONSETS: &str = "Onset Detection";
/// Option label for tempo estimation
pub const OPT_TEMPO: &str = "Tempo Estimation";

/// Envelope frame size in samples
const FRAME_SIZE: usize = 2048;
/// Envelope hop size in samples
const HOP_SIZE: usize = 512;
/// Minimum spacing between detected beats (seconds)
const MIN_BEAT_GAP: f64 = 0.25;
/// Minimum spacing between detected onsets (seconds)
const MIN_ONSET_GAP: f64 = 0.05;

/// The replace-me backend shipped with the template
pub struct ExampleAnalyzer {
    temp_dir: PathBuf,
}

impl ExampleAnalyzer {
    pub fn new(temp_dir: impl Into<PathBuf>) -> Self {
        Self {
            temp_dir: temp_dir.into(),
        }
    }

    fn beats_artifact(&self, buffer: &AudioBuffer, beats: &[f64]) -> Result<PathBuf> {
        // Every fourth beat gets a higher-pitched click, standing in for
        // downbeats the way a real beat tracker would report them
        let downbeats: Vec<f64> = beats.iter().copied().step_by(4).collect();

        let beat_clicks =
            audio::render_clicks(beats, 800.0, 0.1, buffer.len(), buffer.sample_rate);
        let downbeat_clicks =
            audio::render_clicks(&downbeats, 1200.0, 0.15, buffer.len(), buffer.sample_rate);

        let mixed = audio::mix_clicks(&buffer.samples, &[&beat_clicks, &downbeat_clicks]);
        let path = self.temp_dir.join(unique_output_name("beats", "wav"));
        audio::write_wav(&path, &mixed, buffer.sample_rate)?;
        Ok(path)
    }

    fn onsets_artifact(&self, buffer: &AudioBuffer, onsets: &[f64]) -> Result<PathBuf> {
        let onset_clicks =
            audio::render_clicks(onsets, 1500.0, 0.08, buffer.len(), buffer.sample_rate);
        let mixed = audio::mix_clicks(&buffer.samples, &[&onset_clicks]);
        let path = self.temp_dir.join(unique_output_name("onsets", "wav"));
        audio::write_wav(&path, &mixed, buffer.sample_rate)?;
        Ok(path)
    }
}

impl Analyzer for ExampleAnalyzer {
    fn analyze(&self, path: &Path, options: &[String]) -> Result<AnalysisReport> {
        let buffer = audio::decode(path)?;

        let file_size_kb = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0) as f64 / 1024.0;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut markdown = format!(
            "# 🎵 Analysis Results\n\n\
             ## 📁 File Information\n\
             - **Filename:** `{}`\n\
             - **Size:** `{:.1} KB`\n\
             - **Duration:** `{:.2}s` ({:.1} minutes)\n\
             - **Sample Rate:** `{} Hz`\n\n",
            file_name,
            file_size_kb,
            buffer.duration,
            buffer.duration / 60.0,
            buffer.sample_rate
        );

        let mut artifacts: [Option<PathBuf>; 3] = Default::default();
        let envelope = energy_envelope(&buffer);

        if options.iter().any(|o| o == OPT_BEATS) {
            debug!("Running beat tracking");
            let beats = pick_peaks(&envelope, buffer.sample_rate, MIN_BEAT_GAP);
            let bpm = tempo_from_events(&beats);

            markdown.push_str(&format!(
                "## 🥁 Beat Tracking\n\
                 - **BPM:** `{:.1}`\n\
                 - **Total Beats:** `{}`\n",
                bpm,
                beats.len()
            ));
            if let (Some(first), Some(last)) = (beats.first(), beats.last()) {
                markdown.push_str(&format!(
                    "- **First Beat:** `{:.2}s`\n- **Last Beat:** `{:.2}s`\n",
                    first, last
                ));
            }
            markdown.push('\n');

            if !beats.is_empty() {
                artifacts[0] = Some(self.beats_artifact(&buffer, &beats)?);
            }
        }

        if options.iter().any(|o| o == OPT_ONSETS) {
            debug!("Running onset detection");
            let onsets = pick_flux_onsets(&envelope, buffer.sample_rate, MIN_ONSET_GAP);

            markdown.push_str(&format!(
                "## 🎯 Onset Detection\n\
                 - **Total Onsets:** `{}`\n",
                onsets.len()
            ));
            if buffer.duration > 0.0 {
                markdown.push_str(&format!(
                    "- **Density:** `{:.1} onsets/second`\n",
                    onsets.len() as f64 / buffer.duration
                ));
            }
            if let (Some(first), Some(last)) = (onsets.first(), onsets.last()) {
                markdown.push_str(&format!(
                    "- **First Onset:** `{:.2}s`\n- **Last Onset:** `{:.2}s`\n",
                    first, last
                ));
            }
            markdown.push('\n');

            if !onsets.is_empty() {
                artifacts[1] = Some(self.onsets_artifact(&buffer, &onsets)?);
            }
        }

        if options.iter().any(|o| o == OPT_TEMPO) {
            debug!("Running tempo estimation");
            let beats = pick_peaks(&envelope, buffer.sample_rate, MIN_BEAT_GAP);
            let bpm = tempo_from_events(&beats);

            markdown.push_str(&format!(
                "## ⏱️ Tempo Estimation\n- **Primary Tempo:** `{:.1} BPM`\n\n",
                bpm
            ));
        }

        markdown.push_str(
            "---\n✅ **Analysis completed!**\n\n\
             💡 **Tip:** Play audio outputs below to hear detected features.\n",
        );

        Ok(AnalysisReport {
            markdown,
            artifacts,
        })
    }

    fn option_labels(&self) -> Vec<&'static str> {
        vec![OPT_BEATS, OPT_ONSETS, OPT_TEMPO]
    }

    fn name(&self) -> &'static str {
        "example-energy"
    }
}

/// RMS energy per hop
fn energy_envelope(buffer: &AudioBuffer) -> Vec<f32> {
    if buffer.len() < FRAME_SIZE {
        return vec![];
    }

    buffer
        .samples
        .windows(FRAME_SIZE)
        .step_by(HOP_SIZE)
        .map(|frame| {
            let sum: f32 = frame.iter().map(|s| s * s).sum();
            (sum / frame.len() as f32).sqrt()
        })
        .collect()
}

/// Local maxima of the envelope above its mean, at least `min_gap` apart
fn pick_peaks(envelope: &[f32], sample_rate: u32, min_gap: f64) -> Vec<f64> {
    if envelope.len() < 3 || sample_rate == 0 {
        return vec![];
    }

    let mean = envelope.iter().sum::<f32>() / envelope.len() as f32;
    let hop_secs = HOP_SIZE as f64 / sample_rate as f64;

    let mut times = Vec::new();
    let mut last_time = f64::NEG_INFINITY;

    for i in 1..envelope.len() - 1 {
        let v = envelope[i];
        if v <= mean || v < envelope[i - 1] || v < envelope[i + 1] {
            continue;
        }
        let t = i as f64 * hop_secs;
        if t - last_time >= min_gap {
            times.push(t);
            last_time = t;
        }
    }

    times
}

/// Frames where energy rises sharply against the local mean flux
fn pick_flux_onsets(envelope: &[f32], sample_rate: u32, min_gap: f64) -> Vec<f64> {
    if envelope.len() < 2 || sample_rate == 0 {
        return vec![];
    }

    let flux: Vec<f32> = envelope
        .windows(2)
        .map(|w| (w[1] - w[0]).max(0.0))
        .collect();
    let mean_flux = flux.iter().sum::<f32>() / flux.len() as f32;
    let threshold = mean_flux * 2.0;
    let hop_secs = HOP_SIZE as f64 / sample_rate as f64;

    let mut times = Vec::new();
    let mut last_time = f64::NEG_INFINITY;

    for (i, &f) in flux.iter().enumerate() {
        if f <= threshold {
            continue;
        }
        let t = (i + 1) as f64 * hop_secs;
        if t - last_time >= min_gap {
            times.push(t);
            last_time = t;
        }
    }

    times
}

/// BPM from the mean inter-event interval, 0 when there are too few events
fn tempo_from_events(times: &[f64]) -> f64 {
    if times.len() < 2 {
        return 0.0;
    }
    let intervals: Vec<f64> = times.windows(2).map(|w| w[1] - w[0]).collect();
    let mean = intervals.iter().sum::<f64>() / intervals.len() as f64;
    if mean > 0.0 {
        60.0 / mean
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// 120 BPM click track: impulses every 0.5s
    fn click_buffer(duration_secs: f32, sample_rate: u32) -> AudioBuffer {
        let num_samples = (duration_secs * sample_rate as f32) as usize;
        let beat_period = sample_rate as usize / 2;
        let impulse_len = sample_rate as usize / 200; // 5ms

        let samples: Vec<f32> = (0..num_samples)
            .map(|i| {
                let pos = i % beat_period;
                if pos < impulse_len {
                    0.8 * (-5.0 * pos as f32 / impulse_len as f32).exp()
                } else {
                    0.0
                }
            })
            .collect();

        AudioBuffer::new(samples, sample_rate)
    }

    fn write_click_wav(path: &Path, duration_secs: f32, sample_rate: u32) {
        let buffer = click_buffer(duration_secs, sample_rate);
        audio::write_wav(path, &buffer.samples, sample_rate).unwrap();
    }

    #[test]
    fn test_peaks_found_on_click_track() {
        let buffer = click_buffer(5.0, 22050);
        let envelope = energy_envelope(&buffer);
        let beats = pick_peaks(&envelope, buffer.sample_rate, MIN_BEAT_GAP);

        // 5s at 120 BPM is 10 beats; the coarse envelope may miss edges
        assert!(beats.len() >= 6, "expected >= 6 beats, got {}", beats.len());
    }

    #[test]
    fn test_tempo_near_120_on_click_track() {
        let buffer = click_buffer(10.0, 22050);
        let envelope = energy_envelope(&buffer);
        let beats = pick_peaks(&envelope, buffer.sample_rate, MIN_BEAT_GAP);
        let bpm = tempo_from_events(&beats);

        assert!(
            (90.0..=150.0).contains(&bpm),
            "expected tempo near 120, got {:.1}",
            bpm
        );
    }

    #[test]
    fn test_tempo_degenerate_inputs() {
        assert_eq!(tempo_from_events(&[]), 0.0);
        assert_eq!(tempo_from_events(&[1.0]), 0.0);
    }

    #[test]
    fn test_envelope_of_short_buffer_is_empty() {
        let buffer = AudioBuffer::new(vec![0.1; 100], 22050);
        assert!(energy_envelope(&buffer).is_empty());
    }

    #[test]
    fn test_analyze_produces_fixed_four_tuple_shape() {
        let dir = TempDir::new().unwrap();
        let wav = dir.path().join("click.wav");
        write_click_wav(&wav, 4.0, 22050);

        let analyzer = ExampleAnalyzer::new(dir.path());
        let report = analyzer
            .analyze(
                &wav,
                &[OPT_BEATS.to_string(), OPT_ONSETS.to_string(), OPT_TEMPO.to_string()],
            )
            .unwrap();

        assert_eq!(report.artifacts.len(), 3);
        assert!(report.markdown.contains("Beat Tracking"));
        assert!(report.markdown.contains("Onset Detection"));
        assert!(report.markdown.contains("Tempo Estimation"));

        // Beats and onsets artifacts rendered, third slot stays empty
        assert!(report.artifacts[0].as_ref().is_some_and(|p| p.exists()));
        assert!(report.artifacts[1].as_ref().is_some_and(|p| p.exists()));
        assert!(report.artifacts[2].is_none());
    }

    #[test]
    fn test_analyze_with_no_options_reports_file_info_only() {
        let dir = TempDir::new().unwrap();
        let wav = dir.path().join("click.wav");
        write_click_wav(&wav, 2.0, 22050);

        let analyzer = ExampleAnalyzer::new(dir.path());
        let report = analyzer.analyze(&wav, &[]).unwrap();

        assert!(report.markdown.contains("File Information"));
        assert!(!report.markdown.contains("Beat Tracking"));
        assert!(report.artifacts.iter().all(Option::is_none));
    }

    #[test]
    fn test_unknown_options_are_ignored() {
        let dir = TempDir::new().unwrap();
        let wav = dir.path().join("click.wav");
        write_click_wav(&wav, 2.0, 22050);

        let analyzer = ExampleAnalyzer::new(dir.path());
        let report = analyzer
            .analyze(&wav, &["Spectral Unicorns".to_string()])
            .unwrap();
        assert!(report.markdown.contains("Analysis completed"));
    }
}
