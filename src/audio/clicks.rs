//! Click-track rendering
//!
//! Generates audible markers at detected event times, mixes them over the
//! original audio, and writes the result as a 16-bit WAV so the listener can
//! verify analysis output by ear.

use crate::error::{DemoError, Result};
use std::path::Path;

/// Gain applied to the click overlay when mixing
const CLICK_MIX_GAIN: f32 = 0.3;
/// Peak level the mixed output is normalized to
const TARGET_PEAK: f32 = 0.8;

/// Render a click signal: exponentially decaying sine bursts at `times`.
///
/// `length` fixes the output sample count so clicks can be mixed 1:1 over
/// the source audio.
pub fn render_clicks(
    times: &[f64],
    click_freq: f32,
    click_duration: f32,
    length: usize,
    sample_rate: u32,
) -> Vec<f32> {
    use std::f32::consts::PI;

    let mut out = vec![0.0f32; length];
    let click_len = (click_duration * sample_rate as f32) as usize;

    for &t in times {
        let start = (t * sample_rate as f64) as usize;
        for i in 0..click_len {
            let idx = start + i;
            if idx >= length {
                break;
            }
            let phase = 2.0 * PI * click_freq * i as f32 / sample_rate as f32;
            let decay = (-5.0 * i as f32 / click_len as f32).exp();
            out[idx] += phase.sin() * decay;
        }
    }

    out
}

/// Overlay one or more click signals onto the source audio and normalize.
///
/// Clicks are mixed at a fixed gain, then the whole signal is scaled so its
/// peak sits at a comfortable level below full scale.
pub fn mix_clicks(audio: &[f32], click_tracks: &[&[f32]]) -> Vec<f32> {
    let mut mixed: Vec<f32> = audio.to_vec();

    for clicks in click_tracks {
        for (m, c) in mixed.iter_mut().zip(clicks.iter()) {
            *m += c * CLICK_MIX_GAIN;
        }
    }

    let peak = mixed.iter().fold(0.0f32, |p, s| p.max(s.abs()));
    if peak > 0.0 {
        let scale = TARGET_PEAK / peak;
        for s in &mut mixed {
            *s *= scale;
        }
    }

    mixed
}

/// Write mono f32 samples as a 16-bit PCM WAV file
pub fn write_wav(path: &Path, samples: &[f32], sample_rate: u32) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec)
        .map_err(|e| DemoError::OutputError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    for &s in samples {
        let clamped = s.clamp(-1.0, 1.0);
        writer
            .write_sample((clamped * 32767.0) as i16)
            .map_err(|e| DemoError::OutputError {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
    }

    writer.finalize().map_err(|e| DemoError::OutputError {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_clicks_land_at_event_times() {
        let sr = 1000;
        let clicks = render_clicks(&[0.5], 100.0, 0.05, 1000, sr);

        // Silence before the event, energy at and after it
        assert!(clicks[..490].iter().all(|&s| s == 0.0));
        let energy: f32 = clicks[500..550].iter().map(|s| s.abs()).sum();
        assert!(energy > 0.0);
    }

    #[test]
    fn test_clicks_respect_length_bound() {
        // Event near the end must not panic or write past the buffer
        let clicks = render_clicks(&[0.95], 800.0, 0.1, 1000, 1000);
        assert_eq!(clicks.len(), 1000);
    }

    #[test]
    fn test_mix_normalizes_peak() {
        let audio = vec![0.5f32; 100];
        let clicks = vec![1.0f32; 100];
        let mixed = mix_clicks(&audio, &[&clicks]);

        let peak = mixed.iter().fold(0.0f32, |p, s| p.max(s.abs()));
        assert!((peak - 0.8).abs() < 0.001);
    }

    #[test]
    fn test_mix_silent_input_stays_silent() {
        let audio = vec![0.0f32; 64];
        let clicks = vec![0.0f32; 64];
        let mixed = mix_clicks(&audio, &[&clicks]);
        assert!(mixed.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_write_wav_produces_readable_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.wav");

        let samples: Vec<f32> = (0..2000)
            .map(|i| (2.0 * std::f32::consts::PI * 220.0 * i as f32 / 8000.0).sin() * 0.5)
            .collect();
        write_wav(&path, &samples, 8000).unwrap();

        let reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().sample_rate, 8000);
        assert_eq!(reader.spec().channels, 1);
        assert_eq!(reader.len(), 2000);
    }
}
