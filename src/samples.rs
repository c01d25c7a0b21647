//! Quick-pick sample discovery
//!
//! Lists audio files in the samples directory once at startup. The result is
//! read-only for the process lifetime and drives the quick-pick buttons.

use crate::types::{AudioFormat, SampleEntry};
use std::path::Path;
use tracing::{debug, info, warn};

/// Scan the samples directory (non-recursive) for supported audio files.
///
/// Entries are sorted by display name, so repeated scans over an unchanged
/// directory return the same ordered list.
pub fn discover(samples_dir: &Path) -> Vec<SampleEntry> {
    let mut samples = Vec::new();

    if !samples_dir.exists() {
        warn!(
            "Samples directory not found: {} (create it and drop audio files in for quick-pick buttons)",
            samples_dir.display()
        );
        return samples;
    }

    debug!("Scanning samples directory: {}", samples_dir.display());

    let entries = match std::fs::read_dir(samples_dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Could not read samples directory {}: {}", samples_dir.display(), e);
            return samples;
        }
    };

    for entry in entries.filter_map(|e| e.ok()) {
        let path = entry.path();
        if !path.is_file() || !AudioFormat::is_supported_path(&path) {
            continue;
        }

        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };

        samples.push(SampleEntry {
            name: friendly_name(stem),
            path,
        });
    }

    samples.sort_by(|a, b| a.name.cmp(&b.name));
    info!("Discovered {} audio samples", samples.len());

    samples
}

/// Turn a file stem into a display name: `drum_loop-120bpm` -> `drum loop - 120bpm`
fn friendly_name(stem: &str) -> String {
    stem.replace('_', " ").replace('-', " - ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_friendly_name() {
        assert_eq!(friendly_name("guitar_riff"), "guitar riff");
        assert_eq!(friendly_name("beat-128"), "beat - 128");
        assert_eq!(friendly_name("plain"), "plain");
    }

    #[test]
    fn test_discover_filters_and_sorts() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("zebra_beat.wav"), b"x").unwrap();
        fs::write(dir.path().join("alpha_groove.mp3"), b"x").unwrap();
        fs::write(dir.path().join("readme.txt"), b"x").unwrap();
        fs::create_dir(dir.path().join("nested.wav")).unwrap();

        let samples = discover(dir.path());
        let names: Vec<_> = samples.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["alpha groove", "zebra beat"]);
    }

    #[test]
    fn test_discover_is_deterministic() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.wav"), b"x").unwrap();
        fs::write(dir.path().join("a.wav"), b"x").unwrap();
        fs::write(dir.path().join("c.flac"), b"x").unwrap();

        let first = discover(dir.path());
        let second = discover(dir.path());

        assert_eq!(first.len(), 3);
        let paths_a: Vec<_> = first.iter().map(|s| s.path.clone()).collect();
        let paths_b: Vec<_> = second.iter().map(|s| s.path.clone()).collect();
        assert_eq!(paths_a, paths_b);
    }

    #[test]
    fn test_discover_missing_directory() {
        let samples = discover(Path::new("/nonexistent/demodeck-samples"));
        assert!(samples.is_empty());
    }
}
