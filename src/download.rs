//! YouTube download adapter
//!
//! Thin wrapper over the external `yt-dlp` binary: probes source metadata,
//! fetches the best available audio track into the temp directory, and
//! transcodes it to WAV or MP3. Every failure mode (missing binary, bad URL,
//! network error, absent output file) is surfaced as a [`DemoError`] that the
//! handler renders inline; nothing here panics or escapes the boundary.

use crate::error::{DemoError, Result};
use crate::types::{unique_output_stem, DownloadedAudio};
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Output format for downloaded audio
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadFormat {
    Wav,
    Mp3,
}

impl DownloadFormat {
    /// Parse a UI format selection ("wav" or "mp3")
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "wav" => Ok(DownloadFormat::Wav),
            "mp3" => Ok(DownloadFormat::Mp3),
            other => Err(DemoError::download_error(format!(
                "Unsupported download format '{}' (use wav or mp3)",
                other
            ))),
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            DownloadFormat::Wav => "wav",
            DownloadFormat::Mp3 => "mp3",
        }
    }
}

/// Adapter around the `yt-dlp` CLI
///
/// The binary name is injectable so failure paths are testable without a
/// network or an installed downloader.
pub struct YtDlpDownloader {
    binary: String,
    output_dir: PathBuf,
}

impl YtDlpDownloader {
    /// Downloads land in `<temp_dir>/youtube_downloads`
    pub fn new(temp_dir: &Path) -> Self {
        Self {
            binary: "yt-dlp".to_string(),
            output_dir: temp_dir.join("youtube_downloads"),
        }
    }

    /// Override the downloader binary (tests)
    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Download the audio track of `url` into the temp directory.
    ///
    /// `quality` is the target bitrate in kbps and only applies to MP3.
    pub async fn download(
        &self,
        url: &str,
        format: DownloadFormat,
        quality: &str,
    ) -> Result<DownloadedAudio> {
        let url = url.trim();
        if url.is_empty() {
            return Err(DemoError::download_error(
                "No URL supplied. Paste a YouTube URL first.",
            ));
        }

        std::fs::create_dir_all(&self.output_dir)
            .map_err(|e| DemoError::output_error(self.output_dir.clone(), e))?;

        let (title, duration_seconds) = self.probe(url).await?;

        let stem = unique_output_stem("youtube_audio");
        let template = format!("{}.%(ext)s", stem);

        let mut args: Vec<String> = vec![
            "--format".into(),
            "bestaudio/best".into(),
            "-x".into(),
            "--audio-format".into(),
            format.extension().into(),
            "-o".into(),
            template,
            "-P".into(),
            self.output_dir.to_string_lossy().into_owned(),
            "--no-playlist".into(),
            "--no-warnings".into(),
            "--quiet".into(),
        ];
        if format == DownloadFormat::Mp3 {
            args.push("--audio-quality".into());
            args.push(format!("{}K", quality));
        }
        args.push(url.into());

        debug!("Running {} with args {:?}", self.binary, args);

        let output = Command::new(&self.binary)
            .args(&args)
            .output()
            .await
            .map_err(|e| self.spawn_error(e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!("yt-dlp exited with {}: {}", output.status, stderr.trim());
            return Err(DemoError::download_error(first_error_line(&stderr)));
        }

        let expected = self
            .output_dir
            .join(format!("{}.{}", stem, format.extension()));
        if !expected.exists() {
            return Err(DemoError::download_error(format!(
                "Downloader finished but output file is missing: {}",
                expected.display()
            )));
        }

        info!(
            "Downloaded {} -> {}",
            title.as_deref().unwrap_or(url),
            expected.display()
        );

        Ok(DownloadedAudio {
            path: expected,
            title,
            duration_seconds,
        })
    }

    /// Fetch title and duration without downloading
    async fn probe(&self, url: &str) -> Result<(Option<String>, Option<f64>)> {
        let output = Command::new(&self.binary)
            .args(["--dump-json", "--no-playlist", "--no-warnings", url])
            .output()
            .await
            .map_err(|e| self.spawn_error(e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DemoError::download_error(first_error_line(&stderr)));
        }

        let info: serde_json::Value = serde_json::from_slice(&output.stdout)
            .map_err(|e| DemoError::download_error(format!("Could not parse source metadata: {}", e)))?;

        let title = info["title"].as_str().map(|s| s.to_string());
        let duration = info["duration"]
            .as_f64()
            .or_else(|| info["duration"].as_u64().map(|d| d as f64));

        Ok((title, duration))
    }

    fn spawn_error(&self, e: std::io::Error) -> DemoError {
        if e.kind() == std::io::ErrorKind::NotFound {
            DemoError::DownloaderMissing
        } else {
            DemoError::download_error(format!("Failed to execute {}: {}", self.binary, e))
        }
    }
}

/// Pull the most useful single line out of yt-dlp's stderr
fn first_error_line(stderr: &str) -> String {
    stderr
        .lines()
        .find(|l| l.contains("ERROR"))
        .or_else(|| stderr.lines().find(|l| !l.trim().is_empty()))
        .unwrap_or("yt-dlp failed with no error output")
        .trim()
        .to_string()
}

/// Render the success report shown after a download completes
pub fn success_report(audio: &DownloadedAudio, format: DownloadFormat, quality: &str) -> String {
    let title = audio.title.as_deref().unwrap_or("Unknown");
    let duration = audio.duration_seconds.unwrap_or(0.0);
    let file_name = audio
        .path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    format!(
        "# 🎉 YouTube Audio Downloaded!\n\n\
         ## 📺 Video Information\n\
         - **Title:** `{}`\n\
         - **Duration:** `{:.0}s` ({:.1} minutes)\n\n\
         ## 🎵 Download Details\n\
         - **Format:** `{}`\n\
         - **Quality:** `{} kbps`\n\
         - **File:** `{}`\n\
         - **Location:** `{}`\n\n\
         ---\n\
         ✅ **Ready for analysis!**\n",
        title,
        duration,
        duration / 60.0,
        format.extension().to_uppercase(),
        quality,
        file_name,
        audio.path.display()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_empty_url_is_rejected_inline() {
        let dir = TempDir::new().unwrap();
        let dl = YtDlpDownloader::new(dir.path());

        let err = dl.download("   ", DownloadFormat::Wav, "128").await.unwrap_err();
        assert!(!err.is_fatal());
        assert!(err.to_string().contains("No URL supplied"));
    }

    #[tokio::test]
    async fn test_missing_binary_surfaces_as_error_not_panic() {
        let dir = TempDir::new().unwrap();
        let dl = YtDlpDownloader::new(dir.path()).with_binary("yt-dlp-definitely-not-installed");

        let err = dl
            .download("https://youtube.com/watch?v=x", DownloadFormat::Wav, "128")
            .await
            .unwrap_err();
        assert!(matches!(err, DemoError::DownloaderMissing));
        assert!(!err.is_fatal());
    }

    #[tokio::test]
    async fn test_failing_binary_surfaces_stderr() {
        let dir = TempDir::new().unwrap();
        // `false` exits non-zero with no output
        let dl = YtDlpDownloader::new(dir.path()).with_binary("false");

        let err = dl
            .download("https://youtube.com/watch?v=x", DownloadFormat::Mp3, "192")
            .await
            .unwrap_err();
        assert!(matches!(err, DemoError::DownloadError { .. }));
    }

    #[test]
    fn test_format_parse() {
        assert_eq!(DownloadFormat::parse("WAV").unwrap(), DownloadFormat::Wav);
        assert_eq!(DownloadFormat::parse("mp3").unwrap(), DownloadFormat::Mp3);
        assert!(DownloadFormat::parse("flac").is_err());
    }

    #[test]
    fn test_first_error_line_prefers_error_marker() {
        let stderr = "WARNING: something\nERROR: Video unavailable\nmore noise";
        assert_eq!(first_error_line(stderr), "ERROR: Video unavailable");
        assert_eq!(first_error_line(""), "yt-dlp failed with no error output");
    }

    #[test]
    fn test_success_report_contents() {
        let audio = DownloadedAudio {
            path: std::path::PathBuf::from("/tmp/youtube_audio_1_0.wav"),
            title: Some("Test Song".into()),
            duration_seconds: Some(125.0),
        };
        let report = success_report(&audio, DownloadFormat::Wav, "128");
        assert!(report.contains("Test Song"));
        assert!(report.contains("`WAV`"));
        assert!(report.contains("youtube_audio_1_0.wav"));
        assert!(report.contains("Ready for analysis"));
    }
}
