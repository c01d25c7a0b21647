//! HTTP route handlers
//!
//! One JSON endpoint per widget action, plus the page itself and static
//! file serving confined to the two configured roots. Request handlers
//! always answer 200 with an error-formatted report on failure; nothing
//! here can take the server down.

use crate::analysis::run_analysis;
use crate::download::{self, DownloadFormat};
use crate::error::DemoError;
use crate::server::AppState;
use crate::types::{unique_output_stem, AnalysisReport, AudioFormat};
use axum::extract::{Multipart, State};
use axum::response::Html;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, warn};

// =============================================================================
// Wire types
// =============================================================================

#[derive(Debug, Serialize)]
pub struct SampleJson {
    pub name: String,
    pub path: String,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub path: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DownloadRequest {
    pub url: String,
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default = "default_quality")]
    pub quality: String,
}

fn default_format() -> String {
    "wav".to_string()
}

fn default_quality() -> String {
    "128".to_string()
}

#[derive(Debug, Serialize)]
pub struct DownloadResponse {
    pub path: Option<String>,
    pub report: String,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub options: Vec<String>,
}

/// The four-tuple: one report, three audio-url-or-null slots, fixed order
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub report: String,
    pub artifacts: [Option<String>; 3],
}

// =============================================================================
// Handlers
// =============================================================================

/// GET / - the widget tree
pub async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(crate::server::page::render(&state))
}

/// GET /api/samples - quick-pick sample list
pub async fn list_samples(State(state): State<Arc<AppState>>) -> Json<Vec<SampleJson>> {
    let samples = state
        .samples
        .iter()
        .map(|s| SampleJson {
            name: s.name.clone(),
            path: s.path.to_string_lossy().into_owned(),
            url: sample_url(&s.path),
        })
        .collect();
    Json(samples)
}

/// POST /api/upload - save an uploaded audio file into the temp directory
pub async fn upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Json<UploadResponse> {
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("file") {
            continue;
        }

        let original_name = field.file_name().unwrap_or("upload").to_string();
        let ext = Path::new(&original_name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        if AudioFormat::from_extension(&ext).is_none() {
            return Json(UploadResponse {
                path: None,
                error: Some(format!(
                    "Unsupported file type '.{}'. Supported: {}",
                    ext,
                    crate::error::SUPPORTED_FORMATS
                )),
            });
        }

        let bytes = match field.bytes().await {
            Ok(b) => b,
            Err(e) => {
                warn!("Upload aborted: {}", e);
                return Json(UploadResponse {
                    path: None,
                    error: Some(format!("Upload failed: {}", e)),
                });
            }
        };

        let dest = state
            .settings
            .temp_dir
            .join(format!("{}.{}", unique_output_stem("upload"), ext));

        if let Err(e) = tokio::fs::write(&dest, &bytes).await {
            error!("Could not save upload to {}: {}", dest.display(), e);
            return Json(UploadResponse {
                path: None,
                error: Some(DemoError::output_error(dest, e).to_string()),
            });
        }

        return Json(UploadResponse {
            path: Some(dest.to_string_lossy().into_owned()),
            error: None,
        });
    }

    Json(UploadResponse {
        path: None,
        error: Some("No file field in upload".to_string()),
    })
}

/// POST /api/download - fetch audio from a URL via the downloader adapter
pub async fn download(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DownloadRequest>,
) -> Json<DownloadResponse> {
    let format = match DownloadFormat::parse(&req.format) {
        Ok(f) => f,
        Err(e) => {
            return Json(DownloadResponse {
                path: None,
                report: e.user_message(),
            })
        }
    };

    match state.downloader.download(&req.url, format, &req.quality).await {
        Ok(audio) => {
            let report = download::success_report(&audio, format, &req.quality);
            Json(DownloadResponse {
                path: Some(audio.path.to_string_lossy().into_owned()),
                report,
            })
        }
        Err(e) => {
            warn!("Download failed: {}", e);
            Json(DownloadResponse {
                path: None,
                report: e.user_message(),
            })
        }
    }
}

/// POST /api/analyze - the single click handler
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeRequest>,
) -> Json<AnalyzeResponse> {
    let path = req.path.map(PathBuf::from);

    // Enforce the allowed-paths rule before touching the filesystem
    if let Some(p) = &path {
        if !p.as_os_str().is_empty() && !is_allowed_path(&state, p) {
            let report = DemoError::analysis_error(
                p.clone(),
                "path is outside the samples and temp directories",
            )
            .user_message();
            return Json(AnalyzeResponse {
                report,
                artifacts: Default::default(),
            });
        }
    }

    // Analysis decodes and renders synchronously; keep it off the IO workers
    let analyzer = Arc::clone(&state.analyzer);
    let options = req.options;
    let report = tokio::task::spawn_blocking(move || {
        run_analysis(analyzer.as_ref(), path.as_deref(), &options)
    })
    .await
    .unwrap_or_else(|e| {
        error!("Analysis task panicked: {}", e);
        AnalysisReport::text_only(
            DemoError::analysis_error("<task>", "analysis task failed unexpectedly").user_message(),
        )
    });

    Json(to_response(&state, report))
}

// =============================================================================
// Helpers
// =============================================================================

/// Map an analysis report to the wire shape, rewriting artifact paths to
/// `/files/temp/...` URLs
fn to_response(state: &AppState, report: AnalysisReport) -> AnalyzeResponse {
    let artifacts = report.artifacts.map(|slot| {
        slot.and_then(|p| {
            p.strip_prefix(&state.settings.temp_dir)
                .ok()
                .map(|rel| format!("/files/temp/{}", rel.to_string_lossy()))
        })
    });

    AnalyzeResponse {
        report: report.markdown,
        artifacts,
    }
}

fn sample_url(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("/files/samples/{}", name)
}

/// A request path is served only from the two configured roots
fn is_allowed_path(state: &AppState, path: &Path) -> bool {
    let canonical = match path.canonicalize() {
        Ok(c) => c,
        // Nonexistent paths pass through so the boundary can render its
        // file-not-found report
        Err(_) => return true,
    };

    for root in [&state.settings.samples_dir, &state.settings.temp_dir] {
        if let Ok(root) = root.canonicalize() {
            if canonical.starts_with(&root) {
                return true;
            }
        }
    }

    false
}
