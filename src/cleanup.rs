//! Startup cleanup sweep for the temp directory
//!
//! Deletes files whose modification time is older than the configured
//! retention window. Runs once, synchronously, before the server accepts
//! requests. Per-file failures are logged and skipped; the sweep never
//! aborts startup.

use std::path::Path;
use std::time::{Duration, SystemTime};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

const SECONDS_PER_DAY: u64 = 86_400;

/// Summary of one cleanup sweep
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SweepStats {
    /// Files deleted
    pub deleted: u64,
    /// Total bytes reclaimed
    pub bytes: u64,
}

/// Delete files under `dir` older than `days` days.
///
/// A retention of 0 disables the sweep entirely, as does a missing directory.
pub fn sweep(dir: &Path, days: u32) -> SweepStats {
    if days == 0 || !dir.exists() {
        debug!("Cleanup sweep disabled (days={}, dir exists={})", days, dir.exists());
        return SweepStats::default();
    }

    let cutoff = SystemTime::now() - Duration::from_secs(u64::from(days) * SECONDS_PER_DAY);
    let stats = sweep_older_than(dir, cutoff);

    if stats.deleted > 0 {
        info!(
            "Cleaned up {} files ({:.2} MB) older than {} days",
            stats.deleted,
            stats.bytes as f64 / (1024.0 * 1024.0),
            days
        );
    }

    stats
}

/// Delete every file under `dir` modified before `cutoff`.
///
/// Split out from [`sweep`] so the retention boundary is testable without
/// aging files on disk.
pub fn sweep_older_than(dir: &Path, cutoff: SystemTime) -> SweepStats {
    let mut stats = SweepStats::default();

    for entry in WalkDir::new(dir).into_iter().filter_map(|e| e.ok()) {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let metadata = match entry.metadata() {
            Ok(m) => m,
            Err(e) => {
                warn!("Cleanup: could not stat {}: {}", path.display(), e);
                continue;
            }
        };

        let modified = match metadata.modified() {
            Ok(t) => t,
            Err(e) => {
                warn!("Cleanup: no mtime for {}: {}", path.display(), e);
                continue;
            }
        };

        if modified >= cutoff {
            continue;
        }

        match std::fs::remove_file(path) {
            Ok(()) => {
                debug!("Cleanup: removed {}", path.display());
                stats.deleted += 1;
                stats.bytes += metadata.len();
            }
            Err(e) => {
                warn!("Cleanup: failed to remove {}: {}", path.display(), e);
            }
        }
    }

    stats
}
