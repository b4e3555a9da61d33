use crate::errors::{AppError, TrackerError};
use crate::snapshot::{Snapshot, SnapshotPatch};
use chrono::Local;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, warn};

/// Reads the saved state, merged onto defaults.
///
/// A file that does not parse is copied aside before defaults are returned,
/// since the next save overwrites `path`. Only I/O failures are errors: if the
/// file cannot be read or backed up, startup must stop rather than clobber it.
pub async fn load_snapshot(path: &Path) -> std::io::Result<Snapshot> {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            warn!("no data file at {}, starting fresh", path.display());
            return Ok(Snapshot::default());
        }
        Err(err) => return Err(err),
    };

    match parse_snapshot(&bytes) {
        Ok(snapshot) => Ok(snapshot),
        Err(err) => {
            let backup = backup_path(path);
            fs::copy(path, &backup).await?;
            error!(
                "failed to parse data file: {err}; original kept at {}",
                backup.display()
            );
            Ok(Snapshot::default())
        }
    }
}

fn parse_snapshot(bytes: &[u8]) -> Result<Snapshot, TrackerError> {
    let patch: SnapshotPatch = serde_json::from_slice(bytes)
        .map_err(|err| TrackerError::ImportFormat(err.to_string()))?;
    patch.check()?;
    Ok(Snapshot::default().merge(patch))
}

/// `state.json` -> `state.json.20260105T101500.bad`
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(format!(".{}.bad", Local::now().format("%Y%m%dT%H%M%S%.3f")));
    PathBuf::from(name)
}

pub async fn persist_snapshot(path: &Path, snapshot: &Snapshot) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(snapshot).map_err(AppError::internal)?;
    fs::write(path, payload).await.map_err(AppError::internal)?;
    Ok(())
}
