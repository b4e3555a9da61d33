use crate::errors::AppError;
use crate::storage::persist_snapshot;
use crate::tracker::Tracker;
use chrono::Local;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub tracker: Arc<Mutex<Tracker>>,
}

impl AppState {
    pub fn new(data_path: PathBuf, tracker: Tracker) -> Self {
        Self {
            data_path,
            tracker: Arc::new(Mutex::new(tracker)),
        }
    }

    /// Runs the daily reset against the local date and saves if it pruned
    /// anything or moved the marker.
    pub async fn check_daily_reset(&self) -> Result<bool, AppError> {
        let mut tracker = self.tracker.lock().await;
        let before = tracker.clone();
        if !tracker.run_daily_reset(Local::now().date_naive()) {
            return Ok(false);
        }
        // Unsaved, the reset is undone so the next tick tries again.
        if let Err(err) = persist_snapshot(&self.data_path, &tracker.snapshot()).await {
            *tracker = before;
            return Err(err);
        }
        Ok(true)
    }
}
