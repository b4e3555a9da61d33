pub mod app;
pub mod catalog;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod ledger;
pub mod models;
pub mod reset;
pub mod snapshot;
pub mod state;
pub mod storage;
pub mod tracker;
pub mod ui;

pub use app::router;
pub use config::Config;
pub use errors::{AppError, TrackerError};
pub use state::AppState;
pub use storage::{load_snapshot, persist_snapshot};
pub use tracker::Tracker;
