use crate::errors::{AppError, TrackerError};
use crate::models::{ItemId, ItemRequest, SortRequest, TrackerView, TransactionId};
use crate::state::AppState;
use crate::storage::persist_snapshot;
use crate::tracker::Tracker;
use crate::ui::render_index;
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::header,
    response::{Html, IntoResponse},
};
use tracing::{error, info};

pub const EXPORT_FILE_NAME: &str = "chore-tracker-data.json";

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let tracker = state.tracker.lock().await;
    Html(render_index(&tracker.view()))
}

pub async fn get_state(State(state): State<AppState>) -> Json<TrackerView> {
    let tracker = state.tracker.lock().await;
    Json(tracker.view())
}

pub async fn add_chore(
    State(state): State<AppState>,
    payload: Result<Json<ItemRequest>, JsonRejection>,
) -> Result<Json<TrackerView>, AppError> {
    let Json(payload) = payload?;
    apply(&state, |t| t.add_chore(&payload.name, payload.value)).await
}

pub async fn delete_chore(
    State(state): State<AppState>,
    Path(id): Path<ItemId>,
) -> Result<Json<TrackerView>, AppError> {
    apply(&state, |t| t.remove_chore(id)).await
}

pub async fn begin_chore_edit(
    State(state): State<AppState>,
    Path(id): Path<ItemId>,
) -> Result<Json<TrackerView>, AppError> {
    apply(&state, |t| t.begin_chore_edit(id)).await
}

pub async fn cancel_chore_edit(
    State(state): State<AppState>,
    Path(id): Path<ItemId>,
) -> Result<Json<TrackerView>, AppError> {
    apply(&state, |t| t.cancel_chore_edit(id)).await
}

pub async fn save_chore_edit(
    State(state): State<AppState>,
    Path(id): Path<ItemId>,
    payload: Result<Json<ItemRequest>, JsonRejection>,
) -> Result<Json<TrackerView>, AppError> {
    let Json(payload) = payload?;
    apply(&state, |t| t.save_chore_edit(id, &payload.name, payload.value)).await
}

pub async fn complete_chore(
    State(state): State<AppState>,
    Path(id): Path<ItemId>,
) -> Result<Json<TrackerView>, AppError> {
    apply(&state, |t| t.complete_chore(id)).await
}

pub async fn add_reward(
    State(state): State<AppState>,
    payload: Result<Json<ItemRequest>, JsonRejection>,
) -> Result<Json<TrackerView>, AppError> {
    let Json(payload) = payload?;
    apply(&state, |t| t.add_reward(&payload.name, payload.value)).await
}

pub async fn delete_reward(
    State(state): State<AppState>,
    Path(id): Path<ItemId>,
) -> Result<Json<TrackerView>, AppError> {
    apply(&state, |t| t.remove_reward(id)).await
}

pub async fn begin_reward_edit(
    State(state): State<AppState>,
    Path(id): Path<ItemId>,
) -> Result<Json<TrackerView>, AppError> {
    apply(&state, |t| t.begin_reward_edit(id)).await
}

pub async fn cancel_reward_edit(
    State(state): State<AppState>,
    Path(id): Path<ItemId>,
) -> Result<Json<TrackerView>, AppError> {
    apply(&state, |t| t.cancel_reward_edit(id)).await
}

pub async fn save_reward_edit(
    State(state): State<AppState>,
    Path(id): Path<ItemId>,
    payload: Result<Json<ItemRequest>, JsonRejection>,
) -> Result<Json<TrackerView>, AppError> {
    let Json(payload) = payload?;
    apply(&state, |t| t.save_reward_edit(id, &payload.name, payload.value)).await
}

pub async fn redeem_reward(
    State(state): State<AppState>,
    Path(id): Path<ItemId>,
) -> Result<Json<TrackerView>, AppError> {
    apply(&state, |t| t.redeem_reward(id)).await
}

pub async fn undo_transaction(
    State(state): State<AppState>,
    Path(id): Path<TransactionId>,
) -> Result<Json<TrackerView>, AppError> {
    apply(&state, |t| t.undo_transaction(id)).await
}

pub async fn set_sort(
    State(state): State<AppState>,
    payload: Result<Json<SortRequest>, JsonRejection>,
) -> Result<Json<TrackerView>, AppError> {
    let Json(payload) = payload?;
    apply(&state, |t| {
        t.set_sort_order(payload.catalog, payload.order);
        Ok(())
    })
    .await
}

pub async fn toggle_theme(State(state): State<AppState>) -> Result<Json<TrackerView>, AppError> {
    apply(&state, |t| Ok(t.toggle_theme())).await
}

pub async fn export(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let tracker = state.tracker.lock().await;
    let body = serde_json::to_string_pretty(&tracker.snapshot()).map_err(AppError::internal)?;
    info!(bytes = body.len(), "state exported");
    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILE_NAME}\""),
            ),
        ],
        body,
    ))
}

pub async fn import(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<TrackerView>, AppError> {
    apply(&state, |t| t.import_document(&body)).await
}

// One intent at a time: lock, apply, save the full snapshot, answer with the
// fresh view. A rejected intent is never saved, and a failed save rolls the
// tracker back so memory never runs ahead of the file.
async fn apply<T>(
    state: &AppState,
    intent: impl FnOnce(&mut Tracker) -> Result<T, TrackerError>,
) -> Result<Json<TrackerView>, AppError> {
    let mut tracker = state.tracker.lock().await;
    let before = tracker.clone();
    intent(&mut tracker)?;
    if let Err(err) = persist_snapshot(&state.data_path, &tracker.snapshot()).await {
        error!("save failed, change rolled back: {}", err.message);
        *tracker = before;
        return Err(err);
    }
    Ok(Json(tracker.view()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn request(name: &str, value: i64) -> Result<Json<ItemRequest>, JsonRejection> {
        Ok(Json(ItemRequest {
            name: name.into(),
            value,
        }))
    }

    #[tokio::test]
    async fn failed_save_rolls_back_the_change() {
        // A directory cannot be written as a file, so every save fails.
        let state = AppState::new(std::env::temp_dir(), Tracker::default());

        let Err(err) = add_chore(State(state.clone()), request("Dishes", 5)).await else {
            panic!("save into a directory should fail");
        };
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);

        let tracker = state.tracker.lock().await;
        assert_eq!(*tracker, Tracker::default());
        assert!(tracker.view().chores.is_empty());
    }

    #[tokio::test]
    async fn rejected_intent_is_not_saved() {
        let state = AppState::new(std::env::temp_dir(), Tracker::default());

        let Err(err) = add_chore(State(state.clone()), request("  ", 5)).await else {
            panic!("blank name should be rejected");
        };
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }
}
