use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, post},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/state", get(handlers::get_state))
        .route("/api/chores", post(handlers::add_chore))
        .route("/api/chores/:id", delete(handlers::delete_chore))
        .route("/api/chores/:id/edit", post(handlers::begin_chore_edit))
        .route("/api/chores/:id/cancel", post(handlers::cancel_chore_edit))
        .route("/api/chores/:id/save", post(handlers::save_chore_edit))
        .route("/api/chores/:id/complete", post(handlers::complete_chore))
        .route("/api/rewards", post(handlers::add_reward))
        .route("/api/rewards/:id", delete(handlers::delete_reward))
        .route("/api/rewards/:id/edit", post(handlers::begin_reward_edit))
        .route("/api/rewards/:id/cancel", post(handlers::cancel_reward_edit))
        .route("/api/rewards/:id/save", post(handlers::save_reward_edit))
        .route("/api/rewards/:id/redeem", post(handlers::redeem_reward))
        .route("/api/transactions/:id/undo", post(handlers::undo_transaction))
        .route("/api/settings/sort", post(handlers::set_sort))
        .route("/api/settings/theme", post(handlers::toggle_theme))
        .route("/api/export", get(handlers::export))
        .route("/api/import", post(handlers::import))
        .with_state(state)
}
