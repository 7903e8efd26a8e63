use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, post},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/goals", get(handlers::list_goals).post(handlers::create_goal))
        .route("/api/goals/:id", delete(handlers::delete_goal))
        .route("/api/goals/:id/toggle", post(handlers::toggle_completion))
        .route("/api/goals/:id/status", post(handlers::update_status))
        .route("/api/goals/:id/history", get(handlers::goal_history))
        .route("/api/stats/today", get(handlers::today_stats))
        .route("/api/stats/overall", get(handlers::overall_stats))
        .route("/api/stats/categories", get(handlers::category_breakdown))
        .route("/api/stats/leaders", get(handlers::streak_leaders))
        .route("/api/stats/weekly", get(handlers::weekly_history))
        .with_state(state)
}
