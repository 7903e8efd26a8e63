use crate::errors::AppError;
use crate::models::{
    CategoryCount, CreateGoalRequest, Goal, GoalHistoryPoint, OverallStatsResponse,
    TodayStatsResponse, UpdateStatusRequest, WeeklyHistoryPoint,
};
use crate::state::AppState;
use crate::stats;
use crate::storage::persist_data;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

const DEFAULT_LEADER_LIMIT: usize = 5;

#[derive(Debug, Deserialize)]
pub struct LeadersQuery {
    pub limit: Option<usize>,
}

pub async fn list_goals(State(state): State<AppState>) -> Json<Vec<Goal>> {
    let engine = state.engine.lock().await;
    Json(engine.goals().to_vec())
}

pub async fn create_goal(
    State(state): State<AppState>,
    Json(payload): Json<CreateGoalRequest>,
) -> Result<(StatusCode, Json<Goal>), AppError> {
    if payload.title.trim().is_empty() {
        return Err(AppError::bad_request("title must not be blank"));
    }
    if payload.target_count == 0 {
        return Err(AppError::bad_request("target_count must be positive"));
    }

    let mut engine = state.engine.lock().await;
    let goal = engine.create_goal(payload);
    info!("created goal {}", goal.id);
    persist(&state, &engine).await;

    Ok((StatusCode::CREATED, Json(goal)))
}

pub async fn toggle_completion(
    State(state): State<AppState>,
    Path(goal_id): Path<Uuid>,
) -> Result<Json<Goal>, AppError> {
    let mut engine = state.engine.lock().await;
    let goal = engine
        .toggle_completion(goal_id)
        .ok_or_else(|| AppError::not_found(format!("no goal {goal_id}")))?
        .clone();
    persist(&state, &engine).await;

    Ok(Json(goal))
}

pub async fn update_status(
    State(state): State<AppState>,
    Path(goal_id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<Goal>, AppError> {
    let mut engine = state.engine.lock().await;
    let goal = engine
        .update_status(goal_id, payload.status)
        .ok_or_else(|| AppError::not_found(format!("no goal {goal_id}")))?
        .clone();
    persist(&state, &engine).await;

    Ok(Json(goal))
}

pub async fn delete_goal(
    State(state): State<AppState>,
    Path(goal_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let mut engine = state.engine.lock().await;
    if !engine.delete_goal(goal_id) {
        return Err(AppError::not_found(format!("no goal {goal_id}")));
    }
    info!("deleted goal {goal_id}");
    persist(&state, &engine).await;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn goal_history(
    State(state): State<AppState>,
    Path(goal_id): Path<Uuid>,
) -> Result<Json<Vec<GoalHistoryPoint>>, AppError> {
    let engine = state.engine.lock().await;
    let history = stats::goal_history(engine.today(), engine.data(), goal_id)
        .ok_or_else(|| AppError::not_found(format!("no goal {goal_id}")))?;
    Ok(Json(history))
}

pub async fn today_stats(State(state): State<AppState>) -> Json<TodayStatsResponse> {
    let engine = state.engine.lock().await;
    Json(stats::today_stats(engine.today(), engine.data()))
}

pub async fn overall_stats(State(state): State<AppState>) -> Json<OverallStatsResponse> {
    let engine = state.engine.lock().await;
    Json(stats::overall_stats(engine.data()))
}

pub async fn category_breakdown(State(state): State<AppState>) -> Json<Vec<CategoryCount>> {
    let engine = state.engine.lock().await;
    Json(stats::category_breakdown(engine.data()))
}

pub async fn streak_leaders(
    State(state): State<AppState>,
    Query(query): Query<LeadersQuery>,
) -> Json<Vec<Goal>> {
    let engine = state.engine.lock().await;
    let limit = query.limit.unwrap_or(DEFAULT_LEADER_LIMIT);
    Json(stats::streak_leaders(engine.data(), limit))
}

pub async fn weekly_history(State(state): State<AppState>) -> Json<Vec<WeeklyHistoryPoint>> {
    let engine = state.engine.lock().await;
    Json(stats::weekly_history(engine.today(), engine.data()))
}

/// Durability is best-effort: a failed write is logged and the in-memory
/// mutation stands, so the response always reflects the engine state.
async fn persist(state: &AppState, engine: &crate::engine::GoalEngine) {
    if let Err(err) = persist_data(&state.data_path, engine.data()).await {
        warn!("failed to persist goal state: {}", err.message);
    }
}
