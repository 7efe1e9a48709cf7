//! Mission roadmap endpoints

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use moneymap_core::missions::{fallback_roadmap, generate_roadmap, plan_for_horizon};
use moneymap_core::models::{Mission, MissionStatus};

use crate::{AppError, AppState};

/// POST /api/goals/:user_id/:goal_id/missions/generate
///
/// Builds the roadmap for one goal and marks it as on the roadmap. Without
/// an LLM backend the deterministic fallback plan is used directly.
pub async fn generate_missions(
    State(state): State<Arc<AppState>>,
    Path((user_id, goal_id)): Path<(String, String)>,
) -> Result<Json<Vec<Mission>>, AppError> {
    let goal = state.store.get_goal(&user_id, &goal_id)?;

    let missions = match state.llm {
        Some(ref llm) => generate_roadmap(&goal, llm).await,
        None => {
            let days = (goal.target_date - Utc::now().date_naive()).num_days();
            fallback_roadmap(&goal, plan_for_horizon(days))
        }
    };

    info!(goal_id = %goal_id, count = missions.len(), "Mission roadmap generated");
    state.store.add_missions(&user_id, missions.clone());
    state
        .store
        .update_goal(&user_id, &goal_id, |g| g.on_roadmap = true)?;

    Ok(Json(missions))
}

#[derive(Deserialize)]
pub struct UpdateMissionRequest {
    pub status: String,
}

/// PATCH /api/goals/:user_id/:goal_id/missions/:mission_id
pub async fn update_mission_status(
    State(state): State<Arc<AppState>>,
    Path((user_id, goal_id, mission_id)): Path<(String, String, String)>,
    Json(req): Json<UpdateMissionRequest>,
) -> Result<Json<Mission>, AppError> {
    let status: MissionStatus = req
        .status
        .parse()
        .map_err(|_| AppError::bad_request("status must be active, completed, or failed"))?;

    let mission = state
        .store
        .set_mission_status(&user_id, &goal_id, &mission_id, status)?;
    Ok(Json(mission))
}

/// GET /api/missions/:user_id
pub async fn list_missions(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Mission>>, AppError> {
    state.store.get_user(&user_id)?;
    Ok(Json(state.store.list_missions(&user_id)))
}
