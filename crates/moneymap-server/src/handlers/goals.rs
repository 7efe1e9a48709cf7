//! Goal-planning endpoints

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use moneymap_core::agents::goal;
use moneymap_core::models::{ChatMessage, FinancialGoal, Priority};

use crate::{AppError, AppState, SuccessResponse};

#[derive(Deserialize, Default)]
pub struct ChatRequest {
    pub message: Option<String>,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

/// POST /api/goals/chat/:user_id
///
/// One conversational turn. An empty history yields a locally generated
/// opener; later turns go through the LLM with the full history.
pub async fn goal_chat(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let profile = state.store.get_user(&user_id)?;

    let message = req
        .message
        .filter(|m| !m.trim().is_empty())
        .map(ChatMessage::user);

    let mut history = state.store.goal_chat(&user_id);
    if let Some(ref message) = message {
        history.push(message.clone());
    }

    let reply = if history.is_empty() {
        goal::opening_message(&profile)
    } else {
        goal::chat(state.require_llm()?, &profile, &history).await?
    };

    // Record the turn only once the reply is in hand, so a failed LLM call
    // leaves no half-recorded conversation behind
    if let Some(message) = message {
        state.store.append_goal_chat(&user_id, message);
    }
    state
        .store
        .append_goal_chat(&user_id, ChatMessage::assistant(reply.clone()));
    Ok(Json(ChatResponse { reply }))
}

/// POST /api/goals/finalize/:user_id
///
/// Extracts the goals discussed so far into stored records. Finalizing
/// before any conversation is a 400.
pub async fn goal_finalize(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<FinancialGoal>>, AppError> {
    let profile = state.store.get_user(&user_id)?;

    let history = state.store.goal_chat(&user_id);
    if history.is_empty() {
        return Err(AppError::bad_request("No goal conversation to finalize"));
    }

    let goals = goal::finalize(state.require_llm()?, &profile, &history).await?;
    info!(user_id = %user_id, count = goals.len(), "Goals finalized");
    state.store.add_goals(&user_id, goals.clone());
    Ok(Json(goals))
}

/// GET /api/goals/:user_id
pub async fn list_goals(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<FinancialGoal>>, AppError> {
    state.store.get_user(&user_id)?;
    Ok(Json(state.store.list_goals(&user_id)))
}

/// GET /api/goals/:user_id/:goal_id
pub async fn get_goal(
    State(state): State<Arc<AppState>>,
    Path((user_id, goal_id)): Path<(String, String)>,
) -> Result<Json<FinancialGoal>, AppError> {
    Ok(Json(state.store.get_goal(&user_id, &goal_id)?))
}

#[derive(Deserialize, Default)]
pub struct UpdateGoalRequest {
    pub current_amount: Option<f64>,
    pub title: Option<String>,
    pub priority: Option<String>,
    pub on_roadmap: Option<bool>,
}

/// PATCH /api/goals/:user_id/:goal_id
pub async fn update_goal(
    State(state): State<Arc<AppState>>,
    Path((user_id, goal_id)): Path<(String, String)>,
    Json(req): Json<UpdateGoalRequest>,
) -> Result<Json<FinancialGoal>, AppError> {
    let updated = state.store.update_goal(&user_id, &goal_id, |goal| {
        if let Some(amount) = req.current_amount {
            goal.current_amount = amount;
        }
        if let Some(ref title) = req.title {
            goal.title = title.clone();
        }
        if let Some(ref priority) = req.priority {
            goal.priority = Priority::from_loose(priority);
        }
        if let Some(on_roadmap) = req.on_roadmap {
            goal.on_roadmap = on_roadmap;
        }
    })?;
    Ok(Json(updated))
}

/// DELETE /api/goals/:user_id/:goal_id
pub async fn delete_goal(
    State(state): State<Arc<AppState>>,
    Path((user_id, goal_id)): Path<(String, String)>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.store.delete_goal(&user_id, &goal_id)?;
    Ok(Json(SuccessResponse { success: true }))
}
