//! Credit-optimization endpoints

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use tracing::info;

use moneymap_core::agents::credit;
use moneymap_core::models::{CardStack, ChatMessage};

use crate::{AppError, AppState};

use super::goals::{ChatRequest, ChatResponse};

/// POST /api/credit/chat/:user_id
pub async fn credit_chat(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let profile = state.store.get_user(&user_id)?;

    let message = req
        .message
        .filter(|m| !m.trim().is_empty())
        .map(ChatMessage::user);

    let mut history = state.store.credit_chat(&user_id);
    if let Some(ref message) = message {
        history.push(message.clone());
    }

    let reply = if history.is_empty() {
        credit::opening_message(&profile)
    } else {
        credit::chat(state.require_llm()?, &profile, &history).await?
    };

    // Record the turn only once the reply is in hand, so a failed LLM call
    // leaves no half-recorded conversation behind
    if let Some(message) = message {
        state.store.append_credit_chat(&user_id, message);
    }
    state
        .store
        .append_credit_chat(&user_id, ChatMessage::assistant(reply.clone()));
    Ok(Json(ChatResponse { reply }))
}

/// POST /api/credit/finalize/:user_id
///
/// Produces and stores the recommended card stack. Finalizing before any
/// conversation is a 400.
pub async fn credit_finalize(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<CardStack>, AppError> {
    let profile = state.store.get_user(&user_id)?;

    let history = state.store.credit_chat(&user_id);
    if history.is_empty() {
        return Err(AppError::bad_request("No credit conversation to finalize"));
    }

    let stack = credit::finalize(state.require_llm()?, &profile, &history).await?;
    info!(user_id = %user_id, cards = stack.cards.len(), "Card stack finalized");
    state.store.set_card_stack(&user_id, stack.clone());
    Ok(Json(stack))
}
