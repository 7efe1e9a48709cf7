//! Budget and dashboard endpoints

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use moneymap_core::models::{
    CardStack, FinancialGoal, Mission, MissionStatus, SpendingReport, UserProfile,
};

use crate::{AppError, AppState};

/// GET /api/budget/:user_id
pub async fn get_budget(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<SpendingReport>, AppError> {
    state.store.get_user(&user_id)?;
    Ok(Json(state.store.get_report(&user_id)?))
}

#[derive(Serialize)]
pub struct ReportSummary {
    pub report_id: String,
    pub period: String,
    pub total_spending: f64,
    pub total_income: f64,
    pub optimization_score: f64,
    pub insight_count: usize,
}

#[derive(Serialize)]
pub struct DashboardResponse {
    pub profile: UserProfile,
    pub goals: Vec<FinancialGoal>,
    pub missions: Vec<Mission>,
    pub total_points: i64,
    pub report: Option<ReportSummary>,
    pub card_stack: Option<CardStack>,
}

/// GET /api/dashboard/:user_id
///
/// Everything the frontend home screen needs in one call. Total points
/// count completed missions only.
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<DashboardResponse>, AppError> {
    let profile = state.store.get_user(&user_id)?;
    let goals = state.store.list_goals(&user_id);
    let missions = state.store.list_missions(&user_id);

    let total_points = missions
        .iter()
        .filter(|m| m.status == MissionStatus::Completed)
        .map(|m| m.points)
        .sum();

    let report = state.store.get_report(&user_id).ok().map(|r| ReportSummary {
        report_id: r.report_id,
        period: r.period,
        total_spending: r.total_spending,
        total_income: r.total_income,
        optimization_score: r.optimization_score,
        insight_count: r.insights.len(),
    });

    Ok(Json(DashboardResponse {
        profile,
        goals,
        missions,
        total_points,
        report,
        card_stack: state.store.get_card_stack(&user_id),
    }))
}
