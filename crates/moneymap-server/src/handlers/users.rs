//! User onboarding

use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use tracing::info;

use moneymap_core::models::UserProfile;
use moneymap_core::statement::parse_csv_statement;

use crate::{AppError, AppState};

#[derive(Serialize)]
pub struct OnboardResponse {
    pub user_id: String,
    pub message: String,
    pub next_step: String,
}

/// POST /api/users/onboard
///
/// Multipart form: `age`, `annual_income`, `debts` (JSON array string),
/// optional `bank_statement` CSV file. Creates the profile and, when a
/// statement is attached, its first spending report.
pub async fn onboard_user(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<OnboardResponse>, AppError> {
    let mut age: Option<u32> = None;
    let mut annual_income: Option<f64> = None;
    let mut debts: Vec<serde_json::Value> = Vec::new();
    let mut statement: Option<Vec<u8>> = None;

    while let Some(field) = multipart.next_field().await? {
        match field.name().unwrap_or("") {
            "age" => {
                let text = field.text().await?;
                age = Some(
                    text.trim()
                        .parse()
                        .map_err(|_| AppError::bad_request("Invalid age"))?,
                );
            }
            "annual_income" => {
                let text = field.text().await?;
                annual_income = Some(
                    text.trim()
                        .parse()
                        .map_err(|_| AppError::bad_request("Invalid annual_income"))?,
                );
            }
            "debts" => {
                let text = field.text().await?;
                debts = serde_json::from_str(&text)
                    .map_err(|_| AppError::bad_request("debts must be a JSON array"))?;
            }
            "bank_statement" => {
                statement = Some(field.bytes().await?.to_vec());
            }
            other => {
                info!(field = other, "Ignoring unknown onboarding field");
            }
        }
    }

    let age = age.ok_or_else(|| AppError::bad_request("Missing field: age"))?;
    let annual_income =
        annual_income.ok_or_else(|| AppError::bad_request("Missing field: annual_income"))?;

    let user_id = format!("user_{}", Utc::now().timestamp_millis());
    let profile = UserProfile {
        user_id: user_id.clone(),
        age,
        annual_income,
        debts,
        created_at: Utc::now(),
    };
    state.store.insert_user(profile);

    let next_step = if let Some(data) = statement {
        let report = parse_csv_statement(&data, &user_id, &state.categorizer()).await?;
        info!(
            user_id = %user_id,
            transactions = report.transactions.len(),
            score = report.optimization_score,
            "Onboarding statement parsed"
        );
        state.store.set_report(report);
        "goal_planning"
    } else {
        "upload_statement"
    };

    Ok(Json(OnboardResponse {
        user_id,
        message: "Welcome to MoneyMap! Your profile has been created.".to_string(),
        next_step: next_step.to_string(),
    }))
}
