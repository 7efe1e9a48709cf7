//! Gamified mission roadmaps for financial goals
//!
//! A goal's time horizon picks a cadence bucket (interval + mission cap),
//! the LLM drafts the missions, and a deterministic fallback plan takes
//! over whenever the LLM is unavailable or returns nothing usable.
//! Roadmap generation never errors.

use chrono::Utc;
use serde::Deserialize;
use tracing::warn;

use crate::ai::{parsing, LlmBackend, LlmClient};
use crate::models::{FinancialGoal, Mission, MissionStatus, MissionType};

/// Mission cadence derived from the goal's time horizon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoadmapPlan {
    /// Days between consecutive mission deadlines
    pub interval_days: i64,
    /// Number of missions to generate
    pub count: usize,
}

/// Derive the cadence for a goal `days_remaining` from today.
///
/// Non-positive horizons (past-due goals) are treated as 30 days out.
/// The mission count always lands in 5..=30.
pub fn plan_for_horizon(days_remaining: i64) -> RoadmapPlan {
    let days = if days_remaining <= 0 { 30 } else { days_remaining };

    let (interval_days, cap) = match days {
        0..=120 => (7, 12),
        121..=365 => (14, 20),
        366..=720 => (30, 24),
        _ => (180, 24),
    };

    let count = ((days / interval_days) as usize).min(cap).clamp(5, 30);
    RoadmapPlan {
        interval_days,
        count,
    }
}

/// Mission shape the LLM is asked to return
#[derive(Debug, Deserialize)]
struct DraftMission {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    mission_type: String,
    #[serde(default)]
    days_from_start: i64,
    #[serde(default)]
    points: Option<i64>,
    #[serde(default)]
    milestone_percent: Option<f64>,
}

/// Default points by position: opener 100, closer 150, everything else 50
fn default_points(index: usize, total: usize) -> i64 {
    if index == 0 {
        100
    } else if index + 1 == total {
        150
    } else {
        50
    }
}

/// Generate a mission roadmap for a goal.
///
/// Asks the LLM for a drafted sequence sized by [`plan_for_horizon`]; any
/// failure (backend error, unparsable reply, empty draft) degrades to the
/// deterministic fallback roadmap.
pub async fn generate_roadmap(goal: &FinancialGoal, llm: &LlmClient) -> Vec<Mission> {
    let today = Utc::now().date_naive();
    let days_remaining = (goal.target_date - today).num_days();
    let plan = plan_for_horizon(days_remaining);

    let months = (days_remaining / 30).max(1);
    let monthly_savings_needed = (goal.target_amount - goal.current_amount) / months as f64;

    let system = format!(
        "You are a financial mission designer. Create a gamified roadmap of small, \
         concrete missions that lead to the user's goal. Respond with ONLY a JSON array \
         of exactly {count} missions: {{\"title\", \"description\", \"mission_type\" \
         (savings, spending, investment, debt, or learning), \"days_from_start\" \
         (integer), \"points\" (integer), \"milestone_percent\" (optional number)}}. \
         Space missions roughly {interval} days apart.",
        count = plan.count,
        interval = plan.interval_days,
    );
    let prompt = format!(
        "Goal: {title}\nDescription: {description}\nTarget amount: ${target:.2}\n\
         Current amount: ${current:.2}\nTarget date: {date}\nDays remaining: {days}\n\
         Monthly savings needed: ${monthly:.2}",
        title = goal.title,
        description = goal.description,
        target = goal.target_amount,
        current = goal.current_amount,
        date = goal.target_date,
        days = days_remaining.max(0),
        monthly = monthly_savings_needed,
    );

    let drafts = match llm.chat(&system, &[crate::models::ChatMessage::user(prompt)]).await {
        Ok(reply) => match parsing::parse_array::<DraftMission>(&reply) {
            Ok(drafts) if !drafts.is_empty() => Some(drafts),
            Ok(_) => {
                warn!(goal_id = %goal.goal_id, "LLM returned an empty mission list");
                None
            }
            Err(e) => {
                warn!(goal_id = %goal.goal_id, "Unparsable mission draft: {}", e);
                None
            }
        },
        Err(e) => {
            warn!(goal_id = %goal.goal_id, "LLM unavailable for roadmap: {}", e);
            None
        }
    };

    match drafts {
        Some(drafts) => {
            let total = drafts.len().min(plan.count);
            drafts
                .into_iter()
                .take(plan.count)
                .enumerate()
                .map(|(i, draft)| Mission {
                    mission_id: format!("{}_m{}", goal.goal_id, i + 1),
                    user_id: goal.user_id.clone(),
                    title: draft.title,
                    description: draft.description,
                    mission_type: MissionType::from_loose(&draft.mission_type),
                    deadline: today
                        + chrono::Duration::days(draft.days_from_start + plan.interval_days),
                    points: draft.points.unwrap_or_else(|| default_points(i, total)),
                    status: MissionStatus::Active,
                    goal_id: Some(goal.goal_id.clone()),
                    milestone_percent: draft.milestone_percent,
                })
                .collect()
        }
        None => fallback_roadmap(goal, plan),
    }
}

const FALLBACK_MISSIONS: &[(&str, &str, MissionType)] = &[
    (
        "Set Up Savings Plan",
        "Decide how much to put aside each period and where it will live",
        MissionType::Learning,
    ),
    (
        "First Deposit",
        "Make your first transfer toward the goal, any amount counts",
        MissionType::Savings,
    ),
    (
        "Track Spending",
        "Log every purchase for one week to see where money goes",
        MissionType::Spending,
    ),
    (
        "No-Spend Day",
        "Pick one day with zero discretionary spending",
        MissionType::Spending,
    ),
    (
        "Automate Savings",
        "Schedule an automatic recurring transfer toward the goal",
        MissionType::Savings,
    ),
    (
        "Review & Adjust",
        "Check progress against the target and adjust the plan if needed",
        MissionType::Learning,
    ),
    (
        "Savings Boost Week",
        "Cut one recurring expense and redirect it to the goal",
        MissionType::Savings,
    ),
    (
        "Celebrate Progress",
        "Review how far you've come and set the pace for the rest",
        MissionType::Learning,
    ),
];

/// Deterministic roadmap used when the LLM cannot produce one.
///
/// At most eight missions with strictly increasing deadlines spaced by the
/// plan's interval.
pub fn fallback_roadmap(goal: &FinancialGoal, plan: RoadmapPlan) -> Vec<Mission> {
    let today = Utc::now().date_naive();
    let count = plan.count.min(FALLBACK_MISSIONS.len());

    FALLBACK_MISSIONS
        .iter()
        .take(count)
        .enumerate()
        .map(|(i, (title, description, mission_type))| Mission {
            mission_id: format!("{}_m{}", goal.goal_id, i + 1),
            user_id: goal.user_id.clone(),
            title: title.to_string(),
            description: description.to_string(),
            mission_type: *mission_type,
            deadline: today + chrono::Duration::days(plan.interval_days * (i as i64 + 1)),
            points: default_points(i, count),
            status: MissionStatus::Active,
            goal_id: Some(goal.goal_id.clone()),
            milestone_percent: None,
        })
        .collect()
}
