//! Offline mission roadmap preview
//!
//! Shows the deterministic fallback roadmap for a goal without any LLM,
//! useful for checking cadence before wiring up a backend.

use anyhow::{anyhow, Result};
use chrono::{NaiveDate, Utc};

use moneymap_core::missions::{fallback_roadmap, plan_for_horizon};
use moneymap_core::models::{FinancialGoal, Priority};

pub fn cmd_missions(title: &str, target: f64, date: &str) -> Result<()> {
    let target_date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| anyhow!("Target date must be YYYY-MM-DD, got: {}", date))?;

    let today = Utc::now().date_naive();
    let goal = FinancialGoal {
        goal_id: "goal_preview".to_string(),
        user_id: "user_local".to_string(),
        title: title.to_string(),
        description: String::new(),
        target_amount: target,
        current_amount: 0.0,
        target_date,
        priority: Priority::Medium,
        category: "savings".to_string(),
        on_roadmap: false,
    };

    let days = (target_date - today).num_days();
    let plan = plan_for_horizon(days);
    println!(
        "Goal: {} (${:.2} by {}, {} days out)",
        title,
        target,
        target_date,
        days.max(0)
    );
    println!(
        "Cadence: every {} days, {} missions planned\n",
        plan.interval_days, plan.count
    );

    for mission in fallback_roadmap(&goal, plan) {
        println!(
            "{}  [{:>3} pts]  {}  - {}",
            mission.deadline, mission.points, mission.title, mission.description
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_date_is_rejected() {
        assert!(cmd_missions("Trip", 2000.0, "next spring").is_err());
    }

    #[test]
    fn test_preview_runs_offline() {
        cmd_missions("Trip", 2000.0, "2027-09-01").unwrap();
    }
}
