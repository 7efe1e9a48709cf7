//! Spending insight rules and the optimization score
//!
//! Rules are independent and all evaluated; the output order is fixed
//! (subscriptions, dining, transportation). An empty list is a valid
//! outcome when no threshold is crossed.

use std::collections::HashMap;

use crate::models::{Category, InsightType, SpendingInsight, Subscription};

/// Subscription-count threshold for the CSV path
pub const SUBSCRIPTION_THRESHOLD: usize = 3;
/// Subscription-count threshold for the legacy PDF path
pub const SUBSCRIPTION_THRESHOLD_PDF: usize = 5;

const DINING_THRESHOLD: f64 = 500.0;
const TRANSPORT_THRESHOLD: f64 = 400.0;

/// Generate insights from category totals and detected subscriptions.
///
/// `subscription_threshold` is [`SUBSCRIPTION_THRESHOLD`] for CSV statements
/// and [`SUBSCRIPTION_THRESHOLD_PDF`] for the legacy PDF path.
pub fn generate_insights(
    category_breakdown: &HashMap<String, f64>,
    subscriptions: &[Subscription],
    subscription_threshold: usize,
) -> Vec<SpendingInsight> {
    let mut insights = Vec::new();

    if subscriptions.len() > subscription_threshold {
        let total_sub: f64 = subscriptions.iter().map(|s| s.amount).sum();
        insights.push(SpendingInsight {
            category: "subscriptions".to_string(),
            insight_type: InsightType::Opportunity,
            title: "High Subscription Spending".to_string(),
            description: format!(
                "You're spending ${:.2}/month on {} subscriptions",
                total_sub,
                subscriptions.len()
            ),
            potential_savings: total_sub * 0.3,
            action_items: vec![
                "Review and cancel unused subscriptions".to_string(),
                "Look for annual plans to save 15-20%".to_string(),
                "Consider family plans to split costs".to_string(),
            ],
        });
    }

    let dining = category_breakdown
        .get(Category::FoodAndDining.as_str())
        .copied()
        .unwrap_or(0.0);
    if dining > DINING_THRESHOLD {
        insights.push(SpendingInsight {
            category: Category::FoodAndDining.as_str().to_string(),
            insight_type: InsightType::Opportunity,
            title: "High Dining Expenses".to_string(),
            description: format!("Dining spending is above average at ${:.2}", dining),
            potential_savings: 150.0,
            action_items: vec![
                "Meal prep for 2-3 days per week".to_string(),
                "Use dining rewards credit card".to_string(),
                "Set a weekly dining budget".to_string(),
            ],
        });
    }

    let transport = category_breakdown
        .get(Category::Transportation.as_str())
        .copied()
        .unwrap_or(0.0);
    if transport > TRANSPORT_THRESHOLD {
        insights.push(SpendingInsight {
            category: Category::Transportation.as_str().to_string(),
            insight_type: InsightType::Suggestion,
            title: "Transportation Costs".to_string(),
            description: format!("Transportation spending is ${:.2} this period", transport),
            potential_savings: 100.0,
            action_items: vec![
                "Combine errands into fewer trips".to_string(),
                "Compare rideshare against transit for your commute".to_string(),
            ],
        });
    }

    insights
}

/// Compute the 0-100 optimization score.
///
/// Zero income is an undefined-income sentinel (50). Otherwise the savings
/// rate drives a base score, penalized 5 points per insight up to 25.
pub fn optimization_score(total_income: f64, total_expenses: f64, num_insights: usize) -> f64 {
    if total_income == 0.0 {
        return 50.0;
    }

    let savings_rate = (total_income - total_expenses) / total_income;
    let base_score = (savings_rate * 100.0).min(100.0);
    let penalty = ((num_insights as f64) * 5.0).min(25.0);
    (base_score - penalty).max(0.0)
}
