//! Domain models for MoneyMap
//!
//! Transactions, spending reports, goals, and missions. The category and
//! mission enums are closed sets so invalid states are unrepresentable;
//! free-text values coming back from the LLM are validated into them.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Fixed spending category set assigned to every transaction.
///
/// Serialized with the display names the statement sources use
/// ("Food & Dining", "Health & Medical", ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Food & Dining")]
    FoodAndDining,
    Transportation,
    Housing,
    Utilities,
    Entertainment,
    Shopping,
    #[serde(rename = "Health & Medical")]
    HealthAndMedical,
    Travel,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::FoodAndDining => "Food & Dining",
            Category::Transportation => "Transportation",
            Category::Housing => "Housing",
            Category::Utilities => "Utilities",
            Category::Entertainment => "Entertainment",
            Category::Shopping => "Shopping",
            Category::HealthAndMedical => "Health & Medical",
            Category::Travel => "Travel",
            Category::Other => "Other",
        }
    }

    /// All categories in keyword-match priority order (Other excluded).
    pub const MATCH_ORDER: [Category; 8] = [
        Category::FoodAndDining,
        Category::Transportation,
        Category::Housing,
        Category::Utilities,
        Category::Entertainment,
        Category::Shopping,
        Category::HealthAndMedical,
        Category::Travel,
    ];

    /// Validate a free-text category name against the closed set.
    ///
    /// Exact match first, then a case-insensitive substring match in either
    /// direction (so "dining" and "Food & Dining expenses" both resolve).
    /// Anything else falls back to `Other`.
    pub fn from_loose(s: &str) -> Category {
        let s = s.trim();
        if let Ok(cat) = s.parse() {
            return cat;
        }
        let lower = s.to_lowercase();
        if lower.is_empty() {
            return Category::Other;
        }
        for cat in Self::MATCH_ORDER {
            let name = cat.as_str().to_lowercase();
            if lower.contains(&name) || name.contains(&lower) {
                return cat;
            }
        }
        Category::Other
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Food & Dining" => Ok(Category::FoodAndDining),
            "Transportation" => Ok(Category::Transportation),
            "Housing" => Ok(Category::Housing),
            "Utilities" => Ok(Category::Utilities),
            "Entertainment" => Ok(Category::Entertainment),
            "Shopping" => Ok(Category::Shopping),
            "Health & Medical" => Ok(Category::HealthAndMedical),
            "Travel" => Ok(Category::Travel),
            "Other" => Ok(Category::Other),
            _ => Err(format!("Unknown category: {}", s)),
        }
    }
}

/// A parsed bank-statement line. Immutable once parsed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    pub description: String,
    /// Signed amount: positive = income, negative = expense.
    pub amount: f64,
    pub category: Category,
    pub merchant: Option<String>,
}

/// A detected recurring subscription charge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub name: String,
    pub amount: f64,
    pub frequency: String,
}

/// Kind of advisory message an insight carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightType {
    Opportunity,
    Warning,
    Suggestion,
}

impl InsightType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightType::Opportunity => "opportunity",
            InsightType::Warning => "warning",
            InsightType::Suggestion => "suggestion",
        }
    }
}

impl fmt::Display for InsightType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Advisory message derived from a spending report. Stateless, recomputed
/// on each parse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpendingInsight {
    pub category: String,
    pub insight_type: InsightType,
    pub title: String,
    pub description: String,
    pub potential_savings: f64,
    pub action_items: Vec<String>,
}

/// Full analysis of one uploaded statement. Created once per upload,
/// never incrementally updated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpendingReport {
    pub user_id: String,
    pub report_id: String,
    pub period: String,
    pub total_spending: f64,
    pub total_income: f64,
    /// Category display name -> summed absolute expense amount.
    pub category_breakdown: HashMap<String, f64>,
    pub subscriptions: Vec<Subscription>,
    pub repeat_purchases: Vec<String>,
    pub insights: Vec<SpendingInsight>,
    /// Heuristic 0-100 score: savings rate adjusted by insight count.
    pub optimization_score: f64,
    pub transactions: Vec<Transaction>,
}

/// Goal priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    /// Lenient parse for LLM-extracted values; anything unrecognized is
    /// treated as medium.
    pub fn from_loose(s: &str) -> Priority {
        match s.trim().to_lowercase().as_str() {
            "high" => Priority::High,
            "low" => Priority::Low,
            _ => Priority::Medium,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A financial goal extracted from the goal-planning conversation.
///
/// `category` stays a free string (retirement, house, emergency_fund, ...)
/// unlike the closed transaction category set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialGoal {
    pub goal_id: String,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub target_amount: f64,
    #[serde(default)]
    pub current_amount: f64,
    pub target_date: NaiveDate,
    pub priority: Priority,
    pub category: String,
    #[serde(default)]
    pub on_roadmap: bool,
}

/// Mission category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissionType {
    Savings,
    Spending,
    Investment,
    Debt,
    Learning,
}

impl MissionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MissionType::Savings => "savings",
            MissionType::Spending => "spending",
            MissionType::Investment => "investment",
            MissionType::Debt => "debt",
            MissionType::Learning => "learning",
        }
    }

    /// Lenient parse for LLM-extracted values; unrecognized values default
    /// to savings.
    pub fn from_loose(s: &str) -> MissionType {
        match s.trim().to_lowercase().as_str() {
            "spending" => MissionType::Spending,
            "investment" => MissionType::Investment,
            "debt" => MissionType::Debt,
            "learning" => MissionType::Learning,
            _ => MissionType::Savings,
        }
    }
}

impl fmt::Display for MissionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Mission lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissionStatus {
    Active,
    Completed,
    Failed,
}

impl MissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MissionStatus::Active => "active",
            MissionStatus::Completed => "completed",
            MissionStatus::Failed => "failed",
        }
    }
}

impl FromStr for MissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(MissionStatus::Active),
            "completed" => Ok(MissionStatus::Completed),
            "failed" => Ok(MissionStatus::Failed),
            _ => Err(format!("Unknown mission status: {}", s)),
        }
    }
}

impl fmt::Display for MissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A discrete, time-boxed action item tied to a goal.
///
/// The deadline is assigned once at roadmap creation from start date plus
/// interval arithmetic and never recomputed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mission {
    pub mission_id: String,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub mission_type: MissionType,
    pub deadline: NaiveDate,
    pub points: i64,
    pub status: MissionStatus,
    pub goal_id: Option<String>,
    pub milestone_percent: Option<f64>,
}

/// Basic user profile collected at onboarding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    pub age: u32,
    pub annual_income: f64,
    /// Free-form debt entries, e.g. {"type": "student_loan", "amount": 20000}.
    pub debts: Vec<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

/// Role of a chat message in an LLM conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One turn of an LLM conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// One recommended credit card in a stack.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardRecommendation {
    pub name: String,
    pub issuer: String,
    pub reason: String,
    #[serde(default)]
    pub annual_fee: f64,
    #[serde(default)]
    pub best_categories: Vec<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Credit card stack produced by the credit agent's finalize step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardStack {
    pub cards: Vec<CardRecommendation>,
    #[serde(default)]
    pub total_estimated_annual_value: f64,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub strategy: String,
}
