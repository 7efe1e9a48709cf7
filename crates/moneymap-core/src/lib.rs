//! MoneyMap Core Library
//!
//! Shared functionality for the MoneyMap personal finance backend:
//! - Pluggable LLM backends (Ollama, mock) and JSON reply extraction
//! - Bank statement parsing (CSV locally, PDF via the LLM)
//! - Three-tier transaction categorization
//! - Spending insights and the optimization score
//! - Conversational goal-planning and credit-optimization agents
//! - Gamified mission roadmap generation

pub mod agents;
pub mod ai;
pub mod analytics;
pub mod categorize;
pub mod error;
pub mod insights;
pub mod missions;
pub mod models;
pub mod statement;

pub use ai::{LlmBackend, LlmClient, MockBackend, OllamaBackend};
pub use analytics::{AnalyticsClient, TextAnalytics, TextSignals};
pub use categorize::Categorizer;
pub use error::{Error, Result};
pub use insights::{generate_insights, optimization_score};
pub use missions::{fallback_roadmap, generate_roadmap, plan_for_horizon, RoadmapPlan};
pub use models::{
    CardRecommendation, CardStack, Category, ChatMessage, FinancialGoal, InsightType, Mission,
    MissionStatus, MissionType, Priority, Role, SpendingInsight, SpendingReport, Subscription,
    Transaction, UserProfile,
};
pub use statement::{parse_csv_statement, parse_pdf_statement};
