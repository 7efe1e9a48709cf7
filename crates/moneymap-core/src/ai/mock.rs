//! Mock backend for testing
//!
//! Provides scripted replies for all LLM operations. Useful for unit tests
//! and development without a running LLM server.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::models::ChatMessage;

use super::LlmBackend;

/// Mock LLM backend for testing
///
/// Replies can be scripted with [`MockBackend::push_reply`]; when the script
/// is empty, a canned reply is chosen from the system prompt so the common
/// agent flows (goal extraction, card stacks, missions, categorization)
/// produce parseable output without any setup.
#[derive(Clone)]
pub struct MockBackend {
    /// Whether health_check should return true and chat should succeed
    pub healthy: bool,
    scripted: Arc<Mutex<VecDeque<String>>>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    /// Create a new mock backend (healthy by default)
    pub fn new() -> Self {
        Self {
            healthy: true,
            scripted: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    /// Create an unhealthy mock backend whose calls always fail
    pub fn unhealthy() -> Self {
        Self {
            healthy: false,
            scripted: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    /// Queue a scripted reply, returned before any canned default
    pub fn push_reply(&self, reply: impl Into<String>) {
        self.scripted.lock().unwrap().push_back(reply.into());
    }

    fn canned_reply(system: &str) -> String {
        if system.contains("ONLY the category name") {
            return "Other".to_string();
        }
        if system.contains("mission") {
            return r#"Here is the roadmap:
[
  {"title": "Open a dedicated savings account", "description": "Set up a separate account for this goal", "mission_type": "savings", "days_from_start": 0, "points": 100},
  {"title": "Make your first deposit", "description": "Transfer the first contribution", "mission_type": "savings", "days_from_start": 7, "points": 50},
  {"title": "Cut one recurring expense", "description": "Cancel an unused subscription", "mission_type": "spending", "days_from_start": 14, "points": 50},
  {"title": "Read about index funds", "description": "One article on low-cost investing", "mission_type": "learning", "days_from_start": 21, "points": 25},
  {"title": "Review your progress", "description": "Check contributions against the target", "mission_type": "savings", "days_from_start": 28, "points": 75}
]"#
            .to_string();
        }
        if system.contains("extract") && system.contains("goals") {
            return r#"[
  {"goal_id": "", "user_id": "", "title": "Emergency Fund", "description": "Six months of expenses", "target_amount": 15000.0, "target_date": "2027-09-01", "priority": "high", "category": "emergency_fund"}
]"#
            .to_string();
        }
        if system.contains("credit card") {
            return r#"{
  "cards": [
    {"name": "Cashback Everyday", "issuer": "Example Bank", "reason": "Flat-rate cash back on all purchases", "annual_fee": 0, "best_categories": ["groceries", "gas"], "url": "https://example.com/cards/cashback"}
  ],
  "total_estimated_annual_value": 350.0,
  "summary": "A simple no-fee setup",
  "strategy": "Use the cashback card for everything"
}"#
            .to_string();
        }
        if system.contains("bank statement") {
            return r#"{
  "transactions": [
    {"date": "2026-01-05", "description": "NETFLIX.COM", "amount": -15.99, "category": "Entertainment"},
    {"date": "2026-01-10", "description": "PAYCHECK", "amount": 2500.0, "category": "Other"}
  ],
  "total_income": 2500.0,
  "total_expenses": 15.99,
  "categories": {"Entertainment": 15.99}
}"#
            .to_string();
        }
        "Thanks for sharing! Could you tell me a bit more?".to_string()
    }
}

#[async_trait]
impl LlmBackend for MockBackend {
    async fn chat(&self, system: &str, _messages: &[ChatMessage]) -> Result<String> {
        if !self.healthy {
            return Err(Error::Backend("mock backend unavailable".into()));
        }
        if let Some(reply) = self.scripted.lock().unwrap().pop_front() {
            return Ok(reply);
        }
        Ok(Self::canned_reply(system))
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_reply_takes_precedence() {
        let mock = MockBackend::new();
        mock.push_reply("first");
        mock.push_reply("second");
        assert_eq!(mock.chat("anything", &[]).await.unwrap(), "first");
        assert_eq!(mock.chat("anything", &[]).await.unwrap(), "second");
    }

    #[tokio::test]
    async fn test_default_is_healthy() {
        let mock = MockBackend::default();
        assert!(mock.healthy);
        assert!(mock.health_check().await);
    }

    #[tokio::test]
    async fn test_unhealthy_chat_fails() {
        let mock = MockBackend::unhealthy();
        assert!(mock.chat("anything", &[]).await.is_err());
        assert!(!mock.health_check().await);
    }

    #[tokio::test]
    async fn test_canned_category_reply() {
        let mock = MockBackend::new();
        let reply = mock
            .chat("Respond with ONLY the category name.", &[])
            .await
            .unwrap();
        assert_eq!(reply, "Other");
    }
}
