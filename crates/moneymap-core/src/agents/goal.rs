//! Goal-planning agent
//!
//! Guides the user toward concrete financial goals over a short
//! conversation, then extracts them as structured records.

use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use tracing::debug;

use crate::ai::{parsing, LlmBackend, LlmClient};
use crate::error::Result;
use crate::models::{ChatMessage, FinancialGoal, Priority, UserProfile};

use super::profile_context;

const SYSTEM_PROMPT: &str =
    "You are a friendly financial goal-planning assistant. Help the user articulate \
     specific, measurable financial goals: what they want, how much it costs, and by when. \
     Ask one focused question at a time and keep replies short.";

/// Local opener for an empty conversation, no LLM call needed
pub fn opening_message(profile: &UserProfile) -> String {
    format!(
        "Hi! I'm here to help you plan your financial goals. With an annual income of \
         ${:.0}, there's a lot we can work with. What's the first thing you're saving for?",
        profile.annual_income
    )
}

/// One conversational turn: forwards the full history to the LLM
pub async fn chat(
    llm: &LlmClient,
    profile: &UserProfile,
    history: &[ChatMessage],
) -> Result<String> {
    if history.is_empty() {
        return Ok(opening_message(profile));
    }
    let system = format!("{} {}", SYSTEM_PROMPT, profile_context(profile));
    llm.chat(&system, history).await
}

/// Goal shape the LLM is asked to return
#[derive(Debug, Deserialize)]
struct DraftGoal {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    target_amount: f64,
    #[serde(default)]
    current_amount: f64,
    #[serde(default)]
    target_date: String,
    #[serde(default)]
    priority: String,
    #[serde(default)]
    category: String,
}

/// Extract the goals discussed so far into [`FinancialGoal`] records.
///
/// The reply must contain a JSON array; unparsable replies surface the
/// parsing error (with the raw content) to the caller.
pub async fn finalize(
    llm: &LlmClient,
    profile: &UserProfile,
    history: &[ChatMessage],
) -> Result<Vec<FinancialGoal>> {
    let today = Utc::now().date_naive();
    let system = format!(
        "You are a financial goal-planning assistant. Today's date is {}. Based on the \
         conversation, extract the user's goals. Respond with ONLY a JSON array of goals: \
         {{\"title\", \"description\", \"target_amount\" (number), \"current_amount\" \
         (number, 0 if unknown), \"target_date\" (YYYY-MM-DD), \"priority\" (high, \
         medium, or low), \"category\"}}. All target_date values MUST be in the future. {}",
        today,
        profile_context(profile)
    );

    let reply = llm.chat(&system, history).await?;
    let drafts: Vec<DraftGoal> = parsing::parse_array(&reply)?;
    debug!(user_id = %profile.user_id, count = drafts.len(), "Extracted goals");

    let stamp = Utc::now().timestamp_millis();
    Ok(drafts
        .into_iter()
        .enumerate()
        .map(|(i, draft)| {
            // Missing or unparsable dates fall back to today
            let target_date =
                NaiveDate::parse_from_str(&draft.target_date, "%Y-%m-%d").unwrap_or(today);
            FinancialGoal {
                goal_id: format!("goal_{}_{}", stamp, i + 1),
                user_id: profile.user_id.clone(),
                title: draft.title,
                description: draft.description,
                target_amount: draft.target_amount,
                current_amount: draft.current_amount,
                target_date,
                priority: Priority::from_loose(&draft.priority),
                category: draft.category,
                on_roadmap: false,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::MockBackend;
    use crate::error::Error;

    fn profile() -> UserProfile {
        UserProfile {
            user_id: "user_1".to_string(),
            age: 31,
            annual_income: 85000.0,
            debts: vec![],
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_empty_history_gets_local_opener() {
        // No LLM round trip for the opener, so an unhealthy backend is fine
        let llm = LlmClient::Mock(MockBackend::unhealthy());
        let reply = chat(&llm, &profile(), &[]).await.unwrap();
        assert!(reply.contains("$85000"));
    }

    #[tokio::test]
    async fn test_chat_forwards_history() {
        let mock = MockBackend::new();
        mock.push_reply("Great, how much will the house cost?");
        let llm = LlmClient::Mock(mock);
        let history = [ChatMessage::user("I want to buy a house")];
        let reply = chat(&llm, &profile(), &history).await.unwrap();
        assert_eq!(reply, "Great, how much will the house cost?");
    }

    #[tokio::test]
    async fn test_finalize_extracts_goals() {
        let llm = LlmClient::Mock(MockBackend::new());
        let history = [ChatMessage::user("I want an emergency fund of 15000 by late 2027")];
        let goals = finalize(&llm, &profile(), &history).await.unwrap();
        assert_eq!(goals.len(), 1);
        assert_eq!(goals[0].title, "Emergency Fund");
        assert_eq!(goals[0].target_amount, 15000.0);
        assert_eq!(goals[0].user_id, "user_1");
        assert!(goals[0].goal_id.starts_with("goal_"));
        assert!(!goals[0].on_roadmap);
    }

    #[tokio::test]
    async fn test_finalize_unparsable_reply_is_error() {
        let mock = MockBackend::new();
        mock.push_reply("We talked about a house and a vacation, sounds exciting!");
        let llm = LlmClient::Mock(mock);
        let history = [ChatMessage::user("hello")];
        let err = finalize(&llm, &profile(), &history).await.unwrap_err();
        assert!(matches!(err, Error::NoJson(_)));
    }

    #[tokio::test]
    async fn test_finalize_defaults_bad_date_to_today() {
        let mock = MockBackend::new();
        mock.push_reply(
            r#"[{"title": "Trip", "description": "", "target_amount": 2000, "target_date": "sometime next year", "priority": "medium", "category": "travel"}]"#,
        );
        let llm = LlmClient::Mock(mock);
        let history = [ChatMessage::user("a trip")];
        let goals = finalize(&llm, &profile(), &history).await.unwrap();
        assert_eq!(goals[0].target_date, Utc::now().date_naive());
    }

    #[tokio::test]
    async fn test_finalize_missing_date_defaults_to_today() {
        let mock = MockBackend::new();
        mock.push_reply(
            r#"[{"title": "Trip", "description": "", "target_amount": 2000, "priority": "medium", "category": "travel"}]"#,
        );
        let llm = LlmClient::Mock(mock);
        let history = [ChatMessage::user("a trip")];
        let goals = finalize(&llm, &profile(), &history).await.unwrap();
        assert_eq!(goals[0].target_date, Utc::now().date_naive());
    }
}
