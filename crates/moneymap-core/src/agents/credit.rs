//! Credit-optimization agent
//!
//! Discusses the user's spending habits and existing cards, then
//! recommends a concrete card stack as structured output.

use tracing::debug;

use crate::ai::{parsing, LlmBackend, LlmClient};
use crate::error::Result;
use crate::models::{CardStack, ChatMessage, UserProfile};

use super::profile_context;

const SYSTEM_PROMPT: &str =
    "You are a credit card optimization assistant. Learn about the user's spending \
     categories, current cards, and credit comfort level, then help them maximize \
     rewards. Ask one focused question at a time and keep replies short.";

/// Local opener for an empty conversation, no LLM call needed
pub fn opening_message(profile: &UserProfile) -> String {
    format!(
        "Let's optimize your credit card rewards! Based on your income of ${:.0} a year, \
         the right card stack could earn you real money back. Which cards do you \
         currently carry?",
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

/// Produce the final card stack recommendation from the conversation.
///
/// The reply must contain a JSON object; unparsable replies surface the
/// parsing error (with the raw content) to the caller.
pub async fn finalize(
    llm: &LlmClient,
    profile: &UserProfile,
    history: &[ChatMessage],
) -> Result<CardStack> {
    let system = format!(
        "You are a credit card optimization assistant. Based on the conversation, \
         recommend a card stack. Respond with ONLY a JSON object: {{\"cards\": \
         [{{\"name\", \"issuer\", \"reason\", \"annual_fee\" (number), \
         \"best_categories\" (array of strings), \"url\"}}], \
         \"total_estimated_annual_value\" (number), \"summary\", \"strategy\"}}. {}",
        profile_context(profile)
    );

    let reply = llm.chat(&system, history).await?;
    let stack: CardStack = parsing::parse_object(&reply)?;
    debug!(user_id = %profile.user_id, cards = stack.cards.len(), "Card stack finalized");
    Ok(stack)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::MockBackend;
    use crate::error::Error;
    use chrono::Utc;

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
        let llm = LlmClient::Mock(MockBackend::unhealthy());
        let reply = chat(&llm, &profile(), &[]).await.unwrap();
        assert!(reply.contains("cards"));
    }

    #[tokio::test]
    async fn test_finalize_returns_card_stack() {
        let llm = LlmClient::Mock(MockBackend::new());
        let history = [ChatMessage::user("I spend mostly on groceries and gas")];
        let stack = finalize(&llm, &profile(), &history).await.unwrap();
        assert_eq!(stack.cards.len(), 1);
        assert_eq!(stack.cards[0].name, "Cashback Everyday");
        assert_eq!(stack.total_estimated_annual_value, 350.0);
    }

    #[tokio::test]
    async fn test_finalize_unparsable_reply_is_error() {
        let mock = MockBackend::new();
        mock.push_reply("You should probably get a cashback card.");
        let llm = LlmClient::Mock(mock);
        let history = [ChatMessage::user("hello")];
        let err = finalize(&llm, &profile(), &history).await.unwrap_err();
        assert!(matches!(err, Error::NoJson(_)));
    }
}
