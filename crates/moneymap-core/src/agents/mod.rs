//! Conversational agents
//!
//! Each agent wraps the LLM with a domain system prompt and a two-phase
//! flow: free-form chat turns, then a finalize call that asks for
//! structured JSON and parses it. Openers for an empty history are
//! generated locally from the user's profile, without an LLM call.

pub mod credit;
pub mod goal;

use crate::models::UserProfile;

/// One-line profile summary injected into agent system prompts
fn profile_context(profile: &UserProfile) -> String {
    format!(
        "The user is {} years old with an annual income of ${:.0} and {} recorded debt(s).",
        profile.age,
        profile.annual_income,
        profile.debts.len()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_profile_context_mentions_basics() {
        let profile = UserProfile {
            user_id: "user_1".to_string(),
            age: 31,
            annual_income: 85000.0,
            debts: vec![],
            created_at: Utc::now(),
        };
        let ctx = profile_context(&profile);
        assert!(ctx.contains("31"));
        assert!(ctx.contains("$85000"));
        assert!(ctx.contains("0 recorded debt"));
    }
}
