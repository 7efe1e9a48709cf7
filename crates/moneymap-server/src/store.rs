//! In-memory repository
//!
//! All server state lives in per-user maps behind `RwLock`s, held by one
//! `Store` value shared across handlers. Handlers never touch the maps
//! directly, so swapping in persistent storage later only changes this
//! module. Lock scopes are short: lock, read or mutate, release; no await
//! points while holding a guard.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use moneymap_core::error::{Error, Result};
use moneymap_core::models::{
    CardStack, ChatMessage, FinancialGoal, Mission, MissionStatus, SpendingReport, UserProfile,
};

/// Shared in-memory state, cheap to clone
#[derive(Clone, Default)]
pub struct Store {
    users: Arc<RwLock<HashMap<String, UserProfile>>>,
    reports: Arc<RwLock<HashMap<String, SpendingReport>>>,
    goals: Arc<RwLock<HashMap<String, Vec<FinancialGoal>>>>,
    missions: Arc<RwLock<HashMap<String, Vec<Mission>>>>,
    goal_chats: Arc<RwLock<HashMap<String, Vec<ChatMessage>>>>,
    credit_chats: Arc<RwLock<HashMap<String, Vec<ChatMessage>>>>,
    card_stacks: Arc<RwLock<HashMap<String, CardStack>>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    // --- users ---

    pub fn insert_user(&self, profile: UserProfile) {
        self.users
            .write()
            .unwrap()
            .insert(profile.user_id.clone(), profile);
    }

    pub fn get_user(&self, user_id: &str) -> Result<UserProfile> {
        self.users
            .read()
            .unwrap()
            .get(user_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("User not found: {}", user_id)))
    }

    // --- spending reports (latest per user) ---

    pub fn set_report(&self, report: SpendingReport) {
        self.reports
            .write()
            .unwrap()
            .insert(report.user_id.clone(), report);
    }

    pub fn get_report(&self, user_id: &str) -> Result<SpendingReport> {
        self.reports
            .read()
            .unwrap()
            .get(user_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("No spending report for user: {}", user_id)))
    }

    // --- goals ---

    pub fn add_goals(&self, user_id: &str, goals: Vec<FinancialGoal>) {
        self.goals
            .write()
            .unwrap()
            .entry(user_id.to_string())
            .or_default()
            .extend(goals);
    }

    pub fn list_goals(&self, user_id: &str) -> Vec<FinancialGoal> {
        self.goals
            .read()
            .unwrap()
            .get(user_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn get_goal(&self, user_id: &str, goal_id: &str) -> Result<FinancialGoal> {
        self.goals
            .read()
            .unwrap()
            .get(user_id)
            .and_then(|goals| goals.iter().find(|g| g.goal_id == goal_id))
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Goal not found: {}", goal_id)))
    }

    /// Apply an update to one goal and return the new value
    pub fn update_goal<F>(&self, user_id: &str, goal_id: &str, f: F) -> Result<FinancialGoal>
    where
        F: FnOnce(&mut FinancialGoal),
    {
        let mut goals = self.goals.write().unwrap();
        let goal = goals
            .get_mut(user_id)
            .and_then(|goals| goals.iter_mut().find(|g| g.goal_id == goal_id))
            .ok_or_else(|| Error::NotFound(format!("Goal not found: {}", goal_id)))?;
        f(goal);
        Ok(goal.clone())
    }

    pub fn delete_goal(&self, user_id: &str, goal_id: &str) -> Result<()> {
        let mut goals = self.goals.write().unwrap();
        let user_goals = goals
            .get_mut(user_id)
            .ok_or_else(|| Error::NotFound(format!("Goal not found: {}", goal_id)))?;
        let before = user_goals.len();
        user_goals.retain(|g| g.goal_id != goal_id);
        if user_goals.len() == before {
            return Err(Error::NotFound(format!("Goal not found: {}", goal_id)));
        }
        // Cascade: roadmap missions for a deleted goal go with it
        if let Some(user_missions) = self.missions.write().unwrap().get_mut(user_id) {
            user_missions.retain(|m| m.goal_id.as_deref() != Some(goal_id));
        }
        Ok(())
    }

    // --- missions ---

    pub fn add_missions(&self, user_id: &str, missions: Vec<Mission>) {
        self.missions
            .write()
            .unwrap()
            .entry(user_id.to_string())
            .or_default()
            .extend(missions);
    }

    pub fn list_missions(&self, user_id: &str) -> Vec<Mission> {
        self.missions
            .read()
            .unwrap()
            .get(user_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn goal_missions(&self, user_id: &str, goal_id: &str) -> Vec<Mission> {
        self.missions
            .read()
            .unwrap()
            .get(user_id)
            .map(|missions| {
                missions
                    .iter()
                    .filter(|m| m.goal_id.as_deref() == Some(goal_id))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn set_mission_status(
        &self,
        user_id: &str,
        goal_id: &str,
        mission_id: &str,
        status: MissionStatus,
    ) -> Result<Mission> {
        let mut missions = self.missions.write().unwrap();
        let mission = missions
            .get_mut(user_id)
            .and_then(|missions| {
                missions
                    .iter_mut()
                    .find(|m| m.mission_id == mission_id && m.goal_id.as_deref() == Some(goal_id))
            })
            .ok_or_else(|| Error::NotFound(format!("Mission not found: {}", mission_id)))?;
        mission.status = status;
        Ok(mission.clone())
    }

    // --- conversations ---

    pub fn append_goal_chat(&self, user_id: &str, message: ChatMessage) {
        self.goal_chats
            .write()
            .unwrap()
            .entry(user_id.to_string())
            .or_default()
            .push(message);
    }

    pub fn goal_chat(&self, user_id: &str) -> Vec<ChatMessage> {
        self.goal_chats
            .read()
            .unwrap()
            .get(user_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn append_credit_chat(&self, user_id: &str, message: ChatMessage) {
        self.credit_chats
            .write()
            .unwrap()
            .entry(user_id.to_string())
            .or_default()
            .push(message);
    }

    pub fn credit_chat(&self, user_id: &str) -> Vec<ChatMessage> {
        self.credit_chats
            .read()
            .unwrap()
            .get(user_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn set_card_stack(&self, user_id: &str, stack: CardStack) {
        self.card_stacks
            .write()
            .unwrap()
            .insert(user_id.to_string(), stack);
    }

    pub fn get_card_stack(&self, user_id: &str) -> Option<CardStack> {
        self.card_stacks.read().unwrap().get(user_id).cloned()
    }
}
