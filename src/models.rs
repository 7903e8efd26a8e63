use crate::ledger::ProgressLedger;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Health,
    Learning,
    Productivity,
    Personal,
    Creative,
    Other,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Health,
        Category::Learning,
        Category::Productivity,
        Category::Personal,
        Category::Creative,
        Category::Other,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    Active,
    Paused,
    Completed,
    Archived,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub frequency: Frequency,
    pub status: GoalStatus,
    pub target_count: u32,
    pub current_count: u32,
    pub streak: u32,
    pub best_streak: u32,
    pub last_completed: Option<DateTime<Utc>>,
}

impl Goal {
    pub fn is_active(&self) -> bool {
        self.status == GoalStatus::Active
    }
}

/// The engine's entire persistable state, serialized as one JSON document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineData {
    pub goals: Vec<Goal>,
    #[serde(default)]
    pub daily_progress: ProgressLedger,
}

#[derive(Debug, Deserialize)]
pub struct CreateGoalRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: Category,
    pub frequency: Frequency,
    pub target_count: u32,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: GoalStatus,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TodayStatsResponse {
    pub date: String,
    pub total: usize,
    pub completed: usize,
    pub percentage: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OverallStatsResponse {
    pub total_goals: usize,
    pub active_goals: usize,
    pub total_streak: u64,
    pub total_completions: u64,
    pub best_streak: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: Category,
    pub total: usize,
    pub active: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WeeklyHistoryPoint {
    pub date: String,
    pub completed: usize,
    pub total: usize,
    pub percentage: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GoalHistoryPoint {
    pub date: String,
    pub completed: bool,
}
