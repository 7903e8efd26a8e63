use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Day-indexed record of which goals were completed on which days.
/// Keyed by canonical `YYYY-MM-DD` strings; one flag per goal per day.
/// This is the source of truth for all history queries; per-goal history
/// views are derived from it rather than stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgressLedger {
    days: BTreeMap<String, BTreeMap<Uuid, bool>>,
}

impl ProgressLedger {
    /// Completion flags recorded for a day. Days with no activity have no
    /// stored entry and read as an empty set; this never fails.
    pub fn entry(&self, day_key: &str) -> &BTreeMap<Uuid, bool> {
        static EMPTY: BTreeMap<Uuid, bool> = BTreeMap::new();
        self.days.get(day_key).unwrap_or(&EMPTY)
    }

    pub fn is_completed_on(&self, day_key: &str, goal_id: Uuid) -> bool {
        self.days
            .get(day_key)
            .and_then(|day| day.get(&goal_id))
            .copied()
            .unwrap_or(false)
    }

    /// Upserts the flag for one goal on one day, creating the day entry
    /// lazily. Repeating the same call leaves the ledger unchanged.
    pub fn set_completion(&mut self, day_key: &str, goal_id: Uuid, completed: bool) {
        self.days
            .entry(day_key.to_string())
            .or_default()
            .insert(goal_id, completed);
    }

    /// Removes every occurrence of a goal across all days. Days left with
    /// no flags are dropped entirely.
    pub fn purge_goal(&mut self, goal_id: Uuid) {
        for day in self.days.values_mut() {
            day.remove(&goal_id);
        }
        self.days.retain(|_, day| !day.is_empty());
    }

    pub fn completed_count_on<'a, I>(&self, day_key: &str, goal_ids: I) -> usize
    where
        I: IntoIterator<Item = &'a Uuid>,
    {
        goal_ids
            .into_iter()
            .filter(|id| self.is_completed_on(day_key, **id))
            .count()
    }

    #[cfg(test)]
    pub fn day_count(&self) -> usize {
        self.days.len()
    }
}
