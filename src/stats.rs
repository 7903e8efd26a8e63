use crate::dates::{date_key, day_before};
use crate::models::{
    CategoryCount, EngineData, Goal, GoalHistoryPoint, OverallStatsResponse, TodayStatsResponse,
    WeeklyHistoryPoint,
};
use chrono::NaiveDate;
use uuid::Uuid;

/// All queries here are recomputed from goals + ledger on every call; no
/// derived state is stored anywhere. `today` comes from the engine's clock.
pub fn today_stats(today: NaiveDate, data: &EngineData) -> TodayStatsResponse {
    let today_key = date_key(today);
    let active: Vec<Uuid> = active_ids(data);
    let completed = data.daily_progress.completed_count_on(&today_key, active.iter());

    TodayStatsResponse {
        date: today_key,
        total: active.len(),
        completed,
        percentage: percentage(completed, active.len()),
    }
}

pub fn overall_stats(data: &EngineData) -> OverallStatsResponse {
    OverallStatsResponse {
        total_goals: data.goals.len(),
        active_goals: data.goals.iter().filter(|goal| goal.is_active()).count(),
        total_streak: data.goals.iter().map(|goal| u64::from(goal.streak)).sum(),
        total_completions: data
            .goals
            .iter()
            .map(|goal| u64::from(goal.current_count))
            .sum(),
        best_streak: data
            .goals
            .iter()
            .map(|goal| goal.best_streak)
            .max()
            .unwrap_or(0),
    }
}

pub fn category_breakdown(data: &EngineData) -> Vec<CategoryCount> {
    crate::models::Category::ALL
        .iter()
        .map(|&category| {
            let in_category = data.goals.iter().filter(|goal| goal.category == category);
            let (total, active) = in_category.fold((0, 0), |(total, active), goal| {
                (total + 1, active + usize::from(goal.is_active()))
            });
            CategoryCount {
                category,
                total,
                active,
            }
        })
        .collect()
}

/// Active goals by descending streak; ties keep insertion order.
pub fn streak_leaders(data: &EngineData, limit: usize) -> Vec<Goal> {
    let mut leaders: Vec<Goal> = data
        .goals
        .iter()
        .filter(|goal| goal.is_active())
        .cloned()
        .collect();
    leaders.sort_by(|a, b| b.streak.cmp(&a.streak));
    leaders.truncate(limit);
    leaders
}

/// Completion ratio of active goals for each of the last 7 days, oldest
/// first (today is the last point).
pub fn weekly_history(today: NaiveDate, data: &EngineData) -> Vec<WeeklyHistoryPoint> {
    let active: Vec<Uuid> = active_ids(data);
    let mut points = Vec::with_capacity(7);
    for offset in (0..7).rev() {
        let key = date_key(day_before(today, offset));
        let completed = data.daily_progress.completed_count_on(&key, active.iter());
        points.push(WeeklyHistoryPoint {
            date: key,
            completed,
            total: active.len(),
            percentage: percentage(completed, active.len()),
        });
    }
    points
}

/// One goal's last 7 days, derived from the ledger rather than cached on
/// the goal. None if the id is unknown.
pub fn goal_history(
    today: NaiveDate,
    data: &EngineData,
    goal_id: Uuid,
) -> Option<Vec<GoalHistoryPoint>> {
    data.goals.iter().find(|goal| goal.id == goal_id)?;
    let mut points = Vec::with_capacity(7);
    for offset in (0..7).rev() {
        let key = date_key(day_before(today, offset));
        points.push(GoalHistoryPoint {
            completed: data.daily_progress.is_completed_on(&key, goal_id),
            date: key,
        });
    }
    Some(points)
}

fn active_ids(data: &EngineData) -> Vec<Uuid> {
    data.goals
        .iter()
        .filter(|goal| goal.is_active())
        .map(|goal| goal.id)
        .collect()
}

fn percentage(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((completed as f64 / total as f64) * 100.0).round() as u32
}
