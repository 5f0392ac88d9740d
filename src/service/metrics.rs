//! Derived values computed from snapshot rows. Nothing here is ever stored;
//! every figure must be recomputable from raw rows alone.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

/// Display percentage toward a weekly goal. Truncated, capped at 100.
/// A zero goal reads as "nothing configured" and scores 0.
pub fn goal_percent(count: u32, goal: u32) -> u32 {
    if goal == 0 {
        return 0;
    }
    (100 * count / goal).min(100)
}

/// Monday-start week containing `today`, as an inclusive `[start, end]` pair.
pub fn week_bounds(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
    (start, start + Duration::days(6))
}

pub fn sessions_this_week<I>(dates: I, today: NaiveDate) -> u32
where
    I: IntoIterator<Item = NaiveDate>,
{
    let (start, end) = week_bounds(today);
    dates
        .into_iter()
        .filter(|d| *d >= start && *d <= end)
        .count() as u32
}

/// The slice of a class row the academic calculations need.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassFacts<'a> {
    pub status: &'a str,
    pub credits: f64,
    pub grade: Option<f64>,
}

/// Credit-weighted GPA over completed classes that carry both a grade and
/// positive credits. 0.0 when nothing qualifies.
pub fn weighted_gpa(classes: &[ClassFacts]) -> f64 {
    let mut points = 0.0;
    let mut credits = 0.0;
    for class in classes {
        if class.status != "completed" || class.credits <= 0.0 {
            continue;
        }
        let Some(grade) = class.grade else { continue };
        points += grade * class.credits;
        credits += class.credits;
    }
    if credits > 0.0 { points / credits } else { 0.0 }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DegreeProgress {
    pub completed_percent: u32,
    pub in_progress_percent: u32,
    pub remaining_percent: u32,
}

/// Pie segments of the degree: completed and in-progress credits against the
/// configured total, the rest remaining. Failed classes earn nothing, so
/// their credits stay in the remaining segment. Truncated percentages.
pub fn degree_progress(classes: &[ClassFacts], total_credits: f64) -> DegreeProgress {
    if total_credits <= 0.0 {
        return DegreeProgress {
            completed_percent: 0,
            in_progress_percent: 0,
            remaining_percent: 0,
        };
    }
    let mut completed = 0.0;
    let mut in_progress = 0.0;
    for class in classes {
        match class.status {
            "completed" => completed += class.credits,
            "in_progress" => in_progress += class.credits,
            _ => {}
        }
    }
    let remaining = (total_credits - completed - in_progress).max(0.0);
    DegreeProgress {
        completed_percent: percent_of(completed, total_credits),
        in_progress_percent: percent_of(in_progress, total_credits),
        remaining_percent: percent_of(remaining, total_credits),
    }
}

fn percent_of(part: f64, whole: f64) -> u32 {
    ((100.0 * part / whole).floor() as u32).min(100)
}

/// Sum of expense amounts dated within (`year`, `month`).
pub fn month_spend<I>(expenses: I, year: i32, month: u32) -> f64
where
    I: IntoIterator<Item = (NaiveDate, f64)>,
{
    expenses
        .into_iter()
        .filter(|(date, _)| date.year() == year && date.month() == month)
        .map(|(_, amount)| amount)
        .sum()
}

pub fn budget_remaining(spend: f64, monthly_budget: f64) -> f64 {
    monthly_budget - spend
}

/// Reconcile a study timer after reload: a running timer has gained exactly
/// the whole seconds since `running_since`; a paused one has gained nothing.
pub fn timer_elapsed(
    stored_secs: u64,
    running_since: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> u64 {
    match running_since {
        Some(start) if now > start => stored_secs + (now - start).num_seconds() as u64,
        _ => stored_secs,
    }
}
