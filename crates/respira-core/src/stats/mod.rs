//! Habit statistics derived from completed-session history.
//!
//! Everything here is a pure function over an immutable snapshot of
//! [`SessionRecord`]s plus an explicit `today` date, so the same snapshot
//! can be analyzed repeatedly (and concurrently) with identical results.
//! Day truncation uses UTC calendar dates, matching the storage queries
//! that feed this module.

mod streaks;
mod weekly;

pub use streaks::{calculate_streaks, Streaks};
pub use weekly::{last_week_activity, rolling_weekly_average, DailyActivity};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::storage::SessionRecord;

/// Aggregate habit statistics for one user.
///
/// Recomputed on demand; never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreakStatistics {
    pub total_sessions: u64,
    pub total_minutes: u64,
    pub current_streak: u32,
    pub longest_streak: u32,
    /// Sessions per week over the trailing 28 days, one decimal place.
    pub weekly_average: f64,
    /// Per-day breakdown of the trailing 7 days, oldest first.
    pub last_week: Vec<DailyActivity>,
}

impl StreakStatistics {
    /// Compute the full statistics block from a snapshot of one user's
    /// records. `today` is the current UTC date, passed explicitly so the
    /// computation is deterministic.
    pub fn compute(records: &[SessionRecord], today: NaiveDate) -> Self {
        let mut dates: Vec<NaiveDate> = records
            .iter()
            .map(|r| r.completed_at.date_naive())
            .collect();
        dates.sort_unstable();
        dates.dedup();
        let streaks = calculate_streaks(&dates, today);

        let total_seconds: u64 = records
            .iter()
            .map(|r| u64::from(r.duration_seconds))
            .sum();

        Self {
            total_sessions: records.len() as u64,
            total_minutes: minutes_from_seconds(total_seconds),
            current_streak: streaks.current,
            longest_streak: streaks.longest,
            weekly_average: rolling_weekly_average(records, today),
            last_week: last_week_activity(records, today),
        }
    }
}

pub(crate) fn minutes_from_seconds(seconds: u64) -> u64 {
    (seconds as f64 / 60.0).round() as u64
}

#[cfg(test)]
mod tests {
    use chrono::{Days, NaiveDate, TimeZone, Utc};

    use super::*;
    use crate::storage::SessionRecord;

    fn record(completed: NaiveDate, duration_seconds: u32) -> SessionRecord {
        SessionRecord {
            id: format!("s-{completed}-{duration_seconds}"),
            user_id: "local".into(),
            pattern_id: Some("coherence-5-5".into()),
            pattern_name: "Coherence 5-5".into(),
            duration_seconds,
            cycles_completed: 6,
            completed_at: Utc
                .from_utc_datetime(&completed.and_hms_opt(9, 30, 0).unwrap()),
        }
    }

    #[test]
    fn empty_history_yields_zeroes() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let stats = StreakStatistics::compute(&[], today);
        assert_eq!(stats.total_sessions, 0);
        assert_eq!(stats.total_minutes, 0);
        assert_eq!(stats.current_streak, 0);
        assert_eq!(stats.longest_streak, 0);
        assert_eq!(stats.weekly_average, 0.0);
        assert_eq!(stats.last_week.len(), 7);
        assert!(stats.last_week.iter().all(|d| d.sessions == 0));
    }

    #[test]
    fn totals_round_seconds_to_minutes() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let records = vec![record(today, 90), record(today, 45)];
        let stats = StreakStatistics::compute(&records, today);
        assert_eq!(stats.total_sessions, 2);
        // 135 s rounds to 2 minutes.
        assert_eq!(stats.total_minutes, 2);
    }

    #[test]
    fn three_consecutive_days_make_a_streak_of_three() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let records: Vec<_> = (0..3)
            .map(|back| record(today.checked_sub_days(Days::new(back)).unwrap(), 300))
            .collect();
        let stats = StreakStatistics::compute(&records, today);
        assert_eq!(stats.current_streak, 3);
        assert_eq!(stats.longest_streak, 3);
    }

    #[test]
    fn multiple_sessions_on_one_day_count_once_for_streaks() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let records = vec![record(today, 300), record(today, 300), record(today, 300)];
        let stats = StreakStatistics::compute(&records, today);
        assert_eq!(stats.current_streak, 1);
        assert_eq!(stats.longest_streak, 1);
        assert_eq!(stats.total_sessions, 3);
    }
}
