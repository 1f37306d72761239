//! Trailing-window aggregations.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::stats::minutes_from_seconds;
use crate::storage::SessionRecord;

/// One day of the trailing-week breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyActivity {
    pub date: NaiveDate,
    pub sessions: u32,
    pub minutes: u64,
}

/// Per-day session counts and minutes for the trailing 7 UTC days (today and
/// the 6 before it), oldest first. Days without sessions appear with zero
/// counts.
pub fn last_week_activity(records: &[SessionRecord], today: NaiveDate) -> Vec<DailyActivity> {
    (0..7)
        .rev()
        .filter_map(|back| today.checked_sub_days(Days::new(back)))
        .map(|date| {
            let mut sessions = 0;
            let mut seconds = 0;
            for record in records
                .iter()
                .filter(|r| r.completed_at.date_naive() == date)
            {
                sessions += 1;
                seconds += u64::from(record.duration_seconds);
            }
            DailyActivity {
                date,
                sessions,
                minutes: minutes_from_seconds(seconds),
            }
        })
        .collect()
}

/// Sessions per week over the trailing 28 days (today and the 27 before it),
/// rounded to one decimal place.
pub fn rolling_weekly_average(records: &[SessionRecord], today: NaiveDate) -> f64 {
    let Some(cutoff) = today.checked_sub_days(Days::new(27)) else {
        return 0.0;
    };
    let count = records
        .iter()
        .filter(|r| {
            let date = r.completed_at.date_naive();
            date >= cutoff && date <= today
        })
        .count();
    (count as f64 / 4.0 * 10.0).round() / 10.0
}
