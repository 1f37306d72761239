//! Consecutive-day streaks over distinct session dates.

use std::collections::HashSet;

use chrono::{Days, NaiveDate};

/// Streak lengths for one user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Streaks {
    /// Consecutive days ending today (or yesterday, when today has no
    /// session yet).
    pub current: u32,
    /// Longest run of consecutive days anywhere in the history.
    pub longest: u32,
}

/// Compute current and longest streaks.
///
/// `dates` are the distinct UTC calendar dates that contain at least one
/// completed session; order does not matter. The current streak is zero when
/// neither `today` nor the day before appears in the set -- an unbroken
/// streak survives until the end of the day after the last session.
pub fn calculate_streaks(dates: &[NaiveDate], today: NaiveDate) -> Streaks {
    if dates.is_empty() {
        return Streaks::default();
    }
    let set: HashSet<NaiveDate> = dates.iter().copied().collect();

    let mut current = 0;
    let start = if set.contains(&today) {
        Some(today)
    } else {
        today
            .checked_sub_days(Days::new(1))
            .filter(|yesterday| set.contains(yesterday))
    };
    if let Some(mut day) = start {
        while set.contains(&day) {
            current += 1;
            match day.checked_sub_days(Days::new(1)) {
                Some(prev) => day = prev,
                None => break,
            }
        }
    }

    let mut sorted: Vec<NaiveDate> = set.into_iter().collect();
    sorted.sort_unstable();

    let mut longest = 0;
    let mut run = 0;
    let mut prev: Option<NaiveDate> = None;
    for date in sorted {
        run = match prev {
            Some(p) if p.checked_add_days(Days::new(1)) == Some(date) => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        prev = Some(date);
    }

    Streaks { current, longest }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn empty_set_has_no_streaks() {
        assert_eq!(
            calculate_streaks(&[], date(2026, 3, 10)),
            Streaks::default()
        );
    }

    #[test]
    fn single_date_yields_longest_one() {
        let today = date(2026, 3, 10);
        let streaks = calculate_streaks(&[today], today);
        assert_eq!(streaks.current, 1);
        assert_eq!(streaks.longest, 1);
    }

    #[test]
    fn three_consecutive_days_ending_today() {
        let today = date(2026, 3, 10);
        let dates = [today, date(2026, 3, 9), date(2026, 3, 8)];
        let streaks = calculate_streaks(&dates, today);
        assert_eq!(streaks.current, 3);
        assert_eq!(streaks.longest, 3);
    }

    #[test]
    fn gap_at_yesterday_breaks_the_current_streak() {
        // Sessions on D and D-2: the day-long hole caps both streaks at 1.
        let today = date(2026, 3, 10);
        let dates = [today, date(2026, 3, 8)];
        let streaks = calculate_streaks(&dates, today);
        assert_eq!(streaks.current, 1);
        assert_eq!(streaks.longest, 1);
    }

    #[test]
    fn streak_survives_until_tomorrow() {
        // Last session yesterday: still counts, starting from yesterday.
        let today = date(2026, 3, 10);
        let dates = [date(2026, 3, 9), date(2026, 3, 8)];
        let streaks = calculate_streaks(&dates, today);
        assert_eq!(streaks.current, 2);
        assert_eq!(streaks.longest, 2);
    }

    #[test]
    fn stale_history_has_no_current_streak() {
        let today = date(2026, 3, 10);
        let dates = [date(2026, 3, 5), date(2026, 3, 4), date(2026, 3, 3)];
        let streaks = calculate_streaks(&dates, today);
        assert_eq!(streaks.current, 0);
        assert_eq!(streaks.longest, 3);
    }

    #[test]
    fn longest_run_is_found_in_the_middle_of_history() {
        let today = date(2026, 3, 20);
        let dates = [
            date(2026, 3, 20),
            date(2026, 3, 10),
            date(2026, 3, 9),
            date(2026, 3, 8),
            date(2026, 3, 7),
            date(2026, 3, 1),
        ];
        let streaks = calculate_streaks(&dates, today);
        assert_eq!(streaks.current, 1);
        assert_eq!(streaks.longest, 4);
    }

    #[test]
    fn month_boundaries_are_consecutive() {
        let today = date(2026, 3, 1);
        let dates = [date(2026, 2, 27), date(2026, 2, 28), today];
        let streaks = calculate_streaks(&dates, today);
        assert_eq!(streaks.current, 3);
        assert_eq!(streaks.longest, 3);
    }
}
