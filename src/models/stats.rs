//! Activity-streak calculation over journal and mood entry dates.
//!
//! A user's "active days" are the distinct UTC calendar dates carrying at
//! least one journal or mood entry; the streak is the unbroken run of
//! consecutive active days ending today or yesterday.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;

/// Computed streak statistics for a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreakSummary {
    /// Consecutive active days ending today or yesterday
    pub streak: u32,
    /// Distinct calendar days with any activity
    pub total_active_days: u32,
}

/// Compute the current streak from raw entry timestamps.
///
/// `dates` may come from multiple collections, in any order, with
/// duplicates; every timestamp is collapsed to its UTC calendar date first.
/// `today` is passed in by the caller so the result is deterministic.
///
/// A streak that ended yesterday still counts: the chain is only broken
/// once a full calendar day passes with no entry.
pub fn compute_streak(dates: &[DateTime<Utc>], today: NaiveDate) -> StreakSummary {
    let unique_days: BTreeSet<NaiveDate> = dates.iter().map(|d| d.date_naive()).collect();
    let total_active_days = unique_days.len() as u32;

    // Most recent first
    let mut days = unique_days.into_iter().rev();

    let Some(latest) = days.next() else {
        return StreakSummary {
            streak: 0,
            total_active_days,
        };
    };

    let yesterday = today - Duration::days(1);
    if latest != today && latest != yesterday {
        // No activity today or yesterday: the chain is broken no matter
        // how long the historical run was.
        return StreakSummary {
            streak: 0,
            total_active_days,
        };
    }

    let mut streak = 1;
    let mut current = latest;
    for day in days {
        // Calendar-date adjacency, not elapsed-time math
        if day != current - Duration::days(1) {
            break;
        }
        streak += 1;
        current = day;
    }

    StreakSummary {
        streak,
        total_active_days,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(day: NaiveDate, hour: u32) -> DateTime<Utc> {
        Utc.from_utc_datetime(&day.and_hms_opt(hour, 0, 0).unwrap())
    }

    #[test]
    fn empty_input_has_no_streak() {
        let summary = compute_streak(&[], date(2024, 3, 15));
        assert_eq!(
            summary,
            StreakSummary {
                streak: 0,
                total_active_days: 0
            }
        );
    }

    #[test]
    fn single_entry_today() {
        let today = date(2024, 3, 15);
        let summary = compute_streak(&[at(today, 9)], today);
        assert_eq!(summary.streak, 1);
        assert_eq!(summary.total_active_days, 1);
    }

    #[test]
    fn single_entry_yesterday_carries_over() {
        let today = date(2024, 3, 15);
        let summary = compute_streak(&[at(date(2024, 3, 14), 22)], today);
        assert_eq!(summary.streak, 1);
    }

    #[test]
    fn no_recent_entry_breaks_streak_regardless_of_history() {
        let today = date(2024, 3, 15);
        // A long run that ended two days ago counts for nothing
        let dates = vec![
            at(date(2024, 3, 13), 8),
            at(date(2024, 3, 12), 8),
            at(date(2024, 3, 11), 8),
            at(date(2024, 3, 10), 8),
        ];
        let summary = compute_streak(&dates, today);
        assert_eq!(summary.streak, 0);
        assert_eq!(summary.total_active_days, 4);
    }

    #[test]
    fn gap_stops_the_scan_mid_run() {
        let today = date(2024, 3, 15);
        // today, yesterday, day-2, (gap at day-3), day-4
        let dates = vec![
            at(today, 10),
            at(date(2024, 3, 14), 10),
            at(date(2024, 3, 13), 10),
            at(date(2024, 3, 11), 10),
        ];
        let summary = compute_streak(&dates, today);
        assert_eq!(summary.streak, 3);
        assert_eq!(summary.total_active_days, 4);
    }

    #[test]
    fn streak_starting_yesterday_counts_back() {
        let today = date(2024, 3, 15);
        let dates = vec![
            at(date(2024, 3, 14), 7),
            at(date(2024, 3, 13), 7),
            at(date(2024, 3, 12), 7),
        ];
        let summary = compute_streak(&dates, today);
        assert_eq!(summary.streak, 3);
    }

    #[test]
    fn same_day_entries_collapse() {
        let today = date(2024, 3, 15);
        // Two journal entries and one mood entry on the same calendar day
        let dates = vec![at(today, 0), at(today, 12), at(today, 23)];
        let summary = compute_streak(&dates, today);
        assert_eq!(summary.streak, 1);
        assert_eq!(summary.total_active_days, 1);
    }

    #[test]
    fn dedup_spans_collections_and_times() {
        let today = date(2024, 3, 15);
        let dates = vec![
            at(today, 8),
            at(today, 20),
            at(date(2024, 3, 14), 1),
            at(date(2024, 3, 14), 23),
        ];
        let summary = compute_streak(&dates, today);
        assert_eq!(summary.streak, 2);
        assert_eq!(summary.total_active_days, 2);
    }

    #[test]
    fn month_boundary_is_adjacent() {
        let today = date(2024, 3, 1);
        let dates = vec![at(today, 5), at(date(2024, 2, 29), 5), at(date(2024, 2, 28), 5)];
        let summary = compute_streak(&dates, today);
        assert_eq!(summary.streak, 3);
    }

    #[test]
    fn unordered_input_is_fine() {
        let today = date(2024, 3, 15);
        let dates = vec![
            at(date(2024, 3, 13), 6),
            at(today, 6),
            at(date(2024, 3, 14), 6),
        ];
        let summary = compute_streak(&dates, today);
        assert_eq!(summary.streak, 3);
        assert_eq!(summary.total_active_days, 3);
    }
}
