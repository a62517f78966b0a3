//! Plan cycle date rules
//!
//! Pure calendar arithmetic for the subscription lifecycle. Every rule
//! here takes `today` as an argument so callers (and tests) control the
//! clock; nothing in this module reads wall-clock time.

use crate::models::PlanStatus;
use chrono::{Months, NaiveDate};

/// A plan whose end date falls within this many days of today (exclusive)
/// is reported as expiring soon.
pub const EXPIRING_SOON_WINDOW_DAYS: i64 = 5;

/// Compute the end date of a cycle: `start` plus `duration_months`
/// calendar months.
///
/// Month addition clamps to the last day of the target month (Jan 31 +
/// 1 month is Feb 29 in a leap year). Returns `None` for non-positive
/// durations or when the result overflows the calendar range.
pub fn cycle_end_date(start: NaiveDate, duration_months: i32) -> Option<NaiveDate> {
    if duration_months <= 0 {
        return None;
    }
    start.checked_add_months(Months::new(duration_months as u32))
}

/// Derive the display status of a plan from its end date.
///
/// - `NoPlan` when no cycle is assigned
/// - `Expired` when the end date is today or earlier (a plan ending
///   exactly today is already expired, never expiring-soon)
/// - `ExpiringSoon` when the end date falls strictly between today and
///   today plus [`EXPIRING_SOON_WINDOW_DAYS`]
/// - `Active` otherwise
pub fn plan_status(end_date: Option<NaiveDate>, today: NaiveDate) -> PlanStatus {
    let Some(end) = end_date else {
        return PlanStatus::NoPlan;
    };

    if end <= today {
        PlanStatus::Expired
    } else if (end - today).num_days() < EXPIRING_SOON_WINDOW_DAYS {
        PlanStatus::ExpiringSoon
    } else {
        PlanStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_one_month_cycle_end_date() {
        assert_eq!(
            cycle_end_date(date(2024, 1, 1), 1),
            Some(date(2024, 2, 1))
        );
    }

    #[test]
    fn test_quarterly_cycle_end_date() {
        assert_eq!(
            cycle_end_date(date(2024, 3, 1), 3),
            Some(date(2024, 6, 1))
        );
    }

    #[test]
    fn test_end_of_month_clamps() {
        // Jan 31 + 1 month lands on Feb 29 (2024 is a leap year)
        assert_eq!(
            cycle_end_date(date(2024, 1, 31), 1),
            Some(date(2024, 2, 29))
        );
        assert_eq!(
            cycle_end_date(date(2023, 1, 31), 1),
            Some(date(2023, 2, 28))
        );
    }

    #[test]
    fn test_non_positive_duration_rejected() {
        assert_eq!(cycle_end_date(date(2024, 1, 1), 0), None);
        assert_eq!(cycle_end_date(date(2024, 1, 1), -3), None);
    }

    #[test]
    fn test_no_plan_without_end_date() {
        assert_eq!(plan_status(None, date(2024, 1, 1)), PlanStatus::NoPlan);
    }

    #[test]
    fn test_status_scenario_grid() {
        // Plan: start 2024-01-01, one month, so end 2024-02-01
        let end = cycle_end_date(date(2024, 1, 1), 1);
        assert_eq!(end, Some(date(2024, 2, 1)));

        assert_eq!(plan_status(end, date(2024, 1, 15)), PlanStatus::Active);
        assert_eq!(plan_status(end, date(2024, 1, 28)), PlanStatus::ExpiringSoon);
        assert_eq!(plan_status(end, date(2024, 2, 2)), PlanStatus::Expired);
    }

    #[test]
    fn test_plan_ending_today_is_expired() {
        let end = Some(date(2024, 2, 1));
        assert_eq!(plan_status(end, date(2024, 2, 1)), PlanStatus::Expired);
    }

    #[test]
    fn test_expiring_soon_window_boundaries() {
        let end = Some(date(2024, 2, 1));
        // One day before the end date: inside the window
        assert_eq!(plan_status(end, date(2024, 1, 31)), PlanStatus::ExpiringSoon);
        // Exactly five days out: outside the window, still active
        assert_eq!(plan_status(end, date(2024, 1, 27)), PlanStatus::Active);
        // Four days out: inside
        assert_eq!(plan_status(end, date(2024, 1, 28)), PlanStatus::ExpiringSoon);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// The three derived states partition the timeline: for any end
        /// date and any today, exactly one of expired / expiring-soon /
        /// active holds, determined solely by the signed day distance.
        #[test]
        fn prop_status_partitions_by_day_distance(
            end_offset in -4000i64..4000,
            today_offset in -4000i64..4000,
        ) {
            let base = date(2024, 1, 1);
            let end = base + chrono::Duration::days(end_offset);
            let today = base + chrono::Duration::days(today_offset);

            let status = plan_status(Some(end), today);
            let distance = (end - today).num_days();

            if distance <= 0 {
                prop_assert_eq!(status, PlanStatus::Expired);
            } else if distance < EXPIRING_SOON_WINDOW_DAYS {
                prop_assert_eq!(status, PlanStatus::ExpiringSoon);
            } else {
                prop_assert_eq!(status, PlanStatus::Active);
            }
        }

        /// End date computation is monotone in the duration.
        #[test]
        fn prop_end_date_monotone_in_duration(
            start_offset in 0i64..3650,
            months in 1i32..48,
        ) {
            let start = date(2020, 1, 1) + chrono::Duration::days(start_offset);
            let shorter = cycle_end_date(start, months).unwrap();
            let longer = cycle_end_date(start, months + 1).unwrap();
            prop_assert!(longer > shorter);
            prop_assert!(shorter > start);
        }

        /// Positive durations always produce an end date after the start.
        #[test]
        fn prop_end_date_after_start(
            start_offset in 0i64..3650,
            months in 1i32..120,
        ) {
            let start = date(2020, 1, 1) + chrono::Duration::days(start_offset);
            let end = cycle_end_date(start, months).unwrap();
            prop_assert!(end > start);
        }
    }
}
