//! Planning of the calendar-day window a run analyzes.

use chrono::Duration;
use crashtrend_common::Day;
use std::collections::BTreeSet;
use tracing::debug;

/// Validates operator-supplied forced-date strings.
///
/// Keeps entries that are strict `YYYY-MM-DD` and round-trip through date
/// parsing unchanged; everything else is dropped without error.
pub fn verify_forced_dates<'a, I>(raw: I) -> BTreeSet<Day>
where
    I: IntoIterator<Item = &'a str>,
{
    raw.into_iter()
        .filter_map(|s| {
            let day = Day::parse_strict(s);
            if day.is_none() {
                debug!("Dropping malformed forced date `{s}`");
            }
            day
        })
        .collect()
}

/// The days to analyze for a run: `backlog_days` consecutive days ending
/// yesterday, unioned with the forced dates, deduplicated and sorted
/// ascending.
pub fn plan(today: Day, backlog_days: u32, forced: &BTreeSet<Day>) -> Vec<Day> {
    let mut days = forced.clone();
    for offset in 1..=i64::from(backlog_days) {
        days.insert(today.minus(Duration::days(offset)));
    }
    days.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crashtrend_common::test_utils::mock_day;

    #[test]
    fn plan_covers_backlog_ending_yesterday() {
        let today = mock_day(2024, 1, 15);
        let days = plan(today, 3, &BTreeSet::new());
        assert_eq!(
            days,
            vec![
                mock_day(2024, 1, 12),
                mock_day(2024, 1, 13),
                mock_day(2024, 1, 14),
            ]
        );
    }

    #[test]
    fn plan_unions_forced_days_sorted_and_deduplicated() {
        let today = mock_day(2024, 1, 15);
        let forced: BTreeSet<Day> = [mock_day(2023, 12, 1), mock_day(2024, 1, 14)]
            .into_iter()
            .collect();
        let days = plan(today, 2, &forced);
        assert_eq!(
            days,
            vec![
                mock_day(2023, 12, 1),
                mock_day(2024, 1, 13),
                mock_day(2024, 1, 14),
            ]
        );
    }

    #[test]
    fn plan_crosses_month_boundaries() {
        let today = mock_day(2024, 3, 1);
        let days = plan(today, 2, &BTreeSet::new());
        assert_eq!(days, vec![mock_day(2024, 2, 28), mock_day(2024, 2, 29)]);
    }

    #[test]
    fn forced_dates_drop_invalid_input_silently() {
        let forced = verify_forced_dates(
            ["2024-01-10", "2021-13-40", "2021-1-1", "garbage", "2024-01-10"]
                .iter()
                .copied(),
        );
        assert_eq!(forced, [mock_day(2024, 1, 10)].into_iter().collect());
    }

    #[test]
    fn forced_dates_empty_input_is_empty() {
        assert!(verify_forced_dates(std::iter::empty::<&str>()).is_empty());
    }
}
