//! Resolves week/month/year-to-date windows relative to an anchor date.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use insight_domain::{DateWindow, WindowKind};

pub struct WindowResolver;

impl WindowResolver {
    /// Returns the to-date window of `kind` ending on `anchor`.
    ///
    /// Anchors arriving as instants must be reduced to calendar dates first
    /// (`Clock::today`, `DateTime::date_naive`); nothing here looks at time of day.
    pub fn resolve(kind: WindowKind, anchor: NaiveDate, week_start: Weekday) -> DateWindow {
        let from = match kind {
            WindowKind::Week => {
                let offset = (anchor.weekday().num_days_from_sunday() + 7
                    - week_start.num_days_from_sunday())
                    % 7;
                anchor - Duration::days(offset as i64)
            }
            WindowKind::Month => anchor.with_day(1).unwrap_or(anchor),
            WindowKind::Year => NaiveDate::from_ymd_opt(anchor.year(), 1, 1).unwrap_or(anchor),
        };
        DateWindow { from, to: anchor }
    }

    /// Resolves every window kind for one anchor, in week, month, year order.
    pub fn resolve_all(anchor: NaiveDate, week_start: Weekday) -> [(WindowKind, DateWindow); 3] {
        WindowKind::ALL.map(|kind| (kind, Self::resolve(kind, anchor, week_start)))
    }

    /// Trailing window of `months` calendar months ending on `anchor`.
    ///
    /// A 12-month window anchored on 2024-02-15 starts on 2023-02-16.
    pub fn trailing_months(anchor: NaiveDate, months: u32) -> DateWindow {
        let start = anchor
            .checked_sub_months(chrono::Months::new(months))
            .map(|date| date + Duration::days(1))
            .unwrap_or(anchor);
        DateWindow {
            from: start.min(anchor),
            to: anchor,
        }
    }
}

/// Maps a `0..=6` index (0 = Sunday) onto a weekday.
pub fn week_start_from_index(index: u8) -> Option<Weekday> {
    match index {
        0 => Some(Weekday::Sun),
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn week_starts_on_most_recent_matching_weekday() {
        // 2024-02-15 is a Thursday.
        let anchor = date(2024, 2, 15);
        let sunday = WindowResolver::resolve(WindowKind::Week, anchor, Weekday::Sun);
        assert_eq!(sunday.from, date(2024, 2, 11));
        assert_eq!(sunday.to, anchor);

        let monday = WindowResolver::resolve(WindowKind::Week, anchor, Weekday::Mon);
        assert_eq!(monday.from, date(2024, 2, 12));

        let friday = WindowResolver::resolve(WindowKind::Week, anchor, Weekday::Fri);
        assert_eq!(friday.from, date(2024, 2, 9));
    }

    #[test]
    fn week_window_collapses_when_anchor_is_week_start() {
        let sunday = date(2024, 2, 18);
        let window = WindowResolver::resolve(WindowKind::Week, sunday, Weekday::Sun);
        assert_eq!(window, DateWindow::single_day(sunday));
    }

    #[test]
    fn month_and_year_windows_start_on_first_day() {
        let anchor = date(2024, 2, 15);
        let month = WindowResolver::resolve(WindowKind::Month, anchor, Weekday::Sun);
        assert_eq!(month.from, date(2024, 2, 1));
        let year = WindowResolver::resolve(WindowKind::Year, anchor, Weekday::Sun);
        assert_eq!(year.from, date(2024, 1, 1));
    }

    #[test]
    fn every_window_contains_its_anchor() {
        let mut anchor = date(2023, 12, 25);
        for _ in 0..400 {
            for start in 0..7 {
                let week_start = week_start_from_index(start).unwrap();
                for (_, window) in WindowResolver::resolve_all(anchor, week_start) {
                    assert!(window.from <= anchor && anchor <= window.to);
                }
            }
            anchor += Duration::days(1);
        }
    }

    #[test]
    fn trailing_months_spans_one_year() {
        let window = WindowResolver::trailing_months(date(2024, 2, 15), 12);
        assert_eq!(window.from, date(2023, 2, 16));
        assert_eq!(window.to, date(2024, 2, 15));
    }

    #[test]
    fn week_start_index_is_bounded() {
        assert_eq!(week_start_from_index(0), Some(Weekday::Sun));
        assert_eq!(week_start_from_index(6), Some(Weekday::Sat));
        assert_eq!(week_start_from_index(7), None);
    }
}
