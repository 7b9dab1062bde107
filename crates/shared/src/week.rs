use chrono::{Datelike, Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WeekKeyError {
    #[error("Invalid week key '{0}'. Expected format YYYY-Www, e.g. 2026-W06")]
    Format(String),
    #[error("Week number {0} out of range (1-53)")]
    WeekOutOfRange(u32),
    #[error("Year {0} out of range (1-9999)")]
    YearOutOfRange(i32),
}

/// An ISO-8601 calendar week, written as `2026-W06`.
///
/// This is the only key used for cached briefings and submissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WeekKey {
    year: i32,
    week: u32,
}

impl WeekKey {
    pub fn new(year: i32, week: u32) -> Result<Self, WeekKeyError> {
        if !(1..=53).contains(&week) {
            return Err(WeekKeyError::WeekOutOfRange(week));
        }
        if !(1..=9999).contains(&year) {
            return Err(WeekKeyError::YearOutOfRange(year));
        }
        Ok(Self { year, week })
    }

    /// Week containing `date`, or the week before it when `previous` is set.
    pub fn from_date(date: NaiveDate, previous: bool) -> Self {
        let date = if previous {
            date - Duration::days(7)
        } else {
            date
        };
        let iso = date.iso_week();
        Self {
            year: iso.year(),
            week: iso.week(),
        }
    }

    /// Week containing today's local date.
    pub fn current(previous: bool) -> Self {
        Self::from_date(Local::now().date_naive(), previous)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn week(&self) -> u32 {
        self.week
    }

    /// Monday and Sunday of this week.
    pub fn date_range(&self) -> (NaiveDate, NaiveDate) {
        // Week 1 is the week holding January 4th; `new` keeps the year in chrono's range
        let jan4 = NaiveDate::from_ymd_opt(self.year, 1, 4).unwrap_or(NaiveDate::MIN);
        let week1_monday = jan4 - Duration::days(jan4.weekday().num_days_from_monday() as i64);
        let monday = week1_monday + Duration::weeks(self.week as i64 - 1);
        (monday, monday + Duration::days(6))
    }

    /// Human readable range, e.g. "Feb 2, 2026 — Feb 8, 2026".
    pub fn display_range(&self) -> String {
        let (start, end) = self.date_range();
        format!("{} — {}", format_day(start), format_day(end))
    }
}

fn format_day(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

impl fmt::Display for WeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-W{:02}", self.year, self.week)
    }
}

impl FromStr for WeekKey {
    type Err = WeekKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (year, week) = trimmed
            .split_once("-W")
            .ok_or_else(|| WeekKeyError::Format(trimmed.to_string()))?;

        if year.len() != 4 || week.is_empty() || week.len() > 2 {
            return Err(WeekKeyError::Format(trimmed.to_string()));
        }

        let year: i32 = year
            .parse()
            .map_err(|_| WeekKeyError::Format(trimmed.to_string()))?;
        let week: u32 = week
            .parse()
            .map_err(|_| WeekKeyError::Format(trimmed.to_string()))?;

        Self::new(year, week)
    }
}

impl TryFrom<String> for WeekKey {
    type Error = WeekKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<WeekKey> for String {
    fn from(key: WeekKey) -> Self {
        key.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_week_key_format() {
        let key = WeekKey::from_date(date(2026, 2, 4), false);
        assert_eq!(key.to_string(), "2026-W06");
    }

    #[test]
    fn test_previous_week() {
        let key = WeekKey::from_date(date(2026, 2, 4), true);
        assert_eq!(key.to_string(), "2026-W05");
    }

    #[test]
    fn test_iso_year_differs_from_calendar_year() {
        // Dec 29, 2025 is a Monday in ISO week 1 of 2026
        assert_eq!(WeekKey::from_date(date(2025, 12, 29), false).to_string(), "2026-W01");
        // Jan 1, 2021 is a Friday in week 53 of 2020
        assert_eq!(WeekKey::from_date(date(2021, 1, 1), false).to_string(), "2020-W53");
    }

    #[test]
    fn test_date_range_known_week() {
        let key: WeekKey = "2026-W06".parse().unwrap();
        assert_eq!(key.date_range(), (date(2026, 2, 2), date(2026, 2, 8)));
    }

    #[test]
    fn test_display_range() {
        let key: WeekKey = "2026-W06".parse().unwrap();
        assert_eq!(key.display_range(), "Feb 2, 2026 — Feb 8, 2026");
    }

    #[test]
    fn test_date_range_contains_every_day_over_several_years() {
        let mut day = date(2019, 12, 20);
        let last = date(2027, 1, 10);
        while day <= last {
            let (start, end) = WeekKey::from_date(day, false).date_range();
            assert!(start <= day && day <= end, "{} not in {}..{}", day, start, end);
            assert_eq!(end - start, Duration::days(6));
            assert_eq!(start.weekday(), chrono::Weekday::Mon);
            day += Duration::days(1);
        }
    }

    #[test]
    fn test_previous_twice_matches_two_weeks_back() {
        let mut day = date(2024, 12, 1);
        for _ in 0..120 {
            let twice = WeekKey::from_date(day - Duration::days(7), true);
            assert_eq!(twice, WeekKey::from_date(day - Duration::days(14), false));
            day += Duration::days(3);
        }
    }

    #[test]
    fn test_parse_round_trip_through_date_range() {
        let key: WeekKey = "2020-W53".parse().unwrap();
        let (monday, _) = key.date_range();
        assert_eq!(WeekKey::from_date(monday, false), key);
    }

    #[test]
    fn test_parse_rejects_bad_keys() {
        assert!("2026-06".parse::<WeekKey>().is_err());
        assert!("26-W06".parse::<WeekKey>().is_err());
        assert!("2026-Wxx".parse::<WeekKey>().is_err());
        assert_eq!(
            "2026-W54".parse::<WeekKey>(),
            Err(WeekKeyError::WeekOutOfRange(54))
        );
        assert_eq!("2026-W00".parse::<WeekKey>(), Err(WeekKeyError::WeekOutOfRange(0)));
    }

    #[test]
    fn test_ordering_is_chronological() {
        let a: WeekKey = "2025-W52".parse().unwrap();
        let b: WeekKey = "2026-W01".parse().unwrap();
        let c: WeekKey = "2026-W10".parse().unwrap();
        assert!(a < b && b < c);
    }

    #[test]
    fn test_serde_uses_text_form() {
        let key: WeekKey = "2026-W06".parse().unwrap();
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"2026-W06\"");
        let back: WeekKey = serde_json::from_str("\"2026-W06\"").unwrap();
        assert_eq!(back, key);
        assert!(serde_json::from_str::<WeekKey>("\"bogus\"").is_err());
    }
}
