//! Final file names for organized files.
//!
//! Names are either kept as they are or prefixed with a `YYYY-MM-DD_` date.
//! The date comes from a [`Clock`] so runs can be pinned to a known day.

use chrono::{Local, NaiveDate};

/// Date format used for the prefix.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Source of "today" for date prefixes.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Reads the local calendar date from the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Always returns the same date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Computes the name a file will have at its destination.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use tidydir::naming::compute_name;
///
/// let day = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
/// assert_eq!(compute_name("report.pdf", true, day), "2024-03-05_report.pdf");
/// assert_eq!(compute_name("report.pdf", false, day), "report.pdf");
/// ```
pub fn compute_name(original: &str, prepend_date: bool, today: NaiveDate) -> String {
    if prepend_date {
        format!("{}_{}", today.format(DATE_FORMAT), original)
    } else {
        original.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn march_fifth() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
    }

    #[test]
    fn test_name_unchanged_without_prefix() {
        assert_eq!(compute_name("report.pdf", false, march_fifth()), "report.pdf");
        assert_eq!(compute_name("README", false, march_fifth()), "README");
    }

    #[test]
    fn test_date_prefix_is_zero_padded() {
        assert_eq!(
            compute_name("report.pdf", true, march_fifth()),
            "2024-03-05_report.pdf"
        );
    }

    #[test]
    fn test_fixed_clock() {
        let clock = FixedClock(march_fifth());
        assert_eq!(clock.today(), march_fifth());
        assert_eq!(
            compute_name("song.mp3", true, clock.today()),
            "2024-03-05_song.mp3"
        );
    }

    #[test]
    fn test_system_clock_prefix_parses_back() {
        let name = compute_name("a.txt", true, SystemClock.today());
        let date_part = &name[..10];
        assert!(NaiveDate::parse_from_str(date_part, DATE_FORMAT).is_ok());
        assert!(name.ends_with("_a.txt"));
    }
}
