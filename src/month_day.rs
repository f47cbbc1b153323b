use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Cumulative days before each month on a leap-year calendar.
/// Using the leap-year layout keeps Feb 29 representable and gives every
/// month-day a stable ordinal between 1 and 366.
const DAYS_BEFORE_MONTH: [u32; 12] = [0, 31, 60, 91, 121, 152, 182, 213, 244, 274, 305, 335];

/// Days in each month on a leap-year calendar.
const DAYS_IN_MONTH: [u32; 12] = [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// A date reduced to its month and day, discarding the year.
///
/// Used as the cross-year alignment key for seasonal analysis: all rows that
/// share a month-day are averaged together regardless of which year they came
/// from. Ordering is by calendar position (Jan 1 first, Dec 31 last) via an
/// explicit day-of-year ordinal rather than string comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthDay {
    month: u32,
    day: u32,
}

impl MonthDay {
    /// Creates a new month-day pair.
    ///
    /// # Errors
    /// Returns an error if the month is outside 1-12 or the day does not
    /// exist in that month (Feb 29 is accepted).
    pub fn new(month: u32, day: u32) -> Result<Self, MonthDayError> {
        if !(1..=12).contains(&month) {
            return Err(MonthDayError::InvalidMonth(month));
        }
        if day == 0 || day > DAYS_IN_MONTH[(month - 1) as usize] {
            return Err(MonthDayError::InvalidDay { month, day });
        }
        Ok(MonthDay { month, day })
    }

    /// Extracts the month-day from a calendar date.
    pub fn from_date(date: NaiveDate) -> Self {
        // A NaiveDate always carries a valid month/day pair.
        MonthDay {
            month: date.month(),
            day: date.day(),
        }
    }

    /// Parses a "MM-DD" string (e.g. "03-15").
    pub fn parse(s: &str) -> Result<Self, MonthDayError> {
        let (month_str, day_str) = s
            .split_once('-')
            .ok_or_else(|| MonthDayError::InvalidFormat(s.to_string()))?;
        let month = month_str
            .parse::<u32>()
            .map_err(|_| MonthDayError::InvalidFormat(s.to_string()))?;
        let day = day_str
            .parse::<u32>()
            .map_err(|_| MonthDayError::InvalidFormat(s.to_string()))?;
        Self::new(month, day)
    }

    /// January 1, the start of the default selection window.
    pub fn first() -> Self {
        MonthDay { month: 1, day: 1 }
    }

    /// December 31, the end of the default selection window.
    pub fn last() -> Self {
        MonthDay { month: 12, day: 31 }
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    /// Day-of-year ordinal between 1 (Jan 1) and 366 (Dec 31), computed on a
    /// leap-year reference so that Feb 29 has its own slot.
    pub fn ordinal(&self) -> u32 {
        DAYS_BEFORE_MONTH[(self.month - 1) as usize] + self.day
    }
}

impl PartialOrd for MonthDay {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MonthDay {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.ordinal().cmp(&other.ordinal())
    }
}

impl fmt::Display for MonthDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}", self.month, self.day)
    }
}

impl From<MonthDay> for String {
    fn from(md: MonthDay) -> String {
        md.to_string()
    }
}

impl TryFrom<String> for MonthDay {
    type Error = MonthDayError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        MonthDay::parse(&s)
    }
}

/// Errors that can occur when creating or parsing a month-day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonthDayError {
    /// Month outside 1-12
    InvalidMonth(u32),
    /// Day does not exist in the given month
    InvalidDay { month: u32, day: u32 },
    /// String is not in "MM-DD" format
    InvalidFormat(String),
}

impl fmt::Display for MonthDayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthDayError::InvalidMonth(month) => write!(f, "Invalid month: {}", month),
            MonthDayError::InvalidDay { month, day } => {
                write!(f, "Invalid day {} for month {}", day, month)
            }
            MonthDayError::InvalidFormat(s) => write!(f, "Invalid month-day format: '{}'", s),
        }
    }
}

impl std::error::Error for MonthDayError {}
