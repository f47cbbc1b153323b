use crate::month_day::MonthDay;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A single daily price observation: trading date and close price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Trading date
    pub date: NaiveDate,
    /// Close price on that date
    pub close: f64,
}

impl PricePoint {
    /// Creates a new PricePoint.
    pub fn new(date: NaiveDate, close: f64) -> Self {
        PricePoint { date, close }
    }
}

/// A single daily return derived from two consecutive close prices.
///
/// The year and month-day used for seasonal alignment both derive from `date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyReturn {
    /// Date of the later of the two closes
    pub date: NaiveDate,
    /// Simple return: close[i] / close[i-1] - 1
    pub daily_return: f64,
}

impl DailyReturn {
    /// Creates a new DailyReturn.
    pub fn new(date: NaiveDate, daily_return: f64) -> Self {
        DailyReturn { date, daily_return }
    }

    /// Calendar year of this return, used to group pattern returns.
    pub fn year(&self) -> i32 {
        self.date.year()
    }

    /// Month-day alignment key of this return.
    pub fn month_day(&self) -> MonthDay {
        MonthDay::from_date(self.date)
    }
}

/// Computes simple daily returns from an ascending, unique-date price series.
///
/// The first row has no prior close and is dropped, so the output always has
/// exactly one fewer row than the input.
///
/// # Errors
/// Returns `SeasonalError::EmptySeries` when the series has fewer than 2 rows
/// (no return can be computed) and `SeasonalError::UnsortedSeries` when dates
/// are not strictly ascending.
pub fn compute_daily_returns(prices: &[PricePoint]) -> Result<Vec<DailyReturn>, SeasonalError> {
    if prices.len() < 2 {
        return Err(SeasonalError::EmptySeries);
    }

    let mut returns = Vec::with_capacity(prices.len() - 1);
    for pair in prices.windows(2) {
        let (prev, curr) = (&pair[0], &pair[1]);
        if curr.date <= prev.date {
            return Err(SeasonalError::UnsortedSeries {
                prev: prev.date,
                next: curr.date,
            });
        }
        returns.push(DailyReturn::new(curr.date, curr.close / prev.close - 1.0));
    }

    Ok(returns)
}

/// Errors that can occur in the seasonal analysis pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeasonalError {
    /// Fewer than 2 price rows, or no rows survive year exclusion
    EmptySeries,
    /// Price series dates are not strictly ascending
    UnsortedSeries { prev: NaiveDate, next: NaiveDate },
}

impl std::fmt::Display for SeasonalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeasonalError::EmptySeries => {
                write!(f, "Insufficient price history to compute returns")
            }
            SeasonalError::UnsortedSeries { prev, next } => {
                write!(f, "Price series is not sorted: {} followed by {}", prev, next)
            }
        }
    }
}

impl std::error::Error for SeasonalError {}
