//! Seasonal Pattern Engine
//!
//! Pure, stateless functions that turn a daily return series into
//! day-of-year seasonal statistics: the average-return/growth curve, pattern
//! returns within a selected month-day window, per-year compounded returns,
//! and summary statistics. Every user interaction recomputes the whole
//! pipeline from scratch; `SeasonalAnalysis` bundles one such recomputation
//! into a single immutable value.

use crate::month_day::MonthDay;
use crate::price_series::{compute_daily_returns, DailyReturn, PricePoint, SeasonalError};
use chrono::NaiveDate;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A user-selected contiguous range of month-days, inclusive on both bounds.
///
/// The default window covers the full year. A window whose start sorts after
/// its end wraps across year-end and selects the union of `[start, Dec 31]`
/// and `[Jan 1, end]` (e.g. Dec 15 - Jan 15).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionWindow {
    pub start: MonthDay,
    pub end: MonthDay,
}

impl SelectionWindow {
    /// Creates a new selection window.
    pub fn new(start: MonthDay, end: MonthDay) -> Self {
        SelectionWindow { start, end }
    }

    /// The full-year window, Jan 1 - Dec 31.
    pub fn full_year() -> Self {
        SelectionWindow {
            start: MonthDay::first(),
            end: MonthDay::last(),
        }
    }

    /// Whether this window wraps across year-end.
    pub fn wraps(&self) -> bool {
        self.start > self.end
    }

    /// Whether the given month-day falls inside the window.
    pub fn contains(&self, month_day: MonthDay) -> bool {
        if self.wraps() {
            month_day >= self.start || month_day <= self.end
        } else {
            month_day >= self.start && month_day <= self.end
        }
    }
}

impl Default for SelectionWindow {
    fn default() -> Self {
        Self::full_year()
    }
}

/// One point on the seasonal curve: the average daily return across years for
/// a given month-day, and the compounded growth of $100 up to that point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalPoint {
    pub month_day: MonthDay,
    pub avg_return: f64,
    pub growth: f64,
}

/// The day-of-year average-return curve with its compounded growth.
///
/// Points are ordered by calendar position. Month-days with no surviving data
/// after year exclusion are absent; growth compounds over present points only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalCurve {
    pub points: Vec<SeasonalPoint>,
    /// Lowest growth value, for chart y-axis scaling
    pub min_growth: f64,
    /// Highest growth value, for chart y-axis scaling
    pub max_growth: f64,
}

/// Compounded pattern return for a single calendar year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyReturn {
    pub year: i32,
    /// (product of (1 + daily_return) over the year's window rows) - 1
    pub pattern_return: f64,
}

/// Running sum of yearly pattern returns, in year order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CumulativeYearlyReturn {
    pub year: i32,
    pub cumulative_return: f64,
}

/// Summary statistics over the yearly pattern returns.
///
/// `cumulative_return` intentionally differs from the other stats: it is the
/// raw (uncompounded) sum of daily returns over the entire pattern, while
/// max/min/mean operate on the compounded per-year values. The optional
/// fields are `None` when no years qualify; callers must render that case
/// explicitly instead of dividing by zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub max_return: Option<f64>,
    pub min_return: Option<f64>,
    pub mean_return: Option<f64>,
    /// Raw sum of daily returns across all pattern rows
    pub cumulative_return: f64,
    /// Years with pattern return > 0
    pub positive_years: usize,
    /// Years with pattern return < 0
    pub negative_years: usize,
    /// positive_years / total qualifying years
    pub win_ratio: Option<f64>,
}

fn without_excluded_years(
    returns: &[DailyReturn],
    excluded_years: &BTreeSet<i32>,
) -> Vec<DailyReturn> {
    returns
        .iter()
        .filter(|r| !excluded_years.contains(&r.year()))
        .cloned()
        .collect()
}

/// Builds the seasonal average-return curve and its compounded growth.
///
/// Rows from excluded years are dropped before grouping, so a month-day whose
/// every contributing year is excluded is absent from the curve rather than
/// zero-filled. Grouping and growth compounding both run in calendar
/// month-day order.
///
/// # Errors
/// Returns `SeasonalError::EmptySeries` when no rows survive the exclusion.
pub fn build_average_curve(
    returns: &[DailyReturn],
    excluded_years: &BTreeSet<i32>,
) -> Result<SeasonalCurve, SeasonalError> {
    let filtered = without_excluded_years(returns, excluded_years);
    if filtered.is_empty() {
        return Err(SeasonalError::EmptySeries);
    }

    // BTreeMap keyed by MonthDay iterates in calendar order by construction.
    let mut groups: BTreeMap<MonthDay, (f64, usize)> = BTreeMap::new();
    for r in &filtered {
        let entry = groups.entry(r.month_day()).or_insert((0.0, 0));
        entry.0 += r.daily_return;
        entry.1 += 1;
    }

    let mut points = Vec::with_capacity(groups.len());
    let mut growth = 100.0;
    let mut min_growth = f64::INFINITY;
    let mut max_growth = f64::NEG_INFINITY;

    for (month_day, (sum, count)) in groups {
        let avg_return = sum / count as f64;
        growth *= 1.0 + avg_return;
        min_growth = min_growth.min(growth);
        max_growth = max_growth.max(growth);
        points.push(SeasonalPoint {
            month_day,
            avg_return,
            growth,
        });
    }

    Ok(SeasonalCurve {
        points,
        min_growth,
        max_growth,
    })
}

/// Filters the return series down to the pattern: rows from non-excluded
/// years whose month-day falls inside the selection window (inclusive).
pub fn filter_by_window(
    returns: &[DailyReturn],
    excluded_years: &BTreeSet<i32>,
    window: SelectionWindow,
) -> Vec<DailyReturn> {
    returns
        .iter()
        .filter(|r| !excluded_years.contains(&r.year()) && window.contains(r.month_day()))
        .cloned()
        .collect()
}

/// Compounds the pattern rows into one return per calendar year.
///
/// Returns are compounded multiplicatively within each year, not summed.
/// Years with no rows in the window are absent from the output. Output is in
/// ascending year order.
pub fn compute_yearly_returns(pattern: &[DailyReturn]) -> Vec<YearlyReturn> {
    let mut by_year: BTreeMap<i32, f64> = BTreeMap::new();
    for r in pattern {
        let factor = by_year.entry(r.year()).or_insert(1.0);
        *factor *= 1.0 + r.daily_return;
    }

    by_year
        .into_iter()
        .map(|(year, factor)| YearlyReturn {
            year,
            pattern_return: factor - 1.0,
        })
        .collect()
}

/// Computes summary statistics from the yearly returns and the raw pattern.
///
/// See [`SummaryStats`] for the compounded-vs-raw asymmetry. With no
/// qualifying years every optional field is `None` and the counts are zero.
pub fn compute_summary(yearly: &[YearlyReturn], pattern: &[DailyReturn]) -> SummaryStats {
    let cumulative_return = pattern.iter().map(|r| r.daily_return).sum();

    if yearly.is_empty() {
        return SummaryStats {
            max_return: None,
            min_return: None,
            mean_return: None,
            cumulative_return,
            positive_years: 0,
            negative_years: 0,
            win_ratio: None,
        };
    }

    let mut max_return = f64::NEG_INFINITY;
    let mut min_return = f64::INFINITY;
    let mut sum = 0.0;
    let mut positive_years = 0;
    let mut negative_years = 0;

    for y in yearly {
        max_return = max_return.max(y.pattern_return);
        min_return = min_return.min(y.pattern_return);
        sum += y.pattern_return;
        if y.pattern_return > 0.0 {
            positive_years += 1;
        } else if y.pattern_return < 0.0 {
            negative_years += 1;
        }
    }

    SummaryStats {
        max_return: Some(max_return),
        min_return: Some(min_return),
        mean_return: Some(sum / yearly.len() as f64),
        cumulative_return,
        positive_years,
        negative_years,
        win_ratio: Some(positive_years as f64 / yearly.len() as f64),
    }
}

/// Running sum of yearly pattern returns in year order, for the cumulative
/// area chart.
pub fn cumulative_yearly(yearly: &[YearlyReturn]) -> Vec<CumulativeYearlyReturn> {
    let mut running = 0.0;
    yearly
        .iter()
        .map(|y| {
            running += y.pattern_return;
            CumulativeYearlyReturn {
                year: y.year,
                cumulative_return: running,
            }
        })
        .collect()
}

/// Returns the k years with the largest pattern returns, in descending
/// return order. Ties keep ascending-year order (stable sort); fewer than k
/// qualifying years yields all of them with no padding. Used for chart
/// highlighting only.
pub fn top_k_years(yearly: &[YearlyReturn], k: usize) -> Vec<YearlyReturn> {
    let mut ranked = yearly.to_vec();
    ranked.sort_by_key(|y| std::cmp::Reverse(OrderedFloat(y.pattern_return)));
    ranked.truncate(k);
    ranked
}

/// Configuration for one seasonal analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Calendar years removed before any aggregation
    pub excluded_years: BTreeSet<i32>,
    /// Month-day window restricting the pattern
    pub window: SelectionWindow,
    /// How many top years to surface for highlighting
    pub top_k: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            excluded_years: BTreeSet::new(),
            window: SelectionWindow::full_year(),
            top_k: 3,
        }
    }
}

/// The complete result of one seasonal analysis recomputation.
///
/// Immutable: a fetch, window change, or exclusion change produces a fresh
/// value via [`SeasonalAnalysis::compute`]. There is no hidden session state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalAnalysis {
    /// Earliest date in the fetched price series
    pub first_date: NaiveDate,
    /// Latest date in the fetched price series
    pub last_date: NaiveDate,
    pub curve: SeasonalCurve,
    pub yearly_returns: Vec<YearlyReturn>,
    pub cumulative_yearly: Vec<CumulativeYearlyReturn>,
    pub summary: SummaryStats,
    pub top_years: Vec<YearlyReturn>,
}

impl SeasonalAnalysis {
    /// Runs the full pipeline over a raw price series.
    ///
    /// # Errors
    /// Returns `SeasonalError::EmptySeries` when the series has fewer than 2
    /// rows or when year exclusion removes everything, and
    /// `SeasonalError::UnsortedSeries` when dates are not strictly ascending.
    pub fn compute(
        prices: &[PricePoint],
        config: &AnalysisConfig,
    ) -> Result<Self, SeasonalError> {
        let returns = compute_daily_returns(prices)?;
        let curve = build_average_curve(&returns, &config.excluded_years)?;
        let pattern = filter_by_window(&returns, &config.excluded_years, config.window);
        let yearly_returns = compute_yearly_returns(&pattern);
        let summary = compute_summary(&yearly_returns, &pattern);
        let top_years = top_k_years(&yearly_returns, config.top_k);
        let cumulative = cumulative_yearly(&yearly_returns);

        Ok(SeasonalAnalysis {
            first_date: prices[0].date,
            last_date: prices[prices.len() - 1].date,
            curve,
            yearly_returns,
            cumulative_yearly: cumulative,
            summary,
            top_years,
        })
    }
}
