use chrono::{Datelike, Duration, NaiveDate};
use pulse::month_day::MonthDay;
use pulse::price_series::{compute_daily_returns, PricePoint};
use pulse::seasonal::{
    build_average_curve, compute_summary, compute_yearly_returns, filter_by_window, top_k_years,
    AnalysisConfig, SeasonalAnalysis, SelectionWindow,
};
use std::collections::BTreeSet;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Daily series covering several full years with a repeating weekly shape:
/// four small up days and one larger down day, weekends skipped.
fn multi_year_series(first_year: i32, last_year: i32) -> Vec<PricePoint> {
    let mut prices = Vec::new();
    let mut close = 100.0;
    let mut day = date(first_year, 1, 1);
    let end = date(last_year, 12, 31);
    let mut weekday_counter = 0u32;

    while day <= end {
        let weekday = day.weekday().num_days_from_monday();
        if weekday < 5 {
            close *= if weekday_counter % 5 == 4 {
                0.995
            } else {
                1.002
            };
            prices.push(PricePoint::new(day, close));
            weekday_counter += 1;
        }
        day = day + Duration::days(1);
    }

    prices
}

#[test]
fn pipeline_return_count_matches_series() {
    let prices = multi_year_series(2018, 2022);
    let returns = compute_daily_returns(&prices).unwrap();
    assert_eq!(returns.len(), prices.len() - 1);
}

#[test]
fn pipeline_full_window_reproduces_direct_yearly_compounding() {
    let prices = multi_year_series(2018, 2022);
    let returns = compute_daily_returns(&prices).unwrap();

    // Full-year window, no exclusions: the pattern is just the whole series
    let pattern = filter_by_window(&returns, &BTreeSet::new(), SelectionWindow::full_year());
    assert_eq!(pattern.len(), returns.len());

    let yearly = compute_yearly_returns(&pattern);

    for y in &yearly {
        let direct: f64 = returns
            .iter()
            .filter(|r| r.year() == y.year)
            .map(|r| 1.0 + r.daily_return)
            .product::<f64>()
            - 1.0;
        assert!(
            (y.pattern_return - direct).abs() < 1e-12,
            "Year {} mismatch",
            y.year
        );
    }
}

#[test]
fn pipeline_excluded_year_disappears_everywhere() {
    let prices = multi_year_series(2018, 2022);
    let returns = compute_daily_returns(&prices).unwrap();
    let excluded: BTreeSet<i32> = [2020].into_iter().collect();

    let curve = build_average_curve(&returns, &excluded).unwrap();
    assert!(!curve.points.is_empty());

    let pattern = filter_by_window(&returns, &excluded, SelectionWindow::full_year());
    assert!(pattern.iter().all(|r| r.year() != 2020));

    let yearly = compute_yearly_returns(&pattern);
    assert!(yearly.iter().all(|y| y.year != 2020));
    assert_eq!(yearly.len(), 4);
}

#[test]
fn pipeline_summary_counts_and_ratio_are_consistent() {
    let prices = multi_year_series(2018, 2022);
    let returns = compute_daily_returns(&prices).unwrap();
    let pattern = filter_by_window(&returns, &BTreeSet::new(), SelectionWindow::full_year());
    let yearly = compute_yearly_returns(&pattern);
    let summary = compute_summary(&yearly, &pattern);

    assert_eq!(
        summary.positive_years + summary.negative_years,
        yearly
            .iter()
            .filter(|y| y.pattern_return != 0.0)
            .count()
    );
    let ratio = summary.win_ratio.unwrap();
    assert!((0.0..=1.0).contains(&ratio));
    assert!(
        (ratio - summary.positive_years as f64 / yearly.len() as f64).abs() < 1e-12
    );

    let max = summary.max_return.unwrap();
    let min = summary.min_return.unwrap();
    let mean = summary.mean_return.unwrap();
    assert!(min <= mean && mean <= max);
}

#[test]
fn pipeline_top_years_subset_of_yearly() {
    let prices = multi_year_series(2018, 2022);
    let returns = compute_daily_returns(&prices).unwrap();
    let pattern = filter_by_window(&returns, &BTreeSet::new(), SelectionWindow::full_year());
    let yearly = compute_yearly_returns(&pattern);

    let top = top_k_years(&yearly, 3);
    assert_eq!(top.len(), 3);
    let worst_top = top.last().unwrap().pattern_return;
    for y in &yearly {
        if !top.iter().any(|t| t.year == y.year) {
            assert!(y.pattern_return <= worst_top);
        }
    }
}

#[test]
fn pipeline_narrow_window_analysis_is_self_consistent() {
    let prices = multi_year_series(2018, 2022);
    let window = SelectionWindow::new(
        MonthDay::new(3, 1).unwrap(),
        MonthDay::new(4, 30).unwrap(),
    );
    let config = AnalysisConfig {
        excluded_years: BTreeSet::new(),
        window,
        top_k: 3,
    };

    let analysis = SeasonalAnalysis::compute(&prices, &config).unwrap();

    // Five calendar years of March-April data
    assert_eq!(analysis.yearly_returns.len(), 5);

    // The curve always covers the whole year regardless of the window
    let first = analysis.curve.points.first().unwrap().month_day;
    let last = analysis.curve.points.last().unwrap().month_day;
    assert!(first < MonthDay::new(2, 1).unwrap());
    assert!(last > MonthDay::new(11, 30).unwrap());

    // Cumulative yearly is a running sum of the yearly returns
    let mut running = 0.0;
    for (y, c) in analysis
        .yearly_returns
        .iter()
        .zip(analysis.cumulative_yearly.iter())
    {
        running += y.pattern_return;
        assert_eq!(y.year, c.year);
        assert!((c.cumulative_return - running).abs() < 1e-12);
    }
}
