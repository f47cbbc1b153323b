pub mod month_day;
pub mod price_series;
pub mod seasonal;
pub mod tickers;
pub mod yahoo_finance;
pub mod server;


pub use month_day::{MonthDay, MonthDayError};
pub use price_series::{compute_daily_returns, DailyReturn, PricePoint, SeasonalError};
pub use seasonal::{
    build_average_curve,
    compute_summary,
    compute_yearly_returns,
    cumulative_yearly,
    filter_by_window,
    top_k_years,
    AnalysisConfig,
    CumulativeYearlyReturn,
    SeasonalAnalysis,
    SeasonalCurve,
    SeasonalPoint,
    SelectionWindow,
    SummaryStats,
    YearlyReturn,
};
pub use tickers::{InstrumentType, TickerList, TickerListError, TickerRecord};
pub use yahoo_finance::{parse_price_csv, DownloadError, DownloaderConfig, PriceDownloader};
pub use server::{run_server, ApiError, AppState, ServerConfig};
