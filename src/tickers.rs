use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

/// Instrument classification derived from a ticker's ISIN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InstrumentType {
    Stock,
    Etf,
    Currency,
    Crypto,
    Unknown,
}

impl InstrumentType {
    /// Classifies an instrument from its ISIN.
    ///
    /// The reference list currently only carries listed stocks, so any
    /// well-formed ISIN classifies as `Stock`; missing or malformed ISINs
    /// classify as `Unknown`.
    pub fn from_isin(isin: &str) -> Self {
        let isin = isin.trim();
        if isin.len() == 12 && isin.chars().take(2).all(|c| c.is_ascii_alphabetic()) {
            InstrumentType::Stock
        } else {
            InstrumentType::Unknown
        }
    }

    /// Parses the upper-cased wire form ("STOCK", "ETF", ...).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "STOCK" => Some(InstrumentType::Stock),
            "ETF" => Some(InstrumentType::Etf),
            "CURRENCY" => Some(InstrumentType::Currency),
            "CRYPTO" => Some(InstrumentType::Crypto),
            "UNKNOWN" => Some(InstrumentType::Unknown),
            _ => None,
        }
    }
}

/// One row of the static ticker reference list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerRecord {
    /// Country name, upper-cased on load
    pub country: String,
    /// Company or instrument display name
    pub company: String,
    pub isin: String,
    pub symbol: String,
}

impl TickerRecord {
    /// "Company | ISIN" display label shown in instrument pickers.
    pub fn combined_label(&self) -> String {
        format!("{} | {}", self.company, self.isin)
    }

    /// Instrument type classified from this record's ISIN.
    pub fn instrument_type(&self) -> InstrumentType {
        InstrumentType::from_isin(&self.isin)
    }
}

// CSV row shape as written by the offline build script. The legacy
// `combined` column is accepted but recomputed from company + isin.
#[derive(Debug, Deserialize)]
struct RawTickerRow {
    country: String,
    company: String,
    isin: String,
    symbol: String,
    #[serde(default)]
    #[allow(dead_code)]
    combined: Option<String>,
}

/// The static ticker reference list, loaded once from CSV at startup.
///
/// Supports filtering by country and instrument type and resolving an ISIN
/// to the identifiers the downloader needs.
#[derive(Debug, Clone)]
pub struct TickerList {
    records: Vec<TickerRecord>,
}

impl TickerList {
    /// Loads the reference list from a CSV file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or a row fails to parse.
    pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Self, TickerListError> {
        let file = std::fs::File::open(path.as_ref())
            .map_err(|e| TickerListError::Io(e.to_string()))?;
        Self::from_reader(file)
    }

    /// Loads the reference list from any CSV reader. Used directly by tests.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, TickerListError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for row in csv_reader.deserialize::<RawTickerRow>() {
            let row = row.map_err(|e| TickerListError::Csv(e.to_string()))?;
            records.push(TickerRecord {
                country: row.country.trim().to_uppercase(),
                company: row.company.trim().to_string(),
                isin: row.isin.trim().to_string(),
                symbol: row.symbol.trim().to_string(),
            });
        }

        Ok(TickerList { records })
    }

    /// Number of records in the list.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records.
    pub fn records(&self) -> &[TickerRecord] {
        &self.records
    }

    /// Records matching the given country and/or instrument type.
    ///
    /// Country comparison is case-insensitive; `None` filters match
    /// everything.
    pub fn filter(
        &self,
        country: Option<&str>,
        instrument_type: Option<InstrumentType>,
    ) -> Vec<&TickerRecord> {
        let country_upper = country.map(|c| c.trim().to_uppercase());
        self.records
            .iter()
            .filter(|r| {
                country_upper
                    .as_deref()
                    .map_or(true, |c| r.country == c)
                    && instrument_type.map_or(true, |t| r.instrument_type() == t)
            })
            .collect()
    }

    /// Resolves an ISIN to its record.
    ///
    /// # Errors
    /// Returns `TickerListError::UnknownIsin` when the ISIN is not in the
    /// list.
    pub fn resolve_isin(&self, isin: &str) -> Result<&TickerRecord, TickerListError> {
        let isin = isin.trim();
        self.records
            .iter()
            .find(|r| r.isin == isin)
            .ok_or_else(|| TickerListError::UnknownIsin(isin.to_string()))
    }
}

/// Errors that can occur when loading or querying the ticker list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickerListError {
    /// File could not be opened or read
    Io(String),
    /// A CSV row failed to parse
    Csv(String),
    /// ISIN not present in the reference list
    UnknownIsin(String),
}

impl std::fmt::Display for TickerListError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TickerListError::Io(msg) => write!(f, "Ticker list I/O error: {}", msg),
            TickerListError::Csv(msg) => write!(f, "Ticker list parse error: {}", msg),
            TickerListError::UnknownIsin(isin) => {
                write!(f, "Unknown ISIN: {}", isin)
            }
        }
    }
}

impl std::error::Error for TickerListError {}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_CSV: &str = "\
country,company,isin,symbol,combined
united states,Apple Inc,US0378331005,AAPL,Apple Inc | US0378331005
germany,SAP SE,DE0007164600,SAP,SAP SE | DE0007164600
United States,Microsoft Corporation,US5949181045,MSFT,Microsoft Corporation | US5949181045
";

    fn sample_list() -> TickerList {
        TickerList::from_reader(SAMPLE_CSV.as_bytes()).unwrap()
    }

    #[test]
    fn test_load_uppercases_country() {
        let list = sample_list();
        assert_eq!(list.len(), 3);
        assert!(list.records().iter().all(|r| r.country == r.country.to_uppercase()));
        assert_eq!(list.records()[0].country, "UNITED STATES");
    }

    #[test]
    fn test_filter_by_country_case_insensitive() {
        let list = sample_list();
        let us = list.filter(Some("united states"), None);
        assert_eq!(us.len(), 2);
        let de = list.filter(Some("GERMANY"), None);
        assert_eq!(de.len(), 1);
        assert_eq!(de[0].symbol, "SAP");
    }

    #[test]
    fn test_filter_by_instrument_type() {
        let list = sample_list();
        let stocks = list.filter(None, Some(InstrumentType::Stock));
        assert_eq!(stocks.len(), 3);
        let etfs = list.filter(None, Some(InstrumentType::Etf));
        assert!(etfs.is_empty());
    }

    #[test]
    fn test_resolve_isin() {
        let list = sample_list();
        let record = list.resolve_isin("DE0007164600").unwrap();
        assert_eq!(record.symbol, "SAP");
        assert_eq!(record.combined_label(), "SAP SE | DE0007164600");
    }

    #[test]
    fn test_resolve_unknown_isin_errors() {
        let list = sample_list();
        assert_eq!(
            list.resolve_isin("XX0000000000").unwrap_err(),
            TickerListError::UnknownIsin("XX0000000000".to_string())
        );
    }

    #[test]
    fn test_instrument_type_from_isin() {
        assert_eq!(
            InstrumentType::from_isin("US0378331005"),
            InstrumentType::Stock
        );
        assert_eq!(InstrumentType::from_isin(""), InstrumentType::Unknown);
        assert_eq!(InstrumentType::from_isin("12345"), InstrumentType::Unknown);
    }

    #[test]
    fn test_instrument_type_parse() {
        assert_eq!(InstrumentType::parse("stock"), Some(InstrumentType::Stock));
        assert_eq!(InstrumentType::parse("ETF"), Some(InstrumentType::Etf));
        assert_eq!(InstrumentType::parse("bond"), None);
    }

    #[test]
    fn test_missing_column_is_a_parse_error() {
        let bad = "country,company\nunited states,Apple Inc\n";
        assert!(matches!(
            TickerList::from_reader(bad.as_bytes()),
            Err(TickerListError::Csv(_))
        ));
    }
}
