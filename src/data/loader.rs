use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;

use super::model::{ResaleDataset, Transaction};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Columns the pipeline consumes; the CSV header must carry every one.
pub const REQUIRED_COLUMNS: [&str; 5] = [
    "town",
    "flat_type",
    "month",
    "resale_price",
    "floor_area_sqm",
];

/// Structural problems with the source file, distinct from I/O failures.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("required column '{0}' is missing from the CSV header")]
    MissingColumn(&'static str),
    #[error("dataset contains no rows")]
    Empty,
}

/// Load a resale dataset from a CSV file.
///
/// Fails on an unreadable file, a missing required column, a malformed row,
/// or an empty dataset; the dashboard has no partial-load mode.
pub fn load_csv(path: &Path) -> Result<ResaleDataset> {
    let file =
        std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    read_csv(file).with_context(|| format!("loading {}", path.display()))
}

/// Parse CSV content from any reader. Split out from [`load_csv`] so tests
/// can feed in-memory data.
pub fn read_csv<R: Read>(input: R) -> Result<ResaleDataset> {
    let mut reader = csv::Reader::from_reader(input);

    let headers = reader.headers().context("reading CSV header")?;
    for col in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == col) {
            return Err(SchemaError::MissingColumn(col).into());
        }
    }
    let extra_columns: Vec<String> = headers
        .iter()
        .filter(|h| !REQUIRED_COLUMNS.contains(h))
        .map(|h| h.to_string())
        .collect();

    let mut rows: Vec<Transaction> = Vec::new();
    for (row_no, result) in reader.deserialize().enumerate() {
        let raw: RawRecord = result.with_context(|| format!("CSV row {}", row_no + 1))?;
        let tx = Transaction::try_from(raw).with_context(|| format!("CSV row {}", row_no + 1))?;
        rows.push(tx);
    }

    ResaleDataset::from_rows(rows, extra_columns).ok_or_else(|| SchemaError::Empty.into())
}

// ---------------------------------------------------------------------------
// Row deserialization
// ---------------------------------------------------------------------------

/// One CSV row before parsing: every cell as text, unknown columns captured
/// by the flatten map.
#[derive(Debug, Deserialize)]
struct RawRecord {
    town: String,
    flat_type: String,
    month: String,
    resale_price: String,
    floor_area_sqm: String,
    #[serde(flatten)]
    extra: BTreeMap<String, String>,
}

impl TryFrom<RawRecord> for Transaction {
    type Error = anyhow::Error;

    fn try_from(raw: RawRecord) -> Result<Self> {
        let month = parse_month(&raw.month)
            .with_context(|| format!("'{}' is not a month", raw.month))?;
        let resale_price = raw
            .resale_price
            .trim()
            .parse::<f64>()
            .with_context(|| format!("resale_price '{}' is not numeric", raw.resale_price))?;
        let floor_area_sqm = raw
            .floor_area_sqm
            .trim()
            .parse::<f64>()
            .with_context(|| format!("floor_area_sqm '{}' is not numeric", raw.floor_area_sqm))?;

        Ok(Transaction {
            town: raw.town,
            flat_type: raw.flat_type,
            month,
            resale_price,
            floor_area_sqm,
            extra: raw.extra,
        })
    }
}

/// Parse a month cell. Accepts `YYYY-MM` (day pinned to the first of the
/// month) and full `YYYY-MM-DD` dates.
pub fn parse_month(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }
    NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d").ok()
}

// ---------------------------------------------------------------------------
// Memoized load-once accessor
// ---------------------------------------------------------------------------

type DatasetCache = Mutex<BTreeMap<PathBuf, Arc<ResaleDataset>>>;

static CACHE: OnceLock<DatasetCache> = OnceLock::new();

/// Load a dataset at most once per source location and share it read-only.
///
/// The lock is held across the load, so sessions racing on first access
/// cannot read the same file twice; the loser observes the winner's entry.
/// Failed loads are not cached.
pub fn load_cached(path: &Path) -> Result<Arc<ResaleDataset>> {
    let key = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    let cache = CACHE.get_or_init(|| Mutex::new(BTreeMap::new()));

    let mut map = cache.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(dataset) = map.get(&key) {
        log::debug!("dataset cache hit for {}", key.display());
        return Ok(Arc::clone(dataset));
    }
    let dataset = Arc::new(load_csv(path)?);
    map.insert(key, Arc::clone(&dataset));
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
month,town,flat_type,storey_range,floor_area_sqm,resale_price
2020-01,ANG MO KIO,3 ROOM,04 TO 06,68,310000
2020-02,BEDOK,4 ROOM,10 TO 12,92,420000
";

    #[test]
    fn reads_rows_and_passes_extra_columns_through() {
        let ds = read_csv(SAMPLE.as_bytes()).unwrap();

        assert_eq!(ds.len(), 2);
        assert_eq!(ds.extra_columns, vec!["storey_range"]);

        let first = &ds.rows[0];
        assert_eq!(first.town, "ANG MO KIO");
        assert_eq!(first.flat_type, "3 ROOM");
        assert_eq!(first.month, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        assert_eq!(first.resale_price, 310_000.0);
        assert_eq!(first.floor_area_sqm, 68.0);
        assert_eq!(first.extra.get("storey_range").unwrap(), "04 TO 06");
    }

    #[test]
    fn missing_required_column_is_a_schema_error() {
        let csv = "town,flat_type,month,resale_price\nBEDOK,4 ROOM,2020-01,420000\n";
        let err = read_csv(csv.as_bytes()).unwrap_err();
        match err.downcast_ref::<SchemaError>() {
            Some(SchemaError::MissingColumn(col)) => assert_eq!(*col, "floor_area_sqm"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn header_only_file_is_empty() {
        let csv = "town,flat_type,month,resale_price,floor_area_sqm\n";
        let err = read_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SchemaError>(),
            Some(SchemaError::Empty)
        ));
    }

    #[test]
    fn malformed_row_fails_the_load() {
        let csv = "\
town,flat_type,month,resale_price,floor_area_sqm
BEDOK,4 ROOM,2020-01,not-a-price,92
";
        assert!(read_csv(csv.as_bytes()).is_err());
    }

    #[test]
    fn month_cells_accept_both_formats() {
        assert_eq!(
            parse_month("2017-01"),
            NaiveDate::from_ymd_opt(2017, 1, 1)
        );
        assert_eq!(
            parse_month("2017-01-15"),
            NaiveDate::from_ymd_opt(2017, 1, 15)
        );
        assert_eq!(parse_month("January 2017"), None);
    }

    #[test]
    fn cached_load_returns_the_shared_handle() {
        let path = std::env::temp_dir().join(format!(
            "resale-dashboard-cache-test-{}.csv",
            std::process::id()
        ));
        std::fs::write(&path, SAMPLE).unwrap();

        let first = load_cached(&path).unwrap();
        let second = load_cached(&path).unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        std::fs::remove_file(&path).ok();
    }
}
