use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

// ---------------------------------------------------------------------------
// Transaction – one row of the resale dataset
// ---------------------------------------------------------------------------

/// A single resale transaction (one row of the source CSV).
///
/// The five columns the pipeline consumes are typed; every other column of
/// the source file is carried verbatim in `extra` for the preview table and
/// is never consulted by filtering or aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub town: String,
    pub flat_type: String,
    /// Transaction month. Source files carry `YYYY-MM`; the day is pinned to
    /// the first of the month so values compare as full dates.
    pub month: NaiveDate,
    pub resale_price: f64,
    pub floor_area_sqm: f64,
    /// Pass-through columns: column name → raw cell text.
    pub extra: BTreeMap<String, String>,
}

// ---------------------------------------------------------------------------
// ResaleDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset with the unique-value lists and observed bounds
/// that seed the filter controls, computed once at load time.
#[derive(Debug, Clone)]
pub struct ResaleDataset {
    /// All transactions (rows), in file order.
    pub rows: Vec<Transaction>,
    /// Sorted unique towns; rows with an empty town cell are kept in `rows`
    /// but not enumerated here.
    pub towns: Vec<String>,
    /// Sorted unique flat types, same empty-cell handling as `towns`.
    pub flat_types: Vec<String>,
    /// Observed `[min, max]` of `resale_price`.
    pub price_bounds: (f64, f64),
    /// Observed `[min, max]` of `month`.
    pub month_bounds: (NaiveDate, NaiveDate),
    /// Pass-through column names, in source header order.
    pub extra_columns: Vec<String>,
}

impl ResaleDataset {
    /// Build the dataset from parsed rows.
    ///
    /// Returns `None` for an empty row set: the observed bounds would be
    /// undefined and every range control seeds from them.
    pub fn from_rows(rows: Vec<Transaction>, extra_columns: Vec<String>) -> Option<Self> {
        let first = rows.first()?;

        let mut towns: BTreeSet<String> = BTreeSet::new();
        let mut flat_types: BTreeSet<String> = BTreeSet::new();
        let mut price_bounds = (first.resale_price, first.resale_price);
        let mut month_bounds = (first.month, first.month);

        for tx in &rows {
            if !tx.town.is_empty() {
                towns.insert(tx.town.clone());
            }
            if !tx.flat_type.is_empty() {
                flat_types.insert(tx.flat_type.clone());
            }
            price_bounds.0 = price_bounds.0.min(tx.resale_price);
            price_bounds.1 = price_bounds.1.max(tx.resale_price);
            month_bounds.0 = month_bounds.0.min(tx.month);
            month_bounds.1 = month_bounds.1.max(tx.month);
        }

        Some(ResaleDataset {
            rows,
            towns: towns.into_iter().collect(),
            flat_types: flat_types.into_iter().collect(),
            price_bounds,
            month_bounds,
            extra_columns,
        })
    }

    /// Number of transactions.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
