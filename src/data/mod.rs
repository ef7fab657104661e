/// Data layer: core types, loading, filtering, and aggregation.
///
/// Architecture:
/// ```text
///  ResaleData.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + validate → ResaleDataset (cached per path)
///   └──────────┘
///        │
///        ▼
///   ┌───────────────┐
///   │ ResaleDataset  │  Vec<Transaction>, unique values, observed bounds
///   └───────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  conjunctive predicates → matching row indices
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  scalar metrics + grouped tables for display
///   └───────────┘
/// ```
pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;

#[cfg(test)]
pub(crate) mod testutil {
    use std::collections::BTreeMap;

    use super::loader::parse_month;
    use super::model::{ResaleDataset, Transaction};

    /// Build a transaction row for tests; `month` is a `YYYY-MM` string.
    pub fn tx(
        town: &str,
        flat_type: &str,
        month: &str,
        resale_price: f64,
        floor_area_sqm: f64,
    ) -> Transaction {
        Transaction {
            town: town.to_string(),
            flat_type: flat_type.to_string(),
            month: parse_month(month).unwrap(),
            resale_price,
            floor_area_sqm,
            extra: BTreeMap::new(),
        }
    }

    /// Build a dataset from rows, no pass-through columns.
    pub fn dataset(rows: Vec<Transaction>) -> ResaleDataset {
        ResaleDataset::from_rows(rows, Vec::new()).unwrap()
    }
}
