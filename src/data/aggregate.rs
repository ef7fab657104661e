use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::model::ResaleDataset;

/// How many towns the ranked average-price table keeps.
const TOP_TOWNS: usize = 10;

// ---------------------------------------------------------------------------
// Aggregates – everything the dashboard displays for one filtered view
// ---------------------------------------------------------------------------

/// Derived metrics and grouped tables for one filtered view.
///
/// A pure function of (dataset, filtered indices): recomputed wholesale on
/// every filter change and never carried across interactions. Total over
/// any index slice, including an empty one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregates {
    /// Cardinality of the filtered view.
    pub transactions: usize,
    /// `None` when the filtered view is empty; the UI shows a placeholder.
    pub average_price: Option<f64>,
    pub median_price: Option<f64>,
    pub median_floor_area: Option<f64>,
    /// Mean resale price per town, descending by mean, at most [`TOP_TOWNS`]
    /// entries. Exact ties keep the grouping's alphabetical order.
    pub avg_price_by_town: Vec<(String, f64)>,
    /// Transaction count per flat type, descending by count.
    pub tx_by_flat_type: Vec<(String, usize)>,
    /// Median resale price per month, chronological.
    pub median_price_by_month: Vec<(NaiveDate, f64)>,
}

impl Aggregates {
    /// Compute every metric and table from the filtered view.
    pub fn compute(dataset: &ResaleDataset, indices: &[usize]) -> Self {
        let mut prices: Vec<f64> = indices
            .iter()
            .map(|&i| dataset.rows[i].resale_price)
            .collect();
        let mut areas: Vec<f64> = indices
            .iter()
            .map(|&i| dataset.rows[i].floor_area_sqm)
            .collect();

        let average_price = mean(&prices);
        let median_price = median(&mut prices);
        let median_floor_area = median(&mut areas);

        // town → (price sum, row count)
        let mut by_town: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
        let mut by_flat_type: BTreeMap<&str, usize> = BTreeMap::new();
        let mut by_month: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();

        for &i in indices {
            let tx = &dataset.rows[i];
            let town = by_town.entry(tx.town.as_str()).or_insert((0.0, 0));
            town.0 += tx.resale_price;
            town.1 += 1;
            *by_flat_type.entry(tx.flat_type.as_str()).or_insert(0) += 1;
            by_month.entry(tx.month).or_default().push(tx.resale_price);
        }

        let mut avg_price_by_town: Vec<(String, f64)> = by_town
            .into_iter()
            .map(|(town, (sum, n))| (town.to_string(), sum / n as f64))
            .collect();
        // Stable sort: exact ties keep the alphabetical grouping order.
        avg_price_by_town.sort_by(|a, b| b.1.total_cmp(&a.1));
        avg_price_by_town.truncate(TOP_TOWNS);

        let mut tx_by_flat_type: Vec<(String, usize)> = by_flat_type
            .into_iter()
            .map(|(flat_type, n)| (flat_type.to_string(), n))
            .collect();
        tx_by_flat_type.sort_by(|a, b| b.1.cmp(&a.1));

        // BTreeMap iteration is already chronological.
        let median_price_by_month: Vec<(NaiveDate, f64)> = by_month
            .into_iter()
            .filter_map(|(month, mut month_prices)| {
                median(&mut month_prices).map(|m| (month, m))
            })
            .collect();

        Aggregates {
            transactions: indices.len(),
            average_price,
            median_price,
            median_floor_area,
            avg_price_by_town,
            tx_by_flat_type,
            median_price_by_month,
        }
    }
}

/// Arithmetic mean, `None` on empty input.
fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Exact median with midpoint interpolation for even counts. Sorts in place.
fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        Some(values[mid])
    } else {
        Some((values[mid - 1] + values[mid]) / 2.0)
    }
}
