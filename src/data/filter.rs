use std::collections::BTreeSet;

use chrono::NaiveDate;

use super::model::{ResaleDataset, Transaction};

// ---------------------------------------------------------------------------
// FilterCriteria – the user's current selection
// ---------------------------------------------------------------------------

/// The complete, replaceable set of user-chosen constraints.
///
/// Each dimension is an independent predicate and a row must pass all of
/// them (conjunction). An empty `towns` or `flat_types` set means "no
/// restriction", mirroring a multiselect with nothing picked. The price
/// bound always has both ends. The date bound participates only when both
/// endpoints are present; with one or zero endpoints that stage is skipped
/// for the pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    pub towns: BTreeSet<String>,
    pub flat_types: BTreeSet<String>,
    /// Inclusive `[min, max]` resale price bound.
    pub price_range: (f64, f64),
    pub date_start: Option<NaiveDate>,
    pub date_end: Option<NaiveDate>,
}

impl FilterCriteria {
    /// Criteria that keep every row: no categorical restriction, the price
    /// bound at the dataset's observed extremes, both date endpoints at the
    /// observed month extremes.
    pub fn unrestricted(dataset: &ResaleDataset) -> Self {
        FilterCriteria {
            towns: BTreeSet::new(),
            flat_types: BTreeSet::new(),
            price_range: dataset.price_bounds,
            date_start: Some(dataset.month_bounds.0),
            date_end: Some(dataset.month_bounds.1),
        }
    }

    /// The active date bound, or `None` when fewer than two endpoints are
    /// set.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.date_start?, self.date_end?))
    }

    fn town_matches(&self, tx: &Transaction) -> bool {
        self.towns.is_empty() || self.towns.contains(&tx.town)
    }

    fn flat_type_matches(&self, tx: &Transaction) -> bool {
        self.flat_types.is_empty() || self.flat_types.contains(&tx.flat_type)
    }

    fn price_matches(&self, tx: &Transaction) -> bool {
        let (lo, hi) = self.price_range;
        tx.resale_price >= lo && tx.resale_price <= hi
    }

    fn month_matches(&self, tx: &Transaction) -> bool {
        match self.date_bounds() {
            Some((start, end)) => tx.month >= start && tx.month <= end,
            None => true,
        }
    }

    /// Conjunction of the four dimension predicates.
    pub fn matches(&self, tx: &Transaction) -> bool {
        self.town_matches(tx)
            && self.flat_type_matches(tx)
            && self.price_matches(tx)
            && self.month_matches(tx)
    }
}

/// Return indices of rows passing the current criteria, in file order.
/// An empty result is a valid filtered view, not an error.
pub fn filtered_indices(dataset: &ResaleDataset, criteria: &FilterCriteria) -> Vec<usize> {
    dataset
        .rows
        .iter()
        .enumerate()
        .filter(|(_, tx)| criteria.matches(tx))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::testutil::{dataset, tx};

    fn sample() -> ResaleDataset {
        dataset(vec![
            tx("ANG MO KIO", "3 ROOM", "2019-05", 310_000.0, 68.0),
            tx("BEDOK", "4 ROOM", "2020-02", 420_000.0, 92.0),
            tx("BEDOK", "5 ROOM", "2021-11", 560_000.0, 112.0),
            tx("CLEMENTI", "4 ROOM", "2022-07", 610_000.0, 95.0),
        ])
    }

    #[test]
    fn unrestricted_criteria_keep_the_full_dataset() {
        let ds = sample();
        let criteria = FilterCriteria::unrestricted(&ds);
        assert_eq!(filtered_indices(&ds, &criteria), vec![0, 1, 2, 3]);
    }

    #[test]
    fn price_bound_at_observed_extremes_removes_nothing() {
        let ds = sample();
        let mut criteria = FilterCriteria::unrestricted(&ds);
        criteria.price_range = ds.price_bounds;
        let kept = filtered_indices(&ds, &criteria);
        assert_eq!(kept.len(), ds.len());
    }

    #[test]
    fn town_selection_restricts_membership() {
        let ds = sample();
        let mut criteria = FilterCriteria::unrestricted(&ds);
        criteria.towns.insert("BEDOK".to_string());
        assert_eq!(filtered_indices(&ds, &criteria), vec![1, 2]);
    }

    #[test]
    fn dimensions_combine_conjunctively() {
        let ds = sample();
        let mut criteria = FilterCriteria::unrestricted(&ds);
        criteria.towns.insert("BEDOK".to_string());
        criteria.flat_types.insert("4 ROOM".to_string());
        // Only the row that satisfies both selections survives.
        assert_eq!(filtered_indices(&ds, &criteria), vec![1]);
    }

    #[test]
    fn narrowed_date_range_is_inclusive_at_both_ends() {
        let ds = sample();
        let mut criteria = FilterCriteria::unrestricted(&ds);
        criteria.date_start = NaiveDate::from_ymd_opt(2020, 2, 1);
        criteria.date_end = NaiveDate::from_ymd_opt(2021, 11, 1);
        assert_eq!(filtered_indices(&ds, &criteria), vec![1, 2]);
    }

    #[test]
    fn partial_date_range_skips_the_date_stage() {
        let ds = sample();
        let mut criteria = FilterCriteria::unrestricted(&ds);
        // Endpoint would exclude everything if it applied on its own.
        criteria.date_start = NaiveDate::from_ymd_opt(2030, 1, 1);
        criteria.date_end = None;
        assert_eq!(filtered_indices(&ds, &criteria).len(), ds.len());

        criteria.date_start = None;
        assert_eq!(filtered_indices(&ds, &criteria).len(), ds.len());
    }

    #[test]
    fn empty_filtered_view_is_valid() {
        let ds = sample();
        let mut criteria = FilterCriteria::unrestricted(&ds);
        criteria.towns.insert("WOODLANDS".to_string());
        assert!(filtered_indices(&ds, &criteria).is_empty());
    }

    #[test]
    fn predicate_stages_are_order_independent() {
        let ds = sample();
        let mut criteria = FilterCriteria::unrestricted(&ds);
        criteria.towns.insert("BEDOK".to_string());
        criteria.towns.insert("CLEMENTI".to_string());
        criteria.flat_types.insert("4 ROOM".to_string());
        criteria.price_range = (400_000.0, 600_000.0);
        criteria.date_start = NaiveDate::from_ymd_opt(2020, 1, 1);
        criteria.date_end = NaiveDate::from_ymd_opt(2022, 12, 1);

        type Stage = fn(&FilterCriteria, &Transaction) -> bool;
        let stages: [Stage; 4] = [
            FilterCriteria::town_matches,
            FilterCriteria::flat_type_matches,
            FilterCriteria::price_matches,
            FilterCriteria::month_matches,
        ];

        let expected = filtered_indices(&ds, &criteria);
        for order in [[0, 1, 2, 3], [3, 2, 1, 0], [2, 0, 3, 1], [1, 3, 0, 2]] {
            let mut kept: Vec<usize> = (0..ds.len()).collect();
            for stage_idx in order {
                kept.retain(|&i| stages[stage_idx](&criteria, &ds.rows[i]));
            }
            assert_eq!(kept, expected, "stage order {order:?}");
        }
    }
}
