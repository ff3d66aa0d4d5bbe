use crate::types::TripRecord;
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// The year/month multi-select state of one session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub years: BTreeSet<i32>,
    pub months: BTreeSet<u32>,
}

impl Selection {
    pub fn new(
        years: impl IntoIterator<Item = i32>,
        months: impl IntoIterator<Item = u32>,
    ) -> Self {
        Self {
            years: years.into_iter().collect(),
            months: months.into_iter().collect(),
        }
    }

    /// Everything the dataset contains, the initial state of a session.
    pub fn all(records: &[TripRecord]) -> Self {
        Self {
            years: available_years(records),
            months: available_months(records),
        }
    }

    /// No year or no month chosen: the view is deliberately empty.
    pub fn is_empty(&self) -> bool {
        self.years.is_empty() || self.months.is_empty()
    }

    pub fn apply(&self, records: &[TripRecord]) -> Vec<TripRecord> {
        filter(records, &self.years, &self.months)
    }
}

/// Rows whose `year` is in `years` and whose `month` is in `months`, in
/// source order. An empty `years` or `months` selects nothing rather than
/// everything.
pub fn filter(
    records: &[TripRecord],
    years: &BTreeSet<i32>,
    months: &BTreeSet<u32>,
) -> Vec<TripRecord> {
    if years.is_empty() || months.is_empty() {
        warn!(
            years = years.len(),
            months = months.len(),
            "Empty year or month selection, no trips selected"
        );
        return Vec::new();
    }
    let view: Vec<TripRecord> = records
        .iter()
        .filter(|r| years.contains(&r.year) && months.contains(&r.month))
        .cloned()
        .collect();
    debug!(source = records.len(), selected = view.len(), "Filtered trips");
    view
}

pub fn available_years(records: &[TripRecord]) -> BTreeSet<i32> {
    records.iter().map(|r| r.year).collect()
}

pub fn available_months(records: &[TripRecord]) -> BTreeSet<u32> {
    records.iter().map(|r| r.month).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn trip(id: &str, year: i32, month: u32) -> TripRecord {
        let timestamp = NaiveDate::from_ymd_opt(year, month, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        TripRecord {
            booking_id: Some(id.to_string()),
            timestamp,
            year,
            month,
            booking_status: None,
            customer_id: None,
            vehicle_type: None,
            pickup_location: None,
            drop_location: None,
            avg_vtat: None,
            avg_ctat: None,
            booking_value: None,
            ride_distance: None,
            driver_rating: None,
            customer_rating: None,
            payment_method: None,
        }
    }

    fn table() -> Vec<TripRecord> {
        vec![
            trip("a", 2023, 1),
            trip("b", 2024, 1),
            trip("c", 2023, 2),
            trip("d", 2023, 1),
            trip("e", 2024, 3),
        ]
    }

    fn ids(view: &[TripRecord]) -> Vec<&str> {
        view.iter().filter_map(|r| r.booking_id.as_deref()).collect()
    }

    #[test]
    fn keeps_matching_rows_in_order() {
        let records = table();
        let sel = Selection::new([2023], [1]);
        assert_eq!(ids(&sel.apply(&records)), vec!["a", "d"]);

        let sel = Selection::new([2023, 2024], [1, 3]);
        assert_eq!(ids(&sel.apply(&records)), vec!["a", "b", "d", "e"]);
    }

    #[test]
    fn sound_and_complete() {
        let records = table();
        let years = BTreeSet::from([2024]);
        let months = BTreeSet::from([1, 2, 3]);
        let view = filter(&records, &years, &months);
        assert!(view
            .iter()
            .all(|r| years.contains(&r.year) && months.contains(&r.month)));
        let expected = records
            .iter()
            .filter(|r| years.contains(&r.year) && months.contains(&r.month))
            .count();
        assert_eq!(view.len(), expected);
    }

    #[test]
    fn empty_selection_selects_nothing() {
        let records = table();
        let all_years = available_years(&records);
        let all_months = available_months(&records);
        assert!(filter(&records, &BTreeSet::new(), &all_months).is_empty());
        assert!(filter(&records, &all_years, &BTreeSet::new()).is_empty());
        assert!(Selection::new([2023], []).is_empty());
    }

    #[test]
    fn default_selection_is_everything() {
        let records = table();
        let sel = Selection::all(&records);
        assert_eq!(sel.years, BTreeSet::from([2023, 2024]));
        assert_eq!(sel.months, BTreeSet::from([1, 2, 3]));
        assert_eq!(sel.apply(&records), records);
    }

    #[test]
    fn no_match_is_empty_not_error() {
        let records = table();
        assert!(Selection::new([1999], [1]).apply(&records).is_empty());
    }
}
