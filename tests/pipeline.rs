use ride_dashboard::aggregate::{
    count_by, daily_series, distinct_count, mean_by, rating_distribution, sum_by, Category,
    Measure,
};
use ride_dashboard::{filter, Dashboard, DatasetCache, LoadError, Page, PageView, Selection};
use std::collections::BTreeSet;
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

const HEADER: &str = "Booking ID,Booking Status,Customer ID,Vehicle Type,Pickup Location,Drop Location,Avg VTAT,Avg CTAT,Booking Value,Ride Distance,Driver Ratings,Customer Rating,Payment Method,DateTime";

fn fixture(rows: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{HEADER}").unwrap();
    for row in rows {
        writeln!(file, "{row}").unwrap();
    }
    file.flush().unwrap();
    file
}

fn sample() -> NamedTempFile {
    fixture(&[
        "CNR1,Completed,C1,Auto,Palam,Saket,5.0,20.0,100,10.5,4.8,5,UPI,2023-01-05 08:00:00",
        "CNR2,Cancelled,C2,Bike,Palam,Saket,,,0,,,-1,,2023-01-20 09:30:00",
        "CNR3,Completed,C1,Auto,Okhla,Saket,7.0,30.0,50,4.0,4.1,4,Cash,2023-02-03 18:15:00",
        "CNR4,No Driver Found,C3,Go Sedan,Okhla,Saket,,,,,,,,2024-01-05 22:45:00",
    ])
}

#[test]
fn load_filter_sum_by_status() {
    let file = sample();
    let records = ride_dashboard::loader::load(file.path()).unwrap();
    assert_eq!(records.len(), 4);

    let view = filter(&records, &BTreeSet::from([2023]), &BTreeSet::from([1]));
    assert_eq!(view.len(), 2);

    let sums: Vec<(String, f64)> = sum_by(&view, Category::BookingStatus, Measure::BookingValue)
        .into_iter()
        .map(|r| (r.key, r.value))
        .collect();
    assert_eq!(
        sums,
        vec![("Cancelled".to_string(), 0.0), ("Completed".to_string(), 100.0)]
    );
}

#[test]
fn ratings_drop_sentinel_and_missing() {
    let file = fixture(&[
        "A,Completed,C1,Auto,,,,,,,,5,,2024-01-01 10:00:00",
        "B,Completed,C2,Auto,,,,,,,,4,,2024-01-01 11:00:00",
        "C,Completed,C3,Auto,,,,,,,,-1,,2024-01-02 10:00:00",
        "D,Completed,C4,Auto,,,,,,,,,,2024-01-02 11:00:00",
        "E,Completed,C5,Auto,,,,,,,,3,,2024-01-03 10:00:00",
    ]);
    let records = ride_dashboard::loader::load(file.path()).unwrap();
    assert_eq!(
        rating_distribution(&records, Measure::CustomerRating),
        vec![5.0, 4.0, 3.0]
    );
}

#[test]
fn empty_view_never_fails() {
    let file = sample();
    let records = ride_dashboard::loader::load(file.path()).unwrap();
    let view = Selection::new([2023], []).apply(&records);
    assert!(view.is_empty());

    assert!(count_by(&view, Category::BookingStatus).is_empty());
    assert!(mean_by(&view, Category::VehicleType, Measure::AvgVtat).is_empty());
    assert!(sum_by(&view, Category::VehicleType, Measure::BookingValue).is_empty());
    assert!(rating_distribution(&view, Measure::DriverRating).is_empty());
    assert!(daily_series(&view, Measure::BookingValue).is_empty());
    assert_eq!(distinct_count(&view, Category::CustomerId), 0);
}

#[test]
fn every_page_builds_from_loaded_data() {
    let file = sample();
    let cache = DatasetCache::new();
    let dataset = cache.get_or_load(file.path()).unwrap();
    let mut dash = Dashboard::new(Arc::clone(&dataset));

    let Some(PageView::Overview(overview)) = dash.page(Page::Overview) else {
        panic!("expected overview page");
    };
    assert_eq!(overview.kpis.total_trips, 4);
    assert_eq!(overview.kpis.total_booking_value, 150.0);
    assert_eq!(overview.kpis.unique_customers, 3);
    assert_eq!(overview.customer_ratings, vec![5.0, 4.0]);

    dash.set_years(BTreeSet::from([2023]));
    let Some(PageView::TripExperience(trip)) = dash.page(Page::TripExperience) else {
        panic!("expected trip experience page");
    };
    let vtat: Vec<(&str, f64)> = trip
        .avg_vtat_by_vehicle
        .iter()
        .map(|r| (r.key.as_str(), r.value))
        .collect();
    assert_eq!(vtat, vec![("Auto", 6.0)]);

    let Some(PageView::Revenue(revenue)) = dash.page(Page::Revenue) else {
        panic!("expected revenue page");
    };
    assert_eq!(revenue.daily_revenue.len(), 3);
    assert!(revenue
        .daily_revenue
        .windows(2)
        .all(|w| w[0].date < w[1].date));

    dash.set_months(BTreeSet::new());
    assert_eq!(dash.page(Page::Revenue), None);
}

#[test]
fn cache_reuses_table_until_invalidated() {
    let file = sample();
    let cache = DatasetCache::new();
    let first = cache.get_or_load(file.path()).unwrap();
    let again = cache.get_or_load(file.path()).unwrap();
    assert!(Arc::ptr_eq(&first, &again));

    cache.invalidate();
    let reloaded = cache.get_or_load(file.path()).unwrap();
    assert!(!Arc::ptr_eq(&first, &reloaded));
    assert_eq!(*first, *reloaded);
}

#[test]
fn missing_file_is_reported_as_not_found() {
    let cache = DatasetCache::new();
    let dir = tempfile::tempdir().unwrap();
    let err = cache
        .get_or_load(&dir.path().join("cleaned_uber.csv"))
        .unwrap_err();
    assert!(matches!(err, LoadError::NotFound { .. }));
}
