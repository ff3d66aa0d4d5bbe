use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// One CSV row exactly as it appears in the trip export. Every cell is kept
/// as text so the loader can decide what "missing" means per column.
#[derive(Debug, Deserialize)]
pub struct RawRow {
    #[serde(rename = "Booking ID", default)]
    pub booking_id: Option<String>,
    #[serde(rename = "Booking Status", default)]
    pub booking_status: Option<String>,
    #[serde(rename = "Customer ID", default)]
    pub customer_id: Option<String>,
    #[serde(rename = "Vehicle Type", default)]
    pub vehicle_type: Option<String>,
    #[serde(rename = "Pickup Location", default)]
    pub pickup_location: Option<String>,
    #[serde(rename = "Drop Location", default)]
    pub drop_location: Option<String>,
    #[serde(rename = "Avg VTAT", default)]
    pub avg_vtat: Option<String>,
    #[serde(rename = "Avg CTAT", default)]
    pub avg_ctat: Option<String>,
    #[serde(rename = "Booking Value", default)]
    pub booking_value: Option<String>,
    #[serde(rename = "Ride Distance", default)]
    pub ride_distance: Option<String>,
    #[serde(rename = "Driver Ratings", default)]
    pub driver_ratings: Option<String>,
    #[serde(rename = "Customer Rating", default)]
    pub customer_rating: Option<String>,
    #[serde(rename = "Payment Method", default)]
    pub payment_method: Option<String>,
    #[serde(rename = "DateTime", default)]
    pub date_time: Option<String>,
    #[serde(rename = "Year", default)]
    pub year: Option<String>,
    #[serde(rename = "Month", default)]
    pub month: Option<String>,
}

/// A normalized trip. `year` and `month` are always populated, either from
/// the file or from `timestamp`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripRecord {
    pub booking_id: Option<String>,
    pub timestamp: NaiveDateTime,
    pub year: i32,
    pub month: u32,
    pub booking_status: Option<String>,
    pub customer_id: Option<String>,
    pub vehicle_type: Option<String>,
    pub pickup_location: Option<String>,
    pub drop_location: Option<String>,
    pub avg_vtat: Option<f64>,
    pub avg_ctat: Option<f64>,
    pub booking_value: Option<f64>,
    pub ride_distance: Option<f64>,
    pub driver_rating: Option<f64>,
    pub customer_rating: Option<f64>,
    pub payment_method: Option<String>,
}

/// Row count for one value of a categorical column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount {
    pub key: String,
    pub count: usize,
}

/// A single numeric result (mean, sum, share) for one categorical value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryValue {
    pub key: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyValue {
    pub date: NaiveDate,
    pub value: f64,
}

/// Half-open bin `[lower, upper)`; the last bin of a histogram is closed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpis {
    pub total_trips: usize,
    pub total_booking_value: f64,
    pub unique_customers: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataSummary {
    pub records: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
}

// Display rows: everything pre-formatted so the tables line up the same way
// in the terminal and in exported CSV files.

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct CountRow {
    #[serde(rename = "Label")]
    #[tabled(rename = "Label")]
    pub label: String,
    #[serde(rename = "Trips")]
    #[tabled(rename = "Trips")]
    pub count: String,
    #[serde(rename = "Share")]
    #[tabled(rename = "Share")]
    pub share: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct ValueRow {
    #[serde(rename = "Label")]
    #[tabled(rename = "Label")]
    pub label: String,
    #[serde(rename = "Value")]
    #[tabled(rename = "Value")]
    pub value: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct DailyRow {
    #[serde(rename = "Date")]
    #[tabled(rename = "Date")]
    pub date: String,
    #[serde(rename = "Revenue")]
    #[tabled(rename = "Revenue")]
    pub revenue: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct BinRow {
    #[serde(rename = "Range")]
    #[tabled(rename = "Range")]
    pub range: String,
    #[serde(rename = "Frequency")]
    #[tabled(rename = "Frequency")]
    pub frequency: usize,
    #[serde(rename = "Bar")]
    #[tabled(rename = "Bar")]
    pub bar: String,
}
