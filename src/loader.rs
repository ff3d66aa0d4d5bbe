use crate::error::LoadError;
use crate::types::{RawRow, TripRecord};
use crate::util::{parse_f64_safe, parse_i32_safe, parse_text, parse_timestamp};
use chrono::Datelike;
use csv::{ReaderBuilder, Trim};
use std::path::Path;
use tracing::{debug, info};

/// Counters collected while normalizing the file, logged once per load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub derived_year: bool,
    pub derived_month: bool,
    pub missing_values: usize,
}

/// Read and normalize the trip file at `path`.
///
/// A missing file is `LoadError::NotFound`; anything else that stops the
/// file from becoming a table (bad CSV, a row with more cells than the
/// header, bad `DateTime`, month outside 1..=12) is `LoadError::Parse`.
pub fn load(path: &Path) -> Result<Vec<TripRecord>, LoadError> {
    load_with_report(path).map(|(records, _)| records)
}

pub fn load_with_report(path: &Path) -> Result<(Vec<TripRecord>, LoadReport), LoadError> {
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_path(path)
        .map_err(|e| LoadError::from_csv(path, e))?;

    let headers = rdr
        .headers()
        .map_err(|e| LoadError::from_csv(path, e))?
        .clone();
    if !headers.iter().any(|h| h == "DateTime") {
        return Err(LoadError::parse(path, "missing required column `DateTime`"));
    }
    let mut report = LoadReport {
        derived_year: !headers.iter().any(|h| h == "Year"),
        derived_month: !headers.iter().any(|h| h == "Month"),
        ..LoadReport::default()
    };

    let mut records = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        // Header is line 1, so data rows start at line 2.
        let line = idx + 2;
        let record = result.map_err(|e| LoadError::parse(path, format!("line {line}: {e}")))?;
        // Short rows leave trailing cells missing; extra cells have no column.
        if record.len() > headers.len() {
            return Err(LoadError::parse(
                path,
                format!(
                    "line {line}: expected {} fields, found {}",
                    headers.len(),
                    record.len()
                ),
            ));
        }
        let row: RawRow = record
            .deserialize(Some(&headers))
            .map_err(|e| LoadError::parse(path, format!("line {line}: {e}")))?;
        let record = normalize(row, &mut report)
            .map_err(|reason| LoadError::parse(path, format!("line {line}: {reason}")))?;
        records.push(record);
        report.total_rows += 1;
    }

    info!(
        path = %path.display(),
        rows = report.total_rows,
        derived_year = report.derived_year,
        derived_month = report.derived_month,
        "Loaded trip dataset"
    );
    if report.missing_values > 0 {
        debug!(
            missing = report.missing_values,
            "Numeric cells treated as missing"
        );
    }
    Ok((records, report))
}

fn normalize(row: RawRow, report: &mut LoadReport) -> Result<TripRecord, String> {
    let timestamp = parse_timestamp(row.date_time.as_deref()).ok_or_else(|| {
        format!(
            "unparseable DateTime {:?}",
            row.date_time.as_deref().unwrap_or("")
        )
    })?;

    // A Year/Month column wins when it has a usable value; otherwise the
    // timestamp decides, so both are always set.
    let year = parse_i32_safe(row.year.as_deref()).unwrap_or_else(|| timestamp.year());
    let month = match parse_i32_safe(row.month.as_deref()) {
        Some(m) => u32::try_from(m)
            .ok()
            .filter(|m| (1..=12).contains(m))
            .ok_or_else(|| format!("month {m} outside 1..=12"))?,
        None => timestamp.month(),
    };

    let mut numeric = |cell: &Option<String>| {
        let parsed = parse_f64_safe(cell.as_deref());
        if parsed.is_none() {
            report.missing_values += 1;
        }
        parsed
    };
    let avg_vtat = numeric(&row.avg_vtat);
    let avg_ctat = numeric(&row.avg_ctat);
    let booking_value = numeric(&row.booking_value);
    let ride_distance = numeric(&row.ride_distance);
    let driver_rating = numeric(&row.driver_ratings);
    let customer_rating = numeric(&row.customer_rating);

    Ok(TripRecord {
        booking_id: parse_text(row.booking_id.as_deref()),
        timestamp,
        year,
        month,
        booking_status: parse_text(row.booking_status.as_deref()),
        customer_id: parse_text(row.customer_id.as_deref()),
        vehicle_type: parse_text(row.vehicle_type.as_deref()),
        pickup_location: parse_text(row.pickup_location.as_deref()),
        drop_location: parse_text(row.drop_location.as_deref()),
        avg_vtat,
        avg_ctat,
        booking_value,
        ride_distance,
        driver_rating,
        customer_rating,
        payment_method: parse_text(row.payment_method.as_deref()),
    })
}
