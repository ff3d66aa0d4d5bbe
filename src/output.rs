//! Terminal rendering and file export of page summaries.

use crate::aggregate::histogram;
use crate::dashboard::{OverviewView, Page, PageView, RevenueView, TripExperienceView};
use crate::types::{
    BinRow, CategoryCount, CategoryValue, CountRow, DailyRow, DailyValue, DataSummary, ValueRow,
};
use crate::util::{format_int, format_number};
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};
use tracing::info;

const BAR_WIDTH: usize = 30;

#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub bins: usize,
    pub preview_rows: usize,
}

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    fs::write(path, s).with_context(|| format!("writing {}", path.display()))?;
    info!(path = %path.display(), "Wrote JSON summary");
    Ok(())
}

pub fn count_rows(counts: &[CategoryCount]) -> Vec<CountRow> {
    let total: usize = counts.iter().map(|c| c.count).sum();
    counts
        .iter()
        .map(|c| CountRow {
            label: c.key.clone(),
            count: format_int(c.count),
            share: if total == 0 {
                "0.00%".to_string()
            } else {
                format!("{}%", format_number(c.count as f64 / total as f64 * 100.0, 2))
            },
        })
        .collect()
}

pub fn value_rows(values: &[CategoryValue], suffix: &str) -> Vec<ValueRow> {
    values
        .iter()
        .map(|v| ValueRow {
            label: v.key.clone(),
            value: format!("{}{}", format_number(v.value, 2), suffix),
        })
        .collect()
}

pub fn daily_rows(series: &[DailyValue]) -> Vec<DailyRow> {
    series
        .iter()
        .map(|d| DailyRow {
            date: d.date.format("%Y-%m-%d").to_string(),
            revenue: format_number(d.value, 2),
        })
        .collect()
}

/// Text histogram of a rating distribution.
pub fn bin_rows(values: &[f64], bins: usize) -> Vec<BinRow> {
    let bins = histogram(values, bins);
    let peak = bins.iter().map(|b| b.count).max().unwrap_or(0);
    bins.into_iter()
        .map(|b| {
            let len = if peak == 0 {
                0
            } else {
                (b.count * BAR_WIDTH).div_ceil(peak)
            };
            BinRow {
                range: format!("{:.2} - {:.2}", b.lower, b.upper),
                frequency: b.count,
                bar: "#".repeat(len),
            }
        })
        .collect()
}

pub fn print_data_summary(summary: &DataSummary) {
    println!("Data Summary");
    if summary.records == 0 {
        println!("  No data available for selected filters\n");
        return;
    }
    println!("  Filtered Records: {}", format_int(summary.records));
    if let (Some(first), Some(last)) = (summary.first_date, summary.last_date) {
        println!(
            "  Date Range: {} to {}",
            first.format("%Y-%m-%d"),
            last.format("%Y-%m-%d")
        );
    }
    println!();
}

pub fn render_page(view: &PageView, opts: RenderOptions) {
    match view {
        PageView::Overview(v) => render_overview(v, opts),
        PageView::TripExperience(v) => render_trip_experience(v, opts),
        PageView::Revenue(v) => render_revenue(v, opts),
    }
}

fn render_overview(v: &OverviewView, opts: RenderOptions) {
    println!("== {} ==\n", Page::Overview.title());
    println!("Key Performance Indicators");
    println!("  Total Trips:         {}", format_int(v.kpis.total_trips));
    println!(
        "  Total Booking Value: {}",
        format_number(v.kpis.total_booking_value, 0)
    );
    println!("  Unique Customers:    {}\n", format_int(v.kpis.unique_customers));

    section(
        "Trips by Booking Status",
        &count_rows(&v.status_counts),
        opts.preview_rows,
        "No booking status data available for the selected period.",
    );
    section(
        "Customer Ratings Distribution",
        &bin_rows(&v.customer_ratings, opts.bins),
        opts.bins,
        "No valid customer ratings available for the selected period.",
    );
    section(
        "Driver Ratings Distribution",
        &bin_rows(&v.driver_ratings, opts.bins),
        opts.bins,
        "No valid driver ratings available for the selected period.",
    );
}

fn render_trip_experience(v: &TripExperienceView, opts: RenderOptions) {
    println!("== {} ==\n", Page::TripExperience.title());
    section(
        "Booking Status Distribution",
        &count_rows(&v.status_counts),
        opts.preview_rows,
        "No booking status data available for the selected period.",
    );
    section(
        "Average VTAT by Vehicle Type",
        &value_rows(&v.avg_vtat_by_vehicle, " min"),
        opts.preview_rows,
        "No VTAT data available for the selected period.",
    );
    section(
        "Average CTAT by Vehicle Type",
        &value_rows(&v.avg_ctat_by_vehicle, " min"),
        opts.preview_rows,
        "No CTAT data available for the selected period.",
    );
}

fn render_revenue(v: &RevenueView, opts: RenderOptions) {
    println!("== {} ==\n", Page::Revenue.title());
    section(
        "Booking Value by Vehicle Type",
        &value_rows(&v.revenue_by_vehicle, ""),
        opts.preview_rows,
        "No booking value data available for the selected period.",
    );
    section(
        "Revenue Share by Vehicle Type",
        &value_rows(&v.revenue_share, "%"),
        opts.preview_rows,
        "No booking value data available for the selected period.",
    );
    section(
        "Daily Revenue Trend",
        &daily_rows(&v.daily_revenue),
        opts.preview_rows,
        "No booking value data available for the selected period.",
    );
}

// An empty summary only affects its own section: print the placeholder
// and carry on with the rest of the page.
fn section<T>(title: &str, rows: &[T], max_rows: usize, placeholder: &str)
where
    T: Tabled + Clone,
{
    println!("{}", title);
    if rows.is_empty() {
        println!("  {}\n", placeholder);
        return;
    }
    let slice: Vec<T> = rows.iter().take(max_rows).cloned().collect();
    let table_str = Table::new(slice).with(Style::markdown()).to_string();
    println!("{}", table_str);
    if rows.len() > max_rows {
        println!("({} more rows not shown)", format_int(rows.len() - max_rows));
    }
    println!();
}

/// Write each table of a page as `<page>_<table>.csv` under `dir`.
pub fn export_page_csv(dir: &Path, view: &PageView, bins: usize) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    match view {
        PageView::Overview(v) => {
            write_csv(&dir.join("overview_status_counts.csv"), &count_rows(&v.status_counts))?;
            write_csv(
                &dir.join("overview_customer_ratings.csv"),
                &bin_rows(&v.customer_ratings, bins),
            )?;
            write_csv(
                &dir.join("overview_driver_ratings.csv"),
                &bin_rows(&v.driver_ratings, bins),
            )?;
        }
        PageView::TripExperience(v) => {
            write_csv(
                &dir.join("trip_experience_status_counts.csv"),
                &count_rows(&v.status_counts),
            )?;
            write_csv(
                &dir.join("trip_experience_avg_vtat.csv"),
                &value_rows(&v.avg_vtat_by_vehicle, ""),
            )?;
            write_csv(
                &dir.join("trip_experience_avg_ctat.csv"),
                &value_rows(&v.avg_ctat_by_vehicle, ""),
            )?;
        }
        PageView::Revenue(v) => {
            write_csv(
                &dir.join("revenue_by_vehicle.csv"),
                &value_rows(&v.revenue_by_vehicle, ""),
            )?;
            write_csv(
                &dir.join("revenue_share.csv"),
                &value_rows(&v.revenue_share, ""),
            )?;
            write_csv(&dir.join("revenue_daily.csv"), &daily_rows(&v.daily_revenue))?;
        }
    }
    info!(dir = %dir.display(), "Exported page tables");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Kpis;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn status(key: &str, count: usize) -> CategoryCount {
        CategoryCount {
            key: key.to_string(),
            count,
        }
    }

    #[test]
    fn count_rows_include_share() {
        let rows = count_rows(&[status("Completed", 3), status("Cancelled", 1)]);
        assert_eq!(rows[0].share, "75.00%");
        assert_eq!(rows[1].count, "1");
    }

    #[test]
    fn bin_rows_scale_bars_to_peak() {
        let rows = bin_rows(&[4.0, 4.0, 5.0], 2);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].bar.len(), BAR_WIDTH);
        assert_eq!(rows[1].bar.len(), BAR_WIDTH / 2);
        assert!(bin_rows(&[], 20).is_empty());
    }

    #[test]
    fn daily_rows_format_dates() {
        let rows = daily_rows(&[DailyValue {
            date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            value: 1234.5,
        }]);
        assert_eq!(rows[0].date, "2024-03-05");
        assert_eq!(rows[0].revenue, "1,234.50");
    }

    #[test]
    fn exports_every_table_of_a_page() {
        let dir = tempdir().unwrap();
        let view = PageView::Overview(OverviewView {
            kpis: Kpis {
                total_trips: 1,
                total_booking_value: 10.0,
                unique_customers: 1,
            },
            status_counts: vec![status("Completed", 1)],
            customer_ratings: vec![],
            driver_ratings: vec![4.0],
        });
        export_page_csv(dir.path(), &view, 20).unwrap();
        let status = fs::read_to_string(dir.path().join("overview_status_counts.csv")).unwrap();
        assert!(status.starts_with("Label,Trips,Share"));
        assert!(dir.path().join("overview_driver_ratings.csv").exists());

        let json_path = dir.path().join("page.json");
        write_json(&json_path, &view).unwrap();
        let json = fs::read_to_string(json_path).unwrap();
        assert!(json.contains("\"page\": \"overview\""));
    }

    #[test]
    fn rendering_empty_sections_does_not_panic() {
        let view = PageView::Revenue(RevenueView {
            revenue_by_vehicle: vec![],
            revenue_share: vec![],
            daily_revenue: vec![],
        });
        render_page(
            &view,
            RenderOptions {
                bins: 20,
                preview_rows: 5,
            },
        );
    }
}
