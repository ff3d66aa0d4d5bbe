//! Command-line and environment configuration.

use crate::dashboard::Page;
use crate::filter::Selection;
use crate::types::TripRecord;
use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_DATA_PATH: &str = "cleaned_uber.csv";

#[derive(Debug, Parser)]
#[command(name = "ride_dashboard")]
#[command(about = "Ride booking analytics dashboard", long_about = None)]
pub struct Cli {
    /// Trip dataset (CSV with a header row)
    #[arg(short, long, env = "RIDE_DASHBOARD_DATA", default_value = DEFAULT_DATA_PATH)]
    pub data: PathBuf,

    /// Years to include, comma separated (default: every year in the data)
    #[arg(short, long, value_delimiter = ',')]
    pub years: Option<Vec<i32>>,

    /// Months to include as numbers 1-12, comma separated (default: all)
    #[arg(
        short,
        long,
        value_delimiter = ',',
        value_parser = clap::value_parser!(u32).range(1..=12)
    )]
    pub months: Option<Vec<u32>>,

    /// Render a single page and exit instead of opening the menu
    #[arg(short, long, value_enum, conflicts_with = "all_pages")]
    pub page: Option<Page>,

    /// Render every page and exit
    #[arg(long, default_value_t = false)]
    pub all_pages: bool,

    /// Write the rendered page summaries as JSON to this file
    #[arg(long, value_name = "FILE")]
    pub json: Option<PathBuf>,

    /// Write each summary table as CSV into this directory
    #[arg(long, value_name = "DIR")]
    pub export_dir: Option<PathBuf>,

    /// Number of histogram bins for rating distributions
    #[arg(long, default_value_t = 20)]
    pub bins: usize,

    /// Maximum table rows printed per summary
    #[arg(long, default_value_t = 10)]
    pub preview_rows: usize,
}

impl Cli {
    /// Pages to render without the interactive menu, if any were requested.
    pub fn requested_pages(&self) -> Option<Vec<Page>> {
        if self.all_pages {
            Some(Page::ALL.to_vec())
        } else {
            self.page.map(|p| vec![p])
        }
    }

    /// The initial selection: explicit flags win, anything unspecified
    /// defaults to everything present in the dataset.
    pub fn selection(&self, records: &[TripRecord]) -> Selection {
        let mut selection = Selection::all(records);
        if let Some(years) = &self.years {
            selection.years = years.iter().copied().collect();
        }
        if let Some(months) = &self.months {
            selection.months = months.iter().copied().collect();
        }
        selection
    }
}
