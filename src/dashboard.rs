//! Page assembly: which summaries each dashboard page shows, and the
//! per-session filter state that feeds them.

use crate::aggregate::{self, Category, Measure};
use crate::cache::Dataset;
use crate::filter::Selection;
use crate::types::{CategoryCount, CategoryValue, DailyValue, DataSummary, Kpis, TripRecord};
use clap::ValueEnum;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
pub enum Page {
    Overview,
    TripExperience,
    Revenue,
}

impl Page {
    pub const ALL: [Page; 3] = [Page::Overview, Page::TripExperience, Page::Revenue];

    pub fn title(self) -> &'static str {
        match self {
            Page::Overview => "Overview Dashboard",
            Page::TripExperience => "Trip Experience Dashboard",
            Page::Revenue => "Revenue Dashboard",
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewView {
    pub kpis: Kpis,
    pub status_counts: Vec<CategoryCount>,
    pub customer_ratings: Vec<f64>,
    pub driver_ratings: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripExperienceView {
    pub status_counts: Vec<CategoryCount>,
    pub avg_vtat_by_vehicle: Vec<CategoryValue>,
    pub avg_ctat_by_vehicle: Vec<CategoryValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenueView {
    pub revenue_by_vehicle: Vec<CategoryValue>,
    pub revenue_share: Vec<CategoryValue>,
    pub daily_revenue: Vec<DailyValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "page", rename_all = "snake_case")]
pub enum PageView {
    Overview(OverviewView),
    TripExperience(TripExperienceView),
    Revenue(RevenueView),
}

pub fn kpis(view: &[TripRecord]) -> Kpis {
    Kpis {
        total_trips: view.len(),
        total_booking_value: aggregate::total(view, Measure::BookingValue),
        unique_customers: aggregate::distinct_count(view, Category::CustomerId),
    }
}

pub fn data_summary(view: &[TripRecord]) -> DataSummary {
    let range = aggregate::date_range(view);
    DataSummary {
        records: view.len(),
        first_date: range.map(|(first, _)| first),
        last_date: range.map(|(_, last)| last),
    }
}

/// Compute every summary `page` displays from an already filtered view.
pub fn build_page(view: &[TripRecord], page: Page) -> PageView {
    match page {
        Page::Overview => PageView::Overview(OverviewView {
            kpis: kpis(view),
            status_counts: aggregate::count_by(view, Category::BookingStatus),
            customer_ratings: aggregate::rating_distribution(view, Measure::CustomerRating),
            driver_ratings: aggregate::rating_distribution(view, Measure::DriverRating),
        }),
        Page::TripExperience => PageView::TripExperience(TripExperienceView {
            status_counts: aggregate::count_by(view, Category::BookingStatus),
            avg_vtat_by_vehicle: aggregate::mean_by(view, Category::VehicleType, Measure::AvgVtat),
            avg_ctat_by_vehicle: aggregate::mean_by(view, Category::VehicleType, Measure::AvgCtat),
        }),
        Page::Revenue => {
            let revenue_by_vehicle =
                aggregate::sum_by(view, Category::VehicleType, Measure::BookingValue);
            PageView::Revenue(RevenueView {
                revenue_share: aggregate::share_of_total(&revenue_by_vehicle),
                revenue_by_vehicle,
                daily_revenue: aggregate::daily_series(view, Measure::BookingValue),
            })
        }
    }
}

/// One analyst's session: a shared read-only dataset plus their own filter
/// selection. The filtered view is recomputed whenever the selection changes.
pub struct Dashboard {
    dataset: Dataset,
    selection: Selection,
    view: Vec<TripRecord>,
}

impl Dashboard {
    /// Start with every year and month selected.
    pub fn new(dataset: Dataset) -> Self {
        let selection = Selection::all(&dataset);
        Self::with_selection(dataset, selection)
    }

    pub fn with_selection(dataset: Dataset, selection: Selection) -> Self {
        let view = selection.apply(&dataset);
        Self {
            dataset,
            selection,
            view,
        }
    }

    pub fn dataset(&self) -> &[TripRecord] {
        &self.dataset
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn view(&self) -> &[TripRecord] {
        &self.view
    }

    pub fn set_years(&mut self, years: BTreeSet<i32>) {
        self.selection.years = years;
        self.refilter();
    }

    pub fn set_months(&mut self, months: BTreeSet<u32>) {
        self.selection.months = months;
        self.refilter();
    }

    pub fn summary(&self) -> DataSummary {
        data_summary(&self.view)
    }

    /// The page's summaries, or `None` when the current selection leaves no
    /// trips; nothing further should be rendered in that case.
    pub fn page(&self, page: Page) -> Option<PageView> {
        if self.view.is_empty() {
            warn!(%page, "No data available for the selected filters");
            return None;
        }
        Some(build_page(&self.view, page))
    }

    fn refilter(&mut self) {
        self.view = self.selection.apply(&self.dataset);
        info!(
            years = ?self.selection.years,
            months = ?self.selection.months,
            trips = self.view.len(),
            "Filter selection changed"
        );
    }
}
