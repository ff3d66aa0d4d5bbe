//! Ride booking analytics: load a trip CSV once, filter it by year and month,
//! and compute the summaries behind the Overview, Trip Experience and
//! Revenue dashboard pages.

pub mod aggregate;
pub mod cache;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod filter;
pub mod loader;
pub mod output;
pub mod types;
pub mod util;

pub use cache::{Dataset, DatasetCache};
pub use dashboard::{Dashboard, Page, PageView};
pub use error::LoadError;
pub use filter::{filter, Selection};
pub use types::TripRecord;
