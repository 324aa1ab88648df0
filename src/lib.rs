//! Heritage Dash - Korean cultural-heritage counts by region
//!
//! Loads the heritage CSV once and derives the series behind the two dashboard
//! views: category counts for one region, and national totals placed on a map.

pub mod config;
pub mod data;
pub mod regions;
pub mod stats;

pub use config::{AppConfig, ConfigError};
pub use data::{
    CategorySeries, DataLoader, DataProcessor, HeritageTable, LoadOptions, LoaderError,
    RegionTotals, ViewError,
};
pub use regions::{Coordinate, RegionCoordinates, MAP_CENTER};
