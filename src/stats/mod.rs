//! Stats module - descriptive statistics

mod calculator;

pub use calculator::{RegionSummary, SeriesStats, StatsCalculator};
