//! Data module - CSV loading and view projection

mod loader;
mod processor;
mod table;

pub use loader::{
    load, normalize, parse_count, DataLoader, LoadOptions, LoaderError, DEFAULT_SUMMARY_LABEL,
};
pub use processor::{
    CategoryCount, CategorySeries, CategoryTotal, DataProcessor, RegionTotal, RegionTotals,
    ViewError, HERITAGE_CATEGORIES,
};
pub use table::HeritageTable;
