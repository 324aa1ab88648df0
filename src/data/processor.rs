//! Data Processor Module
//! Projects the heritage table into chart-ready series.

use super::table::HeritageTable;
use crate::regions::RegionCoordinates;
use polars::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

/// The seven heritage categories shown per region, in display order:
/// national treasure, treasure, historic site, scenic site, natural monument,
/// national intangible heritage, national folklore heritage.
pub const HERITAGE_CATEGORIES: [&str; 7] = [
    "국보",
    "보물",
    "사적",
    "명승",
    "천연기념물",
    "국가무형유산",
    "국가민속문화유산",
];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    #[error("Unknown region: {0}")]
    UnknownRegion(String),
    #[error("Unknown heritage category: {0} (source schema changed?)")]
    UnknownCategory(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    /// `None` when the source cell was missing or not numeric.
    pub count: Option<f64>,
}

/// Counts per heritage category for one region (bar-chart view).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySeries {
    pub region: String,
    pub entries: Vec<CategoryCount>,
}

impl CategorySeries {
    /// Sum of the present counts.
    pub fn total(&self) -> f64 {
        self.entries.iter().filter_map(|e| e.count).sum()
    }

    /// Output columns: ["category", "count"]
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let categories: Vec<&str> = self.entries.iter().map(|e| e.category.as_str()).collect();
        let counts: Vec<Option<f64>> = self.entries.iter().map(|e| e.count).collect();
        DataFrame::new(vec![
            Column::new("category".into(), categories),
            Column::new("count".into(), counts),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionTotal {
    pub region: String,
    pub total: f64,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

/// One total per region with its map position (bubble-map view).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionTotals {
    pub entries: Vec<RegionTotal>,
}

impl RegionTotals {
    pub fn grand_total(&self) -> f64 {
        self.entries.iter().map(|e| e.total).sum()
    }

    /// Regions that have no coordinate and cannot be placed on the map.
    pub fn unplaced(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.lat.is_none() || e.lon.is_none())
            .map(|e| e.region.as_str())
            .collect()
    }

    pub fn totals(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.total).collect()
    }

    /// Output columns: ["region", "count", "lat", "lon"]
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let regions: Vec<&str> = self.entries.iter().map(|e| e.region.as_str()).collect();
        let totals: Vec<f64> = self.totals();
        let lats: Vec<Option<f64>> = self.entries.iter().map(|e| e.lat).collect();
        let lons: Vec<Option<f64>> = self.entries.iter().map(|e| e.lon).collect();
        DataFrame::new(vec![
            Column::new("region".into(), regions),
            Column::new("count".into(), totals),
            Column::new("lat".into(), lats),
            Column::new("lon".into(), lons),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
}

/// Read-only projections over a `HeritageTable`.
pub struct DataProcessor;

impl DataProcessor {
    /// Counts of the seven standard categories for `region`.
    pub fn category_breakdown(
        table: &HeritageTable,
        region: &str,
    ) -> Result<CategorySeries, ViewError> {
        Self::category_breakdown_with(table, region, &HERITAGE_CATEGORIES[..])
    }

    /// Counts of `categories` for `region`, in the order given.
    pub fn category_breakdown_with<S: AsRef<str>>(
        table: &HeritageTable,
        region: &str,
        categories: &[S],
    ) -> Result<CategorySeries, ViewError> {
        let col = table
            .region_position(region)
            .ok_or_else(|| ViewError::UnknownRegion(region.to_string()))?;

        let entries = categories
            .iter()
            .map(|category| {
                let category = category.as_ref();
                let row = table
                    .category_position(category)
                    .ok_or_else(|| ViewError::UnknownCategory(category.to_string()))?;
                Ok(CategoryCount {
                    category: category.to_string(),
                    count: table.cell(row, col),
                })
            })
            .collect::<Result<Vec<_>, ViewError>>()?;

        debug!(region, categories = entries.len(), "category breakdown");
        Ok(CategorySeries {
            region: region.to_string(),
            entries,
        })
    }

    /// Total of every region column, ignoring missing cells, joined to
    /// `coordinates` by exact name. Unmatched regions keep empty coordinates.
    pub fn region_totals(table: &HeritageTable, coordinates: &RegionCoordinates) -> RegionTotals {
        let entries: Vec<RegionTotal> = table
            .regions()
            .iter()
            .enumerate()
            .map(|(col, region)| {
                let total = table.column(col).flatten().sum();
                let coord = coordinates.get(region);
                RegionTotal {
                    region: region.clone(),
                    total,
                    lat: coord.map(|c| c.lat),
                    lon: coord.map(|c| c.lon),
                }
            })
            .collect();

        let totals = RegionTotals { entries };
        let unplaced = totals.unplaced();
        if !unplaced.is_empty() {
            warn!(regions = ?unplaced, "regions without coordinates");
        }
        totals
    }

    /// Total of every category row across regions, ignoring missing cells.
    pub fn category_totals(table: &HeritageTable) -> Vec<CategoryTotal> {
        table
            .categories()
            .iter()
            .enumerate()
            .map(|(row, category)| CategoryTotal {
                category: category.clone(),
                total: table.row(row).iter().flatten().sum(),
            })
            .collect()
    }

    /// Unpivot the table to long format, skipping missing cells.
    ///
    /// Output columns: ["category", "region", "count"]
    pub fn to_long(table: &HeritageTable) -> PolarsResult<DataFrame> {
        let mut categories: Vec<&str> = Vec::new();
        let mut regions: Vec<&str> = Vec::new();
        let mut counts: Vec<f64> = Vec::new();

        for (row, category) in table.categories().iter().enumerate() {
            for (col, region) in table.regions().iter().enumerate() {
                if let Some(v) = table.cell(row, col) {
                    categories.push(category);
                    regions.push(region);
                    counts.push(v);
                }
            }
        }

        DataFrame::new(vec![
            Column::new("category".into(), categories),
            Column::new("region".into(), regions),
            Column::new("count".into(), counts),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regions::Coordinate;

    fn full_table() -> HeritageTable {
        let categories: Vec<String> = HERITAGE_CATEGORIES.iter().map(|s| s.to_string()).collect();
        let regions = vec!["서울".to_string(), "부산".to_string(), "Z".to_string()];
        let cells = (0..categories.len())
            .map(|i| {
                let i = i as f64;
                vec![Some(i + 1.0), if i == 2.0 { None } else { Some(i * 2.0) }, Some(1.0)]
            })
            .collect();
        HeritageTable::new(categories, regions, cells).unwrap()
    }

    #[test]
    fn breakdown_follows_fixed_order() {
        let table = full_table();
        let series = DataProcessor::category_breakdown(&table, "서울").unwrap();
        let names: Vec<_> = series.entries.iter().map(|e| e.category.as_str()).collect();
        assert_eq!(names, HERITAGE_CATEGORIES);
        assert_eq!(series.entries[0].count, Some(1.0));
        assert_eq!(series.entries[6].count, Some(7.0));
        assert_eq!(series.total(), 28.0);
    }

    #[test]
    fn breakdown_keeps_missing_cells() {
        let table = full_table();
        let series = DataProcessor::category_breakdown(&table, "부산").unwrap();
        assert_eq!(series.entries[2].count, None);
        assert_eq!(series.entries[3].count, Some(6.0));
    }

    #[test]
    fn breakdown_unknown_region() {
        let table = full_table();
        assert_eq!(
            DataProcessor::category_breakdown(&table, "Atlantis"),
            Err(ViewError::UnknownRegion("Atlantis".to_string()))
        );
    }

    #[test]
    fn breakdown_unknown_category() {
        let table = HeritageTable::new(
            vec!["국보".to_string()],
            vec!["서울".to_string()],
            vec![vec![Some(1.0)]],
        )
        .unwrap();
        assert_eq!(
            DataProcessor::category_breakdown(&table, "서울"),
            Err(ViewError::UnknownCategory("보물".to_string()))
        );
    }

    #[test]
    fn totals_pass_through_missing_coordinates() {
        let table = full_table();
        let totals = DataProcessor::region_totals(&table, &RegionCoordinates::korea());
        assert_eq!(totals.entries.len(), 3);

        let seoul = &totals.entries[0];
        assert_eq!(seoul.total, 28.0);
        assert_eq!(seoul.lat, Some(37.5665));

        let z = &totals.entries[2];
        assert_eq!(z.region, "Z");
        assert_eq!(z.total, 7.0);
        assert_eq!((z.lat, z.lon), (None, None));
        assert_eq!(totals.unplaced(), vec!["Z"]);
        assert_eq!(totals.grand_total(), table.numeric_sum());
    }

    #[test]
    fn totals_use_given_coordinates() {
        let table = full_table();
        let coords = RegionCoordinates::from_entries([(
            "Z".to_string(),
            Coordinate { lat: 1.0, lon: 2.0 },
        )]);
        let totals = DataProcessor::region_totals(&table, &coords);
        assert_eq!(totals.unplaced(), vec!["서울", "부산"]);
        assert_eq!(totals.entries[2].lon, Some(2.0));
    }

    #[test]
    fn category_totals_sum_rows() {
        let table = full_table();
        let totals = DataProcessor::category_totals(&table);
        assert_eq!(totals.len(), 7);
        // 국보: 1 + 0 + 1
        assert_eq!(totals[0].total, 2.0);
        // 사적: 3 + missing + 1
        assert_eq!(totals[2].total, 4.0);
    }

    #[test]
    fn long_format_skips_missing() {
        let table = full_table();
        let long = DataProcessor::to_long(&table).unwrap();
        assert_eq!(long.height(), 7 * 3 - 1);
        let names: Vec<String> = long
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(names, ["category", "region", "count"]);
    }

    #[test]
    fn series_frames() {
        let table = full_table();
        let series = DataProcessor::category_breakdown(&table, "부산").unwrap();
        let df = series.to_dataframe().unwrap();
        assert_eq!(df.height(), 7);
        assert_eq!(df.column("count").unwrap().null_count(), 1);

        let totals = DataProcessor::region_totals(&table, &RegionCoordinates::korea());
        let df = totals.to_dataframe().unwrap();
        assert_eq!(df.shape(), (3, 4));
        assert_eq!(df.column("lat").unwrap().null_count(), 1);
    }
}
