//! Heritage Table Module
//! Category-by-region count table with explicit keyed lookup.

use super::loader::LoaderError;
use std::collections::HashMap;

/// Counts keyed by heritage category (rows) and region (columns).
///
/// Built once by the loader and never mutated afterwards. Every cell is either
/// a number or missing; the summary row is never present.
#[derive(Debug, Clone, PartialEq)]
pub struct HeritageTable {
    categories: Vec<String>,
    regions: Vec<String>,
    category_index: HashMap<String, usize>,
    region_index: HashMap<String, usize>,
    /// Row-major: `cells[category][region]`.
    cells: Vec<Vec<Option<f64>>>,
}

impl HeritageTable {
    /// Build a table from row keys, column keys and row-major cells.
    ///
    /// Keys must be unique and every row must have one cell per region.
    pub fn new(
        categories: Vec<String>,
        regions: Vec<String>,
        cells: Vec<Vec<Option<f64>>>,
    ) -> Result<Self, LoaderError> {
        if cells.len() != categories.len() {
            return Err(LoaderError::MalformedInput(format!(
                "{} category keys but {} rows",
                categories.len(),
                cells.len()
            )));
        }
        if let Some((i, row)) = cells
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != regions.len())
        {
            return Err(LoaderError::MalformedInput(format!(
                "row '{}' has {} cells, expected {}",
                categories[i],
                row.len(),
                regions.len()
            )));
        }

        let category_index = Self::index_keys(&categories, "category")?;
        let region_index = Self::index_keys(&regions, "region")?;

        Ok(Self {
            categories,
            regions,
            category_index,
            region_index,
            cells,
        })
    }

    fn index_keys(keys: &[String], what: &str) -> Result<HashMap<String, usize>, LoaderError> {
        let mut index = HashMap::with_capacity(keys.len());
        for (i, key) in keys.iter().enumerate() {
            if index.insert(key.clone(), i).is_some() {
                return Err(LoaderError::MalformedInput(format!(
                    "duplicate {} key '{}'",
                    what, key
                )));
            }
        }
        Ok(index)
    }

    /// Category keys in source row order.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Region names in source column order.
    pub fn regions(&self) -> &[String] {
        &self.regions
    }

    pub fn height(&self) -> usize {
        self.categories.len()
    }

    pub fn width(&self) -> usize {
        self.regions.len()
    }

    pub fn category_position(&self, category: &str) -> Option<usize> {
        self.category_index.get(category).copied()
    }

    pub fn region_position(&self, region: &str) -> Option<usize> {
        self.region_index.get(region).copied()
    }

    /// Cell at (row, column) position. Out-of-range positions read as missing.
    pub fn cell(&self, row: usize, col: usize) -> Option<f64> {
        self.cells.get(row).and_then(|r| r.get(col)).copied().flatten()
    }

    /// Cell by category and region key.
    pub fn get(&self, category: &str, region: &str) -> Option<f64> {
        let row = self.category_position(category)?;
        let col = self.region_position(region)?;
        self.cell(row, col)
    }

    /// All cells of one category row.
    pub fn row(&self, row: usize) -> &[Option<f64>] {
        self.cells.get(row).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All cells of one region column, in row order.
    pub fn column(&self, col: usize) -> impl Iterator<Item = Option<f64>> + '_ {
        self.cells
            .iter()
            .map(move |row| row.get(col).copied().flatten())
    }

    /// Number of missing cells.
    pub fn missing_count(&self) -> usize {
        self.cells.iter().flatten().filter(|v| v.is_none()).count()
    }

    /// Sum of every present cell.
    pub fn numeric_sum(&self) -> f64 {
        self.cells.iter().flatten().flatten().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> HeritageTable {
        HeritageTable::new(
            vec!["국보".into(), "보물".into()],
            vec!["서울".into(), "부산".into()],
            vec![vec![Some(3.0), None], vec![Some(10.0), Some(4.0)]],
        )
        .unwrap()
    }

    #[test]
    fn lookup_by_key() {
        let table = sample();
        assert_eq!(table.get("보물", "부산"), Some(4.0));
        assert_eq!(table.get("국보", "부산"), None);
        assert_eq!(table.get("사적", "서울"), None);
        assert_eq!(table.region_position("부산"), Some(1));
        assert_eq!(table.region_position("Atlantis"), None);
    }

    #[test]
    fn column_and_sums() {
        let table = sample();
        let seoul: Vec<_> = table.column(0).collect();
        assert_eq!(seoul, vec![Some(3.0), Some(10.0)]);
        assert_eq!(table.numeric_sum(), 17.0);
        assert_eq!(table.missing_count(), 1);
    }

    #[test]
    fn rejects_duplicate_keys() {
        let err = HeritageTable::new(
            vec!["국보".into(), "국보".into()],
            vec!["서울".into()],
            vec![vec![Some(1.0)], vec![Some(2.0)]],
        )
        .unwrap_err();
        assert!(matches!(err, LoaderError::MalformedInput(_)));
    }

    #[test]
    fn rejects_ragged_rows() {
        let err = HeritageTable::new(
            vec!["국보".into()],
            vec!["서울".into(), "부산".into()],
            vec![vec![Some(1.0)]],
        )
        .unwrap_err();
        assert!(matches!(err, LoaderError::MalformedInput(_)));
    }
}
