//! CSV Data Loader Module
//! Reads the heritage CSV with Polars and normalizes it into a `HeritageTable`.

use super::table::HeritageTable;
use once_cell::sync::OnceCell;
use polars::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Label of the precomputed grand-total row (and column) in the source file.
pub const DEFAULT_SUMMARY_LABEL: &str = "합계";

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Data file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Malformed input: {0}")]
    MalformedInput(String),
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Failed to read data file: {0}")]
    IoError(#[from] std::io::Error),
}

/// How the raw table is interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    /// Header of the category key column. `None` means the first column.
    pub category_column: Option<String>,
    /// Row (and column) label holding grand totals; removed on load.
    pub summary_label: String,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            category_column: None,
            summary_label: DEFAULT_SUMMARY_LABEL.to_string(),
        }
    }
}

/// Read and normalize the heritage table at `path`.
pub fn load(path: impl AsRef<Path>, options: &LoadOptions) -> Result<HeritageTable, LoaderError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(LoaderError::NotFound(path.to_path_buf()));
    }
    if std::fs::read_to_string(path)?.trim().is_empty() {
        return Err(LoaderError::MalformedInput(format!(
            "{} is empty",
            path.display()
        )));
    }

    debug!(path = %path.display(), "reading heritage csv");

    // Polars renames repeated headers, so duplicates are checked on the raw line.
    let headers = read_headers(path)?;
    if let Some(dup) = first_duplicate(&headers) {
        return Err(LoaderError::MalformedInput(format!(
            "duplicate column '{}'",
            dup
        )));
    }

    // Every column is read as text; coercion happens in `normalize`.
    let df = LazyCsvReader::new(path)
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .finish()?
        .collect()?;

    let table = normalize(&df, options)?;
    info!(
        path = %path.display(),
        categories = table.height(),
        regions = table.width(),
        missing = table.missing_count(),
        "heritage table loaded"
    );
    Ok(table)
}

/// Turn a raw frame into a `HeritageTable`: key the rows by the category
/// column, drop the summary row and column, and coerce every remaining cell
/// to a number. Cells that do not parse become missing.
pub fn normalize(df: &DataFrame, options: &LoadOptions) -> Result<HeritageTable, LoaderError> {
    let columns = df.get_columns();
    if columns.is_empty() {
        return Err(LoaderError::MalformedInput("table has no columns".to_string()));
    }

    let headers: Vec<String> = columns
        .iter()
        .map(|col| clean_header(col.name().as_str()))
        .collect();

    let key_idx = match &options.category_column {
        Some(name) => headers
            .iter()
            .position(|h| h == name.trim())
            .ok_or_else(|| {
                LoaderError::MalformedInput(format!("category column '{}' not found", name))
            })?,
        None => 0,
    };

    let keys = text_cells(&columns[key_idx])?;

    let mut row_indices = Vec::with_capacity(keys.len());
    let mut categories = Vec::with_capacity(keys.len());
    for (i, key) in keys.into_iter().enumerate() {
        let key = key.ok_or_else(|| {
            LoaderError::MalformedInput(format!("row {} has no category key", i + 1))
        })?;
        if key == options.summary_label {
            debug!(row = i, "dropping summary row");
            continue;
        }
        row_indices.push(i);
        categories.push(key);
    }

    let mut regions = Vec::new();
    let mut region_cells: Vec<Vec<Option<f64>>> = Vec::new();
    let mut coerced = 0usize;
    for (idx, col) in columns.iter().enumerate() {
        if idx == key_idx {
            continue;
        }
        if headers[idx] == options.summary_label {
            debug!(column = %headers[idx], "dropping summary column");
            continue;
        }

        let raw = text_cells(col)?;
        let values: Vec<Option<f64>> = row_indices
            .iter()
            .map(|&row| {
                let text = raw[row].as_deref();
                let value = text.and_then(parse_count);
                if text.is_some() && value.is_none() {
                    coerced += 1;
                }
                value
            })
            .collect();

        regions.push(headers[idx].clone());
        region_cells.push(values);
    }

    if coerced > 0 {
        warn!(cells = coerced, "non-numeric cells coerced to missing");
    }

    // Columns were collected region-major; the table is row-major.
    let cells = (0..categories.len())
        .map(|row| region_cells.iter().map(|col| col[row]).collect())
        .collect();

    HeritageTable::new(categories, regions, cells)
}

/// Trimmed, non-empty text of every cell in a column.
fn text_cells(col: &Column) -> Result<Vec<Option<String>>, LoaderError> {
    let as_text = col.cast(&DataType::String)?;
    let ca = as_text.as_materialized_series().str()?;
    Ok(ca
        .into_iter()
        .map(|v| {
            v.map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        })
        .collect())
}

/// Header cells exactly as written in the first line of the file.
fn read_headers(path: &Path) -> Result<Vec<String>, LoaderError> {
    let first_row = LazyCsvReader::new(path)
        .with_has_header(false)
        .with_n_rows(Some(1))
        .with_infer_schema_length(Some(0))
        .finish()?
        .collect()?;

    first_row
        .get_columns()
        .iter()
        .map(|col| {
            let cell = text_cells(col)?.into_iter().next().flatten();
            Ok(cell.map(|h| clean_header(&h)).unwrap_or_default())
        })
        .collect()
}

fn first_duplicate(headers: &[String]) -> Option<&str> {
    let mut seen = HashSet::with_capacity(headers.len());
    headers
        .iter()
        .find(|h| !seen.insert(h.as_str()))
        .map(String::as_str)
}

fn clean_header(name: &str) -> String {
    name.trim_start_matches('\u{feff}').trim().to_string()
}

/// Numeric value of a cell, or `None` when it is not a number.
pub fn parse_count(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Loads the table on first use and hands out the same value afterwards.
pub struct DataLoader {
    file_path: PathBuf,
    options: LoadOptions,
    table: OnceCell<HeritageTable>,
}

impl DataLoader {
    pub fn new(file_path: impl Into<PathBuf>, options: LoadOptions) -> Self {
        Self {
            file_path: file_path.into(),
            options,
            table: OnceCell::new(),
        }
    }

    /// The normalized table, read from disk on the first call only.
    /// A failed load is not cached; the next call retries.
    pub fn table(&self) -> Result<&HeritageTable, LoaderError> {
        self.table
            .get_or_try_init(|| load(&self.file_path, &self.options))
    }

    pub fn is_loaded(&self) -> bool {
        self.table.get().is_some()
    }

    /// Get file path.
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn options(&self) -> &LoadOptions {
        &self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> DataFrame {
        DataFrame::new(vec![
            Column::new("\u{feff}구분".into(), ["국보", "보물", "합계"]),
            Column::new("서울".into(), ["3", "x", "13"]),
            Column::new("부산".into(), [" 1 ", "", "1"]),
            Column::new("합계".into(), ["4", "0", "14"]),
        ])
        .unwrap()
    }

    #[test]
    fn parse_count_handles_noise() {
        assert_eq!(parse_count(" 42 "), Some(42.0));
        assert_eq!(parse_count("1.5"), Some(1.5));
        assert_eq!(parse_count("-"), None);
        assert_eq!(parse_count("NaN"), None);
        assert_eq!(parse_count("1,234"), None);
    }

    #[test]
    fn normalize_drops_summary_and_coerces() {
        let table = normalize(&frame(), &LoadOptions::default()).unwrap();
        assert_eq!(table.categories(), ["국보", "보물"]);
        assert_eq!(table.regions(), ["서울", "부산"]);
        assert_eq!(table.get("국보", "서울"), Some(3.0));
        assert_eq!(table.get("보물", "서울"), None);
        assert_eq!(table.get("국보", "부산"), Some(1.0));
        assert_eq!(table.get("보물", "부산"), None);
    }

    #[test]
    fn named_category_column() {
        let df = DataFrame::new(vec![
            Column::new("서울".into(), ["3"]),
            Column::new("구분".into(), ["국보"]),
        ])
        .unwrap();
        let options = LoadOptions {
            category_column: Some("구분".to_string()),
            ..LoadOptions::default()
        };
        let table = normalize(&df, &options).unwrap();
        assert_eq!(table.categories(), ["국보"]);
        assert_eq!(table.regions(), ["서울"]);
    }

    #[test]
    fn missing_category_column_is_malformed() {
        let options = LoadOptions {
            category_column: Some("유형".to_string()),
            ..LoadOptions::default()
        };
        let err = normalize(&frame(), &options).unwrap_err();
        assert!(matches!(err, LoaderError::MalformedInput(_)));
    }

    #[test]
    fn blank_category_key_is_malformed() {
        let df = DataFrame::new(vec![
            Column::new("구분".into(), ["국보", " "]),
            Column::new("서울".into(), ["3", "4"]),
        ])
        .unwrap();
        let err = normalize(&df, &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, LoaderError::MalformedInput(_)));
    }

    #[test]
    fn custom_summary_label() {
        let df = DataFrame::new(vec![
            Column::new("Category".into(), ["A", "Total"]),
            Column::new("X".into(), ["1", "1"]),
        ])
        .unwrap();
        let options = LoadOptions {
            summary_label: "Total".to_string(),
            ..LoadOptions::default()
        };
        let table = normalize(&df, &options).unwrap();
        assert_eq!(table.categories(), ["A"]);
    }

    #[test]
    fn loader_reports_missing_file() {
        let loader = DataLoader::new("/nonexistent/korean_heritage.csv", LoadOptions::default());
        assert!(matches!(loader.table(), Err(LoaderError::NotFound(_))));
        assert!(!loader.is_loaded());
        assert_eq!(loader.options().summary_label, DEFAULT_SUMMARY_LABEL);
    }

    #[test]
    fn finds_first_duplicate_header() {
        let headers: Vec<String> = ["구분", "서울", "부산", "서울"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(first_duplicate(&headers), Some("서울"));
        assert_eq!(first_duplicate(&headers[..3]), None);
    }
}
