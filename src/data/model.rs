use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use encoding_rs::Encoding;

use super::error::SchemaError;

/// Name of the column identifying each row's region.
pub const KEY_COLUMN: &str = "Name";

// ---------------------------------------------------------------------------
// CellValue – a single cell of a dataset
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring the dtypes a delimited file yields.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Null,
}

impl CellValue {
    /// Infer the type of a raw field; surrounding whitespace is dropped.
    ///
    /// Empty fields are null. A decimal comma (`12,5`) is accepted when the
    /// rest of the field is numeric.
    pub fn parse(raw: &str) -> Self {
        let s = raw.trim();
        if s.is_empty() {
            return CellValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return CellValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return if f.is_nan() {
                CellValue::Null
            } else {
                CellValue::Float(f)
            };
        }
        if s.matches(',').count() == 1 && !s.contains('.') {
            if let Ok(f) = s.replacen(',', ".", 1).parse::<f64>() {
                return CellValue::Float(f);
            }
        }
        CellValue::Text(s.to_string())
    }

    /// Try to interpret the value as an `f64` for plotting.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) if v.is_finite() => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Null => write!(f, "n/a"),
        }
    }
}

/// Interpret a column name as a year: non-empty and ASCII digits only.
pub fn parse_year(column: &str) -> Option<i32> {
    if column.is_empty() || !column.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    column.parse().ok()
}

// ---------------------------------------------------------------------------
// Row – one region line of the file
// ---------------------------------------------------------------------------

/// One data row; `cells` is aligned with [`Dataset::columns`].
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub cells: Vec<CellValue>,
}

// ---------------------------------------------------------------------------
// Dataset – one loaded topic table
// ---------------------------------------------------------------------------

/// A loaded table: one row per region, one column per year.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// File the table was read from.
    pub source: PathBuf,
    /// Encoding that successfully decoded the file.
    pub encoding: &'static Encoding,
    /// Trimmed column names in file order.
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
    /// Set when the key column is missing; the table is still usable.
    pub schema_error: Option<SchemaError>,
}

impl Dataset {
    /// Assemble a dataset and validate that the key column is present.
    pub fn new(
        source: &Path,
        encoding: &'static Encoding,
        columns: Vec<String>,
        rows: Vec<Row>,
    ) -> Self {
        let schema_error = if columns.iter().any(|c| c == KEY_COLUMN) {
            None
        } else {
            Some(SchemaError::MissingKeyColumn {
                path: source.to_path_buf(),
            })
        };
        Dataset {
            source: source.to_path_buf(),
            encoding,
            columns,
            rows,
            schema_error,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    fn key_index(&self) -> Option<usize> {
        self.column_index(KEY_COLUMN)
    }

    /// Region name of a row, if the key column exists and is non-null.
    pub fn region_of<'a>(&self, row: &'a Row) -> Option<&'a str> {
        row.cells.get(self.key_index()?)?.as_str()
    }

    /// Unique region names in file order.
    pub fn regions(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        self.rows
            .iter()
            .filter_map(|row| self.region_of(row))
            .filter(|name| seen.insert(*name))
            .collect()
    }

    /// All rows whose key matches `region`, in file order.
    pub fn rows_for<'a>(&'a self, region: &'a str) -> impl Iterator<Item = &'a Row> + 'a {
        self.rows
            .iter()
            .filter(move |row| self.region_of(row) == Some(region))
    }

    /// First row for `region`.
    pub fn find_region(&self, region: &str) -> Option<&Row> {
        self.rows
            .iter()
            .find(|row| self.region_of(row) == Some(region))
    }

    /// Years named by this dataset's all-digit columns.
    pub fn year_columns(&self) -> BTreeSet<i32> {
        self.columns.iter().filter_map(|c| parse_year(c)).collect()
    }

    /// Index of the column whose name is exactly `year`'s decimal form.
    pub fn year_column_index(&self, year: i32) -> Option<usize> {
        self.column_index(&year.to_string())
    }

    /// Numeric value of `row` for `year`; `None` for a missing column or a
    /// non-numeric cell.
    pub fn value(&self, row: &Row, year: i32) -> Option<f64> {
        let idx = self.year_column_index(year)?;
        row.cells.get(idx)?.as_f64()
    }

    /// Rows for `region` restricted to the key column plus `years`, rendered
    /// as display strings.
    pub fn table_slice(&self, region: &str, years: &[i32]) -> TableSlice {
        let mut header = vec![KEY_COLUMN.to_string()];
        header.extend(years.iter().map(|y| y.to_string()));

        let indices: Vec<Option<usize>> = years
            .iter()
            .map(|&y| self.year_column_index(y))
            .collect();

        let rows = self
            .rows_for(region)
            .map(|row| {
                let mut out = vec![region.to_string()];
                out.extend(indices.iter().map(|idx| {
                    idx.and_then(|i| row.cells.get(i))
                        .map(|c| c.to_string())
                        .unwrap_or_else(|| CellValue::Null.to_string())
                }));
                out
            })
            .collect();

        TableSlice { header, rows }
    }
}

/// A rectangular slice of a dataset ready for a table widget.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableSlice {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}
