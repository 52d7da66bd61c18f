//! In-memory record table backed by a polars `DataFrame`.
//!
//! Column types and missing-value counts come straight from the frame the
//! CSV reader inferred; this module only narrows them to what the analyses
//! need.

use crate::error::AnalysisError;
use polars::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Inferred type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Integer,
    Float,
    Text,
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::Text => "text",
        }
    }

    fn of(dtype: &DataType) -> Self {
        if dtype.is_integer() {
            ColumnType::Integer
        } else if dtype.is_float() {
            ColumnType::Float
        } else {
            ColumnType::Text
        }
    }

    fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Float)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single cell, serialized as a plain JSON number or string.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl CellValue {
    fn from_any(value: AnyValue<'_>) -> Option<Self> {
        match value {
            AnyValue::Null => None,
            AnyValue::Int32(v) => Some(CellValue::Integer(v.into())),
            AnyValue::Int64(v) => Some(CellValue::Integer(v)),
            AnyValue::UInt32(v) => Some(CellValue::Integer(v.into())),
            AnyValue::Float32(v) => Some(CellValue::Float(v.into())),
            AnyValue::Float64(v) => Some(CellValue::Float(v)),
            AnyValue::String(s) => Some(CellValue::Text(s.to_string())),
            AnyValue::StringOwned(s) => Some(CellValue::Text(s.to_string())),
            other => Some(CellValue::Text(other.to_string().trim_matches('"').to_string())),
        }
    }
}

/// Name, type and missing-value count of one column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub name: String,
    pub column_type: ColumnType,
    pub missing: usize,
}

/// Immutable table of records.
#[derive(Debug, Clone, Default)]
pub struct Table {
    df: DataFrame,
}

impl Table {
    pub fn from_dataframe(df: DataFrame) -> Self {
        Self { df }
    }

    pub fn len(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    pub fn width(&self) -> usize {
        self.df.width()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    pub fn summaries(&self) -> Vec<ColumnSummary> {
        self.df
            .get_columns()
            .iter()
            .map(|c| ColumnSummary {
                name: c.name().to_string(),
                column_type: ColumnType::of(c.dtype()),
                missing: c.as_materialized_series().null_count(),
            })
            .collect()
    }

    fn column(&self, name: &str) -> Result<&Column, AnalysisError> {
        self.df
            .column(name)
            .map_err(|_| AnalysisError::MissingColumn(name.to_string()))
    }

    /// Values of a column rendered as labels, whatever its inferred type.
    pub fn labels(&self, name: &str) -> Result<Vec<Option<String>>, AnalysisError> {
        let series = self
            .column(name)?
            .as_materialized_series()
            .cast(&DataType::String)
            .map_err(|e| read_error(name, e))?;
        let values = series.str().map_err(|e| read_error(name, e))?;

        Ok(values
            .into_iter()
            .map(|v| v.map(str::to_string))
            .collect())
    }

    /// Values of a numeric column as `f64`.
    pub fn numbers(&self, name: &str) -> Result<Vec<Option<f64>>, AnalysisError> {
        let column = self.column(name)?;
        let column_type = ColumnType::of(column.dtype());
        if !column_type.is_numeric() {
            return Err(AnalysisError::ColumnType {
                column: name.to_string(),
                expected: "numeric",
                found: column_type.as_str(),
            });
        }

        let as_f64 = column
            .cast(&DataType::Float64)
            .map_err(|e| read_error(name, e))?;
        let values = as_f64.f64().map_err(|e| read_error(name, e))?;

        Ok(values.into_iter().collect())
    }

    /// The first `n` records as column-name → value maps.
    pub fn head(&self, n: usize) -> Vec<BTreeMap<String, Option<CellValue>>> {
        (0..n.min(self.len()))
            .map(|row| {
                self.df
                    .get_columns()
                    .iter()
                    .map(|c| {
                        let value = c
                            .as_materialized_series()
                            .get(row)
                            .ok()
                            .and_then(CellValue::from_any);
                        (c.name().to_string(), value)
                    })
                    .collect()
            })
            .collect()
    }
}

fn read_error(column: &str, source: PolarsError) -> AnalysisError {
    AnalysisError::ColumnRead {
        column: column.to_string(),
        message: source.to_string(),
    }
}

#[cfg(test)]
impl Table {
    pub(crate) fn column_type(&self, name: &str) -> Result<ColumnType, AnalysisError> {
        Ok(ColumnType::of(self.column(name)?.dtype()))
    }

    /// Write the rows out as CSV and read them back through the loader.
    pub(crate) fn from_rows<S: AsRef<str>>(headers: &[S], rows: Vec<Vec<String>>) -> Self {
        use std::io::Write;

        let mut text = headers
            .iter()
            .map(|h| h.as_ref())
            .collect::<Vec<_>>()
            .join(",");
        text.push('\n');
        for row in rows {
            text.push_str(&row.join(","));
            text.push('\n');
        }

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(text.as_bytes()).unwrap();
        file.flush().unwrap();
        crate::data::load(file.path()).unwrap()
    }
}
