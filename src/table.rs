//! Row-oriented point table.
//!
//! `RowTable` is addressed by row (record) but stored column by column, so
//! the numeric columns the plot and layer adapters read are contiguous
//! `f64` slices. Missing numeric values are stored as NaN.

use serde::Serialize;

use crate::error::{GeogofError, Result};

/// Values held by a single column
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ColumnValues {
    /// Numeric column (missing values are NaN)
    Numeric(Vec<f64>),
    /// Free text column
    Text(Vec<String>),
}

impl ColumnValues {
    /// Number of entries in the column
    pub fn len(&self) -> usize {
        match self {
            ColumnValues::Numeric(v) => v.len(),
            ColumnValues::Text(v) => v.len(),
        }
    }

    /// Whether the column holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Short type name used in messages
    pub fn dtype(&self) -> &'static str {
        match self {
            ColumnValues::Numeric(_) => "numeric",
            ColumnValues::Text(_) => "text",
        }
    }
}

/// A named column
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Column name
    pub name: String,
    /// Column values
    pub values: ColumnValues,
}

/// A single cell value, borrowed from a table
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellValue<'a> {
    Number(f64),
    Text(&'a str),
}

impl CellValue<'_> {
    /// Convert the cell to a JSON value. Non-finite numbers become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            CellValue::Number(v) => serde_json::Number::from_f64(*v)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            CellValue::Text(s) => serde_json::Value::String((*s).to_string()),
        }
    }
}

/// Ordered table of equally long columns
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowTable {
    columns: Vec<Column>,
    rows: usize,
}

impl RowTable {
    /// Create an empty table with no columns
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from numeric columns
    pub fn from_numeric<S: Into<String>>(columns: Vec<(S, Vec<f64>)>) -> Result<Self> {
        let mut table = Self::new();
        for (name, values) in columns {
            table.push_column(name, ColumnValues::Numeric(values))?;
        }
        Ok(table)
    }

    /// Append a column. The first column fixes the row count.
    pub fn push_column(&mut self, name: impl Into<String>, values: ColumnValues) -> Result<()> {
        let name = name.into();

        if self.has_column(&name) {
            return Err(GeogofError::InvalidParameter {
                param: "column".to_string(),
                message: format!("Duplicate column name: {}", name),
            });
        }

        if !self.columns.is_empty() && values.len() != self.rows {
            return Err(GeogofError::InvalidParameter {
                param: "column".to_string(),
                message: format!(
                    "Column {} has {} rows but the table has {}",
                    name,
                    values.len(),
                    self.rows
                ),
            });
        }

        self.rows = values.len();
        self.columns.push(Column { name, values });
        Ok(())
    }

    /// Number of rows
    pub fn num_rows(&self) -> usize {
        self.rows
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Column names in insertion order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// All columns in insertion order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Check if a column exists
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    /// Get a column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Get a column by name with error handling
    pub fn column_checked(&self, name: &str) -> Result<&Column> {
        self.column(name).ok_or_else(|| GeogofError::MissingColumn {
            column: name.to_string(),
        })
    }

    /// Get a numeric column's values
    pub fn numeric(&self, name: &str) -> Result<&[f64]> {
        let column = self.column_checked(name)?;
        match &column.values {
            ColumnValues::Numeric(values) => Ok(values),
            other => Err(GeogofError::InvalidColumnType {
                column: name.to_string(),
                message: format!("expected numeric values, found {}", other.dtype()),
            }),
        }
    }

    /// Mutable access to a numeric column, crate-internal so that the
    /// only writer is dataset conditioning.
    pub(crate) fn numeric_mut(&mut self, name: &str) -> Result<&mut Vec<f64>> {
        let column = self
            .columns
            .iter_mut()
            .find(|c| c.name == name)
            .ok_or_else(|| GeogofError::MissingColumn {
                column: name.to_string(),
            })?;

        match &mut column.values {
            ColumnValues::Numeric(values) => Ok(values),
            other => Err(GeogofError::InvalidColumnType {
                column: name.to_string(),
                message: format!("expected numeric values, found {}", other.dtype()),
            }),
        }
    }

    /// Iterate over the cells of one row as (column name, value) pairs
    pub fn row(&self, index: usize) -> Option<Vec<(&str, CellValue<'_>)>> {
        if index >= self.rows {
            return None;
        }

        Some(
            self.columns
                .iter()
                .map(|c| {
                    let cell = match &c.values {
                        ColumnValues::Numeric(v) => CellValue::Number(v[index]),
                        ColumnValues::Text(v) => CellValue::Text(&v[index]),
                    };
                    (c.name.as_str(), cell)
                })
                .collect(),
        )
    }
}
