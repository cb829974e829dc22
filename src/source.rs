//! Input shapes accepted by `PointDataset`.

use crate::error::Result;
use crate::labeled::LabeledArray;
use crate::table::RowTable;

/// Point data in one of the two supported shapes
#[derive(Debug, Clone, PartialEq)]
pub enum PointSource {
    /// Row-oriented table with named columns
    Table(RowTable),
    /// Gridded labeled array, flattened into rows before use
    Grid(LabeledArray),
}

impl PointSource {
    /// Normalize to a row table
    pub fn into_row_table(self) -> Result<RowTable> {
        match self {
            PointSource::Table(table) => Ok(table),
            PointSource::Grid(array) => array.to_row_table(),
        }
    }
}

impl From<RowTable> for PointSource {
    fn from(table: RowTable) -> Self {
        PointSource::Table(table)
    }
}

impl From<LabeledArray> for PointSource {
    fn from(array: LabeledArray) -> Self {
        PointSource::Grid(array)
    }
}
