//! Multi-dimensional labeled arrays.
//!
//! A `LabeledArray` is a named n-dimensional array whose axes carry a
//! dimension name and a coordinate vector, the shape a gridded NetCDF
//! variable has once it is loaded into memory.

use ndarray::{ArrayD, IxDyn};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{GeogofError, Result};
use crate::table::{ColumnValues, RowTable};

/// Metadata about one labeled dimension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    /// Name of the dimension
    pub name: String,
    /// Coordinate values along the dimension
    pub coords: Vec<f64>,
}

impl Dimension {
    /// Create a dimension from a name and coordinate values
    pub fn new(name: impl Into<String>, coords: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            coords,
        }
    }

    /// Size of the dimension
    pub fn size(&self) -> usize {
        self.coords.len()
    }
}

/// A named n-dimensional array with labeled axes
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledArray {
    name: String,
    dims: Vec<Dimension>,
    values: ArrayD<f64>,
}

impl LabeledArray {
    /// Create a labeled array, checking that the dimensions describe the array shape
    pub fn new(name: impl Into<String>, dims: Vec<Dimension>, values: ArrayD<f64>) -> Result<Self> {
        let name = name.into();

        if dims.len() != values.ndim() {
            return Err(GeogofError::InvalidParameter {
                param: "dims".to_string(),
                message: format!(
                    "Array {} has {} axes but {} dimensions were given",
                    name,
                    values.ndim(),
                    dims.len()
                ),
            });
        }

        for (i, dim) in dims.iter().enumerate() {
            if dim.size() != values.shape()[i] {
                return Err(GeogofError::InvalidParameter {
                    param: "dims".to_string(),
                    message: format!(
                        "Dimension {} has {} coordinates but axis {} has length {}",
                        dim.name,
                        dim.size(),
                        i,
                        values.shape()[i]
                    ),
                });
            }
        }

        for (i, dim) in dims.iter().enumerate() {
            if dim.name == name || dims[..i].iter().any(|d| d.name == dim.name) {
                return Err(GeogofError::InvalidParameter {
                    param: "dims".to_string(),
                    message: format!("Duplicate label {} in array {}", dim.name, name),
                });
            }
        }

        Ok(Self { name, dims, values })
    }

    /// Create a labeled array from a flat row-major vector
    pub fn from_shape_vec(
        name: impl Into<String>,
        dims: Vec<Dimension>,
        values: Vec<f64>,
    ) -> Result<Self> {
        let shape: Vec<usize> = dims.iter().map(Dimension::size).collect();
        let array = ArrayD::from_shape_vec(IxDyn(&shape), values)?;
        Self::new(name, dims, array)
    }

    /// Name of the array (becomes the value column when flattened)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Dimensions in axis order
    pub fn dims(&self) -> &[Dimension] {
        &self.dims
    }

    /// The underlying array
    pub fn values(&self) -> &ArrayD<f64> {
        &self.values
    }

    /// Flatten into a row table: one column per dimension followed by the
    /// value column, one row per array element in row-major order.
    pub fn to_row_table(&self) -> Result<RowTable> {
        let total = self.values.len();
        let mut dim_columns: Vec<Vec<f64>> =
            self.dims.iter().map(|_| Vec::with_capacity(total)).collect();
        let mut value_column = Vec::with_capacity(total);

        for (index, &value) in self.values.indexed_iter() {
            for (axis, column) in dim_columns.iter_mut().enumerate() {
                column.push(self.dims[axis].coords[index[axis]]);
            }
            value_column.push(value);
        }

        let mut table = RowTable::new();
        for (dim, column) in self.dims.iter().zip(dim_columns) {
            table.push_column(dim.name.clone(), ColumnValues::Numeric(column))?;
        }
        table.push_column(self.name.clone(), ColumnValues::Numeric(value_column))?;

        debug!(
            array = %self.name,
            shape = ?self.values.shape(),
            rows = table.num_rows(),
            "Flattened labeled array"
        );

        Ok(table)
    }
}
