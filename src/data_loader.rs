//! Point data loading.
//!
//! Two on-disk shapes are supported: JSON records (an array of objects, one
//! per point) which load as a `RowTable`, and a NetCDF variable which loads as
//! a `LabeledArray` together with its coordinate variables.

use serde_json::Value;
use std::path::Path;
use std::time::Instant;
use tracing::debug;

use crate::error::{GeogofError, Result};
#[cfg(feature = "netcdf")]
use crate::labeled::{Dimension, LabeledArray};
use crate::logging::log_data_load_stats;
use crate::source::PointSource;
use crate::table::{ColumnValues, RowTable};

/// Load point data, choosing the reader from the file extension.
///
/// `variable` names the NetCDF variable to read and is ignored for JSON.
pub fn load_source(path: &Path, variable: Option<&str>) -> Result<PointSource> {
    check_exists(path)?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "json" | "geojson" => Ok(PointSource::Table(load_records(path)?)),
        "nc" | "nc4" | "netcdf" => load_netcdf_source(path, variable),
        other => Err(GeogofError::InvalidParameter {
            param: "input".to_string(),
            message: format!(
                "Unsupported input extension '{}' for {}: expected .json or .nc",
                other,
                path.display()
            ),
        }),
    }
}

#[cfg(feature = "netcdf")]
fn load_netcdf_source(path: &Path, variable: Option<&str>) -> Result<PointSource> {
    let variable = variable.ok_or_else(|| GeogofError::InvalidParameter {
        param: "variable".to_string(),
        message: "A variable name is required to read NetCDF input".to_string(),
    })?;
    Ok(PointSource::Grid(load_netcdf_variable(path, variable)?))
}

#[cfg(not(feature = "netcdf"))]
fn load_netcdf_source(path: &Path, _variable: Option<&str>) -> Result<PointSource> {
    Err(GeogofError::InvalidParameter {
        param: "input".to_string(),
        message: format!(
            "{} is a NetCDF file but geogof was built without the netcdf feature",
            path.display()
        ),
    })
}

fn check_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(GeogofError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("File not found: {}", path.display()),
        )));
    }
    Ok(())
}

/// Load a JSON array of objects into a row table
pub fn load_records(path: &Path) -> Result<RowTable> {
    check_exists(path)?;
    let start = Instant::now();

    let content = std::fs::read_to_string(path)?;
    let table = parse_records(&content)?;

    log_data_load_stats(
        &path.display().to_string(),
        table.num_rows(),
        &table.column_names(),
        start.elapsed(),
    );
    Ok(table)
}

/// Parse JSON records text into a row table.
///
/// Columns appear in first-seen key order. Numbers and booleans make numeric
/// columns, with `null` or absent keys stored as NaN. A column holding any
/// string becomes a text column, with numbers stringified and missing
/// entries empty.
pub fn parse_records(content: &str) -> Result<RowTable> {
    let value: Value = serde_json::from_str(content)?;
    let records = value.as_array().ok_or_else(|| GeogofError::InvalidParameter {
        param: "input".to_string(),
        message: "JSON input must be an array of objects".to_string(),
    })?;

    let mut names: Vec<String> = Vec::new();
    for (i, record) in records.iter().enumerate() {
        let object = record.as_object().ok_or_else(|| GeogofError::InvalidParameter {
            param: "input".to_string(),
            message: format!("Record {} is not a JSON object", i),
        })?;
        for key in object.keys() {
            if !names.contains(key) {
                names.push(key.clone());
            }
        }
    }

    let mut table = RowTable::new();
    for name in &names {
        let cells: Vec<Option<&Value>> = records
            .iter()
            .map(|r| r.get(name).filter(|v| !v.is_null()))
            .collect();

        let values = if cells.iter().flatten().any(|v| v.is_string()) {
            ColumnValues::Text(cells.iter().map(|c| cell_to_text(*c)).collect())
        } else {
            let numbers = cells
                .iter()
                .enumerate()
                .map(|(row, c)| cell_to_number(*c, name, row))
                .collect::<Result<Vec<f64>>>()?;
            ColumnValues::Numeric(numbers)
        };
        table.push_column(name.clone(), values)?;
    }

    debug!(rows = records.len(), columns = names.len(), "Parsed JSON records");
    Ok(table)
}

fn cell_to_number(cell: Option<&Value>, column: &str, row: usize) -> Result<f64> {
    match cell {
        None => Ok(f64::NAN),
        Some(Value::Number(n)) => Ok(n.as_f64().unwrap_or(f64::NAN)),
        Some(Value::Bool(b)) => Ok(if *b { 1.0 } else { 0.0 }),
        Some(other) => Err(GeogofError::InvalidColumnType {
            column: column.to_string(),
            message: format!("row {} holds a nested value: {}", row, other),
        }),
    }
}

fn cell_to_text(cell: Option<&Value>) -> String {
    match cell {
        None => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Load one NetCDF variable and its coordinate variables as a labeled array.
///
/// Values equal to the variable's `_FillValue` load as NaN. Dimensions
/// without a coordinate variable get 0-based indices.
#[cfg(feature = "netcdf")]
pub fn load_netcdf_variable(path: &Path, variable: &str) -> Result<LabeledArray> {
    use tracing::{info, warn};

    check_exists(path)?;
    let start = Instant::now();

    let file = netcdf::open(path)?;
    info!("Opened NetCDF file: {}", path.display());

    let var = file
        .variable(variable)
        .ok_or_else(|| GeogofError::InvalidParameter {
            param: "variable".to_string(),
            message: format!("Variable {} not found in {}", variable, path.display()),
        })?;

    let mut dims = Vec::new();
    for dim in var.dimensions() {
        let name = dim.name();
        let coords = match file.variable(&name) {
            Some(coord_var) => coord_var.get_values::<f64, _>(&[] as &[netcdf::Extent])?,
            None => {
                warn!("Created default coordinates for dimension: {}", name);
                (0..dim.len()).map(|i| i as f64).collect()
            }
        };
        dims.push(Dimension::new(name, coords));
    }

    let mut values: Vec<f64> = var.get_values::<f64, _>(&[] as &[netcdf::Extent])?;
    if let Some(fill) = fill_value(&var)? {
        for value in values.iter_mut().filter(|v| **v == fill) {
            *value = f64::NAN;
        }
    }

    let array = LabeledArray::from_shape_vec(variable, dims, values)?;

    let dim_names: Vec<&str> = array.dims().iter().map(|d| d.name.as_str()).collect();
    log_data_load_stats(
        &path.display().to_string(),
        array.values().len(),
        &dim_names,
        start.elapsed(),
    );

    Ok(array)
}

#[cfg(feature = "netcdf")]
fn fill_value(var: &netcdf::Variable) -> Result<Option<f64>> {
    use netcdf::AttributeValue as NcAttributeValue;

    for attr in var.attributes() {
        if attr.name() != "_FillValue" {
            continue;
        }
        let value = match attr.value()? {
            NcAttributeValue::Schar(v) => Some(v as f64),
            NcAttributeValue::Uchar(v) => Some(v as f64),
            NcAttributeValue::Short(v) => Some(v as f64),
            NcAttributeValue::Int(v) => Some(v as f64),
            NcAttributeValue::Float(v) => Some(v as f64),
            NcAttributeValue::Double(v) => Some(v),
            _ => None,
        };
        return Ok(value);
    }
    Ok(None)
}
