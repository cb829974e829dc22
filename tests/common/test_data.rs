//! Test data generation utilities.
//!
//! Writes small point datasets and outlines with known values.

use std::path::Path;

/// Five points across western Europe with objective values 1..=9.
pub const EUROPE_POINTS: &str = r#"[
    {"site": "brest",     "lat": 48.39, "lon": -4.49, "obj": 1},
    {"site": "paris",     "lat": 48.86, "lon": 2.35,  "obj": 3},
    {"site": "lyon",      "lat": 45.76, "lon": 4.84,  "obj": 5},
    {"site": "marseille", "lat": 43.30, "lon": 5.37,  "obj": 7},
    {"site": "strasbourg","lat": 48.57, "lon": 7.75,  "obj": 9}
]"#;

/// A rough rectangle around France
pub const FRANCE_OUTLINE: &str = r#"{
    "type": "FeatureCollection",
    "features": [{
        "type": "Feature",
        "properties": {"name": "france"},
        "geometry": {
            "type": "Polygon",
            "coordinates": [[[-5.0, 42.0], [8.5, 42.0], [8.5, 51.0], [-5.0, 51.0], [-5.0, 42.0]]]
        }
    }]
}"#;

/// Write the European points as JSON records
pub fn write_points_json(path: &Path) -> std::io::Result<()> {
    std::fs::write(path, EUROPE_POINTS)
}

/// Write the French outline as GeoJSON
pub fn write_outline_geojson(path: &Path) -> std::io::Result<()> {
    std::fs::write(path, FRANCE_OUTLINE)
}

/// Creates a NetCDF file with a 2x3 lat/lon grid of `obj` values 0..6.
///
/// Cell (1, 1) holds the fill value and loads as missing.
#[cfg(feature = "netcdf")]
pub fn create_grid_nc(path: &Path) -> Result<(), netcdf::Error> {
    let mut file = netcdf::create(path)?;

    file.add_dimension("lat", 2)?;
    file.add_dimension("lon", 3)?;
    file.add_attribute("title", "geogof grid test data")?;

    {
        let mut lat_var = file.add_variable::<f32>("lat", &["lat"])?;
        lat_var.put_attribute("units", "degrees_north")?;
        lat_var.put_values(&[40.0f32, 50.0], &[..])?;
    }

    {
        let mut lon_var = file.add_variable::<f32>("lon", &["lon"])?;
        lon_var.put_attribute("units", "degrees_east")?;
        lon_var.put_values(&[-10.0f32, 0.0, 10.0], &[..])?;
    }

    {
        let mut obj_var = file.add_variable::<f64>("obj", &["lat", "lon"])?;
        obj_var.put_attribute("_FillValue", -1.0e20f64)?;
        obj_var.put_values(&[0.0, 1.0, 2.0, 3.0, -1.0e20, 5.0], &[.., ..])?;
    }

    Ok(())
}
