//! Cartographic projections for the static plot.
//!
//! Projections map WGS84 lon/lat degrees onto a planar coordinate system.
//! Lambert Azimuthal Equal-Area works on the unit sphere, so its projected
//! coordinates lie in a disk of radius 2; Plate Carrée keeps degrees.

use geo::Point;
use std::str::FromStr;

use crate::error::{GeogofError, Result};

/// Supported projections
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// Lambert Azimuthal Equal-Area centred on the given lon/lat
    LambertAzimuthalEqualArea {
        central_longitude: f64,
        central_latitude: f64,
    },
    /// Equirectangular projection centred on the given longitude
    PlateCarree { central_longitude: f64 },
}

impl Projection {
    /// Lambert Azimuthal Equal-Area centred on a point
    pub fn laea_centered_on(center: Point<f64>) -> Self {
        Projection::LambertAzimuthalEqualArea {
            central_longitude: normalize_longitude(center.x()),
            central_latitude: center.y().clamp(-90.0, 90.0),
        }
    }

    /// Project a lon/lat pair. Returns `None` for non-finite input and for the
    /// antipode of a LAEA centre, which has no unique image.
    pub fn project(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        if !lon.is_finite() || !lat.is_finite() {
            return None;
        }

        match *self {
            Projection::LambertAzimuthalEqualArea {
                central_longitude,
                central_latitude,
            } => {
                let (phi, phi0) = (lat.to_radians(), central_latitude.to_radians());
                let dlambda = (lon - central_longitude).to_radians();

                let denom = 1.0 + phi0.sin() * phi.sin() + phi0.cos() * phi.cos() * dlambda.cos();
                if denom <= 1e-12 {
                    return None;
                }

                let k = (2.0 / denom).sqrt();
                let x = k * phi.cos() * dlambda.sin();
                let y = k * (phi0.cos() * phi.sin() - phi0.sin() * phi.cos() * dlambda.cos());
                Some((x, y))
            }
            Projection::PlateCarree { central_longitude } => {
                Some((normalize_longitude(lon - central_longitude), lat))
            }
        }
    }

    /// Projected bounding box of the whole globe (min_x, min_y, max_x, max_y)
    pub fn full_extent(&self) -> (f64, f64, f64, f64) {
        match self {
            Projection::LambertAzimuthalEqualArea { .. } => (-2.0, -2.0, 2.0, 2.0),
            Projection::PlateCarree { .. } => (-180.0, -90.0, 180.0, 90.0),
        }
    }

    /// Short name of the projection
    pub fn name(&self) -> &'static str {
        match self {
            Projection::LambertAzimuthalEqualArea { .. } => "laea",
            Projection::PlateCarree { .. } => "platecarree",
        }
    }

    /// Parse a projection description.
    ///
    /// Accepted forms: `laea`, `laea:<lon>,<lat>`, `platecarree`,
    /// `platecarree:<lon>`, and the presets `eurocentric`, `americas`, `pacific`.
    /// A bare `laea` is centred on (0, 0).
    pub fn parse_projection(s: &str) -> Result<Self> {
        let lower = s.trim().to_lowercase();
        let (kind, args) = match lower.split_once(':') {
            Some((kind, args)) => (kind, Some(args)),
            None => (lower.as_str(), None),
        };

        let parse_number = |value: &str| {
            value
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| GeogofError::InvalidParameter {
                    param: "projection".to_string(),
                    message: format!("Invalid number in projection {}: {}", s, value),
                })
        };

        match (kind, args) {
            ("laea", None) => Ok(Projection::LambertAzimuthalEqualArea {
                central_longitude: 0.0,
                central_latitude: 0.0,
            }),
            ("laea", Some(args)) => {
                let (lon, lat) = args.split_once(',').ok_or_else(|| GeogofError::InvalidParameter {
                    param: "projection".to_string(),
                    message: format!("Expected laea:<lon>,<lat>, got {}", s),
                })?;
                Ok(Projection::laea_centered_on(Point::new(
                    parse_number(lon)?,
                    parse_number(lat)?,
                )))
            }
            ("platecarree", None) | ("eurocentric", None) => Ok(Projection::PlateCarree {
                central_longitude: 0.0,
            }),
            ("platecarree", Some(lon)) => Ok(Projection::PlateCarree {
                central_longitude: parse_number(lon)?,
            }),
            ("americas", None) => Ok(Projection::PlateCarree {
                central_longitude: -90.0,
            }),
            ("pacific", None) => Ok(Projection::PlateCarree {
                central_longitude: 180.0,
            }),
            _ => Err(GeogofError::Projection {
                message: format!("Unknown map projection: {}", s),
            }),
        }
    }
}

impl FromStr for Projection {
    type Err = GeogofError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Projection::parse_projection(s)
    }
}

/// Normalize a longitude value to the range [-180, 180)
pub fn normalize_longitude(lon: f64) -> f64 {
    let mut normalized = ((lon + 180.0) % 360.0 + 360.0) % 360.0 - 180.0;

    // 180.0 belongs to the other end of the range
    if normalized == 180.0 {
        normalized = -180.0;
    }

    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_normalize_longitude() {
        assert_eq!(normalize_longitude(0.0), 0.0);
        assert_eq!(normalize_longitude(180.0), -180.0);
        assert_eq!(normalize_longitude(-180.0), -180.0);
        assert_eq!(normalize_longitude(190.0), -170.0);
        assert_eq!(normalize_longitude(-190.0), 170.0);
        assert_eq!(normalize_longitude(370.0), 10.0);
    }

    #[test]
    fn test_laea_center_maps_to_origin() {
        let proj = Projection::laea_centered_on(Point::new(15.0, 45.0));
        let (x, y) = proj.project(15.0, 45.0).unwrap();
        assert!(x.abs() < EPS && y.abs() < EPS);
    }

    #[test]
    fn test_laea_orientation_and_antipode() {
        let proj = Projection::parse_projection("laea").unwrap();

        let (x, y) = proj.project(90.0, 0.0).unwrap();
        assert!((x - 2f64.sqrt()).abs() < EPS);
        assert!(y.abs() < EPS);

        let (x, y) = proj.project(0.0, 90.0).unwrap();
        assert!(x.abs() < EPS);
        assert!((y - 2f64.sqrt()).abs() < EPS);

        assert!(proj.project(180.0, 0.0).is_none());
        assert!(proj.project(f64::NAN, 0.0).is_none());
    }

    #[test]
    fn test_plate_carree_recenters() {
        let proj = Projection::parse_projection("pacific").unwrap();
        assert_eq!(proj.project(170.0, 10.0), Some((-10.0, 10.0)));
        assert_eq!(proj.project(-170.0, 10.0), Some((10.0, 10.0)));
    }

    #[test]
    fn test_parse_projection() {
        assert_eq!(
            Projection::from_str("laea:10,50").unwrap(),
            Projection::LambertAzimuthalEqualArea {
                central_longitude: 10.0,
                central_latitude: 50.0
            }
        );
        assert_eq!(
            Projection::from_str("PlateCarree:-45").unwrap(),
            Projection::PlateCarree {
                central_longitude: -45.0
            }
        );
        assert_eq!(
            Projection::from_str("americas").unwrap(),
            Projection::PlateCarree {
                central_longitude: -90.0
            }
        );

        assert!(matches!(
            Projection::from_str("mercator"),
            Err(GeogofError::Projection { .. })
        ));
        assert!(Projection::from_str("laea:10").is_err());
        assert!(Projection::from_str("platecarree:abc").is_err());
    }
}
