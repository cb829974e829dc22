//! Static map plot.
//!
//! Rendering happens in two layers on an RGBA canvas: an optional outline
//! (polygon edges) and the points, filled with one color per distinct
//! objective value. `GeoAxes` carries the projection and the lon/lat → pixel
//! transform; `PlotAxes` carries the canvas and the legend.

use image::{ImageBuffer, Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

use crate::colormaps::{get_colormap, CategoricalPalette, GradientColormap};
use crate::error::{GeogofError, Result};
use crate::geometry::GeoTable;
use crate::outline::Outline;
use crate::projection::Projection;

/// Fraction of the data span added on each side of the extent
const EXTENT_PADDING: f64 = 0.05;

/// Smallest extent span, as a fraction of the projection's full extent
const MIN_SPAN_FRACTION: f64 = 0.01;

/// Legend swatch size and spacing in pixels
const SWATCH_SIZE: u32 = 12;
const SWATCH_GAP: u32 = 4;

/// Rendering options for the static plot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotOptions {
    /// Image width in pixels
    #[serde(default = "default_width")]
    pub width: u32,

    /// Image height in pixels
    #[serde(default = "default_height")]
    pub height: u32,

    /// Point marker radius in pixels
    #[serde(default = "default_marker_radius")]
    pub marker_radius: u32,

    /// Colormap the categories are sampled from
    #[serde(default = "default_colormap")]
    pub colormap: String,

    /// Canvas background
    #[serde(default = "default_background")]
    pub background: [u8; 4],

    /// Outline edge color
    #[serde(default = "default_outline_color")]
    pub outline_color: [u8; 4],

    /// Whether to draw legend swatches
    #[serde(default = "default_legend")]
    pub legend: bool,
}

/// Largest accepted canvas side in pixels
pub const MAX_DIMENSION: u32 = 8192;

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            marker_radius: default_marker_radius(),
            colormap: default_colormap(),
            background: default_background(),
            outline_color: default_outline_color(),
            legend: default_legend(),
        }
    }
}

impl PlotOptions {
    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(GeogofError::InvalidParameter {
                param: "size".to_string(),
                message: format!(
                    "Image size must be positive, got {}x{}",
                    self.width, self.height
                ),
            });
        }

        if self.width > MAX_DIMENSION || self.height > MAX_DIMENSION {
            return Err(GeogofError::InvalidParameter {
                param: "size".to_string(),
                message: format!(
                    "Image size {}x{} exceeds the maximum of {} pixels per side",
                    self.width, self.height, MAX_DIMENSION
                ),
            });
        }

        if self.marker_radius == 0 {
            return Err(GeogofError::InvalidParameter {
                param: "marker_radius".to_string(),
                message: "Marker radius must be positive".to_string(),
            });
        }

        if self.marker_radius > MAX_DIMENSION {
            return Err(GeogofError::InvalidParameter {
                param: "marker_radius".to_string(),
                message: format!(
                    "Marker radius {} exceeds the maximum of {} pixels",
                    self.marker_radius, MAX_DIMENSION
                ),
            });
        }

        get_colormap(&self.colormap)?;
        Ok(())
    }
}

fn default_width() -> u32 {
    800
}

fn default_height() -> u32 {
    600
}

fn default_marker_radius() -> u32 {
    4
}

fn default_colormap() -> String {
    "viridis".to_string()
}

fn default_background() -> [u8; 4] {
    [255, 255, 255, 255]
}

fn default_outline_color() -> [u8; 4] {
    [64, 64, 64, 255]
}

fn default_legend() -> bool {
    true
}

/// Projected coordinate context of a plot
#[derive(Debug, Clone, PartialEq)]
pub struct GeoAxes {
    projection: Projection,
    extent: (f64, f64, f64, f64),
    width: u32,
    height: u32,
    scale: f64,
    offset_x: f64,
    offset_y: f64,
}

impl GeoAxes {
    /// Fit axes around the projected points and outline
    pub fn fit(
        projection: &Projection,
        gdf: &GeoTable,
        outline: Option<&Outline>,
        options: &PlotOptions,
    ) -> Result<Self> {
        options.validate()?;

        let mut projected: Vec<(f64, f64)> = gdf
            .finite_points()
            .filter_map(|p| projection.project(p.x(), p.y()))
            .collect();
        if let Some(outline) = outline {
            projected.extend(
                outline
                    .rings()
                    .flat_map(|ring| ring.coords())
                    .filter_map(|c| projection.project(c.x, c.y)),
            );
        }

        let full = projection.full_extent();
        let extent = if projected.is_empty() {
            full
        } else {
            let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
            let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
            for &(x, y) in &projected {
                min_x = min_x.min(x);
                min_y = min_y.min(y);
                max_x = max_x.max(x);
                max_y = max_y.max(y);
            }
            pad_extent(
                (min_x, min_y, max_x, max_y),
                (full.2 - full.0) * MIN_SPAN_FRACTION,
            )
        };

        Ok(Self::with_extent(*projection, extent, options.width, options.height))
    }

    /// Axes showing a fixed projected extent
    pub fn with_extent(
        projection: Projection,
        extent: (f64, f64, f64, f64),
        width: u32,
        height: u32,
    ) -> Self {
        let span_x = (extent.2 - extent.0).max(f64::EPSILON);
        let span_y = (extent.3 - extent.1).max(f64::EPSILON);
        let scale = (width as f64 / span_x).min(height as f64 / span_y);

        // centre the extent; the unused axis gets equal margins
        let offset_x = (width as f64 - span_x * scale) / 2.0;
        let offset_y = (height as f64 - span_y * scale) / 2.0;

        Self {
            projection,
            extent,
            width,
            height,
            scale,
            offset_x,
            offset_y,
        }
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Projected extent (min_x, min_y, max_x, max_y)
    pub fn extent(&self) -> (f64, f64, f64, f64) {
        self.extent
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel position of projected coordinates (north up)
    pub fn projected_to_pixel(&self, x: f64, y: f64) -> (f64, f64) {
        let px = self.offset_x + (x - self.extent.0) * self.scale;
        let py = self.height as f64 - (self.offset_y + (y - self.extent.1) * self.scale);
        (px, py)
    }

    /// Pixel position of a lon/lat pair, if it can be projected
    pub fn to_pixel(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        self.projection
            .project(lon, lat)
            .map(|(x, y)| self.projected_to_pixel(x, y))
    }
}

fn pad_extent(extent: (f64, f64, f64, f64), min_span: f64) -> (f64, f64, f64, f64) {
    let (mut min_x, mut min_y, mut max_x, mut max_y) = extent;

    for (lo, hi) in [(&mut min_x, &mut max_x), (&mut min_y, &mut max_y)] {
        let span = (*hi - *lo).max(min_span);
        let center = (*hi + *lo) / 2.0;
        let half = span * (0.5 + EXTENT_PADDING);
        *lo = center - half;
        *hi = center + half;
    }

    (min_x, min_y, max_x, max_y)
}

/// One legend entry per objective value category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub label: String,
    pub value: f64,
    pub color: [u8; 4],
}

/// Rendered plot surface
#[derive(Debug, Clone)]
pub struct PlotAxes {
    image: RgbaImage,
    legend: Vec<LegendEntry>,
    has_outline: bool,
    drawn_points: usize,
    skipped_points: usize,
}

impl PlotAxes {
    fn blank(width: u32, height: u32, background: [u8; 4]) -> Self {
        Self {
            image: ImageBuffer::from_pixel(width, height, Rgba(background)),
            legend: Vec::new(),
            has_outline: false,
            drawn_points: 0,
            skipped_points: 0,
        }
    }

    /// The rendered canvas
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Legend entries, ascending by value
    pub fn legend(&self) -> &[LegendEntry] {
        &self.legend
    }

    /// Whether an outline layer was drawn
    pub fn has_outline(&self) -> bool {
        self.has_outline
    }

    /// Points drawn on the canvas
    pub fn drawn_points(&self) -> usize {
        self.drawn_points
    }

    /// Points that could not be projected
    pub fn skipped_points(&self) -> usize {
        self.skipped_points
    }

    /// Encode the canvas as PNG
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        self.image
            .write_to(&mut buffer, image::ImageFormat::Png)
            .map_err(|e| GeogofError::ImageGeneration {
                message: format!("Failed to encode PNG: {}", e),
            })?;
        Ok(buffer.into_inner())
    }

    /// Write the canvas as a PNG file
    pub fn save(&self, path: &Path) -> Result<()> {
        let bytes = self.to_png()?;
        std::fs::write(path, bytes)?;
        debug!(path = %path.display(), "Saved plot");
        Ok(())
    }
}

/// Draw the outline's polygon edges onto a fresh canvas
pub fn polyplot(outline: &Outline, axes: &GeoAxes, options: &PlotOptions) -> PlotAxes {
    let mut plot = PlotAxes::blank(axes.width(), axes.height(), options.background);
    let (full_min_x, _, full_max_x, _) = axes.projection().full_extent();
    let max_jump = (full_max_x - full_min_x) / 2.0;

    for ring in outline.rings() {
        let projected: Vec<Option<(f64, f64)>> = ring
            .coords()
            .map(|c| axes.projection().project(c.x, c.y))
            .collect();

        for pair in projected.windows(2) {
            if let (Some(a), Some(b)) = (pair[0], pair[1]) {
                // segments that wrap around the map edge are not drawn
                if (a.0 - b.0).abs() > max_jump {
                    continue;
                }
                let (x0, y0) = axes.projected_to_pixel(a.0, a.1);
                let (x1, y1) = axes.projected_to_pixel(b.0, b.1);
                draw_line(&mut plot.image, (x0, y0), (x1, y1), options.outline_color);
            }
        }
    }

    plot.has_outline = true;
    plot
}

/// Draw every point, colored by its objective value category, onto `base`
/// (or a blank canvas when there is no base layer)
pub fn pointplot(
    gdf: &GeoTable,
    values: &[f64],
    axes: &GeoAxes,
    base: Option<PlotAxes>,
    options: &PlotOptions,
) -> PlotAxes {
    let mut plot =
        base.unwrap_or_else(|| PlotAxes::blank(axes.width(), axes.height(), options.background));

    // options were validated when the axes were fitted
    let cmap = get_colormap(&options.colormap).unwrap_or_else(|_| GradientColormap::viridis());
    let palette = CategoricalPalette::from_values(values, &cmap);

    for (point, &value) in gdf.geometry().iter().zip(values) {
        let color = palette.color_for(value);
        match (axes.to_pixel(point.x(), point.y()), color) {
            (Some(center), Some(color)) => {
                fill_circle(&mut plot.image, center, options.marker_radius, color);
                plot.drawn_points += 1;
            }
            _ => plot.skipped_points += 1,
        }
    }

    plot.legend = palette
        .categories()
        .iter()
        .map(|&(value, color)| LegendEntry {
            label: format!("{}", value),
            value,
            color,
        })
        .collect();

    if options.legend {
        draw_legend(&mut plot.image, &plot.legend);
    }

    plot
}

fn put_pixel_checked(image: &mut RgbaImage, x: i64, y: i64, color: [u8; 4]) {
    if x >= 0 && y >= 0 && (x as u32) < image.width() && (y as u32) < image.height() {
        image.put_pixel(x as u32, y as u32, Rgba(color));
    }
}

fn draw_line(image: &mut RgbaImage, from: (f64, f64), to: (f64, f64), color: [u8; 4]) {
    let (mut x0, mut y0) = (from.0.round() as i64, from.1.round() as i64);
    let (x1, y1) = (to.0.round() as i64, to.1.round() as i64);

    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        put_pixel_checked(image, x0, y0, color);
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

fn fill_circle(image: &mut RgbaImage, center: (f64, f64), radius: u32, color: [u8; 4]) {
    let (cx, cy) = (center.0.round() as i64, center.1.round() as i64);
    let r = radius as i64;
    let (width, height) = (image.width() as i64, image.height() as i64);

    // only the part of the bounding square that lies on the canvas
    let (y_min, y_max) = ((cy - r).max(0), (cy + r).min(height - 1));
    let (x_min, x_max) = ((cx - r).max(0), (cx + r).min(width - 1));
    for y in y_min..=y_max {
        for x in x_min..=x_max {
            let (dx, dy) = (x - cx, y - cy);
            if dx * dx + dy * dy <= r * r {
                image.put_pixel(x as u32, y as u32, Rgba(color));
            }
        }
    }
}

fn draw_legend(image: &mut RgbaImage, legend: &[LegendEntry]) {
    let step = SWATCH_SIZE + SWATCH_GAP;
    if image.width() < step || image.height() < step {
        return;
    }

    let x0 = image.width() - step;
    let fit = ((image.height() - SWATCH_GAP) / step) as usize;

    for (i, entry) in legend.iter().take(fit).enumerate() {
        let y0 = SWATCH_GAP + i as u32 * step;
        for y in y0..y0 + SWATCH_SIZE {
            for x in x0..x0 + SWATCH_SIZE {
                let edge = y == y0 || y == y0 + SWATCH_SIZE - 1 || x == x0 || x == x0 + SWATCH_SIZE - 1;
                let color = if edge { [0, 0, 0, 255] } else { entry.color };
                image.put_pixel(x, y, Rgba(color));
            }
        }
    }
}
