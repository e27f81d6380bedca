//! Canvas configuration.
//!
//! # Example
//!
//! ```
//! use chordplot_rs::ChordConfig;
//!
//! let config = ChordConfig::default()
//!     .with_radius(2.0)
//!     .with_subdivisions(64)
//!     .with_outer_circle(false);
//! assert!(config.validate().is_ok());
//! ```

use crate::canvas::ColorBlend;
use crate::color::Rgba;
use crate::error::{ChordError, Result};

/// Fraction of the radius left as margin around the circle on each side.
pub const VIEW_MARGIN: f64 = 0.1;

/// Widest accepted surface, in terminal cells.
pub const MAX_SURFACE_WIDTH: usize = 4096;

/// Settings for a [`ChordCanvas`](crate::ChordCanvas).
#[derive(Debug, Clone, PartialEq)]
pub struct ChordConfig {
    /// Radius of the reference circle in world units.
    pub radius: f64,

    /// Stroke width of curves, in Braille dots (rounded, at least 1).
    pub line_width: f64,

    /// Draw the circle outline at construction.
    pub draw_outer_circle: bool,

    /// Sample points per curve, at least 2.
    pub subdivisions: usize,

    /// Surface width in terminal cells. The height is half of it, rounded
    /// up, so the dot grid stays square.
    pub surface_width: usize,

    /// Radius of the endpoint markers in dots.
    pub marker_radius: usize,

    /// Which stroke owns a cell when two artifacts touch it.
    pub blend: ColorBlend,

    /// Stroke color of the circle outline.
    pub outline_color: Rgba,
}

impl Default for ChordConfig {
    fn default() -> Self {
        Self {
            radius: 1.0,
            line_width: 2.0,
            draw_outer_circle: true,
            subdivisions: 100,
            surface_width: 60,
            marker_radius: 1,
            blend: ColorBlend::Overwrite,
            outline_color: Rgba::opaque(0.5, 0.5, 0.5),
        }
    }
}

impl ChordConfig {
    #[must_use]
    pub const fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    #[must_use]
    pub const fn with_line_width(mut self, line_width: f64) -> Self {
        self.line_width = line_width;
        self
    }

    #[must_use]
    pub const fn with_outer_circle(mut self, draw: bool) -> Self {
        self.draw_outer_circle = draw;
        self
    }

    #[must_use]
    pub const fn with_subdivisions(mut self, subdivisions: usize) -> Self {
        self.subdivisions = subdivisions;
        self
    }

    #[must_use]
    pub const fn with_surface_width(mut self, cells: usize) -> Self {
        self.surface_width = cells;
        self
    }

    #[must_use]
    pub const fn with_marker_radius(mut self, dots: usize) -> Self {
        self.marker_radius = dots;
        self
    }

    #[must_use]
    pub const fn with_blend(mut self, blend: ColorBlend) -> Self {
        self.blend = blend;
        self
    }

    #[must_use]
    pub const fn with_outline_color(mut self, color: Rgba) -> Self {
        self.outline_color = color;
        self
    }

    /// Sizes the surface to the largest square that fits the current
    /// terminal, leaving room for the frame. Unchanged when stdout is not a
    /// terminal.
    #[must_use]
    pub fn fit_terminal(mut self) -> Self {
        if let Some((terminal_size::Width(cols), terminal_size::Height(rows))) =
            terminal_size::terminal_size()
        {
            let by_cols = (cols as usize).saturating_sub(2);
            let by_rows = (rows as usize).saturating_sub(3) * 2;
            let cells = by_cols.min(by_rows).min(MAX_SURFACE_WIDTH);
            if cells >= 2 {
                self.surface_width = cells;
            }
        }
        self
    }

    /// Surface height in terminal rows.
    pub fn surface_height(&self) -> usize {
        self.surface_width.div_ceil(2)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(ChordError::InvalidConfiguration(format!(
                "radius must be positive and finite, got {}",
                self.radius
            )));
        }
        if !self.line_width.is_finite() || self.line_width <= 0.0 {
            return Err(ChordError::InvalidConfiguration(format!(
                "line_width must be positive and finite, got {}",
                self.line_width
            )));
        }
        validate_subdivisions(self.subdivisions)?;
        if !(2..=MAX_SURFACE_WIDTH).contains(&self.surface_width) {
            return Err(ChordError::InvalidConfiguration(format!(
                "surface_width must be between 2 and {} cells, got {}",
                MAX_SURFACE_WIDTH, self.surface_width
            )));
        }
        // a marker wider than the surface in dots would cover all of it
        let max_marker = self.surface_width * 2;
        if self.marker_radius > max_marker {
            return Err(ChordError::InvalidConfiguration(format!(
                "marker_radius must be at most {} dots, got {}",
                max_marker, self.marker_radius
            )));
        }
        Ok(())
    }
}

pub(crate) fn validate_subdivisions(subdivisions: usize) -> Result<()> {
    if subdivisions < 2 {
        return Err(ChordError::InvalidConfiguration(format!(
            "subdivisions must be at least 2, got {}",
            subdivisions
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ChordConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.radius, 1.0);
        assert_eq!(config.line_width, 2.0);
        assert!(config.draw_outer_circle);
        assert_eq!(config.subdivisions, 100);
        assert_eq!(config.surface_height(), 30);
    }

    #[test]
    fn rejects_bad_radius() {
        for r in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = ChordConfig::default().with_radius(r).validate();
            assert!(matches!(err, Err(ChordError::InvalidConfiguration(_))), "{r}");
        }
    }

    #[test]
    fn rejects_bad_line_width() {
        assert!(ChordConfig::default().with_line_width(0.0).validate().is_err());
        assert!(ChordConfig::default().with_line_width(f64::NAN).validate().is_err());
    }

    #[test]
    fn rejects_too_few_subdivisions() {
        assert!(ChordConfig::default().with_subdivisions(1).validate().is_err());
        assert!(ChordConfig::default().with_subdivisions(0).validate().is_err());
        assert!(ChordConfig::default().with_subdivisions(2).validate().is_ok());
    }

    #[test]
    fn rejects_tiny_surface() {
        assert!(ChordConfig::default().with_surface_width(1).validate().is_err());
    }

    #[test]
    fn rejects_oversized_surface() {
        for width in [MAX_SURFACE_WIDTH + 1, usize::MAX / 2, usize::MAX] {
            let err = ChordConfig::default().with_surface_width(width).validate();
            assert!(matches!(err, Err(ChordError::InvalidConfiguration(_))), "{width}");
        }
        assert!(ChordConfig::default()
            .with_surface_width(MAX_SURFACE_WIDTH)
            .validate()
            .is_ok());
    }

    #[test]
    fn rejects_oversized_marker() {
        let config = ChordConfig::default().with_surface_width(10);
        assert!(config.clone().with_marker_radius(20).validate().is_ok());
        assert!(config.clone().with_marker_radius(21).validate().is_err());
        assert!(config.with_marker_radius(usize::MAX).validate().is_err());
    }

    #[test]
    fn odd_width_rounds_height_up() {
        assert_eq!(ChordConfig::default().with_surface_width(7).surface_height(), 4);
    }
}
