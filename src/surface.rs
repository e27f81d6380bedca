//! The drawing surface: an ordered list of artifacts over fixed view limits,
//! rasterised on demand into a [`BrailleCanvas`].

use crate::canvas::{BrailleCanvas, ColorBlend};
use crate::color::Rgba;
use crate::error::Result;
use glam::DVec2;
use log::trace;
use std::fmt;
use std::path::Path;

/// Unfilled circle centred at the origin.
#[derive(Debug, Clone, PartialEq)]
pub struct CircleOutline {
    pub radius: f64,
    pub color: Rgba,
}

/// A sampled chord curve with one color per segment.
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    pub start_angle: f64,
    pub end_angle: f64,
    pub line_width: f64,
    points: Vec<DVec2>,
    colors: Vec<Rgba>,
}

impl Curve {
    pub(crate) fn new(
        start_angle: f64,
        end_angle: f64,
        line_width: f64,
        points: Vec<DVec2>,
        colors: Vec<Rgba>,
    ) -> Self {
        debug_assert_eq!(points.len(), colors.len() + 1);
        Self {
            start_angle,
            end_angle,
            line_width,
            points,
            colors,
        }
    }

    pub fn points(&self) -> &[DVec2] {
        &self.points
    }

    pub fn segment_colors(&self) -> &[Rgba] {
        &self.colors
    }

    /// Consecutive `(from, to, color)` triples along the curve.
    pub fn segments(&self) -> impl Iterator<Item = (DVec2, DVec2, Rgba)> + '_ {
        self.points
            .windows(2)
            .zip(&self.colors)
            .map(|(w, &c)| (w[0], w[1], c))
    }
}

/// The two endpoint markers of a curve.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerPair {
    pub points: [DVec2; 2],
    pub colors: [Rgba; 2],
}

#[derive(Debug, Clone, PartialEq)]
pub enum Artifact {
    Outline(CircleOutline),
    Curve(Curve),
    Markers(MarkerPair),
}

impl Artifact {
    /// Curves and markers are path-like; the outline is static decoration.
    pub fn is_path_like(&self) -> bool {
        matches!(self, Artifact::Curve(_) | Artifact::Markers(_))
    }
}

/// World-space view rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewLimits {
    pub x: (f64, f64),
    pub y: (f64, f64),
}

impl ViewLimits {
    /// `[-extent, extent]` on both axes.
    pub fn symmetric(extent: f64) -> Self {
        Self {
            x: (-extent, extent),
            y: (-extent, extent),
        }
    }
}

pub struct Surface {
    width: usize,
    height: usize,
    limits: ViewLimits,
    axis_visible: bool,
    blend: ColorBlend,
    marker_radius: usize,
    artifacts: Vec<Artifact>,
}

impl Surface {
    pub(crate) fn new(width: usize, height: usize, blend: ColorBlend, marker_radius: usize) -> Self {
        Self {
            width,
            height,
            limits: ViewLimits::symmetric(1.0),
            axis_visible: true,
            blend,
            marker_radius,
            artifacts: Vec::new(),
        }
    }

    /// Width in terminal cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in terminal rows.
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn limits(&self) -> ViewLimits {
        self.limits
    }

    pub(crate) fn set_limits(&mut self, limits: ViewLimits) {
        self.limits = limits;
    }

    pub fn axis_visible(&self) -> bool {
        self.axis_visible
    }

    /// Frames the plot when visible.
    pub fn set_axis_visible(&mut self, visible: bool) {
        self.axis_visible = visible;
    }

    pub fn artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }

    pub fn curves(&self) -> impl Iterator<Item = &Curve> {
        self.artifacts.iter().filter_map(|a| match a {
            Artifact::Curve(c) => Some(c),
            _ => None,
        })
    }

    pub fn has_outline(&self) -> bool {
        self.artifacts.iter().any(|a| matches!(a, Artifact::Outline(_)))
    }

    pub(crate) fn push(&mut self, artifact: Artifact) {
        self.artifacts.push(artifact);
    }

    /// Drops every path-like artifact and returns how many went.
    pub(crate) fn remove_path_like(&mut self) -> usize {
        let before = self.artifacts.len();
        self.artifacts.retain(|a| !a.is_path_like());
        before - self.artifacts.len()
    }

    fn scale(&self) -> f64 {
        let pw = (self.width * 2) as f64 - 1.0;
        let ph = (self.height * 4) as f64 - 1.0;
        let sx = pw / (self.limits.x.1 - self.limits.x.0);
        let sy = ph / (self.limits.y.1 - self.limits.y.0);
        sx.min(sy)
    }

    /// Maps a world point to a cartesian dot. One scale for both axes keeps
    /// circles round; the view centre lands on the raster centre.
    pub fn to_pixel(&self, p: DVec2) -> (isize, isize) {
        let scale = self.scale();
        let cx = (self.limits.x.0 + self.limits.x.1) / 2.0;
        let cy = (self.limits.y.0 + self.limits.y.1) / 2.0;
        let px = ((self.width * 2) as f64 - 1.0) / 2.0 + (p.x - cx) * scale;
        let py = ((self.height * 4) as f64 - 1.0) / 2.0 + (p.y - cy) * scale;
        (px.round() as isize, py.round() as isize)
    }

    pub fn rasterize(&self) -> Result<BrailleCanvas> {
        let mut canvas = BrailleCanvas::new(self.width, self.height)?;
        canvas.blend_mode = self.blend;
        let scale = self.scale();
        // f64 -> usize casts saturate, so clamp before casting
        let max_stroke = canvas.diagonal() as f64;
        let marker_radius = self.marker_radius.min(canvas.diagonal()) as isize;

        for artifact in &self.artifacts {
            match artifact {
                Artifact::Outline(o) => {
                    let (cx, cy) = self.to_pixel(DVec2::ZERO);
                    let r = (o.radius * scale).round() as isize;
                    canvas.circle(cx, cy, r, Some(o.color.to_terminal()));
                }
                Artifact::Curve(c) => {
                    let width = c.line_width.round().clamp(1.0, max_stroke) as usize;
                    for (from, to, color) in c.segments() {
                        let (x0, y0) = self.to_pixel(from);
                        let (x1, y1) = self.to_pixel(to);
                        canvas.thick_line(x0, y0, x1, y1, width, Some(color.to_terminal()));
                    }
                }
                Artifact::Markers(m) => {
                    for (p, color) in m.points.iter().zip(m.colors) {
                        let (x, y) = self.to_pixel(*p);
                        canvas.circle_filled(x, y, marker_radius, Some(color.to_terminal()));
                    }
                }
            }
        }

        trace!(
            "rasterised {} artifacts into {}x{} cells, {} dots lit",
            self.artifacts.len(),
            self.width,
            self.height,
            canvas.lit_count()
        );
        Ok(canvas)
    }

    pub fn render_to<W: fmt::Write>(&self, w: &mut W) -> Result<()> {
        self.rasterize()?.render_to(w, self.axis_visible)?;
        Ok(())
    }

    /// ANSI-colored rendering.
    pub fn render(&self) -> Result<String> {
        Ok(self.rasterize()?.render_colored(self.axis_visible))
    }

    /// Rendering without escape codes.
    pub fn render_plain(&self) -> Result<String> {
        Ok(self.rasterize()?.render_no_color(self.axis_visible))
    }

    /// Writes the rendering to `path`, with ANSI colors when `colored`.
    pub fn save<P: AsRef<Path>>(&self, path: P, colored: bool) -> Result<()> {
        let text = if colored { self.render()? } else { self.render_plain()? };
        std::fs::write(path, text)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface(width: usize) -> Surface {
        let mut s = Surface::new(width, width / 2, ColorBlend::Overwrite, 1);
        s.set_limits(ViewLimits::symmetric(1.1));
        s
    }

    #[test]
    fn origin_maps_to_centre() {
        let s = surface(40);
        let (x, y) = s.to_pixel(DVec2::ZERO);
        assert!((x - 40).abs() <= 1 && (y - 40).abs() <= 1);
    }

    #[test]
    fn limits_map_to_edges() {
        let s = surface(40);
        assert_eq!(s.to_pixel(DVec2::new(-1.1, -1.1)), (0, 0));
        assert_eq!(s.to_pixel(DVec2::new(1.1, 1.1)), (79, 79));
    }

    #[test]
    fn remove_path_like_keeps_outline() {
        let mut s = surface(20);
        s.push(Artifact::Outline(CircleOutline { radius: 1.0, color: Rgba::opaque(0.5, 0.5, 0.5) }));
        s.push(Artifact::Markers(MarkerPair {
            points: [DVec2::X, DVec2::NEG_X],
            colors: [Rgba::opaque(1.0, 0.0, 0.0); 2],
        }));
        assert_eq!(s.remove_path_like(), 1);
        assert!(s.has_outline());
        assert_eq!(s.remove_path_like(), 0);
    }

    #[test]
    fn empty_surface_renders_blank_cells() {
        let mut s = surface(4);
        s.set_axis_visible(false);
        assert_eq!(s.render_plain().unwrap(), "\u{2800}\u{2800}\u{2800}\u{2800}\n".repeat(2));
    }

    #[test]
    fn curve_segments_pair_points_with_colors() {
        let red = Rgba::opaque(1.0, 0.0, 0.0);
        let blue = Rgba::opaque(0.0, 0.0, 1.0);
        let c = Curve::new(0.0, 1.0, 1.0, vec![DVec2::X, DVec2::ZERO, DVec2::Y], vec![red, blue]);
        let segs: Vec<_> = c.segments().collect();
        assert_eq!(segs, vec![(DVec2::X, DVec2::ZERO, red), (DVec2::ZERO, DVec2::Y, blue)]);
    }
}
