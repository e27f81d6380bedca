use crate::color::{ColorMap, ColorSpec, Gradient};
use crate::config::{validate_subdivisions, ChordConfig, VIEW_MARGIN};
use crate::error::{ChordError, Result};
use crate::geometry::{polar_to_cartesian, SamplingBasis};
use crate::surface::{Artifact, CircleOutline, Curve, MarkerPair, Surface, ViewLimits};
use crossterm::{
    cursor,
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use log::debug;
use std::io::{self, Write};

/// A chord diagram: a reference circle with gradient-colored curves between
/// points on its perimeter.
///
/// ```
/// use chordplot_rs::{ChordCanvas, ChordConfig};
/// use std::f64::consts::PI;
///
/// let mut chord = ChordCanvas::new(ChordConfig::default().with_surface_width(30))?;
/// let gradient = chord.make_gradient(["red", "blue"])?;
/// chord.add_curve(0.0, PI / 6.0, &gradient)?;
/// assert_eq!(chord.curve_count(), 1);
/// # Ok::<(), chordplot_rs::ChordError>(())
/// ```
pub struct ChordCanvas {
    config: ChordConfig,
    basis: SamplingBasis,
    surface: Surface,
}

impl ChordCanvas {
    pub fn new(config: ChordConfig) -> Result<Self> {
        config.validate()?;

        let mut surface = Surface::new(
            config.surface_width,
            config.surface_height(),
            config.blend,
            config.marker_radius,
        );
        surface.set_axis_visible(false);
        surface.set_limits(ViewLimits::symmetric((1.0 + VIEW_MARGIN) * config.radius));

        let mut chord = Self {
            basis: SamplingBasis::new(config.subdivisions),
            config,
            surface,
        };
        if chord.config.draw_outer_circle {
            chord.draw_circle();
        }

        debug!(
            "chord canvas: radius={} subdivisions={} surface={}x{}",
            chord.config.radius,
            chord.config.subdivisions,
            chord.surface.width(),
            chord.surface.height()
        );
        Ok(chord)
    }

    /// Unit radius, 2-dot strokes, outline on, 100 samples per curve.
    pub fn with_defaults() -> Result<Self> {
        Self::new(ChordConfig::default())
    }

    pub fn config(&self) -> &ChordConfig {
        &self.config
    }

    pub fn radius(&self) -> f64 {
        self.config.radius
    }

    pub fn line_width(&self) -> f64 {
        self.config.line_width
    }

    pub fn subdivisions(&self) -> usize {
        self.config.subdivisions
    }

    pub fn basis(&self) -> &SamplingBasis {
        &self.basis
    }

    /// Changes the sample count for curves added from now on.
    pub fn set_subdivisions(&mut self, subdivisions: usize) -> Result<()> {
        validate_subdivisions(subdivisions)?;
        self.config.subdivisions = subdivisions;
        self.basis = SamplingBasis::new(subdivisions);
        debug!("sampling basis recomputed for {} subdivisions", subdivisions);
        Ok(())
    }

    /// Adds the reference circle outline.
    pub fn draw_circle(&mut self) {
        self.surface.push(Artifact::Outline(CircleOutline {
            radius: self.config.radius,
            color: self.config.outline_color,
        }));
    }

    /// A gradient with one sample per subdivision across `colors`.
    pub fn make_gradient<I, C>(&self, colors: I) -> Result<Gradient>
    where
        I: IntoIterator<Item = C>,
        C: Into<ColorSpec>,
    {
        Gradient::from_anchors(colors, self.config.subdivisions)
    }

    /// Adds a curve between two perimeter angles (radians) plus markers on
    /// its ends. Nothing is added if either angle is not finite.
    pub fn add_curve<M: ColorMap + ?Sized>(
        &mut self,
        start_angle: f64,
        end_angle: f64,
        gradient: &M,
    ) -> Result<()> {
        if !start_angle.is_finite() || !end_angle.is_finite() {
            return Err(ChordError::InvalidAngle {
                start: start_angle,
                end: end_angle,
            });
        }

        let start = polar_to_cartesian(self.config.radius, start_angle);
        let end = polar_to_cartesian(self.config.radius, end_angle);
        let points = self.basis.sample(start, end);

        let segments = points.len() - 1;
        let last = segments.saturating_sub(1).max(1) as f64;
        let colors = (0..segments)
            .map(|k| gradient.color_at(k as f64 / last))
            .collect();

        self.surface.push(Artifact::Curve(Curve::new(
            start_angle,
            end_angle,
            self.config.line_width,
            points,
            colors,
        )));
        self.surface.push(Artifact::Markers(MarkerPair {
            points: [start, end],
            colors: [gradient.color_at(0.0), gradient.color_at(1.0)],
        }));

        debug!("curve added: {:.4} -> {:.4} rad", start_angle, end_angle);
        Ok(())
    }

    /// Removes every curve and marker; the outline and axis settings stay.
    pub fn remove_curves(&mut self) -> usize {
        let removed = self.surface.remove_path_like();
        if removed > 0 {
            debug!("removed {} curve artifacts", removed);
        }
        removed
    }

    pub fn curve_count(&self) -> usize {
        self.surface.curves().count()
    }

    pub fn get_surface(&self) -> &Surface {
        &self.surface
    }

    pub fn get_surface_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }

    /// Shows the diagram. On a terminal this takes over the screen until a
    /// key is pressed; otherwise the rendering is printed once.
    pub fn render(&self) -> Result<()> {
        let mut stdout = io::stdout().lock();
        if !stdout.is_tty() {
            stdout.write_all(self.surface.render_plain()?.as_bytes())?;
            stdout.flush()?;
            return Ok(());
        }

        let frame = self.surface.render()?;
        terminal::enable_raw_mode()?;
        let shown = Self::show_until_key(&mut stdout, &frame);
        let restored = execute!(stdout, cursor::Show, LeaveAlternateScreen);
        terminal::disable_raw_mode()?;
        shown?;
        restored?;
        Ok(())
    }

    fn show_until_key<W: Write>(out: &mut W, frame: &str) -> Result<()> {
        execute!(out, EnterAlternateScreen, cursor::Hide, cursor::MoveTo(0, 0))?;
        // raw mode does not translate newlines
        write!(out, "{}", frame.replace('\n', "\r\n"))?;
        out.flush()?;

        loop {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(());
                }
            }
        }
    }
}
