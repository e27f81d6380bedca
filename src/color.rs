//! Colors, color parsing and sampled gradients.
//!
//! User colors arrive as [`ColorSpec`] values (names, hex strings, grey
//! levels or float tuples) and are resolved into [`Rgba`]. A [`Gradient`]
//! is a fixed-length lookup table interpolated between anchor colors.

use crate::error::{ChordError, Result};
use colored::Color;

/// A color with channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: f64, g: f64, b: f64) -> Self {
        Self::new(r, g, b, 1.0)
    }

    pub fn from_u8(r: u8, g: u8, b: u8) -> Self {
        Self::opaque(r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0)
    }

    /// Linear interpolation, `t = 0` gives `self`, `t = 1` gives `other`.
    pub fn lerp(self, other: Rgba, t: f64) -> Rgba {
        Rgba {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }

    /// 8-bit channels, alpha dropped.
    pub fn to_rgb8(self) -> (u8, u8, u8) {
        let q = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        (q(self.r), q(self.g), q(self.b))
    }

    /// Terminal foreground color. Terminals have no alpha, so it is ignored.
    pub fn to_terminal(self) -> Color {
        let (r, g, b) = self.to_rgb8();
        Color::TrueColor { r, g, b }
    }

    fn checked(channels: &[f64]) -> Result<Rgba> {
        if channels.iter().any(|c| !c.is_finite() || !(0.0..=1.0).contains(c)) {
            return Err(ChordError::InvalidColorSpec(format!(
                "channels must lie in [0, 1], got {:?}",
                channels
            )));
        }
        Ok(match *channels {
            [r, g, b] => Rgba::opaque(r, g, b),
            [r, g, b, a] => Rgba::new(r, g, b, a),
            _ => {
                return Err(ChordError::InvalidColorSpec(format!(
                    "expected 3 or 4 channels, got {}",
                    channels.len()
                )))
            }
        })
    }
}

/// An unresolved user color.
#[derive(Debug, Clone, PartialEq)]
pub enum ColorSpec {
    /// Name, `#hex` string or grey level such as `"0.5"`.
    Named(String),
    Rgb(f64, f64, f64),
    Rgba(f64, f64, f64, f64),
}

impl From<&str> for ColorSpec {
    fn from(s: &str) -> Self {
        ColorSpec::Named(s.to_string())
    }
}

impl From<String> for ColorSpec {
    fn from(s: String) -> Self {
        ColorSpec::Named(s)
    }
}

impl From<(f64, f64, f64)> for ColorSpec {
    fn from((r, g, b): (f64, f64, f64)) -> Self {
        ColorSpec::Rgb(r, g, b)
    }
}

impl From<(f64, f64, f64, f64)> for ColorSpec {
    fn from((r, g, b, a): (f64, f64, f64, f64)) -> Self {
        ColorSpec::Rgba(r, g, b, a)
    }
}

impl From<Rgba> for ColorSpec {
    fn from(c: Rgba) -> Self {
        ColorSpec::Rgba(c.r, c.g, c.b, c.a)
    }
}

impl ColorSpec {
    pub fn resolve(&self) -> Result<Rgba> {
        match self {
            ColorSpec::Named(name) => parse_color(name),
            ColorSpec::Rgb(r, g, b) => Rgba::checked(&[*r, *g, *b]),
            ColorSpec::Rgba(r, g, b, a) => Rgba::checked(&[*r, *g, *b, *a]),
        }
    }
}

// Single-letter shorthands plus the CSS names people actually reach for.
const NAMED_COLORS: &[(&str, (u8, u8, u8))] = &[
    ("b", (0, 0, 255)),
    ("g", (0, 128, 0)),
    ("r", (255, 0, 0)),
    ("c", (0, 191, 191)),
    ("m", (191, 0, 191)),
    ("y", (191, 191, 0)),
    ("k", (0, 0, 0)),
    ("w", (255, 255, 255)),
    ("black", (0, 0, 0)),
    ("white", (255, 255, 255)),
    ("red", (255, 0, 0)),
    ("green", (0, 128, 0)),
    ("lime", (0, 255, 0)),
    ("blue", (0, 0, 255)),
    ("yellow", (255, 255, 0)),
    ("cyan", (0, 255, 255)),
    ("aqua", (0, 255, 255)),
    ("magenta", (255, 0, 255)),
    ("fuchsia", (255, 0, 255)),
    ("gray", (128, 128, 128)),
    ("grey", (128, 128, 128)),
    ("silver", (192, 192, 192)),
    ("maroon", (128, 0, 0)),
    ("olive", (128, 128, 0)),
    ("navy", (0, 0, 128)),
    ("teal", (0, 128, 128)),
    ("purple", (128, 0, 128)),
    ("orange", (255, 165, 0)),
    ("gold", (255, 215, 0)),
    ("pink", (255, 192, 203)),
    ("brown", (165, 42, 42)),
    ("coral", (255, 127, 80)),
    ("salmon", (250, 128, 114)),
    ("crimson", (220, 20, 60)),
    ("violet", (238, 130, 238)),
    ("indigo", (75, 0, 130)),
    ("turquoise", (64, 224, 208)),
    ("skyblue", (135, 206, 235)),
    ("darkgreen", (0, 100, 0)),
    ("darkblue", (0, 0, 139)),
    ("darkred", (139, 0, 0)),
    ("lightgray", (211, 211, 211)),
    ("lightgrey", (211, 211, 211)),
    ("darkgray", (169, 169, 169)),
    ("darkgrey", (169, 169, 169)),
];

/// Parses a color name, a `#rgb` / `#rrggbb` / `#rrggbbaa` hex string or a
/// grey level between `"0"` and `"1"`. Names are case insensitive.
pub fn parse_color(input: &str) -> Result<Rgba> {
    let s = input.trim().to_ascii_lowercase();

    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex).ok_or_else(|| {
            ChordError::InvalidColorSpec(format!("malformed hex color '{}'", input))
        });
    }

    if let Some(&(_, (r, g, b))) = NAMED_COLORS.iter().find(|(name, _)| *name == s) {
        return Ok(Rgba::from_u8(r, g, b));
    }

    if let Ok(level) = s.parse::<f64>() {
        if (0.0..=1.0).contains(&level) {
            return Ok(Rgba::opaque(level, level, level));
        }
        return Err(ChordError::InvalidColorSpec(format!(
            "grey level '{}' outside [0, 1]",
            input
        )));
    }

    Err(ChordError::InvalidColorSpec(format!(
        "unknown color '{}'",
        input
    )))
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);

    match hex.len() {
        3 => Some(Rgba::from_u8(nibble(0)?, nibble(1)?, nibble(2)?)),
        6 => Some(Rgba::from_u8(byte(0)?, byte(2)?, byte(4)?)),
        8 => {
            let mut c = Rgba::from_u8(byte(0)?, byte(2)?, byte(4)?);
            c.a = byte(6)? as f64 / 255.0;
            Some(c)
        }
        _ => None,
    }
}

/// Maps a position in `[0, 1]` along a curve to a color.
pub trait ColorMap {
    fn color_at(&self, x: f64) -> Rgba;
}

/// A discretely sampled gradient across evenly spaced anchor colors.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    samples: Vec<Rgba>,
}

impl Gradient {
    /// Builds `steps` samples spread over the anchors. Sample `i` sits at
    /// `i / (steps - 1)`, anchors sit at `j / (anchors - 1)`.
    pub fn from_anchors<I, C>(anchors: I, steps: usize) -> Result<Self>
    where
        I: IntoIterator<Item = C>,
        C: Into<ColorSpec>,
    {
        let anchors = anchors
            .into_iter()
            .map(|c| Into::<ColorSpec>::into(c).resolve())
            .collect::<Result<Vec<_>>>()?;

        if anchors.len() < 2 {
            return Err(ChordError::InvalidColorSpec(format!(
                "a gradient needs at least 2 colors, got {}",
                anchors.len()
            )));
        }
        if steps < 2 {
            return Err(ChordError::InvalidConfiguration(format!(
                "a gradient needs at least 2 steps, got {}",
                steps
            )));
        }

        let spans = (anchors.len() - 1) as f64;
        let samples = (0..steps)
            .map(|i| {
                let x = i as f64 / (steps - 1) as f64 * spans;
                let seg = (x.floor() as usize).min(anchors.len() - 2);
                anchors[seg].lerp(anchors[seg + 1], x - seg as f64)
            })
            .collect();

        Ok(Self { samples })
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[Rgba] {
        &self.samples
    }

    pub fn first(&self) -> Rgba {
        self.samples[0]
    }

    pub fn last(&self) -> Rgba {
        self.samples[self.samples.len() - 1]
    }
}

impl ColorMap for Gradient {
    fn color_at(&self, x: f64) -> Rgba {
        let x = if x.is_finite() { x.clamp(0.0, 1.0) } else { 0.0 };
        let idx = (x * (self.samples.len() - 1) as f64).round() as usize;
        self.samples[idx.min(self.samples.len() - 1)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Rgba, b: Rgba) -> bool {
        (a.r - b.r).abs() < 1e-9
            && (a.g - b.g).abs() < 1e-9
            && (a.b - b.b).abs() < 1e-9
            && (a.a - b.a).abs() < 1e-9
    }

    #[test]
    fn named_colors_are_case_insensitive() {
        assert_eq!(parse_color("Red").unwrap(), Rgba::opaque(1.0, 0.0, 0.0));
        assert_eq!(parse_color(" GOLD ").unwrap(), Rgba::from_u8(255, 215, 0));
    }

    #[test]
    fn hex_forms() {
        assert_eq!(parse_color("#ff0000").unwrap(), Rgba::opaque(1.0, 0.0, 0.0));
        assert_eq!(parse_color("#0f0").unwrap(), Rgba::opaque(0.0, 1.0, 0.0));
        let c = parse_color("#0000ff80").unwrap();
        assert!((c.a - 128.0 / 255.0).abs() < 1e-12);
        assert!(parse_color("#12345").is_err());
        assert!(parse_color("#gggggg").is_err());
    }

    #[test]
    fn grey_levels() {
        assert_eq!(parse_color("0.5").unwrap(), Rgba::opaque(0.5, 0.5, 0.5));
        assert!(parse_color("1.5").is_err());
    }

    #[test]
    fn unknown_name_is_rejected() {
        assert!(matches!(
            parse_color("blurple"),
            Err(ChordError::InvalidColorSpec(_))
        ));
    }

    #[test]
    fn tuple_channels_must_be_in_unit_range() {
        assert!(ColorSpec::from((0.2, 0.4, 0.6)).resolve().is_ok());
        assert!(ColorSpec::from((0.2, 1.4, 0.6)).resolve().is_err());
        assert!(ColorSpec::from((0.2, 0.4, 0.6, f64::NAN)).resolve().is_err());
    }

    #[test]
    fn gradient_endpoints_match_anchors() {
        let g = Gradient::from_anchors(["red", "blue"], 100).unwrap();
        assert_eq!(g.len(), 100);
        assert!(close(g.first(), Rgba::opaque(1.0, 0.0, 0.0)));
        assert!(close(g.last(), Rgba::opaque(0.0, 0.0, 1.0)));
    }

    #[test]
    fn gradient_passes_through_middle_anchor() {
        let g = Gradient::from_anchors(["red", "lime", "blue"], 5).unwrap();
        assert!(close(g.samples()[2], Rgba::opaque(0.0, 1.0, 0.0)));
        assert!(close(g.samples()[1], Rgba::opaque(0.5, 0.5, 0.0)));
    }

    #[test]
    fn gradient_needs_two_colors() {
        assert!(matches!(
            Gradient::from_anchors(["red"], 10),
            Err(ChordError::InvalidColorSpec(_))
        ));
        assert!(matches!(
            Gradient::from_anchors(Vec::<ColorSpec>::new(), 10),
            Err(ChordError::InvalidColorSpec(_))
        ));
    }

    #[test]
    fn color_at_clamps() {
        let g = Gradient::from_anchors(["black", "white"], 11).unwrap();
        assert_eq!(g.color_at(-3.0), g.first());
        assert_eq!(g.color_at(7.0), g.last());
        assert!(close(g.color_at(0.5), Rgba::opaque(0.5, 0.5, 0.5)));
    }

    #[test]
    fn terminal_color_is_truecolor() {
        assert_eq!(
            Rgba::opaque(1.0, 0.5, 0.0).to_terminal(),
            Color::TrueColor { r: 255, g: 128, b: 0 }
        );
    }
}
