use crate::error::{ChordError, Result};
use colored::Color;
use std::fmt::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorBlend {
    /// A later stroke overwrites the color of the cell.
    #[default]
    Overwrite,
    /// The first color assigned to a cell is kept.
    KeepFirst,
}

/// Dot raster backed by Unicode Braille cells (2x4 dots per character).
pub struct BrailleCanvas {
    pub width: usize,
    pub height: usize,
    pub blend_mode: ColorBlend,
    buffer: Vec<u8>,
    colors: Vec<Option<Color>>,
}

impl BrailleCanvas {
    /// Fails when the cell count or the dot grid does not fit in `usize`.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        let size = width
            .checked_mul(height)
            .filter(|_| width.checked_mul(2).is_some() && height.checked_mul(4).is_some())
            .ok_or_else(|| {
                ChordError::InvalidConfiguration(format!(
                    "canvas of {}x{} cells is too large",
                    width, height
                ))
            })?;
        Ok(Self {
            width,
            height,
            blend_mode: ColorBlend::Overwrite,
            buffer: vec![0u8; size],
            colors: vec![None; size],
        })
    }

    #[inline]
    pub fn pixel_width(&self) -> usize {
        self.width * 2
    }

    #[inline]
    pub fn pixel_height(&self) -> usize {
        self.height * 4
    }

    pub fn clear(&mut self) {
        self.buffer.fill(0);
        self.colors.fill(None);
    }

    // --- coordinates ---

    #[inline]
    fn idx(&self, col: usize, row: usize) -> usize {
        row * self.width + col
    }

    #[inline]
    fn get_mask(sub_x: usize, sub_y: usize) -> u8 {
        match (sub_x, sub_y) {
            (0, 0) => 0x01,
            (1, 0) => 0x08,
            (0, 1) => 0x02,
            (1, 1) => 0x10,
            (0, 2) => 0x04,
            (1, 2) => 0x20,
            (0, 3) => 0x40,
            (1, 3) => 0x80,
            _ => 0,
        }
    }

    #[inline]
    fn to_screen_y(&self, y: usize) -> usize {
        self.pixel_height().saturating_sub(1).saturating_sub(y)
    }

    fn set_pixel_impl(&mut self, px: usize, py: usize, color: Option<Color>) {
        if px >= self.pixel_width() || py >= self.pixel_height() {
            return;
        }

        let index = self.idx(px / 2, py / 4);
        self.buffer[index] |= Self::get_mask(px % 2, py % 4);

        if let Some(c) = color {
            match self.blend_mode {
                ColorBlend::Overwrite => self.colors[index] = Some(c),
                ColorBlend::KeepFirst => {
                    if self.colors[index].is_none() {
                        self.colors[index] = Some(c);
                    }
                }
            }
        }
    }

    /// Sets a dot in cartesian coordinates (origin bottom-left, y up).
    pub fn set_pixel(&mut self, x: usize, y: usize, color: Option<Color>) {
        let screen_y = self.to_screen_y(y);
        self.set_pixel_impl(x, screen_y, color);
    }

    /// Whether the dot at cartesian `(x, y)` is lit.
    pub fn is_set(&self, x: usize, y: usize) -> bool {
        if x >= self.pixel_width() || y >= self.pixel_height() {
            return false;
        }
        let sy = self.to_screen_y(y);
        self.buffer[self.idx(x / 2, sy / 4)] & Self::get_mask(x % 2, sy % 4) != 0
    }

    /// Color of the cell holding the cartesian dot `(x, y)`.
    pub fn color_at(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.pixel_width() || y >= self.pixel_height() {
            return None;
        }
        let sy = self.to_screen_y(y);
        self.colors[self.idx(x / 2, sy / 4)]
    }

    /// Number of lit dots on the whole raster.
    pub fn lit_count(&self) -> usize {
        self.buffer.iter().map(|m| m.count_ones() as usize).sum()
    }

    // --- clipped primitives (Cohen-Sutherland) ---

    fn compute_outcode(&self, x: isize, y: isize) -> u8 {
        let mut code = 0;
        let w = self.pixel_width() as isize;
        let h = self.pixel_height() as isize;

        if x < 0 {
            code |= 1;
        } else if x >= w {
            code |= 2;
        }
        if y < 0 {
            code |= 4;
        } else if y >= h {
            code |= 8;
        }
        code
    }

    fn bresenham(
        &mut self,
        mut x0: isize,
        mut y0: isize,
        mut x1: isize,
        mut y1: isize,
        color: Option<Color>,
    ) {
        let w = self.pixel_width() as isize;
        let h = self.pixel_height() as isize;

        let mut outcode0 = self.compute_outcode(x0, y0);
        let mut outcode1 = self.compute_outcode(x1, y1);
        let mut accept = false;

        loop {
            if (outcode0 | outcode1) == 0 {
                accept = true;
                break;
            } else if (outcode0 & outcode1) != 0 {
                break;
            } else {
                let outcode_out = if outcode0 != 0 { outcode0 } else { outcode1 };
                let mut x = 0;
                let mut y = 0;

                if outcode_out & 8 != 0 {
                    x = x0 + (x1 - x0) * (h - 1 - y0) / (y1 - y0);
                    y = h - 1;
                } else if outcode_out & 4 != 0 {
                    x = x0 + (x1 - x0) * (0 - y0) / (y1 - y0);
                    y = 0;
                } else if outcode_out & 2 != 0 {
                    y = y0 + (y1 - y0) * (w - 1 - x0) / (x1 - x0);
                    x = w - 1;
                } else if outcode_out & 1 != 0 {
                    y = y0 + (y1 - y0) * (0 - x0) / (x1 - x0);
                    x = 0;
                }

                if outcode_out == outcode0 {
                    x0 = x;
                    y0 = y;
                    outcode0 = self.compute_outcode(x0, y0);
                } else {
                    x1 = x;
                    y1 = y;
                    outcode1 = self.compute_outcode(x1, y1);
                }
            }
        }

        if !accept {
            return;
        }

        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        let mut x = x0;
        let mut y = y0;

        loop {
            self.set_pixel(x as usize, y as usize, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    pub fn line(&mut self, x0: isize, y0: isize, x1: isize, y1: isize, color: Option<Color>) {
        self.bresenham(x0, y0, x1, y1, color);
    }

    /// Upper bound on the length of any straight run across the raster, in dots.
    pub fn diagonal(&self) -> usize {
        self.pixel_width() + self.pixel_height()
    }

    /// A line `width` dots wide, built from parallel copies shifted along
    /// the minor axis. Widths beyond the raster diagonal are clamped to it.
    pub fn thick_line(
        &mut self,
        x0: isize,
        y0: isize,
        x1: isize,
        y1: isize,
        width: usize,
        color: Option<Color>,
    ) {
        let width = width.clamp(1, self.diagonal().max(1)) as isize;
        let steep = (y1 - y0).abs() > (x1 - x0).abs();
        let lo = -(width - 1) / 2;
        for off in lo..lo + width {
            if steep {
                self.bresenham(x0 + off, y0, x1 + off, y1, color);
            } else {
                self.bresenham(x0, y0 + off, x1, y1 + off, color);
            }
        }
    }

    /// Midpoint circle outline.
    pub fn circle(&mut self, xc: isize, yc: isize, r: isize, color: Option<Color>) {
        let mut x = 0;
        let mut y = r;
        let mut d = 3 - 2 * r;

        let mut draw_octants = |cx: isize, cy: isize, x: isize, y: isize| {
            let points = [
                (cx + x, cy + y), (cx - x, cy + y), (cx + x, cy - y), (cx - x, cy - y),
                (cx + y, cy + x), (cx - y, cy + x), (cx + y, cy - x), (cx - y, cy - x),
            ];
            for (px, py) in points {
                if px >= 0 && py >= 0 {
                    self.set_pixel(px as usize, py as usize, color);
                }
            }
        };

        draw_octants(xc, yc, x, y);
        while y >= x {
            x += 1;
            if d > 0 {
                y -= 1;
                d = d + 4 * (x - y) + 10;
            } else {
                d = d + 4 * x + 6;
            }
            draw_octants(xc, yc, x, y);
        }
    }

    pub fn circle_filled(&mut self, xc: isize, yc: isize, r: isize, color: Option<Color>) {
        let mut x = 0;
        let mut y = r;
        let mut d = 3 - 2 * r;

        let mut draw_lines = |cx: isize, cy: isize, x: isize, y: isize| {
            self.line(cx - x, cy + y, cx + x, cy + y, color);
            self.line(cx - x, cy - y, cx + x, cy - y, color);
            self.line(cx - y, cy + x, cx + y, cy + x, color);
            self.line(cx - y, cy - x, cx + y, cy - x, color);
        };

        draw_lines(xc, yc, x, y);
        while y >= x {
            x += 1;
            if d > 0 {
                y -= 1;
                d = d + 4 * (x - y) + 10;
            } else {
                d = d + 4 * x + 6;
            }
            draw_lines(xc, yc, x, y);
        }
    }

    // --- rendering ---

    /// Writes the escape sequence directly instead of going through `colored` strings.
    fn write_ansi_color<W: Write>(w: &mut W, color: Color) -> fmt::Result {
        write!(w, "\x1b[{}m", color.to_fg_str())
    }

    pub fn render_to<W: Write>(&self, w: &mut W, show_border: bool) -> fmt::Result {
        if show_border {
            w.write_char('┌')?;
            for _ in 0..self.width {
                w.write_char('─')?;
            }
            w.write_char('┐')?;
            w.write_char('\n')?;
        }

        let mut last_color: Option<Color> = None;

        for row in 0..self.height {
            if show_border {
                w.write_char('│')?;
            }

            for col in 0..self.width {
                let idx = self.idx(col, row);
                let mask = self.buffer[idx];
                let glyph = std::char::from_u32(0x2800 + mask as u32).unwrap_or(' ');

                let current_color = self.colors[idx];
                if current_color != last_color {
                    match current_color {
                        Some(c) => Self::write_ansi_color(w, c)?,
                        None => w.write_str("\x1b[0m")?,
                    }
                    last_color = current_color;
                }

                w.write_char(glyph)?;
            }

            if last_color.is_some() {
                w.write_str("\x1b[0m")?;
                last_color = None;
            }

            if show_border {
                w.write_char('│')?;
            }
            w.write_char('\n')?;
        }

        if show_border {
            w.write_char('└')?;
            for _ in 0..self.width {
                w.write_char('─')?;
            }
            w.write_char('┘')?;
            w.write_char('\n')?;
        }

        Ok(())
    }

    /// ANSI-colored rendering into a fresh string.
    pub fn render_colored(&self, show_border: bool) -> String {
        let mut out = String::with_capacity(self.width * self.height * 2 + 100);
        // writing into a String cannot fail
        let _ = self.render_to(&mut out, show_border);
        out
    }

    pub fn render_no_color(&self, show_border: bool) -> String {
        let mut out = String::with_capacity(self.width * self.height + self.height);
        if show_border {
            out.push('┌');
            out.extend(std::iter::repeat('─').take(self.width));
            out.push_str("┐\n");
        }
        for row in 0..self.height {
            if show_border {
                out.push('│');
            }
            for col in 0..self.width {
                let mask = self.buffer[self.idx(col, row)];
                out.push(std::char::from_u32(0x2800 + mask as u32).unwrap_or(' '));
            }
            if show_border {
                out.push('│');
            }
            out.push('\n');
        }
        if show_border {
            out.push('└');
            out.extend(std::iter::repeat('─').take(self.width));
            out.push_str("┘\n");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dot_masks_follow_braille_layout() {
        let mut c = BrailleCanvas::new(1, 1).unwrap();
        // top-left dot in cartesian space is (0, 3)
        c.set_pixel(0, 3, None);
        assert_eq!(c.render_no_color(false), "\u{2801}\n");
        c.clear();
        c.set_pixel(1, 0, None);
        assert_eq!(c.render_no_color(false), "\u{2880}\n");
    }

    #[test]
    fn overflowing_size_is_rejected() {
        assert!(matches!(
            BrailleCanvas::new(usize::MAX / 2, usize::MAX / 4),
            Err(ChordError::InvalidConfiguration(_))
        ));
        assert!(BrailleCanvas::new(usize::MAX, 1).is_err());
    }

    #[test]
    fn huge_stroke_is_clamped_to_the_raster() {
        let mut c = BrailleCanvas::new(10, 5).unwrap();
        c.thick_line(0, 10, 19, 10, usize::MAX, None);
        assert_eq!(c.lit_count(), 20 * 20);
    }

    #[test]
    fn out_of_range_pixels_are_ignored() {
        let mut c = BrailleCanvas::new(2, 2).unwrap();
        c.set_pixel(100, 100, Some(Color::Red));
        assert_eq!(c.lit_count(), 0);
        assert!(!c.is_set(100, 100));
    }

    #[test]
    fn clipped_line_stays_on_raster() {
        let mut c = BrailleCanvas::new(10, 5).unwrap();
        c.line(-50, -50, 100, 100, Some(Color::Green));
        assert!(c.lit_count() > 0);
        assert!(c.is_set(0, 0));
        assert!(c.is_set(19, 19));
    }

    #[test]
    fn thick_line_widens_along_minor_axis() {
        let mut thin = BrailleCanvas::new(10, 5).unwrap();
        thin.thick_line(0, 10, 19, 10, 1, None);
        let mut thick = BrailleCanvas::new(10, 5).unwrap();
        thick.thick_line(0, 10, 19, 10, 3, None);
        assert_eq!(thin.lit_count(), 20);
        assert_eq!(thick.lit_count(), 60);
        assert!(thick.is_set(5, 9) && thick.is_set(5, 11));
    }

    #[test]
    fn blend_modes() {
        let mut c = BrailleCanvas::new(1, 1).unwrap();
        c.set_pixel(0, 0, Some(Color::Red));
        c.set_pixel(1, 1, Some(Color::Blue));
        assert_eq!(c.color_at(0, 0), Some(Color::Blue));

        let mut c = BrailleCanvas::new(1, 1).unwrap();
        c.blend_mode = ColorBlend::KeepFirst;
        c.set_pixel(0, 0, Some(Color::Red));
        c.set_pixel(1, 1, Some(Color::Blue));
        assert_eq!(c.color_at(0, 0), Some(Color::Red));
    }

    #[test]
    fn circle_is_symmetric() {
        let mut c = BrailleCanvas::new(20, 10).unwrap();
        c.circle(19, 19, 10, None);
        assert!(c.is_set(29, 19));
        assert!(c.is_set(9, 19));
        assert!(c.is_set(19, 29));
        assert!(c.is_set(19, 9));
        assert!(!c.is_set(19, 19));
    }

    #[test]
    fn render_emits_truecolor_and_reset() {
        let mut c = BrailleCanvas::new(2, 1).unwrap();
        c.set_pixel(0, 0, Some(Color::TrueColor { r: 1, g: 2, b: 3 }));
        let s = c.render_colored(false);
        assert!(s.starts_with("\x1b[38;2;1;2;3m"));
        assert!(s.contains("\x1b[0m"));
    }

    #[test]
    fn border_wraps_every_row() {
        let c = BrailleCanvas::new(3, 2).unwrap();
        let s = c.render_no_color(true);
        let lines: Vec<&str> = s.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "┌───┐");
        assert!(lines[1].starts_with('│') && lines[1].ends_with('│'));
    }
}
