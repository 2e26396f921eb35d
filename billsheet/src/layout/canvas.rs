//! The drawing contract the layout engine renders through.
//!
//! Coordinates are page units (millimetres) on a 210 x 297 page with the
//! origin at the top-left corner; `y` grows downward and text `y` is the
//! baseline. Font sizes are in points.

use billsheet_pdf::{wrap_text, BuiltinFont, Color, FontMetrics, TextAlign};

use crate::error::RenderError;

pub const PAGE_WIDTH: f64 = 210.0;
pub const PAGE_HEIGHT: f64 = 297.0;
pub const MARGIN: f64 = 20.0;

/// Points per page unit.
pub const PT_PER_UNIT: f64 = 72.0 / 25.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontFace {
    #[default]
    Normal,
    Bold,
    Italic,
    BoldItalic,
}

impl FontFace {
    pub fn builtin(self) -> BuiltinFont {
        match self {
            FontFace::Normal => BuiltinFont::Helvetica,
            FontFace::Bold => BuiltinFont::HelveticaBold,
            FontFace::Italic => BuiltinFont::HelveticaOblique,
            FontFace::BoldItalic => BuiltinFont::HelveticaBoldOblique,
        }
    }

    pub fn from_builtin(font: BuiltinFont) -> Self {
        match font {
            BuiltinFont::Helvetica => FontFace::Normal,
            BuiltinFont::HelveticaBold => FontFace::Bold,
            BuiltinFont::HelveticaOblique => FontFace::Italic,
            BuiltinFont::HelveticaBoldOblique => FontFace::BoldItalic,
        }
    }
}

/// Width of `text` in page units.
pub fn text_width(text: &str, face: FontFace, size: f64) -> f64 {
    FontMetrics::measure_text(text, face.builtin(), size) / PT_PER_UNIT
}

/// Font, size, alignment and color of one piece of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    pub face: FontFace,
    pub size: f64,
    pub align: TextAlign,
    pub color: Color,
}

impl Style {
    pub fn new(face: FontFace, size: f64) -> Self {
        Style {
            face,
            size,
            align: TextAlign::Left,
            color: Color::BLACK,
        }
    }

    pub fn normal(size: f64) -> Self {
        Style::new(FontFace::Normal, size)
    }

    pub fn bold(size: f64) -> Self {
        Style::new(FontFace::Bold, size)
    }

    pub fn italic(size: f64) -> Self {
        Style::new(FontFace::Italic, size)
    }

    pub fn aligned(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    pub fn colored(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Baseline-to-baseline distance in page units.
    pub fn line_height(&self) -> f64 {
        FontMetrics::line_height(self.size) / PT_PER_UNIT
    }

    /// Distance from the top of a line box to its baseline.
    pub fn ascent(&self) -> f64 {
        self.size / PT_PER_UNIT
    }
}

/// One styled line of a composite cell.
#[derive(Debug, Clone, PartialEq)]
pub struct CellLine {
    pub text: String,
    pub style: Style,
}

impl CellLine {
    pub fn new(text: impl Into<String>, style: Style) -> Self {
        CellLine {
            text: text.into(),
            style,
        }
    }
}

/// Table cell content: plain wrapped text in the table's body style, or
/// stacked lines drawn by the table's [`CellPainter`].
#[derive(Debug, Clone, PartialEq)]
pub enum TableCell {
    Text { text: String, align: TextAlign },
    Composite(Vec<CellLine>),
}

impl TableCell {
    pub fn text(text: impl Into<String>, align: TextAlign) -> Self {
        TableCell::Text {
            text: text.into(),
            align,
        }
    }
}

/// A single-page table: geometry, header row, body rows and styling.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSpec {
    pub x: f64,
    pub top: f64,
    /// Lowest y a row may reach.
    pub bottom: f64,
    pub columns: Vec<f64>,
    pub head: Vec<TableCell>,
    pub rows: Vec<Vec<TableCell>>,
    pub font_size: f64,
    pub padding: f64,
    pub head_fill: Color,
    pub head_text: Color,
    pub border_color: Color,
    pub border_width: f64,
}

impl TableSpec {
    pub fn width(&self) -> f64 {
        self.columns.iter().sum()
    }
}

/// Where a composite cell sits on the page, in page units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellBox {
    pub x: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub padding: f64,
}

impl CellBox {
    pub fn inner_left(&self) -> f64 {
        self.x + self.padding
    }

    pub fn inner_right(&self) -> f64 {
        self.x + self.width - self.padding
    }

    pub fn inner_width(&self) -> f64 {
        (self.width - 2.0 * self.padding).max(0.0)
    }

    pub fn anchor_x(&self, align: TextAlign) -> f64 {
        match align {
            TextAlign::Left => self.inner_left(),
            TextAlign::Center => self.x + self.width / 2.0,
            TextAlign::Right => self.inner_right(),
        }
    }
}

/// Drawing target handed to a [`CellPainter`]. Output lands inside
/// the cell's row.
pub trait CellSurface {
    fn text(&mut self, text: &str, x: f64, y: f64, style: &Style);

    fn wrap(&self, text: &str, width: f64, style: &Style) -> Vec<String> {
        wrap_text(text, width, &|s| text_width(s, style.face, style.size))
    }
}

/// Custom draw hook for composite cells.
pub trait CellPainter {
    fn paint(&self, cell: &CellBox, lines: &[CellLine], surface: &mut dyn CellSurface);
}

/// Height a composite cell needs for `lines` wrapped to `inner_width`.
pub fn composite_height(lines: &[CellLine], inner_width: f64) -> f64 {
    lines
        .iter()
        .map(|line| {
            let wrapped = wrap_text(&line.text, inner_width, &|s| {
                text_width(s, line.style.face, line.style.size)
            });
            wrapped.len() as f64 * line.style.line_height()
        })
        .sum()
}

/// Page-space drawing operations used by the layout engine.
///
/// Drawing calls do not fail individually; a backend holds the first
/// error and reports it from `draw_table` or `finish`.
pub trait Canvas {
    fn text(&mut self, text: &str, x: f64, y: f64, style: &Style);

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, width: f64, color: Color);

    /// Outline a rectangle whose top-left corner is (x, y).
    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64, width: f64, color: Color);

    /// Fill a rectangle whose top-left corner is (x, y).
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Color);

    fn measure(&self, text: &str, face: FontFace, size: f64) -> f64 {
        text_width(text, face, size)
    }

    fn wrap(&self, text: &str, width: f64, face: FontFace, size: f64) -> Vec<String> {
        wrap_text(text, width, &|s| self.measure(s, face, size))
    }

    /// Draw the table top to bottom and return the y of its last row's
    /// lower edge. A row that would cross `table.bottom` is an error.
    fn draw_table(
        &mut self,
        table: &TableSpec,
        painter: &dyn CellPainter,
    ) -> Result<f64, RenderError>;

    fn finish(self) -> Result<Vec<u8>, RenderError>
    where
        Self: Sized;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_and_units() {
        assert!((PT_PER_UNIT * 25.4 - 72.0).abs() < 1e-12);
        // 10pt type leads 12pt, about 4.23mm.
        assert!((Style::normal(10.0).line_height() - 4.2333).abs() < 1e-3);
    }

    #[test]
    fn faces_round_trip_builtin_fonts() {
        for face in [FontFace::Normal, FontFace::Bold, FontFace::Italic, FontFace::BoldItalic] {
            assert_eq!(FontFace::from_builtin(face.builtin()), face);
        }
    }

    #[test]
    fn composite_height_sums_lines() {
        let lines = [
            CellLine::new("Consulting", Style::bold(9.0)),
            CellLine::new("tax:10%", Style::italic(7.0)),
        ];
        let expected = Style::bold(9.0).line_height() + Style::italic(7.0).line_height();
        assert!((composite_height(&lines, 60.0) - expected).abs() < 1e-12);
    }
}
