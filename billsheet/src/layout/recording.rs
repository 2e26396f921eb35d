//! A canvas that records drawing calls, for cursor and placement tests.

use std::iter;

use billsheet_pdf::Color;

use super::canvas::{
    composite_height, text_width, Canvas, CellBox, CellPainter, CellSurface, FontFace, Style,
    TableCell, TableSpec,
};
use crate::error::RenderError;

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Text {
        text: String,
        x: f64,
        y: f64,
        style: Style,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        width: f64,
    },
    StrokeRect {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
    },
    FillRect {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        color: Color,
    },
    TableRow {
        top: f64,
        height: f64,
    },
}

#[derive(Debug, Default)]
pub struct RecordingCanvas {
    pub ops: Vec<Op>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        RecordingCanvas::default()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Position and style of the first text op showing exactly `wanted`.
    pub fn text_at(&self, wanted: &str) -> Option<(f64, f64, Style)> {
        self.ops.iter().find_map(|op| match op {
            Op::Text { text, x, y, style } if text == wanted => Some((*x, *y, *style)),
            _ => None,
        })
    }
}

struct RecordingSurface<'a> {
    ops: &'a mut Vec<Op>,
}

impl CellSurface for RecordingSurface<'_> {
    fn text(&mut self, text: &str, x: f64, y: f64, style: &Style) {
        self.ops.push(Op::Text {
            text: text.to_string(),
            x,
            y,
            style: *style,
        });
    }
}

fn body_style(spec: &TableSpec) -> Style {
    Style::new(FontFace::Normal, spec.font_size)
}

fn row_height(spec: &TableSpec, cells: &[TableCell]) -> f64 {
    let style = body_style(spec);
    cells
        .iter()
        .zip(&spec.columns)
        .map(|(cell, width)| {
            let inner = (width - 2.0 * spec.padding).max(0.0);
            let content = match cell {
                TableCell::Text { text, .. } => {
                    let lines = billsheet_pdf::wrap_text(text, inner, &|s| {
                        text_width(s, style.face, style.size)
                    });
                    lines.len() as f64 * style.line_height()
                }
                TableCell::Composite(lines) => composite_height(lines, inner),
            };
            content + 2.0 * spec.padding
        })
        .fold(0.0_f64, f64::max)
}

impl Canvas for RecordingCanvas {
    fn text(&mut self, text: &str, x: f64, y: f64, style: &Style) {
        self.ops.push(Op::Text {
            text: text.to_string(),
            x,
            y,
            style: *style,
        });
    }

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, width: f64, _color: Color) {
        self.ops.push(Op::Line {
            x1,
            y1,
            x2,
            y2,
            width,
        });
    }

    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64, _width: f64, _color: Color) {
        self.ops.push(Op::StrokeRect { x, y, w, h });
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Color) {
        self.ops.push(Op::FillRect { x, y, w, h, color });
    }

    fn draw_table(
        &mut self,
        spec: &TableSpec,
        painter: &dyn CellPainter,
    ) -> Result<f64, RenderError> {
        let mut top = spec.top;
        for (index, cells) in iter::once(&spec.head).chain(&spec.rows).enumerate() {
            let height = row_height(spec, cells);
            if top + height > spec.bottom {
                return Err(RenderError::PageOverflow { row: index });
            }
            self.ops.push(Op::TableRow { top, height });

            let mut x = spec.x;
            for (cell, &width) in cells.iter().zip(&spec.columns) {
                let cell_box = CellBox {
                    x,
                    top,
                    width,
                    height,
                    padding: spec.padding,
                };
                match cell {
                    TableCell::Text { text, align } => {
                        let style = body_style(spec).aligned(*align);
                        let baseline = top + spec.padding + style.ascent();
                        self.text(text, cell_box.anchor_x(*align), baseline, &style);
                    }
                    TableCell::Composite(lines) => {
                        let mut surface = RecordingSurface { ops: &mut self.ops };
                        painter.paint(&cell_box, lines, &mut surface);
                    }
                }
                x += width;
            }
            top += height;
        }
        Ok(top)
    }

    fn finish(self) -> Result<Vec<u8>, RenderError> {
        Ok(Vec::new())
    }
}
