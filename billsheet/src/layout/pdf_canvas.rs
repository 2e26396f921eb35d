use billsheet_pdf::{
    BuiltinFont, Cell, CellPainter as PdfCellPainter, CellStyle, Color, FitResult, PdfDocument,
    Rect, Row, Run, Table, TableCursor, TextAlign, TextStyle,
};

use super::canvas::{
    Canvas, CellBox, CellLine, CellPainter, CellSurface, FontFace, Style, TableCell, TableSpec,
    PAGE_HEIGHT, PAGE_WIDTH, PT_PER_UNIT,
};
use crate::error::RenderError;

fn pt(v: f64) -> f64 {
    v * PT_PER_UNIT
}

/// Page y (top-left origin, units) to PDF y (bottom-left origin, points).
fn flip(y: f64) -> f64 {
    pt(PAGE_HEIGHT - y)
}

fn unflip(y_pt: f64) -> f64 {
    PAGE_HEIGHT - y_pt / PT_PER_UNIT
}

fn text_style(style: &Style) -> TextStyle {
    TextStyle::new(style.face.builtin(), style.size)
}

/// [`Canvas`] backed by a single-page `PdfDocument` held in memory.
pub struct PdfCanvas {
    doc: PdfDocument<Vec<u8>>,
}

impl PdfCanvas {
    /// A canvas with compressed content streams.
    pub fn new() -> Result<Self, RenderError> {
        Self::with_compression(true)
    }

    pub fn with_compression(compress: bool) -> Result<Self, RenderError> {
        let mut doc = PdfDocument::new(Vec::new())?;
        doc.set_compression(compress)
            .set_info("Producer", "billsheet")
            .begin_page(pt(PAGE_WIDTH), pt(PAGE_HEIGHT));
        Ok(PdfCanvas { doc })
    }

    pub fn set_title(&mut self, title: &str) {
        self.doc.set_info("Title", title);
    }

    fn place_row(
        &mut self,
        table: &Table,
        row: &Row,
        cursor: &mut TableCursor,
        painter: &dyn CellPainter,
        index: usize,
    ) -> Result<(), RenderError> {
        let result = self
            .doc
            .fit_row_with(table, row, cursor, &mut |frame, runs, pdf_painter| {
                let cell = CellBox {
                    x: frame.x / PT_PER_UNIT,
                    top: unflip(frame.top),
                    width: frame.width / PT_PER_UNIT,
                    height: frame.height / PT_PER_UNIT,
                    padding: frame.padding / PT_PER_UNIT,
                };
                let lines: Vec<CellLine> = runs.iter().map(line_from_run).collect();
                let mut surface = PdfCellSurface {
                    painter: pdf_painter,
                };
                painter.paint(&cell, &lines, &mut surface);
            })?;
        match result {
            FitResult::Stop => Ok(()),
            FitResult::BoxFull | FitResult::BoxEmpty => {
                Err(RenderError::PageOverflow { row: index })
            }
        }
    }
}

impl Canvas for PdfCanvas {
    fn text(&mut self, text: &str, x: f64, y: f64, style: &Style) {
        if text.is_empty() {
            return;
        }
        self.doc
            .save_state()
            .set_fill_color(style.color)
            .place_text_aligned(text, pt(x), flip(y), &text_style(style), style.align)
            .restore_state();
    }

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, width: f64, color: Color) {
        self.doc
            .save_state()
            .set_stroke_color(color)
            .set_line_width(pt(width))
            .move_to(pt(x1), flip(y1))
            .line_to(pt(x2), flip(y2))
            .stroke()
            .restore_state();
    }

    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64, width: f64, color: Color) {
        self.doc
            .save_state()
            .set_stroke_color(color)
            .set_line_width(pt(width))
            .rect(pt(x), flip(y + h), pt(w), pt(h))
            .stroke()
            .restore_state();
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Color) {
        self.doc
            .save_state()
            .set_fill_color(color)
            .rect(pt(x), flip(y + h), pt(w), pt(h))
            .fill()
            .restore_state();
    }

    fn draw_table(
        &mut self,
        spec: &TableSpec,
        painter: &dyn CellPainter,
    ) -> Result<f64, RenderError> {
        let mut table = Table::new(spec.columns.iter().map(|w| pt(*w)).collect());
        table.border_color = spec.border_color;
        table.border_width = pt(spec.border_width);

        let rect = Rect {
            x: pt(spec.x),
            y: flip(spec.top),
            width: pt(spec.width()),
            height: pt(spec.bottom - spec.top),
        };
        let mut cursor = TableCursor::new(&rect);

        let head = table_row(spec, &spec.head, true);
        self.place_row(&table, &head, &mut cursor, painter, 0)?;
        for (i, cells) in spec.rows.iter().enumerate() {
            let row = table_row(spec, cells, false);
            self.place_row(&table, &row, &mut cursor, painter, i + 1)?;
        }
        Ok(unflip(cursor.current_y()))
    }

    fn finish(self) -> Result<Vec<u8>, RenderError> {
        Ok(self.doc.end_document()?)
    }
}

/// Routes a cell hook's text onto the PDF row being placed.
struct PdfCellSurface<'p, 'a> {
    painter: &'p mut PdfCellPainter<'a>,
}

impl CellSurface for PdfCellSurface<'_, '_> {
    fn text(&mut self, text: &str, x: f64, y: f64, style: &Style) {
        self.painter
            .text(text, pt(x), flip(y), &text_style(style), style.align, style.color);
    }
}

fn table_row(spec: &TableSpec, cells: &[TableCell], head: bool) -> Row {
    let base = CellStyle {
        background_color: None,
        text_color: if head { Some(spec.head_text) } else { None },
        font: if head {
            BuiltinFont::HelveticaBold
        } else {
            BuiltinFont::Helvetica
        },
        font_size: spec.font_size,
        padding: pt(spec.padding),
        text_align: TextAlign::Left,
    };
    let cells = cells
        .iter()
        .map(|cell| match cell {
            TableCell::Text { text, align } => Cell::styled(
                text.clone(),
                CellStyle {
                    text_align: *align,
                    ..base.clone()
                },
            ),
            TableCell::Composite(lines) => {
                Cell::runs(lines.iter().map(run_from_line).collect(), base.clone())
            }
        })
        .collect();
    Row {
        cells,
        background_color: if head { Some(spec.head_fill) } else { None },
    }
}

fn run_from_line(line: &CellLine) -> Run {
    Run {
        text: line.text.clone(),
        style: text_style(&line.style),
        align: line.style.align,
        color: Some(line.style.color),
    }
}

fn line_from_run(run: &Run) -> CellLine {
    CellLine::new(
        run.text.clone(),
        Style {
            face: FontFace::from_builtin(run.style.font),
            size: run.style.font_size,
            align: run.align,
            color: run.color.unwrap_or(Color::BLACK),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flip_maps_top_left_to_bottom_left() {
        assert!((flip(0.0) - pt(PAGE_HEIGHT)).abs() < 1e-9);
        assert!(flip(PAGE_HEIGHT).abs() < 1e-9);
        assert!((unflip(flip(52.0)) - 52.0).abs() < 1e-9);
    }

    #[test]
    fn lines_survive_run_conversion() {
        let line = CellLine::new(
            "tax:18%",
            Style::italic(7.0)
                .aligned(TextAlign::Right)
                .colored(Color::gray(0.4)),
        );
        assert_eq!(line_from_run(&run_from_line(&line)), line);
    }
}
