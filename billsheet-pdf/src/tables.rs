use crate::document::{format_coord, text_ops, TextAlign, TextStyle};
use crate::error::{PdfError, Result};
use crate::fonts::BuiltinFont;
use crate::graphics::Color;
use crate::wrap::wrap_text;

// -------------------------------------------------------
// Public types
// -------------------------------------------------------

/// Result of fitting a row into the table's bounding rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitResult {
    /// The row has been placed.
    Stop,
    /// The rectangle is full; the row was not placed.
    BoxFull,
    /// The rectangle is too small for even the first row.
    BoxEmpty,
}

/// A bounding rectangle. (x, y) is the upper-left corner in PDF
/// coordinates; content flows downward from `y`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Style options for a table cell.
#[derive(Debug, Clone, PartialEq)]
pub struct CellStyle {
    /// Optional cell background color (overrides row background).
    pub background_color: Option<Color>,
    /// Text color. Defaults to black.
    pub text_color: Option<Color>,
    pub font: BuiltinFont,
    /// Font size in points.
    pub font_size: f64,
    /// Padding applied to all four sides, in points.
    pub padding: f64,
    pub text_align: TextAlign,
}

impl CellStyle {
    fn text_style(&self) -> TextStyle {
        TextStyle::new(self.font, self.font_size)
    }
}

impl Default for CellStyle {
    fn default() -> Self {
        CellStyle {
            background_color: None,
            text_color: None,
            font: BuiltinFont::Helvetica,
            font_size: 10.0,
            padding: 4.0,
            text_align: TextAlign::Left,
        }
    }
}

/// One styled line of a composite cell. Long runs wrap within the cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub text: String,
    pub style: TextStyle,
    pub align: TextAlign,
    pub color: Option<Color>,
}

impl Run {
    pub fn new(text: impl Into<String>, style: TextStyle) -> Self {
        Run {
            text: text.into(),
            style,
            align: TextAlign::Left,
            color: None,
        }
    }
}

/// What a cell holds.
#[derive(Debug, Clone, PartialEq)]
pub enum CellContent {
    /// Plain text in the cell's own style, word-wrapped.
    Text(String),
    /// Stacked runs with their own fonts and sizes. Drawn by the
    /// caller's hook when one is supplied to `fit_row_with`.
    Runs(Vec<Run>),
}

/// A single table cell: content plus style.
#[derive(Debug, Clone)]
pub struct Cell {
    pub content: CellContent,
    pub style: CellStyle,
}

impl Cell {
    /// Create a text cell with the default style.
    pub fn new(text: impl Into<String>) -> Self {
        Cell::styled(text, CellStyle::default())
    }

    /// Create a text cell with an explicit style.
    pub fn styled(text: impl Into<String>, style: CellStyle) -> Self {
        Cell {
            content: CellContent::Text(text.into()),
            style,
        }
    }

    /// Create a composite cell. `style` supplies padding and background.
    pub fn runs(runs: Vec<Run>, style: CellStyle) -> Self {
        Cell {
            content: CellContent::Runs(runs),
            style,
        }
    }
}

/// A row of cells in a table.
#[derive(Debug, Clone)]
pub struct Row {
    pub cells: Vec<Cell>,
    /// Optional background color applied to the entire row.
    /// Per-cell background_color takes priority.
    pub background_color: Option<Color>,
}

impl Row {
    /// Create a row with no background.
    pub fn new(cells: Vec<Cell>) -> Self {
        Row {
            cells,
            background_color: None,
        }
    }
}

/// Table layout configuration. Holds column widths and visual style; does not
/// store row data. The caller supplies one `Row` at a time to `fit_row`.
#[derive(Debug, Clone)]
pub struct Table {
    /// Column widths in points.
    pub columns: Vec<f64>,
    /// Style used to size columns that have no cell in a row.
    pub default_style: CellStyle,
    /// Border stroke color (default: black).
    pub border_color: Color,
    /// Border line width in points. Set to `0.0` to disable borders.
    pub border_width: f64,
}

/// Placement of a single cell handed to a custom draw hook.
/// `top` is the PDF y of the cell's upper edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellFrame {
    pub x: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub padding: f64,
}

impl CellFrame {
    pub fn inner_left(&self) -> f64 {
        self.x + self.padding
    }

    pub fn inner_right(&self) -> f64 {
        self.x + self.width - self.padding
    }

    pub fn inner_width(&self) -> f64 {
        (self.width - 2.0 * self.padding).max(0.0)
    }

    /// Baseline of the first line of text at `font_size`.
    pub fn first_baseline(&self, font_size: f64) -> f64 {
        self.top - self.padding - font_size
    }

    /// The x a run aligned by `align` is anchored at.
    pub fn anchor_x(&self, align: TextAlign) -> f64 {
        match align {
            TextAlign::Left => self.inner_left(),
            TextAlign::Center => self.x + self.width / 2.0,
            TextAlign::Right => self.inner_right(),
        }
    }
}

/// Drawing surface passed to a custom cell hook. Output lands inside
/// the row being placed.
pub struct CellPainter<'a> {
    output: &'a mut Vec<u8>,
    error: Option<PdfError>,
}

impl<'a> CellPainter<'a> {
    fn new(output: &'a mut Vec<u8>) -> Self {
        CellPainter {
            output,
            error: None,
        }
    }

    /// Show `text` with its baseline at (x, baseline), anchored by `align`.
    pub fn text(
        &mut self,
        text: &str,
        x: f64,
        baseline: f64,
        style: &TextStyle,
        align: TextAlign,
        color: Color,
    ) {
        if self.error.is_some() || text.is_empty() {
            return;
        }
        let start_x = align.start_x(x, style.measure(text));
        if !(start_x.is_finite() && baseline.is_finite() && style.font_size.is_finite()) {
            self.error = Some(PdfError::NonFiniteCoordinate("CellPainter::text"));
            return;
        }
        self.output.extend_from_slice(b"q\n");
        self.output.extend_from_slice(color_op(color, "rg").as_bytes());
        text_ops(self.output, text, style, start_x, baseline);
        self.output.extend_from_slice(b"Q\n");
    }

    /// Wrap `text` to the given width in `style`.
    pub fn wrap(&self, text: &str, width: f64, style: &TextStyle) -> Vec<String> {
        wrap_text(text, width, &|s| style.measure(s))
    }

    fn finish(self) -> Result<()> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Table {
    /// Create a new table layout with the given column widths.
    pub fn new(columns: Vec<f64>) -> Self {
        Table {
            columns,
            default_style: CellStyle::default(),
            border_color: Color::BLACK,
            border_width: 0.5,
        }
    }

    /// Height the row would occupy, in points.
    pub fn measure_row_height(&self, row: &Row) -> f64 {
        self.columns
            .iter()
            .enumerate()
            .map(|(col_idx, &col_width)| match row.cells.get(col_idx) {
                Some(cell) => measure_cell_height(cell, col_width),
                None => {
                    let style = &self.default_style;
                    style.text_style().line_height() + 2.0 * style.padding
                }
            })
            .fold(0.0_f64, f64::max)
    }

    /// Generate PDF content stream bytes for a single row and advance
    /// `cursor` past it.
    pub(crate) fn generate_row_ops(
        &self,
        row: &Row,
        cursor: &mut TableCursor,
        mut hook: Option<&mut dyn FnMut(&CellFrame, &[Run], &mut CellPainter<'_>)>,
    ) -> Result<(Vec<u8>, FitResult)> {
        if self.columns.iter().any(|w| !w.is_finite())
            || !(cursor.rect.x.is_finite() && cursor.current_y.is_finite())
        {
            return Err(PdfError::NonFiniteCoordinate("fit_row"));
        }
        let row_height = self.measure_row_height(row);
        let bottom = cursor.rect.y - cursor.rect.height;

        if cursor.current_y - row_height < bottom {
            // Nothing placed yet on this page: the rect is too small
            // for this row. Otherwise the page is simply full.
            let result = if cursor.first_row {
                FitResult::BoxEmpty
            } else {
                FitResult::BoxFull
            };
            return Ok((Vec::new(), result));
        }

        let mut output: Vec<u8> = Vec::new();
        let (x, y) = (cursor.rect.x, cursor.current_y);
        draw_row_backgrounds(row, &self.columns, x, y, row_height, &mut output);

        let mut col_x = cursor.rect.x;
        for (col_idx, &col_width) in self.columns.iter().enumerate() {
            if let Some(cell) = row.cells.get(col_idx) {
                let frame = CellFrame {
                    x: col_x,
                    top: cursor.current_y,
                    width: col_width,
                    height: row_height,
                    padding: cell.style.padding,
                };
                match (&cell.content, hook.as_deref_mut()) {
                    (CellContent::Runs(runs), Some(hook)) => {
                        let mut painter = CellPainter::new(&mut output);
                        hook(&frame, runs, &mut painter);
                        painter.finish()?;
                    }
                    _ => render_cell(cell, &frame, &mut output),
                }
            }
            col_x += col_width;
        }

        if self.border_width > 0.0 {
            draw_row_borders(
                &self.columns,
                cursor.rect.x,
                cursor.current_y,
                row_height,
                self.border_color,
                self.border_width,
                &mut output,
            );
        }

        cursor.current_y -= row_height;
        cursor.first_row = false;

        Ok((output, FitResult::Stop))
    }
}

/// Tracks where the next row will be placed within a page.
///
/// Created once per table area, then passed to each `fit_row` call.
pub struct TableCursor {
    pub(crate) rect: Rect,
    /// Top of the next row (PDF absolute coordinates, from page bottom).
    pub(crate) current_y: f64,
    /// True when no rows have been placed yet.
    pub(crate) first_row: bool,
}

impl TableCursor {
    /// Create a cursor positioned at the top of `rect`.
    pub fn new(rect: &Rect) -> Self {
        TableCursor {
            rect: *rect,
            current_y: rect.y,
            first_row: true,
        }
    }

    /// Returns `true` if no rows have been placed yet.
    pub fn is_first_row(&self) -> bool {
        self.first_row
    }

    /// Returns the Y coordinate where the next row would be placed.
    ///
    /// After placing all rows, this equals the bottom edge of the last row,
    /// which is where content following the table should be anchored.
    pub fn current_y(&self) -> f64 {
        self.current_y
    }
}

// -------------------------------------------------------
// Measurement helpers
// -------------------------------------------------------

fn run_lines(run: &Run, avail_width: f64) -> Vec<String> {
    wrap_text(&run.text, avail_width, &|s| run.style.measure(s))
}

fn cell_text_lines(text: &str, style: &CellStyle, avail_width: f64) -> Vec<String> {
    let ts = style.text_style();
    wrap_text(text, avail_width, &|s| ts.measure(s))
}

/// Height needed to display a cell's content with wrapping.
fn measure_cell_height(cell: &Cell, col_width: f64) -> f64 {
    let style = &cell.style;
    let avail_width = (col_width - 2.0 * style.padding).max(0.0);
    let content = match &cell.content {
        CellContent::Text(text) => {
            let lines = cell_text_lines(text, style, avail_width).len();
            lines as f64 * style.text_style().line_height()
        }
        CellContent::Runs(runs) if runs.is_empty() => style.text_style().line_height(),
        CellContent::Runs(runs) => runs
            .iter()
            .map(|run| run_lines(run, avail_width).len() as f64 * run.style.line_height())
            .sum(),
    };
    content + 2.0 * style.padding
}

// -------------------------------------------------------
// Rendering helpers
// -------------------------------------------------------

fn color_op(c: Color, op: &str) -> String {
    let [r, g, b] = c.channels().map(format_coord);
    format!("{} {} {} {}\n", r, g, b, op)
}

fn fill_rect_ops(output: &mut Vec<u8>, color: Color, x: f64, y: f64, w: f64, h: f64) {
    output.extend_from_slice(color_op(color, "rg").as_bytes());
    output.extend_from_slice(
        format!(
            "{} {} {} {} re\nf\n",
            format_coord(x),
            format_coord(y),
            format_coord(w),
            format_coord(h),
        )
        .as_bytes(),
    );
}

/// Draw row and cell background fills.
///
/// Row background is drawn first; per-cell backgrounds overlay on top.
fn draw_row_backgrounds(
    row: &Row,
    columns: &[f64],
    row_x: f64,
    row_top: f64,
    row_height: f64,
    output: &mut Vec<u8>,
) {
    let row_bottom = row_top - row_height;

    if let Some(bg) = row.background_color {
        let total_width: f64 = columns.iter().sum();
        fill_rect_ops(output, bg, row_x, row_bottom, total_width, row_height);
    }

    let mut col_x = row_x;
    for (col_idx, &col_width) in columns.iter().enumerate() {
        if let Some(bg) = row.cells.get(col_idx).and_then(|c| c.style.background_color) {
            fill_rect_ops(output, bg, col_x, row_bottom, col_width, row_height);
        }
        col_x += col_width;
    }
}

/// Draw row borders: outer rectangle plus vertical column dividers.
fn draw_row_borders(
    columns: &[f64],
    row_x: f64,
    row_top: f64,
    row_height: f64,
    border_color: Color,
    border_width: f64,
    output: &mut Vec<u8>,
) {
    let row_bottom = row_top - row_height;
    let total_width: f64 = columns.iter().sum();

    output.extend_from_slice(b"q\n");
    output.extend_from_slice(color_op(border_color, "RG").as_bytes());
    output.extend_from_slice(format!("{} w\n", format_coord(border_width)).as_bytes());
    output.extend_from_slice(
        format!(
            "{} {} {} {} re\nS\n",
            format_coord(row_x),
            format_coord(row_bottom),
            format_coord(total_width),
            format_coord(row_height),
        )
        .as_bytes(),
    );

    // Vertical column dividers (not drawn after the last column)
    let mut col_x = row_x;
    for &col_width in &columns[..columns.len().saturating_sub(1)] {
        col_x += col_width;
        output.extend_from_slice(
            format!(
                "{} {} m\n{} {} l\nS\n",
                format_coord(col_x),
                format_coord(row_top),
                format_coord(col_x),
                format_coord(row_bottom),
            )
            .as_bytes(),
        );
    }

    output.extend_from_slice(b"Q\n");
}

/// Default rendering of a cell: wrapped text, or runs stacked top to
/// bottom, each line anchored by its alignment.
fn render_cell(cell: &Cell, frame: &CellFrame, output: &mut Vec<u8>) {
    let style = &cell.style;
    let avail_width = frame.inner_width();
    let default_color = style.text_color.unwrap_or(Color::BLACK);

    // Always set an explicit fill color for text. Without this, the fill
    // color from background drawing would bleed into the text.
    output.extend_from_slice(b"q\n");
    match &cell.content {
        CellContent::Text(text) => {
            let ts = style.text_style();
            output.extend_from_slice(color_op(default_color, "rg").as_bytes());
            let mut baseline = frame.first_baseline(style.font_size);
            for line in cell_text_lines(text, style, avail_width) {
                if !line.is_empty() {
                    let anchor = frame.anchor_x(style.text_align);
                    let x = style.text_align.start_x(anchor, ts.measure(&line));
                    text_ops(output, &line, &ts, x, baseline);
                }
                baseline -= ts.line_height();
            }
        }
        CellContent::Runs(runs) => {
            let mut line_top = frame.top - frame.padding;
            for run in runs {
                let color = run.color.unwrap_or(default_color);
                output.extend_from_slice(color_op(color, "rg").as_bytes());
                for line in run_lines(run, avail_width) {
                    let baseline = line_top - run.style.font_size;
                    if !line.is_empty() {
                        let anchor = frame.anchor_x(run.align);
                        let x = run.align.start_x(anchor, run.style.measure(&line));
                        text_ops(output, &line, &run.style, x, baseline);
                    }
                    line_top -= run.style.line_height();
                }
            }
        }
    }
    output.extend_from_slice(b"Q\n");
}
