use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::error::{PdfError, Result};
use crate::fonts::{encode_win_ansi, BuiltinFont, FontMetrics};
use crate::graphics::Color;
use crate::objects::{escape_pdf_bytes, ObjId, PdfObject};
use crate::tables::{CellFrame, CellPainter, FitResult, Row, Run, Table, TableCursor};
use crate::writer::PdfWriter;

const CATALOG_OBJ: ObjId = ObjId(1, 0);
const PAGES_OBJ: ObjId = ObjId(2, 0);
const FIRST_FONT_OBJ_NUM: u32 = 3;
const FIRST_PAGE_OBJ_NUM: u32 = FIRST_FONT_OBJ_NUM + BuiltinFont::ALL.len() as u32;

/// Font and size used when placing text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font: BuiltinFont,
    pub font_size: f64,
}

impl TextStyle {
    pub fn new(font: BuiltinFont, font_size: f64) -> Self {
        TextStyle { font, font_size }
    }

    /// Width of `text` in points when set in this style.
    pub fn measure(&self, text: &str) -> f64 {
        FontMetrics::measure_text(text, self.font, self.font_size)
    }

    pub fn line_height(&self) -> f64 {
        FontMetrics::line_height(self.font_size)
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        TextStyle {
            font: BuiltinFont::Helvetica,
            font_size: 12.0,
        }
    }
}

/// Horizontal anchoring of text relative to its x coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlign {
    /// Left edge for a run of `width` anchored at `x`.
    pub fn start_x(self, x: f64, width: f64) -> f64 {
        match self {
            TextAlign::Left => x,
            TextAlign::Center => x - width / 2.0,
            TextAlign::Right => x - width,
        }
    }
}

/// High-level API for building PDF documents.
///
/// Generic over `Write` so it works with files, in-memory buffers
/// (`Vec<u8>`), or any other writer.
///
/// Drawing calls return `&mut Self` for chaining. A call made with no
/// open page, or with a NaN/infinite coordinate, is dropped and the
/// error is held until the next fallible call (`fit_row`, `end_page`,
/// `end_document`), which reports it.
pub struct PdfDocument<W: Write> {
    writer: PdfWriter<W>,
    info: Vec<(String, String)>,
    page_obj_ids: Vec<ObjId>,
    current_page: Option<PageBuilder>,
    next_obj_num: u32,
    compress: bool,
    deferred_error: Option<PdfError>,
}

struct PageBuilder {
    width: f64,
    height: f64,
    content_ops: Vec<u8>,
}

impl<W: Write> PdfDocument<W> {
    /// Create a new PDF document that writes to the given writer.
    /// Writes the PDF header and the shared font objects immediately.
    pub fn new(writer: W) -> Result<Self> {
        let mut pdf_writer = PdfWriter::new(writer);
        pdf_writer.write_header()?;

        for (i, font) in BuiltinFont::ALL.iter().enumerate() {
            let obj = PdfObject::dict(vec![
                ("Type", PdfObject::name("Font")),
                ("Subtype", PdfObject::name("Type1")),
                ("BaseFont", PdfObject::name(font.pdf_base_name())),
                ("Encoding", PdfObject::name("WinAnsiEncoding")),
            ]);
            pdf_writer.write_object(ObjId(FIRST_FONT_OBJ_NUM + i as u32, 0), &obj)?;
        }

        Ok(PdfDocument {
            writer: pdf_writer,
            info: Vec::new(),
            page_obj_ids: Vec::new(),
            current_page: None,
            next_obj_num: FIRST_PAGE_OBJ_NUM,
            compress: false,
            deferred_error: None,
        })
    }

    /// Set a document info entry (e.g. "Creator", "Title").
    pub fn set_info(&mut self, key: &str, value: &str) -> &mut Self {
        self.info.push((key.to_string(), value.to_string()));
        self
    }

    /// Compress page content streams with FlateDecode.
    pub fn set_compression(&mut self, enabled: bool) -> &mut Self {
        self.compress = enabled;
        self
    }

    /// Begin a new page with the given dimensions in points.
    /// If a page is currently open, it is automatically closed.
    pub fn begin_page(&mut self, width: f64, height: f64) -> &mut Self {
        if self.current_page.is_some() {
            if let Err(e) = self.end_page() {
                self.defer(e);
            }
        }
        self.current_page = Some(PageBuilder {
            width,
            height,
            content_ops: Vec::new(),
        });
        self
    }

    fn defer(&mut self, err: PdfError) {
        if self.deferred_error.is_none() {
            self.deferred_error = Some(err);
        }
    }

    fn check_deferred(&mut self) -> Result<()> {
        match self.deferred_error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Append raw operator bytes to the open page after validating
    /// the numeric operands.
    fn push_ops(&mut self, caller: &'static str, operands: &[f64], ops: &[u8]) -> &mut Self {
        if self.deferred_error.is_some() {
            return self;
        }
        if operands.iter().any(|v| !v.is_finite()) {
            self.defer(PdfError::NonFiniteCoordinate(caller));
            return self;
        }
        match self.current_page.as_mut() {
            Some(page) => page.content_ops.extend_from_slice(ops),
            None => self.defer(PdfError::NoOpenPage(caller)),
        }
        self
    }

    fn operator(&mut self, caller: &'static str, operands: &[f64], op: &str) -> &mut Self {
        let mut line = String::new();
        for v in operands {
            line.push_str(&format_coord(*v));
            line.push(' ');
        }
        line.push_str(op);
        line.push('\n');
        self.push_ops(caller, operands, line.as_bytes())
    }

    /// Place text with its baseline at (x, y), anchored by `align`.
    /// Coordinates use PDF's default bottom-left origin.
    pub fn place_text_aligned(
        &mut self,
        text: &str,
        x: f64,
        y: f64,
        style: &TextStyle,
        align: TextAlign,
    ) -> &mut Self {
        let start_x = align.start_x(x, style.measure(text));
        let mut ops = Vec::new();
        text_ops(&mut ops, text, style, start_x, y);
        self.push_ops("place_text", &[start_x, y, style.font_size], &ops)
    }

    pub fn save_state(&mut self) -> &mut Self {
        self.operator("save_state", &[], "q")
    }

    pub fn restore_state(&mut self) -> &mut Self {
        self.operator("restore_state", &[], "Q")
    }

    pub fn set_fill_color(&mut self, c: Color) -> &mut Self {
        self.operator("set_fill_color", &c.channels(), "rg")
    }

    pub fn set_stroke_color(&mut self, c: Color) -> &mut Self {
        self.operator("set_stroke_color", &c.channels(), "RG")
    }

    pub fn set_line_width(&mut self, width: f64) -> &mut Self {
        self.operator("set_line_width", &[width], "w")
    }

    pub fn move_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.operator("move_to", &[x, y], "m")
    }

    pub fn line_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.operator("line_to", &[x, y], "l")
    }

    /// Append a rectangle path; (x, y) is the lower-left corner.
    pub fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> &mut Self {
        self.operator("rect", &[x, y, width, height], "re")
    }

    pub fn stroke(&mut self) -> &mut Self {
        self.operator("stroke", &[], "S")
    }

    pub fn fill(&mut self) -> &mut Self {
        self.operator("fill", &[], "f")
    }

    /// Place one table row at the cursor using the default cell rendering.
    pub fn fit_row(
        &mut self,
        table: &Table,
        row: &Row,
        cursor: &mut TableCursor,
    ) -> Result<FitResult> {
        self.place_row(table, row, cursor, None)
    }

    /// Place one table row, handing every `CellContent::Runs` cell to
    /// `hook` instead of the default stacked rendering. Backgrounds and
    /// borders are still drawn by the table.
    pub fn fit_row_with(
        &mut self,
        table: &Table,
        row: &Row,
        cursor: &mut TableCursor,
        hook: &mut dyn FnMut(&CellFrame, &[Run], &mut CellPainter<'_>),
    ) -> Result<FitResult> {
        self.place_row(table, row, cursor, Some(hook))
    }

    fn place_row(
        &mut self,
        table: &Table,
        row: &Row,
        cursor: &mut TableCursor,
        hook: Option<&mut dyn FnMut(&CellFrame, &[Run], &mut CellPainter<'_>)>,
    ) -> Result<FitResult> {
        self.check_deferred()?;
        if self.current_page.is_none() {
            return Err(PdfError::NoOpenPage("fit_row"));
        }
        let (ops, result) = table.generate_row_ops(row, cursor, hook)?;
        self.push_ops("fit_row", &[], &ops);
        Ok(result)
    }

    /// End the current page. Writes page objects to the
    /// writer and frees page content from memory.
    pub fn end_page(&mut self) -> Result<()> {
        self.check_deferred()?;
        let page = self
            .current_page
            .take()
            .ok_or(PdfError::NoOpenPage("end_page"))?;

        let content_id = ObjId(self.next_obj_num, 0);
        let page_id = ObjId(self.next_obj_num + 1, 0);
        self.next_obj_num += 2;

        let content_stream = if self.compress {
            let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(&page.content_ops)?;
            PdfObject::stream(
                vec![("Filter", PdfObject::name("FlateDecode"))],
                encoder.finish()?,
            )
        } else {
            PdfObject::stream(vec![], page.content_ops)
        };
        self.writer.write_object(content_id, &content_stream)?;

        let fonts = BuiltinFont::ALL
            .iter()
            .enumerate()
            .map(|(i, font)| {
                (
                    font.pdf_name(),
                    PdfObject::reference(FIRST_FONT_OBJ_NUM + i as u32, 0),
                )
            })
            .collect();
        let page_dict = PdfObject::dict(vec![
            ("Type", PdfObject::name("Page")),
            ("Parent", PdfObject::Reference(PAGES_OBJ)),
            (
                "MediaBox",
                PdfObject::array(vec![
                    PdfObject::Integer(0),
                    PdfObject::Integer(0),
                    PdfObject::Real(page.width),
                    PdfObject::Real(page.height),
                ]),
            ),
            ("Contents", PdfObject::Reference(content_id)),
            (
                "Resources",
                PdfObject::dict(vec![("Font", PdfObject::dict(fonts))]),
            ),
        ]);
        self.writer.write_object(page_id, &page_dict)?;

        self.page_obj_ids.push(page_id);
        Ok(())
    }

    /// Finish the document. Writes the info dictionary, pages tree,
    /// catalog, xref table, and trailer, and returns the writer.
    pub fn end_document(mut self) -> Result<W> {
        if self.current_page.is_some() {
            self.end_page()?;
        }
        self.check_deferred()?;

        let info_id = if self.info.is_empty() {
            None
        } else {
            let id = ObjId(self.next_obj_num, 0);
            self.next_obj_num += 1;
            let entries = self
                .info
                .iter()
                .map(|(k, v)| (k.as_str(), PdfObject::literal_string(v)))
                .collect();
            self.writer.write_object(id, &PdfObject::dict(entries))?;
            Some(id)
        };

        let kids = self
            .page_obj_ids
            .iter()
            .map(|id| PdfObject::Reference(*id))
            .collect();
        let pages = PdfObject::dict(vec![
            ("Type", PdfObject::name("Pages")),
            ("Kids", PdfObject::Array(kids)),
            ("Count", PdfObject::Integer(self.page_obj_ids.len() as i64)),
        ]);
        self.writer.write_object(PAGES_OBJ, &pages)?;

        let catalog = PdfObject::dict(vec![
            ("Type", PdfObject::name("Catalog")),
            ("Pages", PdfObject::Reference(PAGES_OBJ)),
        ]);
        self.writer.write_object(CATALOG_OBJ, &catalog)?;

        self.writer.write_xref_and_trailer(CATALOG_OBJ, info_id)?;
        Ok(self.writer.into_inner())
    }
}

/// Emit a self-contained `BT ... ET` block showing `text` with its
/// baseline starting at (x, y).
pub(crate) fn text_ops(out: &mut Vec<u8>, text: &str, style: &TextStyle, x: f64, y: f64) {
    out.extend_from_slice(
        format!(
            "BT\n/{} {} Tf\n{} {} Td\n(",
            style.font.pdf_name(),
            format_coord(style.font_size),
            format_coord(x),
            format_coord(y),
        )
        .as_bytes(),
    );
    out.extend_from_slice(&escape_pdf_bytes(&encode_win_ansi(text)));
    out.extend_from_slice(b") Tj\nET\n");
}

/// Format a coordinate value for PDF content streams.
pub(crate) fn format_coord(v: f64) -> String {
    if v == v.floor() && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        let s = format!("{:.4}", v);
        let s = s.trim_end_matches('0').trim_end_matches('.');
        if s == "-0" {
            "0".to_string()
        } else {
            s.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_coord_trims_zeros() {
        assert_eq!(format_coord(72.0), "72");
        assert_eq!(format_coord(56.6929), "56.6929");
        assert_eq!(format_coord(0.5), "0.5");
        assert_eq!(format_coord(-0.00001), "0");
    }

    #[test]
    fn align_start_x() {
        assert_eq!(TextAlign::Left.start_x(100.0, 40.0), 100.0);
        assert_eq!(TextAlign::Center.start_x(100.0, 40.0), 80.0);
        assert_eq!(TextAlign::Right.start_x(100.0, 40.0), 60.0);
    }

    #[test]
    fn text_ops_encode_and_escape() {
        let mut out = Vec::new();
        let style = TextStyle::new(BuiltinFont::HelveticaBold, 9.0);
        text_ops(&mut out, "Fee (€)", &style, 10.0, 20.0);
        assert_eq!(out, b"BT\n/F2 9 Tf\n10 20 Td\n(Fee \\(\x80\\)) Tj\nET\n".to_vec());
    }
}
