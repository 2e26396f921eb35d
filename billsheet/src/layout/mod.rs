//! Single-page invoice layout.
//!
//! [`render`] produces PDF bytes; [`render_to`] draws onto any
//! [`Canvas`], which is how the placement logic is exercised without a
//! PDF backend.

mod canvas;
mod pdf_canvas;
#[cfg(test)]
mod recording;
mod sections;

pub use canvas::{
    composite_height, text_width, Canvas, CellBox, CellLine, CellPainter, CellSurface, FontFace,
    Style, TableCell, TableSpec, MARGIN, PAGE_HEIGHT, PAGE_WIDTH, PT_PER_UNIT,
};
pub use pdf_canvas::PdfCanvas;
pub use sections::{item_table, summary_rows, Cursor, StackedLines};

use tracing::debug;

use crate::error::RenderError;
use crate::format::{display_number, file_name};
use crate::ledger::Ledger;
use crate::model::{InvoiceHeader, LineItem, Settings};
use crate::totals::Totals;

/// What the caller wants done with the rendered document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Deliver as a named file.
    Save,
    /// Keep in memory for display; nothing is written.
    Preview,
}

/// A rendered invoice.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub file_name: String,
    pub mode: RenderMode,
    pub bytes: Vec<u8>,
}

/// Lay out the invoice onto `canvas`. Returns the cursor below the last
/// drawn block.
pub fn render_to<C: Canvas>(
    canvas: &mut C,
    header: &InvoiceHeader,
    items: &[LineItem],
    totals: &Totals,
    settings: &Settings,
) -> Result<Cursor, RenderError> {
    sections::page(canvas, header, items, totals, settings)
}

/// Render the invoice to PDF bytes. Identical inputs produce identical
/// bytes.
pub fn render(
    header: &InvoiceHeader,
    ledger: &Ledger,
    totals: &Totals,
    settings: &Settings,
    mode: RenderMode,
) -> Result<Document, RenderError> {
    let display = display_number(&settings.invoice_prefix, &header.invoice_number);
    let mut canvas = PdfCanvas::new()?;
    canvas.set_title(&format!("Invoice {}", display));

    let end = render_to(&mut canvas, header, ledger.list(), totals, settings)?;
    let bytes = canvas.finish()?;
    debug!(rows = ledger.len(), bottom = end.y, bytes = bytes.len(), "invoice laid out");

    Ok(Document {
        file_name: file_name(&display),
        mode,
        bytes,
    })
}
