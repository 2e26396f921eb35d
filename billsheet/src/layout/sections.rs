//! Section-by-section placement of the invoice page.
//!
//! Each section takes the cursor it starts from and returns the cursor
//! for whatever follows. Optional lines are collected first and drawn
//! from the list, so a missing field shifts everything after it by
//! exactly one row.

use billsheet_pdf::{Color, TextAlign};
use tracing::warn;

use super::canvas::{
    Canvas, CellBox, CellLine, CellPainter, CellSurface, Style, TableCell, TableSpec, MARGIN,
    PAGE_HEIGHT, PAGE_WIDTH,
};
use crate::error::RenderError;
use crate::format::{
    display_number, format_amount, format_date, format_date_text, format_money, format_quantity,
    format_rate, split_lines,
};
use crate::model::{InvoiceHeader, LineItem, Settings};
use crate::totals::{item_tax, Totals};

const RIGHT_EDGE: f64 = PAGE_WIDTH - MARGIN;
const CENTER_X: f64 = PAGE_WIDTH / 2.0;

const NAME_Y: f64 = 20.0;
const LETTERHEAD_FIRST_ROW: f64 = 25.0;
const LETTERHEAD_ROW: f64 = 4.0;
const DIVIDER_Y: f64 = 40.0;
const DIVIDER_WIDTH: f64 = 0.5;
const TITLE_Y: f64 = 52.0;

const DETAILS_Y: f64 = 60.0;
const DETAILS_ROW: f64 = 5.0;
const SECTION_GAP: f64 = 5.0;

const COLUMN_WIDTHS: [f64; 6] = [12.0, 70.0, 18.0, 22.0, 24.0, 24.0];
const TABLE_FONT_SIZE: f64 = 9.0;
const TABLE_PADDING: f64 = 1.5;
const TABLE_BORDER: f64 = 0.1;

const TOTALS_LABEL_X: f64 = 130.0;
const TOTALS_ROW: f64 = 6.0;
const GRAND_TOTAL_GAP: f64 = 8.0;
const BAND_LEFT: f64 = TOTALS_LABEL_X - 2.0;
const BAND_ASCENT: f64 = 5.0;
const BAND_HEIGHT: f64 = 7.5;

const NOTES_WIDTH: f64 = 100.0;
const NOTES_HEADING_GAP: f64 = 5.0;
const NOTES_ROW: f64 = 4.0;

const BOX_GAP: f64 = 10.0;
const BOX_WIDTH: f64 = 85.0;
const BOX_HEIGHT: f64 = 30.0;
const RIGHT_BOX_X: f64 = MARGIN + BOX_WIDTH;
const BOX_INSET: f64 = 2.0;
const BANK_ROW: f64 = 4.0;

const SIGNATURE_GAP: f64 = 10.0;
const SIGNATURE_LABEL_GAP: f64 = 6.0;

fn brand_blue() -> Color {
    Color::rgb8(0, 70, 136)
}

fn band_fill() -> Color {
    Color::rgb8(226, 234, 244)
}

fn muted() -> Color {
    Color::gray(0.35)
}

/// Vertical position on the page, in page units from the top.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cursor {
    pub y: f64,
}

impl Cursor {
    pub fn at(y: f64) -> Self {
        Cursor { y }
    }

    pub fn advance(self, dy: f64) -> Self {
        Cursor { y: self.y + dy }
    }

    pub fn max(self, other: Cursor) -> Self {
        Cursor {
            y: self.y.max(other.y),
        }
    }
}

/// Draw rows top-down from `start`, `step` apart. Returns the cursor
/// one step past the last row.
fn draw_rows<C: Canvas>(
    canvas: &mut C,
    rows: &[String],
    x: f64,
    start: Cursor,
    step: f64,
    style: &Style,
) -> Cursor {
    let mut cursor = start;
    for row in rows {
        canvas.text(row, x, cursor.y, style);
        cursor = cursor.advance(step);
    }
    cursor
}

fn non_empty(text: &str) -> Option<String> {
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Company name, tagline, address, contact and tax id. Returns the
/// cursor below the last line.
pub fn letterhead<C: Canvas>(canvas: &mut C, settings: &Settings) -> Cursor {
    canvas.text(settings.company_name.trim(), MARGIN, NAME_Y, &Style::bold(16.0));

    let mut cursor = Cursor::at(LETTERHEAD_FIRST_ROW);
    if let Some(tagline) = non_empty(&settings.company_tagline) {
        canvas.text(&tagline, MARGIN, cursor.y, &Style::italic(9.0));
        cursor = cursor.advance(LETTERHEAD_ROW);
    }

    let mut rows: Vec<String> = split_lines(&settings.company_address)
        .into_iter()
        .map(str::to_string)
        .collect();
    let contact: Vec<&str> = [settings.company_phone.trim(), settings.company_email.trim()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect();
    if !contact.is_empty() {
        rows.push(contact.join(" | "));
    }
    if let Some(gstin) = non_empty(&settings.company_gstin) {
        rows.push(format!("GSTIN : {}", gstin));
    }
    let cursor = draw_rows(canvas, &rows, MARGIN, cursor, LETTERHEAD_ROW, &Style::normal(9.0));

    if cursor.y > DIVIDER_Y {
        warn!(
            bottom = cursor.y,
            divider = DIVIDER_Y,
            "letterhead runs past the divider rule"
        );
    }
    cursor
}

pub fn divider<C: Canvas>(canvas: &mut C) {
    canvas.line(MARGIN, DIVIDER_Y, RIGHT_EDGE, DIVIDER_Y, DIVIDER_WIDTH, Color::BLACK);
}

pub fn title<C: Canvas>(canvas: &mut C, settings: &Settings) {
    let style = Style::bold(20.0).aligned(TextAlign::Center);
    canvas.text(settings.title(), CENTER_X, TITLE_Y, &style);
}

/// Right-aligned invoice number, dates and currency.
pub fn invoice_details<C: Canvas>(
    canvas: &mut C,
    header: &InvoiceHeader,
    settings: &Settings,
) -> Cursor {
    let mut rows = vec![format!(
        "Invoice # : {}",
        display_number(&settings.invoice_prefix, &header.invoice_number)
    )];
    if !header.invoice_date.trim().is_empty() {
        rows.push(format!("Invoice Date : {}", format_date_text(&header.invoice_date)));
    }
    if let Some(currency) = non_empty(&header.currency) {
        rows.push(format!("Currency : {}", currency));
    }
    if let Some(due) = header.due_date() {
        rows.push(format!("Due Date : {}", format_date(due)));
    }
    let style = Style::normal(10.0).aligned(TextAlign::Right);
    draw_rows(canvas, &rows, RIGHT_EDGE, Cursor::at(DETAILS_Y), DETAILS_ROW, &style)
}

/// Bill-To label and client lines; blank fields take no row.
pub fn bill_to<C: Canvas>(canvas: &mut C, header: &InvoiceHeader, settings: &Settings) -> Cursor {
    canvas.text(settings.bill_to(), MARGIN, DETAILS_Y, &Style::bold(11.0));

    let mut rows: Vec<String> = Vec::new();
    rows.extend(non_empty(&header.client_name));
    rows.extend(split_lines(&header.client_address).into_iter().map(str::to_string));
    rows.extend(non_empty(&header.client_email));
    rows.extend(non_empty(&header.client_phone));

    let start = Cursor::at(DETAILS_Y).advance(DETAILS_ROW);
    draw_rows(canvas, &rows, MARGIN, start, DETAILS_ROW, &Style::normal(10.0))
}

fn service_lines(item: &LineItem) -> Vec<CellLine> {
    let body = Style::normal(TABLE_FONT_SIZE);
    let mut lines = vec![CellLine::new(item.service_name(), Style::bold(TABLE_FONT_SIZE))];
    if !item.hsn().is_empty() {
        lines.push(CellLine::new(format!("HSN Code : {}", item.hsn()), body));
    }
    if !item.service_desc().is_empty() {
        lines.push(CellLine::new(format!("Description : {}", item.service_desc()), body));
    }
    if !item.period().is_empty() {
        lines.push(CellLine::new(item.period(), body));
    }
    lines
}

fn tax_lines(item: &LineItem) -> Vec<CellLine> {
    vec![
        CellLine::new(
            format_amount(item_tax(item)),
            Style::normal(TABLE_FONT_SIZE).aligned(TextAlign::Right),
        ),
        CellLine::new(
            format!("tax:{}%", format_rate(item.tax_pct())),
            Style::italic(7.0).aligned(TextAlign::Right).colored(muted()),
        ),
    ]
}

/// The line item table for `items`, starting at `top`.
pub fn item_table(items: &[LineItem], top: Cursor) -> TableSpec {
    let head = vec![
        TableCell::text("Sr no.", TextAlign::Center),
        TableCell::text("Product/Services", TextAlign::Left),
        TableCell::text("Qty", TextAlign::Right),
        TableCell::text("Rate", TextAlign::Right),
        TableCell::text("Tax", TextAlign::Right),
        TableCell::text("Amount", TextAlign::Right),
    ];
    let rows = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            vec![
                TableCell::text((i + 1).to_string(), TextAlign::Center),
                TableCell::Composite(service_lines(item)),
                TableCell::text(format_quantity(item.qty()), TextAlign::Right),
                TableCell::text(format_amount(item.rate()), TextAlign::Right),
                TableCell::Composite(tax_lines(item)),
                TableCell::text(format_amount(item.amount()), TextAlign::Right),
            ]
        })
        .collect();

    TableSpec {
        x: MARGIN,
        top: top.y,
        bottom: PAGE_HEIGHT - MARGIN,
        columns: COLUMN_WIDTHS.to_vec(),
        head,
        rows,
        font_size: TABLE_FONT_SIZE,
        padding: TABLE_PADDING,
        head_fill: brand_blue(),
        head_text: Color::WHITE,
        border_color: Color::gray(200.0 / 255.0),
        border_width: TABLE_BORDER,
    }
}

/// Draws composite cells as stacked, wrapped lines, each anchored by its
/// own alignment.
pub struct StackedLines;

impl CellPainter for StackedLines {
    fn paint(&self, cell: &CellBox, lines: &[CellLine], surface: &mut dyn CellSurface) {
        let mut line_top = cell.top + cell.padding;
        for line in lines {
            let x = cell.anchor_x(line.style.align);
            for text in surface.wrap(&line.text, cell.inner_width(), &line.style) {
                surface.text(&text, x, line_top + line.style.ascent(), &line.style);
                line_top += line.style.line_height();
            }
        }
    }
}

pub fn draw_item_table<C: Canvas>(
    canvas: &mut C,
    items: &[LineItem],
    top: Cursor,
) -> Result<Cursor, RenderError> {
    let spec = item_table(items, top);
    let bottom = canvas.draw_table(&spec, &StackedLines)?;
    Ok(Cursor::at(bottom))
}

/// Summary rows in display order. Shipping and discount appear only
/// when positive.
pub fn summary_rows(totals: &Totals, currency: &str, settings: &Settings) -> Vec<(String, String)> {
    let mut rows = vec![
        ("Base Amount".to_string(), format_money(totals.subtotal, currency)),
        (
            format!(
                "(+) {} : {}%",
                settings.tax_name(),
                format_rate(totals.effective_tax_rate())
            ),
            format_money(totals.tax, currency),
        ),
        ("Total".to_string(), format_money(totals.total(), currency)),
    ];
    if totals.shipping > 0.0 {
        rows.push(("(+) Shipping".to_string(), format_money(totals.shipping, currency)));
    }
    if totals.discount > 0.0 {
        rows.push(("(-) Discount".to_string(), format_money(totals.discount, currency)));
    }
    rows
}

/// Totals block starting at `top`. Returns the cursor at the bottom of
/// the grand total band.
pub fn totals_block<C: Canvas>(
    canvas: &mut C,
    totals: &Totals,
    currency: &str,
    settings: &Settings,
    top: Cursor,
) -> Cursor {
    let label_style = Style::normal(10.0);
    let value_style = Style::normal(10.0).aligned(TextAlign::Right);

    let rows = summary_rows(totals, currency, settings);
    let mut cursor = top;
    for (label, value) in &rows {
        canvas.text(label, TOTALS_LABEL_X, cursor.y, &label_style);
        canvas.text(value, RIGHT_EDGE, cursor.y, &value_style);
        cursor = cursor.advance(TOTALS_ROW);
    }

    // The last regular row sits one step above the cursor.
    let grand_y = cursor.y - TOTALS_ROW + GRAND_TOTAL_GAP;
    let band_top = grand_y - BAND_ASCENT;
    canvas.fill_rect(
        BAND_LEFT,
        band_top,
        RIGHT_EDGE + 2.0 - BAND_LEFT,
        BAND_HEIGHT,
        band_fill(),
    );
    canvas.text("Grand Total", TOTALS_LABEL_X, grand_y, &Style::bold(11.0));
    canvas.text(
        &format_money(totals.grand_total, currency),
        RIGHT_EDGE,
        grand_y,
        &Style::bold(11.0).aligned(TextAlign::Right),
    );
    Cursor::at(band_top + BAND_HEIGHT)
}

/// Notes beside the totals. Nothing is drawn for blank text and the
/// cursor comes back unchanged.
pub fn notes<C: Canvas>(canvas: &mut C, text: &str, top: Cursor) -> Cursor {
    if text.trim().is_empty() {
        return top;
    }
    canvas.text("Please Note", MARGIN, top.y, &Style::bold(9.0));
    let body = Style::normal(8.0);
    let lines = canvas.wrap(text, NOTES_WIDTH, body.face, body.size);
    draw_rows(canvas, &lines, MARGIN, top.advance(NOTES_HEADING_GAP), NOTES_ROW, &body)
}

fn bank_rows(settings: &Settings) -> Vec<String> {
    [
        ("BANK NAME", &settings.bank_name),
        ("ACCOUNT HOLDER NAME", &settings.bank_holder),
        ("ACCOUNT NUMBER", &settings.bank_account),
        ("SWIFT CODE", &settings.bank_swift),
        ("UPI ID", &settings.bank_upi),
    ]
    .into_iter()
    .filter_map(|(label, value)| non_empty(value).map(|v| format!("{}: {}", label, v)))
    .collect()
}

/// "Payable To" and "Bank Details" boxes with their top edge at `top`.
/// Returns the cursor at the boxes' lower edge.
pub fn payment_boxes<C: Canvas>(canvas: &mut C, settings: &Settings, top: Cursor) -> Cursor {
    let frame = Color::BLACK;
    canvas.stroke_rect(MARGIN, top.y, BOX_WIDTH, BOX_HEIGHT, 0.2, frame);
    canvas.stroke_rect(RIGHT_BOX_X, top.y, BOX_WIDTH, BOX_HEIGHT, 0.2, frame);

    let small = Style::normal(9.0);
    canvas.text("Payable To", MARGIN + BOX_INSET, top.y + 5.0, &small);
    canvas.text(settings.payee().trim(), MARGIN + BOX_INSET, top.y + 12.0, &Style::bold(9.0));

    canvas.text("Bank Details", RIGHT_BOX_X + BOX_INSET, top.y + 5.0, &small);
    draw_rows(
        canvas,
        &bank_rows(settings),
        RIGHT_BOX_X + BOX_INSET,
        top.advance(10.0),
        BANK_ROW,
        &Style::normal(8.0),
    );
    top.advance(BOX_HEIGHT)
}

/// Signatory name and label, right-aligned under the boxes.
pub fn signature<C: Canvas>(canvas: &mut C, settings: &Settings, boxes_bottom: Cursor) -> Cursor {
    let style = Style::normal(10.0).aligned(TextAlign::Right);
    let name_y = boxes_bottom.advance(SIGNATURE_GAP);
    canvas.text(settings.signatory_name.trim(), RIGHT_EDGE, name_y.y, &style);
    let label_y = name_y.advance(SIGNATURE_LABEL_GAP);
    canvas.text(settings.signature(), RIGHT_EDGE, label_y.y, &style);
    label_y
}

/// Lay out the whole page. Returns the cursor at the signature label.
///
/// Fails with [`RenderError::FooterOverflow`] when the signature lands
/// below the bottom margin; whatever was drawn must then be discarded.
pub fn page<C: Canvas>(
    canvas: &mut C,
    header: &InvoiceHeader,
    items: &[LineItem],
    totals: &Totals,
    settings: &Settings,
) -> Result<Cursor, RenderError> {
    letterhead(canvas, settings);
    divider(canvas);
    title(canvas, settings);
    let details = invoice_details(canvas, header, settings);
    let billing = bill_to(canvas, header, settings);

    let table_top = billing.max(details).advance(SECTION_GAP);
    let table_bottom = draw_item_table(canvas, items, table_top)?;

    let summary_top = table_bottom.advance(SECTION_GAP);
    let currency = header.currency.trim();
    let band_bottom = totals_block(canvas, totals, currency, settings, summary_top);

    let note_text = if header.notes.trim().is_empty() {
        &settings.default_notes
    } else {
        &header.notes
    };
    let notes_bottom = notes(canvas, note_text, summary_top);

    let boxes_top = band_bottom.max(notes_bottom).advance(BOX_GAP);
    let boxes_bottom = payment_boxes(canvas, settings, boxes_top);
    let end = signature(canvas, settings, boxes_bottom);
    if end.y > PAGE_HEIGHT - MARGIN {
        return Err(RenderError::FooterOverflow { bottom: end.y });
    }
    Ok(end)
}
