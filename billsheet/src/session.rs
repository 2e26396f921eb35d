use tracing::{debug, error, info, warn};

use crate::error::{ExportError, ValidationError};
use crate::export::{DocumentSink, Export};
use crate::layout::{render, RenderMode};
use crate::ledger::Ledger;
use crate::model::{Client, InvoiceHeader, LineItemDraft, Service, Settings};
use crate::totals::{compute_totals, Totals};
use crate::validate::ValidationReport;

/// Editing state of one invoice: header fields, line items and the two
/// adjustments. Every mutator returns freshly computed totals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvoiceSession {
    pub header: InvoiceHeader,
    ledger: Ledger,
    discount: f64,
    shipping: f64,
    default_tax_pct: f64,
}

/// Negative and non-finite adjustments count as zero.
fn clamp_adjustment(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

impl InvoiceSession {
    /// A blank invoice seeded with the organization defaults.
    pub fn new(settings: &Settings) -> Self {
        InvoiceSession {
            header: InvoiceHeader {
                currency: settings.default_currency.clone(),
                payment_terms: settings.default_payment_terms,
                notes: settings.default_notes.clone(),
                ..InvoiceHeader::default()
            },
            default_tax_pct: settings.default_tax_pct,
            ..InvoiceSession::default()
        }
    }

    /// Rebuild a session from stored parts. Items are re-validated;
    /// any that fail are skipped with a warning.
    pub fn restore(
        header: InvoiceHeader,
        items: Vec<LineItemDraft>,
        discount: f64,
        shipping: f64,
        settings: &Settings,
    ) -> Self {
        let mut session = InvoiceSession {
            header,
            default_tax_pct: settings.default_tax_pct,
            ..InvoiceSession::default()
        };
        for (index, draft) in items.into_iter().enumerate() {
            if let Err(err) = session.ledger.add(draft) {
                warn!(index, error = %err, "skipping stored line item");
            }
        }
        session.discount = clamp_adjustment(discount);
        session.shipping = clamp_adjustment(shipping);
        session
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn discount(&self) -> f64 {
        self.discount
    }

    pub fn shipping(&self) -> f64 {
        self.shipping
    }

    pub fn totals(&self) -> Totals {
        compute_totals(self.ledger.list(), self.discount, self.shipping)
    }

    fn recomputed(&self) -> Totals {
        let totals = self.totals();
        debug!(
            subtotal = totals.subtotal,
            tax = totals.tax,
            grand_total = totals.grand_total,
            "totals recomputed"
        );
        totals
    }

    pub fn add_item(&mut self, draft: LineItemDraft) -> Result<Totals, ValidationError> {
        self.ledger.add(draft)?;
        Ok(self.recomputed())
    }

    pub fn remove_item(&mut self, index: usize) -> Totals {
        self.ledger.remove(index);
        self.recomputed()
    }

    pub fn set_discount(&mut self, discount: f64) -> Totals {
        self.discount = clamp_adjustment(discount);
        self.recomputed()
    }

    pub fn set_shipping(&mut self, shipping: f64) -> Totals {
        self.shipping = clamp_adjustment(shipping);
        self.recomputed()
    }

    /// A line item draft prefilled from a catalog service.
    pub fn draft_for(&self, service: &Service) -> LineItemDraft {
        LineItemDraft::from_service(service, self.default_tax_pct)
    }

    /// Copy a saved client into the header. Terms that are not a whole
    /// number of days leave the current terms alone.
    pub fn apply_client(&mut self, client: &Client) {
        self.header.client_name = client.name.clone();
        self.header.client_email = client.email.clone();
        self.header.client_phone = client.phone.clone();
        self.header.client_address = client.address.clone();
        if let Some(days) = client.terms_days() {
            self.header.payment_terms = days;
        }
    }

    pub fn validate(&self) -> ValidationReport {
        ValidationReport::check(&self.header, &self.ledger)
    }

    /// Validate, render and deliver. Preview mode returns the document
    /// without touching `sink`.
    pub fn export(
        &self,
        settings: &Settings,
        mode: RenderMode,
        sink: &mut dyn DocumentSink,
    ) -> Result<Export, ExportError> {
        let report = self.validate();
        if !report.is_empty() {
            warn!(errors = %report, "export blocked by validation");
            return Err(ExportError::Invalid(report));
        }

        let totals = self.totals();
        let document = render(&self.header, &self.ledger, &totals, settings, mode).map_err(|e| {
            error!(error = %e, "invoice render failed");
            ExportError::Render(e)
        })?;

        match mode {
            RenderMode::Preview => {
                info!(
                    file = %document.file_name,
                    bytes = document.bytes.len(),
                    "invoice preview ready"
                );
                Ok(Export::Preview(document))
            }
            RenderMode::Save => {
                let location = sink.deliver(&document).map_err(|e| {
                    error!(error = %e, file = %document.file_name, "invoice delivery failed");
                    ExportError::Delivery(e)
                })?;
                info!(
                    file = %document.file_name,
                    bytes = document.bytes.len(),
                    location = %location.display(),
                    "invoice saved"
                );
                Ok(Export::Saved {
                    file_name: document.file_name,
                    location,
                })
            }
        }
    }

    /// Start a fresh invoice with the organization defaults.
    pub fn reset(&mut self, settings: &Settings) {
        *self = InvoiceSession::new(settings);
    }
}
