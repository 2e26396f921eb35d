use std::fmt;
use std::io;

use billsheet_pdf::PdfError;
use thiserror::Error;

use crate::validate::ValidationReport;

/// Form fields a validation failure can point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    ServiceName,
    InvoiceNumber,
    InvoiceDate,
    ClientName,
    ClientEmail,
    ClientAddress,
}

impl Field {
    pub fn label(&self) -> &'static str {
        match self {
            Field::ServiceName => "service name",
            Field::InvoiceNumber => "invoice number",
            Field::InvoiceDate => "invoice date",
            Field::ClientName => "client name",
            Field::ClientEmail => "client email",
            Field::ClientAddress => "client address",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A rejected line item or an incomplete invoice.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(Field),

    #[error("quantity must be greater than zero")]
    InvalidQuantity,

    #[error("rate and tax must not be negative")]
    NegativeValue,

    #[error("add at least one line item")]
    EmptyLedger,
}

impl ValidationError {
    /// The field the user should be sent to. An empty ledger points at
    /// the service name input, where the next item is entered.
    pub fn field(&self) -> Option<Field> {
        match self {
            ValidationError::MissingField(field) => Some(*field),
            ValidationError::EmptyLedger => Some(Field::ServiceName),
            ValidationError::InvalidQuantity | ValidationError::NegativeValue => None,
        }
    }
}

/// Failures while laying out or serializing the document.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Pdf(#[from] PdfError),

    #[error("line item {row} does not fit on the page")]
    PageOverflow { row: usize },

    /// The table fit, but the blocks below it end past the bottom margin.
    #[error("invoice footer ends at {bottom:.1} mm, past the bottom margin")]
    FooterOverflow { bottom: f64 },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("record {key} could not be parsed: {source}")]
    Parse {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0}")]
    Rejected(String),
}

/// Everything that can stop an export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("invoice is incomplete: {0}")]
    Invalid(ValidationReport),

    #[error("rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("delivering the document failed: {0}")]
    Delivery(#[from] io::Error),
}

impl ExportError {
    /// Text shown to the user. Render and delivery failures collapse
    /// into one generic notice; details go to the log.
    pub fn user_message(&self) -> String {
        match self {
            ExportError::Invalid(report) => report.to_string(),
            ExportError::Render(_) | ExportError::Delivery(_) => {
                "Failed to generate PDF. Please try again.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_field_message_names_field() {
        let err = ValidationError::MissingField(Field::ClientEmail);
        assert_eq!(err.to_string(), "client email is required");
    }

    #[test]
    fn render_failure_message_is_generic() {
        let err = ExportError::Render(RenderError::PageOverflow { row: 40 });
        assert_eq!(err.user_message(), "Failed to generate PDF. Please try again.");
        assert!(err.to_string().contains("line item 40"));
    }
}
