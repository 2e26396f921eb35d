use std::fmt;

use crate::error::{Field, ValidationError};
use crate::ledger::Ledger;
use crate::model::InvoiceHeader;

/// Check that an invoice is complete enough to export. Every problem
/// is reported, in form order, with the ledger check last.
pub fn validate(header: &InvoiceHeader, ledger: &Ledger) -> Vec<ValidationError> {
    let required = [
        (Field::InvoiceNumber, &header.invoice_number),
        (Field::InvoiceDate, &header.invoice_date),
        (Field::ClientName, &header.client_name),
        (Field::ClientEmail, &header.client_email),
        (Field::ClientAddress, &header.client_address),
    ];
    let mut errors: Vec<ValidationError> = required
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| ValidationError::MissingField(*field))
        .collect();
    if ledger.is_empty() {
        errors.push(ValidationError::EmptyLedger);
    }
    errors
}

/// All pre-export failures for one invoice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    errors: Vec<ValidationError>,
}

impl ValidationReport {
    pub fn check(header: &InvoiceHeader, ledger: &Ledger) -> Self {
        ValidationReport {
            errors: validate(header, ledger),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// The first failing field; it should receive input focus.
    pub fn focus(&self) -> Option<Field> {
        self.errors.iter().find_map(ValidationError::field)
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LineItemDraft;

    fn complete_header() -> InvoiceHeader {
        InvoiceHeader {
            invoice_number: "042".into(),
            invoice_date: "2025-03-01".into(),
            client_name: "Acme".into(),
            client_email: "ap@acme.test".into(),
            client_address: "1 Road".into(),
            ..InvoiceHeader::default()
        }
    }

    fn one_item() -> Ledger {
        let mut ledger = Ledger::new();
        ledger.add(LineItemDraft::new("Work", 1.0, 1.0, 0.0)).unwrap();
        ledger
    }

    #[test]
    fn complete_invoice_passes() {
        assert!(validate(&complete_header(), &one_item()).is_empty());
    }

    #[test]
    fn errors_aggregate_in_form_order() {
        let header = InvoiceHeader {
            client_name: " ".into(),
            invoice_number: String::new(),
            ..complete_header()
        };
        let report = ValidationReport::check(&header, &Ledger::new());
        assert_eq!(
            report.errors(),
            &[
                ValidationError::MissingField(Field::InvoiceNumber),
                ValidationError::MissingField(Field::ClientName),
                ValidationError::EmptyLedger,
            ]
        );
        assert_eq!(report.focus(), Some(Field::InvoiceNumber));
        assert_eq!(
            report.to_string(),
            "invoice number is required; client name is required; add at least one line item"
        );
    }

    #[test]
    fn empty_ledger_focuses_service_entry() {
        let report = ValidationReport::check(&complete_header(), &Ledger::new());
        assert_eq!(report.focus(), Some(Field::ServiceName));
    }
}
