use chrono::{Days, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Field, ValidationError};
use crate::format::{format_date, format_date_range, parse_iso_date};

/// Billing period of a line item as entered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum Period {
    #[default]
    None,
    Text(String),
    Date(NaiveDate),
    Range(NaiveDate, NaiveDate),
}

impl Period {
    /// Printed form of the period, or `None` when there is nothing to show.
    pub fn label(&self) -> Option<String> {
        let label = match self {
            Period::None => return None,
            Period::Text(text) => text.clone(),
            Period::Date(date) => format_date(*date),
            Period::Range(from, to) => format_date_range(*from, *to),
        };
        if label.trim().is_empty() {
            None
        } else {
            Some(label)
        }
    }
}

/// Candidate line item, as typed into the form. Becomes a `LineItem`
/// only through validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LineItemDraft {
    pub service_name: String,
    pub hsn: String,
    pub service_desc: String,
    pub period: Period,
    pub qty: f64,
    pub rate: f64,
    pub tax_pct: f64,
}

impl LineItemDraft {
    pub fn new(service_name: impl Into<String>, qty: f64, rate: f64, tax_pct: f64) -> Self {
        LineItemDraft {
            service_name: service_name.into(),
            qty,
            rate,
            tax_pct,
            ..LineItemDraft::default()
        }
    }

    /// Prefill name, HSN and description from a catalog entry. Quantity
    /// starts at one; the rate is left for the user.
    pub fn from_service(service: &Service, default_tax_pct: f64) -> Self {
        LineItemDraft {
            service_name: service.name.clone(),
            hsn: service.hsn.clone(),
            service_desc: service.desc.clone(),
            period: Period::None,
            qty: 1.0,
            rate: 0.0,
            tax_pct: default_tax_pct,
        }
    }

    pub fn with_hsn(mut self, hsn: impl Into<String>) -> Self {
        self.hsn = hsn.into();
        self
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.service_desc = desc.into();
        self
    }

    pub fn with_period(mut self, period: Period) -> Self {
        self.period = period;
        self
    }
}

/// One validated invoice row. `amount` is fixed at `qty * rate` when
/// the item is built and has no setter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    service_name: String,
    hsn: String,
    service_desc: String,
    period: String,
    qty: f64,
    rate: f64,
    tax_pct: f64,
    amount: f64,
}

impl LineItem {
    /// Validate a draft. Checks run in order and the first failure wins:
    /// service name, then quantity, then rate and tax.
    pub fn try_from_draft(draft: LineItemDraft) -> Result<LineItem, ValidationError> {
        let service_name = draft.service_name.trim();
        if service_name.is_empty() {
            return Err(ValidationError::MissingField(Field::ServiceName));
        }
        if !(draft.qty.is_finite() && draft.qty > 0.0) {
            return Err(ValidationError::InvalidQuantity);
        }
        let non_negative = |v: f64| v.is_finite() && v >= 0.0;
        if !(non_negative(draft.rate) && non_negative(draft.tax_pct)) {
            return Err(ValidationError::NegativeValue);
        }

        Ok(LineItem {
            service_name: service_name.to_string(),
            hsn: draft.hsn.trim().to_string(),
            service_desc: draft.service_desc.trim().to_string(),
            period: draft.period.label().unwrap_or_default(),
            qty: draft.qty,
            rate: draft.rate,
            tax_pct: draft.tax_pct,
            amount: draft.qty * draft.rate,
        })
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    pub fn hsn(&self) -> &str {
        &self.hsn
    }

    pub fn service_desc(&self) -> &str {
        &self.service_desc
    }

    /// Normalized period label; empty when none was given.
    pub fn period(&self) -> &str {
        &self.period
    }

    pub fn qty(&self) -> f64 {
        self.qty
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn tax_pct(&self) -> f64 {
        self.tax_pct
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// Draft that rebuilds this item. The period is carried as its label.
    pub fn to_draft(&self) -> LineItemDraft {
        let period = if self.period.is_empty() {
            Period::None
        } else {
            Period::Text(self.period.clone())
        };
        LineItemDraft {
            service_name: self.service_name.clone(),
            hsn: self.hsn.clone(),
            service_desc: self.service_desc.clone(),
            period,
            qty: self.qty,
            rate: self.rate,
            tax_pct: self.tax_pct,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InvoiceHeader {
    pub invoice_number: String,
    /// As entered; `YYYY-MM-DD` is expected.
    pub invoice_date: String,
    pub currency: String,
    /// Days until payment is due.
    pub payment_terms: u32,
    pub client_name: String,
    pub client_address: String,
    pub client_email: String,
    pub client_phone: String,
    pub notes: String,
}

impl InvoiceHeader {
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_iso_date(&self.invoice_date)
    }

    /// Invoice date plus payment terms. `None` when the date does not parse.
    pub fn due_date(&self) -> Option<NaiveDate> {
        self.parsed_date()?
            .checked_add_days(Days::new(u64::from(self.payment_terms)))
    }
}

/// Organization defaults and document labels. Keys match the records
/// the browser tool wrote, so existing settings load unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub company_name: String,
    pub company_tagline: String,
    pub company_address: String,
    pub company_email: String,
    pub company_phone: String,
    pub company_gstin: String,

    pub bank_name: String,
    pub bank_account: String,
    pub bank_holder: String,
    pub bank_swift: String,
    pub bank_upi: String,

    pub default_currency: String,
    pub default_tax_pct: f64,
    pub default_payment_terms: u32,
    pub default_notes: String,

    pub signatory_name: String,
    pub invoice_prefix: String,

    pub invoice_title: String,
    pub bill_to_label: String,
    pub tax_label: String,
    pub signature_label: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            company_name: String::new(),
            company_tagline: String::new(),
            company_address: String::new(),
            company_email: String::new(),
            company_phone: String::new(),
            company_gstin: String::new(),
            bank_name: String::new(),
            bank_account: String::new(),
            bank_holder: String::new(),
            bank_swift: String::new(),
            bank_upi: String::new(),
            default_currency: "CAD".to_string(),
            default_tax_pct: 0.0,
            default_payment_terms: 0,
            default_notes: String::new(),
            signatory_name: String::new(),
            invoice_prefix: String::new(),
            invoice_title: String::new(),
            bill_to_label: String::new(),
            tax_label: String::new(),
            signature_label: String::new(),
        }
    }
}

fn or_default<'a>(custom: &'a str, fallback: &'a str) -> &'a str {
    let custom = custom.trim();
    if custom.is_empty() {
        fallback
    } else {
        custom
    }
}

impl Settings {
    pub fn title(&self) -> &str {
        or_default(&self.invoice_title, "INVOICE")
    }

    pub fn bill_to(&self) -> &str {
        or_default(&self.bill_to_label, "Bill To")
    }

    pub fn tax_name(&self) -> &str {
        or_default(&self.tax_label, "Tax")
    }

    pub fn signature(&self) -> &str {
        or_default(&self.signature_label, "Authorised Signatory")
    }

    /// Name printed in the "Payable To" box.
    pub fn payee(&self) -> &str {
        or_default(&self.bank_holder, &self.company_name)
    }
}

/// Saved client, keyed by email.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Client {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    /// Payment terms in days, kept as entered.
    #[serde(deserialize_with = "text_or_number")]
    pub terms: String,
}

impl Client {
    pub fn terms_days(&self) -> Option<u32> {
        self.terms.trim().parse().ok()
    }
}

/// Saved service, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Service {
    pub name: String,
    pub hsn: String,
    pub desc: String,
}

/// Form values were stored as strings, but hand-edited records may hold
/// plain numbers.
fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TextOrNumber {
        Text(String),
        Number(serde_json::Number),
        Null(()),
    }

    Ok(match TextOrNumber::deserialize(deserializer)? {
        TextOrNumber::Text(text) => text,
        TextOrNumber::Number(n) => n.to_string(),
        TextOrNumber::Null(()) => String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> LineItemDraft {
        LineItemDraft::new("Consulting", 10.0, 50.0, 10.0)
    }

    #[test]
    fn amount_is_qty_times_rate() {
        let item = LineItem::try_from_draft(draft()).unwrap();
        assert_eq!(item.amount(), 500.0);
    }

    #[test]
    fn name_checked_before_quantity() {
        let mut d = draft();
        d.service_name = "   ".into();
        d.qty = 0.0;
        assert_eq!(
            LineItem::try_from_draft(d),
            Err(ValidationError::MissingField(Field::ServiceName))
        );
    }

    #[test]
    fn quantity_checked_before_rate() {
        let mut d = draft();
        d.qty = f64::NAN;
        d.rate = -1.0;
        assert_eq!(LineItem::try_from_draft(d), Err(ValidationError::InvalidQuantity));
    }

    #[test]
    fn negative_tax_rejected() {
        let mut d = draft();
        d.tax_pct = -5.0;
        assert_eq!(LineItem::try_from_draft(d), Err(ValidationError::NegativeValue));
    }

    #[test]
    fn zero_rate_allowed() {
        let mut d = draft();
        d.rate = 0.0;
        assert_eq!(LineItem::try_from_draft(d).unwrap().amount(), 0.0);
    }

    #[test]
    fn period_range_is_normalized() {
        let from = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        let item = LineItem::try_from_draft(draft().with_period(Period::Range(from, to))).unwrap();
        assert_eq!(item.period(), "[01 Jan 2025 - 31 Jan 2025]");
        assert_eq!(Period::Text("  ".into()).label(), None);
    }

    #[test]
    fn free_text_period_is_kept_as_typed() {
        let period = Period::Text(" Q3 (Jul - Sep) ".into());
        assert_eq!(period.label().as_deref(), Some(" Q3 (Jul - Sep) "));
    }

    #[test]
    fn due_date_adds_terms() {
        let header = InvoiceHeader {
            invoice_date: "2025-01-25".into(),
            payment_terms: 15,
            ..InvoiceHeader::default()
        };
        assert_eq!(header.due_date(), NaiveDate::from_ymd_opt(2025, 2, 9));

        let undated = InvoiceHeader {
            invoice_date: "soon".into(),
            ..header
        };
        assert_eq!(undated.due_date(), None);
    }

    #[test]
    fn settings_read_legacy_keys() {
        let json = r#"{"companyName":"Imagine Studios","companyGstin":"08ABC","defaultTaxPct":18}"#;
        let s: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(s.company_name, "Imagine Studios");
        assert_eq!(s.company_gstin, "08ABC");
        assert_eq!(s.default_tax_pct, 18.0);
        assert_eq!(s.default_currency, "CAD");
        assert_eq!(s.title(), "INVOICE");
    }

    #[test]
    fn client_terms_accept_numbers() {
        let json = r#"{"name":"A","email":"a@x.io","terms":30}"#;
        let c: Client = serde_json::from_str(json).unwrap();
        assert_eq!(c.terms, "30");
        assert_eq!(c.terms_days(), Some(30));
    }

    #[test]
    fn service_prefills_draft() {
        let service = Service {
            name: "Design".into(),
            hsn: "998391".into(),
            desc: "Logo work".into(),
        };
        let d = LineItemDraft::from_service(&service, 18.0);
        assert_eq!(d.hsn, "998391");
        assert_eq!(d.qty, 1.0);
        assert_eq!(d.tax_pct, 18.0);
    }
}
