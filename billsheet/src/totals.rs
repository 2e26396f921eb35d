use serde::Serialize;

use crate::model::LineItem;

/// Derived invoice figures. Never stored; recompute with
/// [`compute_totals`] whenever the ledger or an adjustment changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub subtotal: f64,
    pub tax: f64,
    pub discount: f64,
    pub shipping: f64,
    pub grand_total: f64,
}

impl Totals {
    /// Tax as a percentage of the subtotal, for display. Zero when
    /// there is no subtotal.
    pub fn effective_tax_rate(&self) -> f64 {
        if self.subtotal > 0.0 {
            self.tax / self.subtotal * 100.0
        } else {
            0.0
        }
    }

    /// Subtotal plus tax, before shipping and discount.
    pub fn total(&self) -> f64 {
        self.subtotal + self.tax
    }
}

/// Tax charged on one row.
pub fn item_tax(item: &LineItem) -> f64 {
    item.amount() * item.tax_pct() / 100.0
}

/// Sum the ledger and apply the flat discount and shipping. The grand
/// total never goes below zero.
pub fn compute_totals(items: &[LineItem], discount: f64, shipping: f64) -> Totals {
    let subtotal: f64 = items.iter().map(LineItem::amount).sum();
    let tax: f64 = items.iter().map(item_tax).sum();
    let grand_total = (subtotal + tax + shipping - discount).max(0.0);
    Totals {
        subtotal,
        tax,
        discount,
        shipping,
        grand_total,
    }
}
