use std::slice;

use tracing::debug;

use crate::error::ValidationError;
use crate::model::{LineItem, LineItemDraft};

/// Ordered line items of one invoice. Insertion order is table order;
/// duplicates are allowed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    items: Vec<LineItem>,
}

impl Ledger {
    pub fn new() -> Self {
        Ledger::default()
    }

    /// Validate `draft` and append it. On failure the ledger is unchanged.
    pub fn add(&mut self, draft: LineItemDraft) -> Result<&LineItem, ValidationError> {
        let item = LineItem::try_from_draft(draft)?;
        debug!(
            service = item.service_name(),
            amount = item.amount(),
            position = self.items.len(),
            "line item added"
        );
        let index = self.items.len();
        self.items.push(item);
        Ok(&self.items[index])
    }

    /// Remove the item at `index`. Out-of-range indexes are ignored.
    pub fn remove(&mut self, index: usize) -> Option<LineItem> {
        if index >= self.items.len() {
            debug!(index, len = self.items.len(), "remove ignored: no such line item");
            return None;
        }
        let item = self.items.remove(index);
        debug!(index, service = item.service_name(), "line item removed");
        Some(item)
    }

    pub fn list(&self) -> &[LineItem] {
        &self.items
    }

    pub fn iter(&self) -> slice::Iter<'_, LineItem> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = &'a LineItem;
    type IntoIter = slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
