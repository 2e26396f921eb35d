use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::StoreError;
use crate::model::{InvoiceHeader, LineItemDraft, Settings};
use crate::session::InvoiceSession;
use crate::store::{load_or_default, save, RecordStore, DRAFTS_KEY};

/// A named snapshot of an invoice in progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    pub name: String,
    pub saved_at: DateTime<Utc>,
    #[serde(default)]
    pub header: InvoiceHeader,
    #[serde(default)]
    pub items: Vec<LineItemDraft>,
    #[serde(default)]
    pub discount: f64,
    #[serde(default)]
    pub shipping: f64,
}

impl Draft {
    pub fn capture(name: &str, session: &InvoiceSession, saved_at: DateTime<Utc>) -> Self {
        Draft {
            name: name.to_string(),
            saved_at,
            header: session.header.clone(),
            items: session.ledger().iter().map(|item| item.to_draft()).collect(),
            discount: session.discount(),
            shipping: session.shipping(),
        }
    }
}

/// Named drafts kept in one record.
pub struct DraftBook<S> {
    store: S,
}

impl<S: RecordStore> DraftBook<S> {
    pub fn new(store: S) -> Self {
        DraftBook { store }
    }

    pub fn list(&self) -> Vec<Draft> {
        load_or_default(&self.store, DRAFTS_KEY)
    }

    /// Snapshot `session` under `name`, replacing a draft of the same name.
    pub fn save(&self, session: &InvoiceSession, name: &str) -> Result<Draft, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::Rejected("draft name is required".to_string()));
        }
        let draft = Draft::capture(name, session, Utc::now());
        let mut drafts = self.list();
        match drafts.iter_mut().find(|d| d.name == name) {
            Some(existing) => *existing = draft.clone(),
            None => drafts.push(draft.clone()),
        }
        save(&self.store, DRAFTS_KEY, &drafts)?;
        debug!(name, items = draft.items.len(), "draft saved");
        Ok(draft)
    }

    /// Reopen a draft as a session. Stored items go back through ledger
    /// validation.
    pub fn load(&self, name: &str, settings: &Settings) -> Option<InvoiceSession> {
        let name = name.trim();
        let draft = self.list().into_iter().find(|d| d.name == name)?;
        Some(InvoiceSession::restore(
            draft.header,
            draft.items,
            draft.discount,
            draft.shipping,
            settings,
        ))
    }

    pub fn delete(&self, name: &str) -> Result<bool, StoreError> {
        let name = name.trim();
        let mut drafts = self.list();
        let before = drafts.len();
        drafts.retain(|d| d.name != name);
        if drafts.len() == before {
            return Ok(false);
        }
        save(&self.store, DRAFTS_KEY, &drafts)?;
        Ok(true)
    }
}
