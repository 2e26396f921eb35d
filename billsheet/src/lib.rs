pub mod catalog;
pub mod draft;
pub mod error;
pub mod export;
pub mod format;
pub mod layout;
pub mod ledger;
pub mod model;
pub mod session;
pub mod store;
pub mod totals;
pub mod validate;

pub use catalog::Catalog;
pub use draft::{Draft, DraftBook};
pub use error::{ExportError, Field, RenderError, StoreError, ValidationError};
pub use export::{DirectorySink, DocumentSink, Export, MemorySink};
pub use layout::{render, render_to, Canvas, Document, PdfCanvas, RenderMode};
pub use ledger::Ledger;
pub use model::{Client, InvoiceHeader, LineItem, LineItemDraft, Period, Service, Settings};
pub use session::InvoiceSession;
pub use store::{FileStore, MemoryStore, RecordStore};
pub use totals::{compute_totals, item_tax, Totals};
pub use validate::{validate, ValidationReport};
