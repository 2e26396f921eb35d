use std::io;

use thiserror::Error;

/// Errors raised while building or writing a PDF.
///
/// Drawing calls on `PdfDocument` chain and do not return errors
/// themselves; the first failure is held and reported by the next
/// `end_page`, `fit_row` or `end_document` call.
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("{0} called with no open page")]
    NoOpenPage(&'static str),

    #[error("non-finite coordinate passed to {0}")]
    NonFiniteCoordinate(&'static str),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, PdfError>;
