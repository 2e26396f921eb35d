pub mod document;
pub mod error;
pub mod fonts;
pub mod graphics;
pub mod objects;
pub mod tables;
pub mod wrap;
pub mod writer;

pub use document::{PdfDocument, TextAlign, TextStyle};
pub use error::{PdfError, Result};
pub use fonts::{BuiltinFont, FontMetrics};
pub use graphics::Color;
pub use tables::{
    Cell, CellContent, CellFrame, CellPainter, CellStyle, FitResult, Rect, Row, Run, Table,
    TableCursor,
};
pub use wrap::wrap_text;
