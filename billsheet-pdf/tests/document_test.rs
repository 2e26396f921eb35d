use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use billsheet_pdf::{BuiltinFont, PdfDocument, PdfError, TextAlign, TextStyle};

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

#[test]
fn create_empty_document() {
    let mut doc = PdfDocument::new(Vec::<u8>::new()).unwrap();
    doc.begin_page(595.28, 841.89);
    doc.end_page().unwrap();
    let bytes = doc.end_document().unwrap();
    assert!(bytes.starts_with(b"%PDF-1.7"));
    assert!(contains(&bytes, b"/Count 1"));
    assert!(bytes.ends_with(b"%%EOF\n"));
}

#[test]
fn builtin_fonts_declare_win_ansi() {
    let doc = PdfDocument::new(Vec::<u8>::new()).unwrap();
    let bytes = doc.end_document().unwrap();
    assert!(contains(&bytes, b"/BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding"));
    assert!(contains(&bytes, b"/BaseFont /Helvetica-BoldOblique"));
}

#[test]
fn set_info_appears_in_output() {
    let mut doc = PdfDocument::new(Vec::<u8>::new()).unwrap();
    doc.set_info("Title", "Invoice INV-7");
    doc.begin_page(595.28, 841.89);
    let bytes = doc.end_document().unwrap();
    assert!(contains(&bytes, b"/Title (Invoice INV-7)"));
    assert!(contains(&bytes, b"/Info"));
}

#[test]
fn styled_text_in_content_stream() {
    let mut doc = PdfDocument::new(Vec::<u8>::new()).unwrap();
    doc.begin_page(595.28, 841.89);
    let title = TextStyle::new(BuiltinFont::HelveticaBold, 20.0);
    doc.place_text_aligned("INVOICE", 20.0, 700.0, &title, TextAlign::Left);
    let bytes = doc.end_document().unwrap();
    assert!(contains(&bytes, b"/F2 20 Tf\n20 700 Td\n(INVOICE) Tj"));
}

#[test]
fn right_aligned_text_ends_at_anchor() {
    let style = TextStyle::new(BuiltinFont::Helvetica, 10.0);
    let width = style.measure("Total");
    let mut doc = PdfDocument::new(Vec::<u8>::new()).unwrap();
    doc.begin_page(595.28, 841.89);
    doc.place_text_aligned("Total", 500.0, 100.0, &style, TextAlign::Right);
    let bytes = doc.end_document().unwrap();
    let expected = format!("{:.2} 100 Td", 500.0 - width);
    assert!(contains(&bytes, expected.as_bytes()), "missing {}", expected);
}

#[test]
fn compression_adds_flate_filter() {
    let mut doc = PdfDocument::new(Vec::<u8>::new()).unwrap();
    doc.set_compression(true);
    doc.begin_page(595.28, 841.89);
    doc.place_text_aligned("compressed", 20.0, 20.0, &TextStyle::default(), TextAlign::Left);
    let bytes = doc.end_document().unwrap();
    assert!(contains(&bytes, b"/Filter /FlateDecode"));
    assert!(!contains(&bytes, b"(compressed) Tj"));
}

#[test]
fn identical_documents_are_byte_identical() {
    let build = || {
        let mut doc = PdfDocument::new(Vec::<u8>::new()).unwrap();
        doc.set_compression(true);
        doc.set_info("Title", "same");
        doc.begin_page(595.28, 841.89);
        doc.place_text_aligned("same text", 40.0, 40.0, &TextStyle::default(), TextAlign::Left);
        doc.end_document().unwrap()
    };
    assert_eq!(build(), build());
}

#[test]
fn drawing_without_page_is_reported_at_end() {
    let mut doc = PdfDocument::new(Vec::<u8>::new()).unwrap();
    doc.rect(10.0, 10.0, 20.0, 20.0);
    match doc.end_document() {
        Err(PdfError::NoOpenPage(caller)) => assert_eq!(caller, "rect"),
        other => panic!("expected NoOpenPage, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn non_finite_coordinate_fails_end_page() {
    let mut doc = PdfDocument::new(Vec::<u8>::new()).unwrap();
    doc.begin_page(595.28, 841.89);
    doc.place_text_aligned("x", f64::NAN, 10.0, &TextStyle::default(), TextAlign::Left);
    assert!(matches!(doc.end_page(), Err(PdfError::NonFiniteCoordinate(_))));
}

#[test]
fn end_page_without_page_is_an_error() {
    let mut doc = PdfDocument::new(Vec::<u8>::new()).unwrap();
    assert!(matches!(doc.end_page(), Err(PdfError::NoOpenPage("end_page"))));
}

/// Page content stays in memory until `end_page`, then is flushed.
#[test]
fn end_page_flushes_to_writer() {
    struct TrackingWriter {
        byte_count: Rc<RefCell<usize>>,
        inner: Vec<u8>,
    }

    impl Write for TrackingWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let n = self.inner.write(buf)?;
            *self.byte_count.borrow_mut() += n;
            Ok(n)
        }
        fn flush(&mut self) -> io::Result<()> {
            self.inner.flush()
        }
    }

    let counter = Rc::new(RefCell::new(0usize));
    let writer = TrackingWriter {
        byte_count: counter.clone(),
        inner: Vec::new(),
    };

    let mut doc = PdfDocument::new(writer).unwrap();
    let after_init = *counter.borrow();

    doc.begin_page(595.28, 841.89);
    doc.place_text_aligned("Hello", 20.0, 20.0, &TextStyle::default(), TextAlign::Left);
    assert_eq!(*counter.borrow(), after_init);

    doc.end_page().unwrap();
    assert!(*counter.borrow() > after_init);
    doc.end_document().unwrap();
}
