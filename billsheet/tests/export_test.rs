use billsheet::{
    DirectorySink, Export, ExportError, Field, InvoiceHeader, InvoiceSession, LineItemDraft,
    MemorySink, RenderMode, Settings, ValidationError,
};
use tempfile::TempDir;

fn settings() -> Settings {
    Settings {
        company_name: "Imagine Studios".into(),
        invoice_prefix: "INV-".into(),
        default_currency: "INR".into(),
        ..Settings::default()
    }
}

fn ready_session() -> InvoiceSession {
    let mut session = InvoiceSession::new(&settings());
    session.header = InvoiceHeader {
        invoice_number: "7".into(),
        invoice_date: "2024-05-10".into(),
        client_name: "Acme Corp".into(),
        client_email: "ap@acme.test".into(),
        client_address: "1 Main St".into(),
        ..session.header.clone()
    };
    session
        .add_item(LineItemDraft::new("Audit", 2.0, 250.0, 18.0))
        .unwrap();
    session
}

#[test]
fn empty_ledger_blocks_export_without_an_artifact() {
    let mut session = ready_session();
    session.remove_item(0);
    let dir = TempDir::new().unwrap();
    let mut sink = DirectorySink::new(dir.path().join("out"));

    let err = session
        .export(&settings(), RenderMode::Save, &mut sink)
        .unwrap_err();
    match err {
        ExportError::Invalid(report) => {
            assert_eq!(report.errors(), &[ValidationError::EmptyLedger]);
            assert_eq!(report.focus(), Some(Field::ServiceName));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!dir.path().join("out").exists());
}

#[test]
fn missing_fields_are_reported_in_form_order() {
    let session = InvoiceSession::new(&settings());
    let mut sink = MemorySink::new();
    let err = session
        .export(&settings(), RenderMode::Save, &mut sink)
        .unwrap_err();
    let ExportError::Invalid(report) = err else {
        panic!("expected validation failure");
    };
    assert_eq!(report.focus(), Some(Field::InvoiceNumber));
    assert_eq!(report.errors().last(), Some(&ValidationError::EmptyLedger));
    assert!(sink.documents.is_empty());
}

#[test]
fn save_writes_the_pdf_into_the_directory() {
    let session = ready_session();
    let dir = TempDir::new().unwrap();
    let mut sink = DirectorySink::new(dir.path());

    let export = session
        .export(&settings(), RenderMode::Save, &mut sink)
        .unwrap();
    let Export::Saved { file_name, location } = export else {
        panic!("expected a saved export");
    };
    assert_eq!(file_name, "Invoice_INV-7.pdf");
    assert_eq!(location, dir.path().join("Invoice_INV-7.pdf"));

    let bytes = std::fs::read(&location).unwrap();
    assert!(bytes.starts_with(b"%PDF-"));
    let leftovers: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(leftovers.len(), 1);
}

#[test]
fn preview_does_not_touch_the_sink() {
    let session = ready_session();
    let mut sink = MemorySink::new();
    let export = session
        .export(&settings(), RenderMode::Preview, &mut sink)
        .unwrap();
    match export {
        Export::Preview(doc) => {
            assert_eq!(doc.mode, RenderMode::Preview);
            assert!(!doc.bytes.is_empty());
        }
        other => panic!("unexpected export: {other:?}"),
    }
    assert!(sink.documents.is_empty());
}

#[test]
fn render_failures_get_a_generic_message() {
    let mut session = ready_session();
    for i in 0..60 {
        session
            .add_item(LineItemDraft::new(format!("Extra {i}"), 1.0, 1.0, 0.0))
            .unwrap();
    }
    let mut sink = MemorySink::new();
    let err = session
        .export(&settings(), RenderMode::Save, &mut sink)
        .unwrap_err();
    assert!(matches!(err, ExportError::Render(_)));
    assert_eq!(err.user_message(), "Failed to generate PDF. Please try again.");
    assert!(sink.documents.is_empty());
}
