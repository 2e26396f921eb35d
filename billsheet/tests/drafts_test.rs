use billsheet::store::DRAFTS_KEY;
use billsheet::{
    DraftBook, InvoiceSession, LineItemDraft, MemoryStore, Period, RecordStore, Settings,
    StoreError,
};

fn session(settings: &Settings) -> InvoiceSession {
    let mut session = InvoiceSession::new(settings);
    session.header.invoice_number = "12".into();
    session.header.client_name = "Acme Corp".into();
    session
        .add_item(
            LineItemDraft::new("Retainer", 1.0, 900.0, 5.0)
                .with_hsn("998311")
                .with_period(Period::Text("March".into())),
        )
        .unwrap();
    session.set_discount(50.0);
    session.set_shipping(10.0);
    session
}

#[test]
fn saved_draft_reopens_as_the_same_invoice() {
    let settings = Settings::default();
    let book = DraftBook::new(MemoryStore::new());
    let original = session(&settings);

    let draft = book.save(&original, "  March retainer ").unwrap();
    assert_eq!(draft.name, "March retainer");

    let reopened = book.load("March retainer", &settings).unwrap();
    assert_eq!(reopened.header, original.header);
    assert_eq!(reopened.ledger(), original.ledger());
    assert_eq!(reopened.totals(), original.totals());
    assert_eq!(reopened.ledger().list()[0].period(), "March");
}

#[test]
fn saving_under_an_existing_name_replaces_it() {
    let settings = Settings::default();
    let book = DraftBook::new(MemoryStore::new());
    let mut session = session(&settings);
    book.save(&session, "acme").unwrap();
    session.set_shipping(0.0);
    book.save(&session, "acme").unwrap();
    book.save(&session, "other").unwrap();

    let drafts = book.list();
    assert_eq!(drafts.len(), 2);
    assert_eq!(drafts[0].shipping, 0.0);
}

#[test]
fn blank_name_is_rejected() {
    let book = DraftBook::new(MemoryStore::new());
    let err = book
        .save(&InvoiceSession::default(), "   ")
        .unwrap_err();
    assert!(matches!(err, StoreError::Rejected(_)));
    assert!(book.list().is_empty());
}

#[test]
fn delete_and_missing_load() {
    let settings = Settings::default();
    let book = DraftBook::new(MemoryStore::new());
    book.save(&session(&settings), "acme").unwrap();

    assert!(book.load("nope", &settings).is_none());
    assert!(book.delete("acme").unwrap());
    assert!(!book.delete("acme").unwrap());
    assert!(book.list().is_empty());
}

#[test]
fn invalid_stored_items_are_skipped_on_load() {
    let store = MemoryStore::new();
    store
        .set(
            DRAFTS_KEY,
            r#"[{"name":"hand","savedAt":"2024-01-01T00:00:00Z",
                "items":[{"serviceName":"Ok","qty":1,"rate":2,"taxPct":0},
                         {"serviceName":"Broken","qty":0,"rate":2,"taxPct":0}]}]"#,
        )
        .unwrap();
    let book = DraftBook::new(&store);
    let session = book.load("hand", &Settings::default()).unwrap();
    assert_eq!(session.ledger().len(), 1);
    assert_eq!(session.totals().grand_total, 2.0);
}
