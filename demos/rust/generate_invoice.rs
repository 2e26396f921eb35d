/// Invoice example: catalog, session, draft and export end to end.
///
/// Run with:
///   cargo run --example generate_invoice -p billsheet-demos
///
/// Writes to: demos/output/Invoice_INV-2024-0042.pdf
use billsheet::store::save_settings;
use billsheet::{
    Catalog, Client, DirectorySink, DraftBook, Export, FileStore, InvoiceSession, Period,
    RenderMode, Service, Settings,
};
use tracing::info;

fn settings() -> Settings {
    Settings {
        company_name: "NovaPeak Solutions".into(),
        company_tagline: "Software consulting".into(),
        company_address: "400 Harbour Way\nVancouver, BC".into(),
        company_email: "accounts@novapeak.test".into(),
        company_phone: "+1 604 555 0142".into(),
        bank_name: "Northern Trust".into(),
        bank_account: "0042-118-7731".into(),
        bank_holder: "NovaPeak Solutions Ltd".into(),
        bank_swift: "NTRSCA22".into(),
        default_currency: "CAD".into(),
        default_tax_pct: 5.0,
        default_payment_terms: 30,
        default_notes: "Thank you for your business.".into(),
        signatory_name: "J. Rivera".into(),
        invoice_prefix: "INV-".into(),
        tax_label: "GST".into(),
        ..Settings::default()
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().init();

    let settings = settings();
    let store = FileStore::new("demos/output/data");
    save_settings(&store, &settings)?;

    let catalog = Catalog::new(&store);
    catalog.upsert_client(Client {
        name: "Acme Corp".into(),
        email: "ap@acme.test".into(),
        address: "1 Main St\nSpringfield, OR".into(),
        terms: "15".into(),
        ..Client::default()
    })?;
    catalog.upsert_service(Service {
        name: "Platform engineering".into(),
        hsn: "998314".into(),
        desc: "Build pipeline and deployment work".into(),
    })?;
    catalog.upsert_service(Service {
        name: "Support retainer".into(),
        hsn: "998316".into(),
        desc: String::new(),
    })?;

    let mut session = InvoiceSession::new(&settings);
    session.header.invoice_number = "2024-0042".into();
    session.header.invoice_date = "2024-03-01".into();
    if let Some(client) = catalog.find_client("ap@acme.test") {
        session.apply_client(&client);
    }
    for service in catalog.services() {
        let mut draft = session.draft_for(&service);
        draft.qty = 10.0;
        draft.rate = 145.0;
        draft.period = Period::Text("March 2024".into());
        session.add_item(draft)?;
    }
    session.set_shipping(0.0);
    let totals = session.set_discount(100.0);
    info!(grand_total = totals.grand_total, "invoice ready");

    DraftBook::new(&store).save(&session, "Acme March")?;

    let mut sink = DirectorySink::new("demos/output");
    match session.export(&settings, RenderMode::Save, &mut sink) {
        Ok(Export::Saved { location, .. }) => println!("Written to {}", location.display()),
        Ok(Export::Preview(_)) => {}
        Err(e) => {
            eprintln!("{}", e.user_message());
            return Err(e.into());
        }
    }
    Ok(())
}
