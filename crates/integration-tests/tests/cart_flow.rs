//! End-to-end cart flows through a session.

use storecart::{
    CartCommand, CartListing, CatalogItem, CheckoutOutcome, Locale, LocaleId, Persistence,
    ProductDraft, QuantityEdit, ReconcileStrategy,
};
use storecart_core::{CartEntry, Price, ProductId, Quantity};
use storecart_integration_tests::{load_page, test_config};

fn id(s: &str) -> ProductId {
    ProductId::parse(s).expect("valid id")
}

fn entry(name: &str, title: &str, price: u64, quantity: u32) -> CartEntry {
    CartEntry::new(
        id(name),
        title,
        Price::new(price),
        Quantity::new(quantity).expect("nonzero quantity"),
    )
}

// ============================================================================
// Add and merge
// ============================================================================

#[test]
fn test_add_twice_updates_counter_and_total() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut page = load_page(&test_config(), dir.path());

    page.dispatch(CartCommand::AddItem(entry("P1", "Подушка", 1000, 1)))
        .expect("add");
    assert!(page.presenter().counter_html().contains(">1<"));
    assert!(page.presenter().summary_html().contains("1\u{a0}000 ₽"));

    page.dispatch(CartCommand::AddItem(entry("P1", "Подушка", 1000, 2)))
        .expect("add");
    assert_eq!(page.query().len(), 1);
    assert!(page.presenter().counter_html().contains(">3<"));
    assert!(page.presenter().summary_html().contains("3\u{a0}000 ₽"));
    assert!(page.presenter().summary_html().contains("Товары (3 шт.)"));
}

#[test]
fn test_distinct_products_keep_insertion_order() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut page = load_page(&test_config(), dir.path());

    for (name, price) in [("C", 300), ("A", 100), ("B", 200)] {
        page.dispatch(CartCommand::AddItem(entry(name, name, price, 1)))
            .expect("add");
    }

    let listing = page.renderer().listing(page.store().cart());
    let ids: Vec<&str> = listing.rows().iter().map(|row| row.id.as_str()).collect();
    assert_eq!(ids, ["C", "A", "B"]);
    assert_eq!(page.totals().total, Price::new(600));
}

// ============================================================================
// Direct edits
// ============================================================================

#[test]
fn test_typed_quantity_on_rendered_row() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut page = load_page(&test_config(), dir.path());
    page.dispatch(CartCommand::AddItem(entry("P1", "Подушка", 1000, 1)))
        .expect("add");
    page.dispatch(CartCommand::AddItem(entry("P2", "Плед", 750, 2)))
        .expect("add");

    let mut row = page.renderer().row(page.query().get(1).expect("second row"));
    let edit = page
        .edit_row(&mut row, &QuantityEdit::Typed("5".to_string()))
        .expect("edit");

    assert_eq!(edit.quantity.get(), 5);
    assert_eq!(row.line_total, Price::new(3750));
    assert_eq!(row.line_total_display, "3\u{a0}750 ₽");
    assert!(
        page.presenter()
            .row_html(&id("P2"))
            .expect("row on page")
            .contains("3\u{a0}750 ₽")
    );
    assert_eq!(page.totals().total, Price::new(4750));
    assert!(page.presenter().counter_html().contains(">6<"));
}

#[test]
fn test_rebuild_strategy_reaches_same_totals() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut config = test_config();
    config.reconcile = ReconcileStrategy::FullRebuild;
    let mut page = load_page(&config, dir.path());
    page.dispatch(CartCommand::AddItem(entry("P2", "Плед", 750, 2)))
        .expect("add");
    let renders = page.presenter().full_renders();

    let mut row = page.renderer().row(page.query().first().expect("row"));
    page.edit_row(&mut row, &QuantityEdit::Typed("5".to_string()))
        .expect("edit");

    assert_eq!(page.presenter().full_renders(), renders + 1);
    assert!(page.presenter().items_html().contains("3\u{a0}750 ₽"));
    assert_eq!(page.totals().total, Price::new(3750));
}

#[test]
fn test_stepper_and_garbage_input_clamp() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut page = load_page(&test_config(), dir.path());
    page.dispatch(CartCommand::AddItem(entry("P1", "X", 100, 1)))
        .expect("add");
    let mut row = page.renderer().row(page.query().first().expect("row"));

    page.edit_row(&mut row, &QuantityEdit::Decrement).expect("edit");
    assert_eq!(page.totals().item_count, 1);

    page.edit_row(&mut row, &QuantityEdit::Typed("abc".to_string()))
        .expect("edit");
    assert_eq!(page.totals().item_count, 1);

    page.edit_row(&mut row, &QuantityEdit::Typed("7 шт".to_string()))
        .expect("edit");
    assert_eq!(page.totals().item_count, 7);
}

// ============================================================================
// Remove and checkout
// ============================================================================

#[test]
fn test_remove_last_item_shows_empty_cart() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut page = load_page(&test_config(), dir.path());
    page.dispatch(CartCommand::AddItem(entry("P1", "X", 100, 1)))
        .expect("add");

    page.dispatch(CartCommand::RemoveItem(id("P1"))).expect("remove");

    let listing = page.renderer().listing(page.store().cart());
    assert!(matches!(listing, CartListing::Empty { .. }));
    assert!(page.presenter().items_html().contains("checkout-btn\" hidden"));
    assert!(!page.presenter().counter_html().contains("active"));
    assert!(matches!(page.checkout(), CheckoutOutcome::EmptyCart(_)));
}

#[test]
fn test_catalog_and_product_page_adds() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut page = load_page(&test_config(), dir.path());

    let item = CatalogItem::from_attributes("CAT-1", "Кружка", "450", Some("/img/mug.png"))
        .expect("catalog attributes");
    page.add_catalog_item(&item).expect("add catalog");

    let mut draft = ProductDraft::new("Плед", Price::new(3500), &Locale::RU)
        .with_id(id("ART-42"));
    page.edit_draft(&mut draft, &QuantityEdit::Increment);
    page.edit_draft(&mut draft, &QuantityEdit::Increment);
    assert_eq!(page.query().len(), 1);

    page.add_draft(&draft).expect("add draft");

    assert_eq!(page.totals().item_count, 4);
    assert_eq!(page.totals().total, Price::new(450 + 3 * 3500));
    assert_eq!(
        page.checkout(),
        CheckoutOutcome::Proceed(Locale::RU.checkout_message.to_string())
    );
}

#[test]
fn test_english_locale_formatting() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut config = test_config();
    config.locale = LocaleId::En;
    let mut page = load_page(&config, dir.path());

    let persistence = page
        .dispatch(CartCommand::AddItem(entry("P1", "Mug", 1250, 2)))
        .expect("add");

    assert_eq!(persistence, Persistence::Saved);
    assert!(page.presenter().summary_html().contains("$2,500"));
    assert!(page.presenter().summary_html().contains("Items (2 pcs.)"));
}
