mod common;

use std::cell::RefCell;

use common::{EffectLog, RecordingNotifier, ScriptedTransport};
use refurnish::api::Product;
use refurnish::flows::{Catalog, StepOutcome};
use serde_json::json;

fn listings() -> serde_json::Value {
    json!([
        {"_id": "p1", "title": "Teak Bed", "type": "Bed", "year": 2015,
         "image": "bed.png", "price": "", "user_id": "u1", "user_name": "Asha"},
        {"_id": "p2", "title": "Oak Table", "type": "Table", "year": "1999",
         "image": "", "price": 3200, "user_id": "u2", "user_name": "Ravi"}
    ])
}

#[test]
fn listings_decode_lenient_fields() {
    let transport = ScriptedTransport::new().reply_json(200, listings());
    let products = Catalog::new(&transport).fetch_all().unwrap();

    assert_eq!(products.len(), 2);
    assert_eq!(products[0].price_label(), "Price Not Specified Yet");
    assert_eq!(products[1].price_label(), "Price: \u{20b9} 3200");
    assert_eq!(products[1].year_label(), "1999");
    assert_eq!(
        products[1].image_url("https://bucket/", "https://placeholder"),
        "https://placeholder"
    );
    assert_eq!(transport.paths(), vec!["/product/getall"]);
}

#[test]
fn my_products_only_lists_own_items() {
    let transport = ScriptedTransport::new().reply_json(200, listings());
    let mine = Catalog::new(&transport).fetch_owned_by("u2").unwrap();
    let titles: Vec<&str> = mine.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["Oak Table"]);
}

#[test]
fn product_and_image_deletions_are_independent() {
    let product: Product = serde_json::from_value(listings()[0].clone()).unwrap();
    let transport = ScriptedTransport::new()
        .reply_json(500, json!({}))
        .reply_json(200, json!({}));
    let log = RefCell::new(EffectLog::default());
    let mut notifier = RecordingNotifier(&log);

    let report = Catalog::new(&transport).delete_listing(&product, &mut notifier);

    assert_eq!(report.product, StepOutcome::Failed(500));
    assert_eq!(report.image, StepOutcome::Deleted);
    assert_eq!(
        transport.paths(),
        vec!["/product/delete/p1", "/util/deletefile/bed.png"]
    );
    assert_eq!(
        log.borrow().events,
        vec![
            "notify:Error deleting product.",
            "ack",
            "notify:Product's Image deleted successfully.",
            "ack"
        ]
    );
}

#[test]
fn image_transport_error_has_its_own_message() {
    let product: Product = serde_json::from_value(listings()[0].clone()).unwrap();
    let transport = ScriptedTransport::new()
        .reply_json(200, json!({}))
        .fail("connection reset");
    let log = RefCell::new(EffectLog::default());
    let mut notifier = RecordingNotifier(&log);

    let report = Catalog::new(&transport).delete_listing(&product, &mut notifier);

    assert!(report.product.is_deleted());
    assert_eq!(report.image, StepOutcome::Errored("connection reset".into()));
    assert!(log
        .borrow()
        .events
        .contains(&"notify:An error occurred in image deletion.".to_string()));
}
