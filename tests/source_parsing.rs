use chrono::NaiveDate;
use outage_calplot::source::{LayerFields, is_data_consistency, parse_page};
use serde_json::json;

// 2024-03-01T00:00:00Z
const MARCH_1_MS: i64 = 1_709_251_200_000;

#[test]
fn parses_features_with_default_fields() {
    let body = json!({
        "exceededTransferLimit": true,
        "features": [
            {"attributes": {"data": MARCH_1_MS, "neveikia_sistema": "VPS", "kiekis": 5}},
            {"attributes": {"data": MARCH_1_MS, "neveikia_sistema": " ESPBI ", "kiekis": "2"}},
            {"attributes": {"data": MARCH_1_MS, "neveikia_sistema": "VPS", "kiekis": null}},
            {"attributes": {"neveikia_sistema": "VPS", "kiekis": 1}}
        ]
    });
    let page = parse_page(&body, &LayerFields::default()).unwrap();
    assert_eq!(page.feature_count, 4);
    assert!(page.exceeded_transfer_limit);
    assert_eq!(page.observations.len(), 2);
    let march_1 = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    assert_eq!(page.observations[0].date, march_1);
    assert_eq!(page.observations[0].quantity, 5.0);
    assert_eq!(page.observations[1].facet, "ESPBI");
    assert_eq!(page.observations[1].quantity, 2.0);
}

#[test]
fn error_object_fails_the_page() {
    let body = json!({"error": {"code": 400, "message": "Invalid query"}});
    let err = parse_page(&body, &LayerFields::default()).unwrap_err();
    assert!(err.to_string().contains("feature layer error"));
    assert!(!is_data_consistency(&err));
}

#[test]
fn non_numeric_quantity_is_a_data_consistency_error() {
    let body = json!({
        "features": [
            {"attributes": {"data": MARCH_1_MS, "neveikia_sistema": "VPS", "kiekis": "daug"}}
        ]
    });
    let err = parse_page(&body, &LayerFields::default()).unwrap_err();
    assert!(is_data_consistency(&err));
}

#[test]
fn custom_field_names() {
    let fields = LayerFields {
        date: "day".into(),
        facet: "system".into(),
        quantity: "count".into(),
    };
    let body = json!({
        "features": [{"attributes": {"day": MARCH_1_MS, "system": "VPS", "count": 3.0}}]
    });
    let page = parse_page(&body, &fields).unwrap();
    assert!(!page.exceeded_transfer_limit);
    assert_eq!(page.observations.len(), 1);
}

#[cfg(feature = "online")]
#[test]
#[ignore]
fn fetch_live_layer() {
    use outage_calplot::source::Client;
    let url = std::env::var("OUTAGE_LAYER_URL").expect("set OUTAGE_LAYER_URL");
    let rows = Client::new(url).unwrap().fetch(&LayerFields::default()).unwrap();
    assert!(!rows.is_empty());
}
