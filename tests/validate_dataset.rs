// tests/validate_dataset.rs
use restaurant_ranker::store::read_json;
use restaurant_ranker::validate::{is_valid, validate_and_persist, validate_records};
use serde_json::{json, Value};

fn mixed() -> Vec<Value> {
    vec![
        json!({ "id": 1, "restaurant_name": "Blue Moon", "rating": 9.5, "distance_from_me": 20.0 }),
        json!({ "id": 2, "restaurant_name": "Taco99", "rating": 8.0, "distance_from_me": 50.0 }),
        json!({ "id": 3, "restaurant_name": "Red Door", "rating": 4.25, "distance_from_me": 999.5, "tags": ["x"] }),
        json!({ "id": "4", "restaurant_name": "Nope", "rating": 4.0, "distance_from_me": 99.0 }),
        json!({ "id": 5, "restaurant_name": "Far Away", "rating": 4.0, "distance_from_me": 1500.0 }),
        json!(null),
    ]
}

#[test]
fn every_kept_record_satisfies_the_schema() {
    let report = validate_records(mixed());
    assert_eq!(report.records.len(), 2);
    assert_eq!(report.dropped, 4);
    for r in &report.records {
        assert!(is_valid(&serde_json::to_value(r).unwrap()));
    }
}

#[test]
fn persisted_file_round_trips_raw_objects() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("validated_dataset.json");

    let report = validate_and_persist(mixed(), &path).unwrap();
    assert_eq!(report.records.len(), 2);

    let on_disk = read_json(&path).unwrap();
    assert_eq!(
        on_disk,
        json!([
            { "id": 1, "restaurant_name": "Blue Moon", "rating": 9.5, "distance_from_me": 20.0 },
            { "id": 3, "restaurant_name": "Red Door", "rating": 4.25, "distance_from_me": 999.5, "tags": ["x"] }
        ])
    );

    // validating the persisted dataset again changes nothing
    let again = validate_records(on_disk.as_array().unwrap().clone());
    assert_eq!(again.dropped, 0);
    assert_eq!(again.records, report.records);
}
