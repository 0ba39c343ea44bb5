// src/validate.rs
//! Schema filter for raw dataset rows.
//!
//! A row is kept only when all four hold:
//! - `id` is a JSON integer
//! - `restaurant_name` is a string of ASCII letters and whitespace, nothing else
//! - `rating` is a JSON float in [1.00, 10.00]
//! - `distance_from_me` is a JSON float in [10.00, 1000.00]
//!
//! Type checks are on the JSON representation: `8` is an integer and fails the
//! float checks even though `8.0` would pass. `id` must fit in an `i64`; larger
//! integers are rejected. Failing rows are dropped silently.
//!
//! An incoming `score` is discarded: it is derived data, recomputed by the ranker.

use std::path::Path;

use anyhow::Result;
use metrics::counter;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::{info, warn};

use crate::record::Record;
use crate::store;

pub const RATING_RANGE: std::ops::RangeInclusive<f64> = 1.00..=10.00;
pub const DISTANCE_RANGE: std::ops::RangeInclusive<f64> = 10.00..=1000.00;

static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z\s]+$").expect("restaurant name regex compiles"));

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    pub records: Vec<Record>,
    pub dropped: usize,
}

fn is_integer(v: Option<&Value>) -> bool {
    matches!(v, Some(Value::Number(n)) if n.is_i64())
}

fn float_in(v: Option<&Value>, range: &std::ops::RangeInclusive<f64>) -> bool {
    match v {
        Some(Value::Number(n)) if n.is_f64() => n.as_f64().is_some_and(|x| range.contains(&x)),
        _ => false,
    }
}

pub fn is_valid_name(name: &str) -> bool {
    NAME_RE.is_match(name)
}

pub fn is_valid(raw: &Value) -> bool {
    let Some(obj) = raw.as_object() else {
        return false;
    };
    is_integer(obj.get("id"))
        && obj
            .get("restaurant_name")
            .and_then(Value::as_str)
            .is_some_and(is_valid_name)
        && float_in(obj.get("rating"), &RATING_RANGE)
        && float_in(obj.get("distance_from_me"), &DISTANCE_RANGE)
}

/// Order-preserving filter. Never fails; rejected rows only show up in `dropped`.
pub fn validate_records(raw: Vec<Value>) -> ValidationReport {
    crate::telemetry::ensure_metrics_described();

    let total = raw.len();
    let mut records = Vec::with_capacity(total);
    for row in raw {
        if !is_valid(&row) {
            continue;
        }
        let Value::Object(mut obj) = row else {
            continue;
        };
        obj.remove("score");
        // Typed fields are checked above and `extra` accepts any value.
        match serde_json::from_value::<Record>(Value::Object(obj)) {
            Ok(rec) => records.push(rec),
            Err(e) => warn!(target: "validate", error = %e, "valid row failed to deserialize"),
        }
    }
    let dropped = total - records.len();

    counter!("validate_kept_total").increment(records.len() as u64);
    counter!("validate_dropped_total").increment(dropped as u64);
    info!(target: "validate", kept = records.len(), dropped, "dataset validated");

    ValidationReport { records, dropped }
}

/// Validate and write the result as the durable validated dataset.
pub fn validate_and_persist(raw: Vec<Value>, path: &Path) -> Result<ValidationReport> {
    let report = validate_records(raw);
    store::write_records(path, &report.records)?;
    info!(target: "validate", path = %path.display(), "validated dataset written");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(id: Value, name: Value, rating: Value, distance: Value) -> Value {
        json!({ "id": id, "restaurant_name": name, "rating": rating, "distance_from_me": distance })
    }

    #[test]
    fn blue_moon_passes_taco99_fails() {
        assert!(is_valid(&json!({
            "id": 1, "restaurant_name": "Blue Moon", "rating": 9.5, "distance_from_me": 20.0
        })));
        assert!(!is_valid(&json!({
            "id": 2, "restaurant_name": "Taco99", "rating": 8.0, "distance_from_me": 50.0
        })));
    }

    #[test]
    fn whole_number_ratings_must_be_floats() {
        assert!(!is_valid(&row(json!(3), json!("Pho"), json!(8), json!(50.0))));
        assert!(is_valid(&row(json!(3), json!("Pho"), json!(8.0), json!(50.0))));
        assert!(!is_valid(&row(json!(3), json!("Pho"), json!(8.0), json!(50))));
    }

    #[test]
    fn range_bounds_are_inclusive() {
        assert!(is_valid(&row(json!(1), json!("A"), json!(1.0), json!(10.0))));
        assert!(is_valid(&row(json!(1), json!("A"), json!(10.0), json!(1000.0))));
        assert!(!is_valid(&row(json!(1), json!("A"), json!(0.99), json!(10.0))));
        assert!(!is_valid(&row(json!(1), json!("A"), json!(10.01), json!(10.0))));
        assert!(!is_valid(&row(json!(1), json!("A"), json!(5.0), json!(9.99))));
        assert!(!is_valid(&row(json!(1), json!("A"), json!(5.0), json!(1000.01))));
    }

    #[test]
    fn id_must_be_integer() {
        assert!(!is_valid(&row(json!(1.0), json!("A"), json!(5.0), json!(50.0))));
        assert!(!is_valid(&row(json!("1"), json!("A"), json!(5.0), json!(50.0))));
        assert!(!is_valid(&row(json!(true), json!("A"), json!(5.0), json!(50.0))));
        assert!(is_valid(&row(json!(-4), json!("A"), json!(5.0), json!(50.0))));
    }

    #[test]
    fn names_allow_only_letters_and_whitespace() {
        assert!(is_valid_name("Le Petit\tCafe"));
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("Joe's Diner"));
        assert!(!is_valid_name("Café"));
        assert!(!is_valid(&row(json!(1), json!(null), json!(5.0), json!(50.0))));
    }

    #[test]
    fn missing_fields_and_non_objects_are_dropped() {
        assert!(!is_valid(&json!({ "id": 1, "restaurant_name": "A", "rating": 5.0 })));
        assert!(!is_valid(&json!([1, "A", 5.0, 50.0])));
    }

    #[test]
    fn incoming_score_of_any_type_does_not_drop_a_valid_row() {
        let raw = vec![
            json!({ "id": 1, "restaurant_name": "Blue Moon", "rating": 9.5, "distance_from_me": 20.0, "score": "n/a" }),
            json!({ "id": 2, "restaurant_name": "Red Door", "rating": 7.5, "distance_from_me": 40.0, "score": 12.34 }),
        ];
        let report = validate_records(raw);
        assert_eq!(report.dropped, 0);
        assert_eq!(report.records.len(), 2);
        assert!(report.records.iter().all(|r| r.score.is_none()));
        assert!(report.records.iter().all(|r| !r.extra.contains_key("score")));
    }

    #[test]
    fn ids_beyond_i64_are_rejected() {
        let big: Value = serde_json::from_str("18446744073709551615").unwrap();
        assert!(!is_valid(&row(big, json!("A"), json!(5.0), json!(50.0))));
    }

    #[test]
    fn filter_preserves_order_and_is_idempotent() {
        let raw = vec![
            row(json!(3), json!("Gamma"), json!(7.5), json!(30.0)),
            row(json!(2), json!("Taco99"), json!(8.0), json!(50.0)),
            row(json!(1), json!("Alpha"), json!(9.5), json!(20.0)),
        ];
        let first = validate_records(raw);
        assert_eq!(first.dropped, 1);
        let ids: Vec<i64> = first.records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 1]);

        let again: Vec<Value> = first
            .records
            .iter()
            .map(|r| serde_json::to_value(r).unwrap())
            .collect();
        let second = validate_records(again);
        assert_eq!(second.dropped, 0);
        assert_eq!(second.records, first.records);
    }
}
