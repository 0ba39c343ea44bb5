// src/record.rs
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One restaurant row. `score` is only present after ranking; any other field
/// the API sends is carried through untouched in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Record {
    pub id: i64,
    pub restaurant_name: String,
    pub rating: f64,
    pub distance_from_me: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record {
    pub fn new(
        id: i64,
        restaurant_name: impl Into<String>,
        rating: f64,
        distance_from_me: f64,
    ) -> Self {
        Self {
            id,
            restaurant_name: restaurant_name.into(),
            rating,
            distance_from_me,
            score: None,
            extra: Map::new(),
        }
    }
}
