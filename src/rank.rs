// src/rank.rs
//! Top-K selection over the validated dataset.
//!
//! score = round2(((rating*10 - distance*0.5 + sin(id)*2) * 100 + 0.5) / 100)
//!
//! The `+ 0.5` is added in the x100 domain before scaling back down and must be
//! kept as is. Ordering is total: score desc, rating desc, distance desc, then
//! restaurant name asc.

use std::cmp::Ordering;
use std::path::Path;

use anyhow::Result;
use tracing::{debug, info};

use crate::record::Record;
use crate::store;

/// Round half away from zero to 2 decimals.
fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Pure function of `(id, rating, distance)`.
pub fn score(id: i64, rating: f64, distance: f64) -> f64 {
    let raw = rating * 10.0 - distance * 0.5 + (id as f64).sin() * 2.0;
    round2((raw * 100.0 + 0.5) / 100.0)
}

/// Attach (or recompute) `score` on every record.
pub fn apply_scores(records: &mut [Record]) {
    for r in records.iter_mut() {
        r.score = Some(score(r.id, r.rating, r.distance_from_me));
    }
}

/// `Less` means `a` ranks ahead of `b`. Unscored records are scored on the fly.
pub fn rank_order(a: &Record, b: &Record) -> Ordering {
    let sa = a
        .score
        .unwrap_or_else(|| score(a.id, a.rating, a.distance_from_me));
    let sb = b
        .score
        .unwrap_or_else(|| score(b.id, b.rating, b.distance_from_me));

    sb.total_cmp(&sa)
        .then_with(|| b.rating.total_cmp(&a.rating))
        .then_with(|| b.distance_from_me.total_cmp(&a.distance_from_me))
        .then_with(|| a.restaurant_name.cmp(&b.restaurant_name))
}

/// Score everything, then keep the `k` best. Stable: records equal on all four
/// keys stay in input order.
pub fn top_k(mut records: Vec<Record>, k: usize) -> Vec<Record> {
    apply_scores(&mut records);
    records.sort_by(rank_order);
    records.truncate(k);
    records
}

/// Read the persisted validated dataset, rank it and persist the result.
pub fn rank_file(validated: &Path, out: &Path, k: usize) -> Result<Vec<Record>> {
    let records = store::read_records(validated)?;
    let input = records.len();
    let ranked = top_k(records, k);

    if let Some(best) = ranked.first() {
        debug!(
            target: "rank",
            id = best.id,
            name = %best.restaurant_name,
            score = ?best.score,
            "top candidate"
        );
    }

    store::write_records(out, &ranked)?;
    info!(
        target: "rank",
        input,
        kept = ranked.len(),
        path = %out.display(),
        "top-k written"
    );
    Ok(ranked)
}
