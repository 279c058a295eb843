//! Base-100 index series per (country, metric)

use std::collections::HashMap;

use crate::models::Observation;

/// Value every series takes at its first chronological point
pub const INDEX_BASE: f64 = 100.0;

/// Compute `value_indexed` for every observation
///
/// Rows are visited in ascending year order (stable, so equal years keep
/// input order) to find each group's first value; the output keeps the input
/// row order. A group whose first value is zero is indexed at 100 throughout.
pub fn compute_indexed(mut observations: Vec<Observation>) -> Vec<Observation> {
    let mut order: Vec<usize> = (0..observations.len()).collect();
    order.sort_by_key(|&i| observations[i].year);

    let mut base: HashMap<(String, String), f64> = HashMap::new();
    for &i in &order {
        let obs = &observations[i];
        base.entry((obs.country.clone(), obs.metric.clone())).or_insert(obs.value);
    }

    for obs in observations.iter_mut() {
        let first = base
            .get(&(obs.country.clone(), obs.metric.clone()))
            .copied()
            .unwrap_or(obs.value);
        obs.value_indexed = Some(if first == 0.0 {
            INDEX_BASE
        } else {
            obs.value / first * INDEX_BASE
        });
    }

    observations
}
