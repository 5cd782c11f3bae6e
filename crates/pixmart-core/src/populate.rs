//! # Reference Population
//!
//! Rebuilds an ordered list of referenced documents from an unordered batch.
//!
//! ## How It Works
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Indexed Reassembly                                   │
//! │                                                                         │
//! │  order.products (ids):   [ p2, p9, p1, p2 ]                            │
//! │       │                                                                 │
//! │       ▼  one batch lookup (storage returns any order)                   │
//! │  fetched:                { p1, p2 }          ← p9 is dangling          │
//! │       │                                                                 │
//! │       ▼  index by id, walk the original list                            │
//! │  populated:              [ P2, P1, P2 ]                                 │
//! │                                                                         │
//! │  • Original order preserved                                            │
//! │  • Unresolvable ids dropped (no placeholder, no error)                 │
//! │  • Repeated ids resolve at every position                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::{HashMap, HashSet};

use crate::types::Product;

/// Returns the distinct ids to fetch, in first-seen order.
pub fn distinct_ids(ids: &[String]) -> Vec<String> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter()
        .filter(|id| seen.insert(id.as_str()))
        .cloned()
        .collect()
}

/// Maps each id in `ids` to its fetched product, preserving the order of
/// `ids` and omitting ids with no match.
pub fn reassemble(ids: &[String], fetched: Vec<Product>) -> Vec<Product> {
    let by_id: HashMap<String, Product> = fetched
        .into_iter()
        .map(|product| (product.id.clone(), product))
        .collect();

    ids.iter().filter_map(|id| by_id.get(id).cloned()).collect()
}

/// Ids in `ids` that have no fetched counterpart.
pub fn missing_ids<'a>(ids: &'a [String], resolved: &[Product]) -> Vec<&'a str> {
    let found: HashSet<&str> = resolved.iter().map(|product| product.id.as_str()).collect();
    ids.iter()
        .map(String::as_str)
        .filter(|id| !found.contains(id))
        .collect()
}
