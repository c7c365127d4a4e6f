//! Filter projection
//!
//! Overlays URL-present values onto template defaults. The projection is the
//! whole read path: parse the live query, walk the template in declared
//! order, and for every field whose namespaced key is present, decode the
//! raw value with the field's declared kind. Fields without a matching key
//! keep their defaults, so projecting over an empty query is structurally
//! identical to the template.

use super::types::{EffectiveField, EffectiveFilters, FilterTemplate};
use crate::query::QueryState;
use crate::value::FilterValue;

/// Compute the URL key for a field under an optional namespace
///
/// `Some("shop")` + `"page"` → `"shop-page"`; without a namespace the field
/// name is the key. The prefix is the sole collision-avoidance mechanism
/// between controllers sharing one URL.
#[must_use]
pub fn namespaced_key(namespace: Option<&str>, field: &str) -> String {
    match namespace {
        Some(ns) => format!("{ns}-{field}"),
        None => field.to_string(),
    }
}

/// Project a template over the current query state
///
/// Returns the effective filters: template shape, URL-derived values where
/// a namespaced key is present, defaults everywhere else.
#[must_use]
pub fn project(
    template: &FilterTemplate,
    namespace: Option<&str>,
    query: &QueryState,
) -> EffectiveFilters {
    let fields = template
        .fields()
        .iter()
        .map(|field| {
            let key = namespaced_key(namespace, field.name());
            let value = query.get(&key).map_or_else(
                || field.default().clone(),
                |raw| FilterValue::decode(raw, field.kind()),
            );
            EffectiveField::new(field.name().to_string(), value)
        })
        .collect();
    EffectiveFilters::from_fields(fields)
}
