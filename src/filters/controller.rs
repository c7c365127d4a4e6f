//! Filter controller
//!
//! The externally-consumed unit: it owns a template and a namespace, borrows
//! a [`Location`], and exposes the two halves of the sync protocol:
//! `filters()` (read path) and `change_filter()` (write path). The URL is
//! the single source of truth; the controller keeps no state between calls,
//! so a read after any commit always reflects the committed query.

use super::error::FilterError;
use super::projection::{namespaced_key, project};
use super::types::{EffectiveFilters, FilterTemplate, validate_namespace};
use crate::location::Location;
use crate::query::QueryState;
use crate::value::FilterValue;

/// Key written by `reset_skip`, whether or not the template declares it
const SKIP_FIELD: &str = "skip";

/// Options for a single `change_filter` call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeOptions {
    /// Force-set the namespaced `skip` key to `"0"` in the same commit
    ///
    /// Supports pagination reset when a filter changes: the result list
    /// starts over from the first page.
    pub reset_skip: bool,
}

impl ChangeOptions {
    /// Options with `reset_skip` enabled
    #[must_use]
    pub const fn resetting_skip() -> Self {
        Self { reset_skip: true }
    }
}

/// Synchronizes one filter template with the query string of a location
///
/// Reads recompute the effective filters from the live query on every call;
/// writes read, clone, mutate and commit the whole query state, leaving
/// keys of other controllers (and foreign keys like `utm_*`) untouched.
///
/// Single-threaded by design: sequential `change_filter` calls observe each
/// other's effects because each one reads the latest committed state first.
/// Two controllers racing on the same namespace is an accepted limitation.
///
/// # Examples
///
/// ```
/// use filtersync::{FilterController, FilterTemplate, Location, MemoryLocation};
///
/// let template = FilterTemplate::builder()
///     .string("search", "")
///     .number("page", 1.0)
///     .build()
///     .unwrap();
///
/// let location = MemoryLocation::new();
/// let controller = FilterController::new(template, &location);
///
/// controller.set("search", "gardening");
/// assert_eq!(controller.filters().get_str("search"), Some("gardening"));
/// assert_eq!(location.query(), "search=gardening");
/// ```
pub struct FilterController<'a> {
    namespace: Option<String>,
    template: FilterTemplate,
    location: &'a dyn Location,
}

impl<'a> FilterController<'a> {
    /// Create a controller without a namespace
    #[must_use]
    pub fn new(template: FilterTemplate, location: &'a dyn Location) -> Self {
        Self {
            namespace: None,
            template,
            location,
        }
    }

    /// Create a controller whose URL keys are prefixed `"{namespace}-"`
    ///
    /// # Errors
    ///
    /// Returns `FilterError` if the namespace is empty or contains
    /// characters that would corrupt a query string.
    pub fn with_namespace(
        namespace: impl Into<String>,
        template: FilterTemplate,
        location: &'a dyn Location,
    ) -> Result<Self, FilterError> {
        let namespace = namespace.into();
        validate_namespace(&namespace)?;
        Ok(Self {
            namespace: Some(namespace),
            template,
            location,
        })
    }

    /// The controller's namespace, if any
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// The template this controller was built from
    #[must_use]
    pub const fn template(&self) -> &FilterTemplate {
        &self.template
    }

    /// The current effective filters
    ///
    /// Recomputed from the live query string on every call; never stale
    /// after a commit, on this controller or any other sharing the
    /// location.
    #[must_use]
    pub fn filters(&self) -> EffectiveFilters {
        project(&self.template, self.namespace.as_deref(), &self.read())
    }

    /// Update one field and commit the resulting query string
    ///
    /// `None`, an empty string and an empty list all mean "remove": the
    /// namespaced key is deleted and the field reverts to its template
    /// default on the next read. Any other value is encoded by its own
    /// kind and set under the namespaced key. The mutation is synchronous;
    /// when this returns, `filters()` reflects it.
    pub fn change_filter(&self, key: &str, value: Option<FilterValue>, options: ChangeOptions) {
        let mut state = self.read();
        let param_key = namespaced_key(self.namespace.as_deref(), key);

        match value {
            Some(value) if !value.is_empty() => state.set(&param_key, &value.encode()),
            _ => state.delete(&param_key),
        }

        if options.reset_skip {
            let skip_key = namespaced_key(self.namespace.as_deref(), SKIP_FIELD);
            state.set(&skip_key, "0");
        }

        self.commit(&state);
    }

    /// Set one field, default options
    pub fn set(&self, key: &str, value: impl Into<FilterValue>) {
        self.change_filter(key, Some(value.into()), ChangeOptions::default());
    }

    /// Remove one field from the URL, reverting it to its default
    pub fn clear(&self, key: &str) {
        self.change_filter(key, None, ChangeOptions::default());
    }

    fn read(&self) -> QueryState {
        QueryState::parse(&self.location.query())
    }

    fn commit(&self, state: &QueryState) {
        self.location.replace_query(&state.serialize());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::{DetachedLocation, MemoryLocation};

    fn shop_template() -> FilterTemplate {
        FilterTemplate::builder()
            .string("search", "")
            .string("category", "all")
            .number("page", 1.0)
            .string_list("categories", Vec::<String>::new())
            .build()
            .unwrap()
    }

    #[test]
    fn test_write_then_read_convergence() {
        let location = MemoryLocation::new();
        let controller = FilterController::new(shop_template(), &location);

        controller.set("search", "test");
        controller.set("page", 3.0);

        let filters = controller.filters();
        assert_eq!(filters.get_str("search"), Some("test"));
        assert_eq!(filters.get_number("page"), Some(3.0));
    }

    #[test]
    fn test_deletion_reverts_to_default() {
        // Template { search: '' }, current query ?search=test
        let location = MemoryLocation::with_query("?search=test");
        let template = FilterTemplate::builder().string("search", "").build().unwrap();
        let controller = FilterController::new(template, &location);

        controller.set("search", "");

        assert!(!location.query().contains("search"));
        assert_eq!(controller.filters().get_str("search"), Some(""));
    }

    #[test]
    fn test_none_and_empty_list_also_delete() {
        let location = MemoryLocation::with_query("categories=books&page=2");
        let controller = FilterController::new(shop_template(), &location);

        controller.change_filter(
            "categories",
            Some(FilterValue::StrList(vec![])),
            ChangeOptions::default(),
        );
        controller.clear("page");

        assert_eq!(location.query(), "");
        assert_eq!(controller.filters().get_number("page"), Some(1.0));
    }

    #[test]
    fn test_array_encoding_commits_percent_encoded_comma() {
        let location = MemoryLocation::new();
        let controller = FilterController::new(shop_template(), &location);

        controller.set("categories", vec!["books", "movies"]);

        assert!(location.query().contains("categories=books%2Cmovies"));
        assert_eq!(
            controller.filters().get_str_list("categories").unwrap(),
            &["books".to_string(), "movies".to_string()]
        );
    }

    #[test]
    fn test_reset_skip_forces_skip_key() {
        // skip is not part of the template; reset_skip writes it anyway
        let location = MemoryLocation::new();
        let controller = FilterController::new(shop_template(), &location);

        controller.change_filter(
            "search",
            Some("x".into()),
            ChangeOptions::resetting_skip(),
        );

        let state = QueryState::parse(&location.query());
        assert_eq!(state.get("search"), Some("x"));
        assert_eq!(state.get("skip"), Some("0"));
    }

    #[test]
    fn test_reset_skip_uses_namespaced_key() {
        let location = MemoryLocation::new();
        let controller =
            FilterController::with_namespace("shop", shop_template(), &location).unwrap();

        controller.change_filter(
            "search",
            Some("x".into()),
            ChangeOptions::resetting_skip(),
        );

        let state = QueryState::parse(&location.query());
        assert_eq!(state.get("shop-skip"), Some("0"));
        assert!(!state.contains("skip"));
    }

    #[test]
    fn test_namespace_isolation() {
        let location = MemoryLocation::new();
        let left =
            FilterController::with_namespace("left", shop_template(), &location).unwrap();
        let right =
            FilterController::with_namespace("right", shop_template(), &location).unwrap();

        left.set("page", 2.0);
        right.set("page", 7.0);

        assert_eq!(left.filters().get_number("page"), Some(2.0));
        assert_eq!(right.filters().get_number("page"), Some(7.0));

        let state = QueryState::parse(&location.query());
        assert_eq!(state.get("left-page"), Some("2"));
        assert_eq!(state.get("right-page"), Some("7"));
    }

    #[test]
    fn test_foreign_keys_survive_commits() {
        let location = MemoryLocation::with_query("utm_source=mail&search=old");
        let controller = FilterController::new(shop_template(), &location);

        controller.set("search", "new");

        let state = QueryState::parse(&location.query());
        assert_eq!(state.get("utm_source"), Some("mail"));
        assert_eq!(state.get("search"), Some("new"));
    }

    #[test]
    fn test_sequential_changes_apply_in_call_order() {
        let location = MemoryLocation::new();
        let controller = FilterController::new(shop_template(), &location);

        controller.set("search", "a");
        controller.set("page", 2.0);
        controller.set("search", "b");

        let filters = controller.filters();
        assert_eq!(filters.get_str("search"), Some("b"));
        assert_eq!(filters.get_number("page"), Some(2.0));
    }

    #[test]
    fn test_detached_location_stays_usable() {
        let location = DetachedLocation::new();
        let controller = FilterController::new(shop_template(), &location);

        controller.set("search", "ignored");

        let filters = controller.filters();
        assert_eq!(filters.get_str("search"), Some(""));
        assert_eq!(filters.get_number("page"), Some(1.0));
    }

    #[test]
    fn test_invalid_namespace_rejected() {
        let location = MemoryLocation::new();
        assert!(FilterController::with_namespace("a b", shop_template(), &location).is_err());
        assert!(FilterController::with_namespace("", shop_template(), &location).is_err());
    }
}
