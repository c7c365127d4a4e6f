//! Filtersync - keep typed list-view filters in sync with a URL query string
//!
//! This library lets a list view read its filters (search text, category,
//! pagination) from the current URL and write changes back, so filter state
//! is shareable, bookmarkable and back-button friendly without the view
//! parsing query strings itself.
//!
//! The pieces, leaves first:
//! - [`value`]: the typed value codec between filter values and their
//!   query-string form
//! - [`query`]: the ordered key/value multi-map backing one query string
//! - [`location`]: the injected "address bar" port
//! - [`filters`]: templates, projection and the [`FilterController`]
//!
//! Sync never errors at runtime: malformed numbers decode to `NaN`, missing
//! URL context degrades to defaults-only operation, and deletes simply
//! revert fields to their template defaults.

pub mod filters;
pub mod location;
pub mod query;
pub mod value;

pub use filters::{
    ChangeOptions, EffectiveFilters, FilterController, FilterError, FilterTemplate,
};
pub use location::{DetachedLocation, Location, MemoryLocation};
pub use query::QueryState;
pub use value::{FilterKind, FilterValue};
