//! Filter synchronization module
//!
//! This module ties the value codec, query store and location port together
//! into the consumer-facing API:
//!
//! - **Templates**: declare the field set (names, kinds, defaults) once
//!   via `FilterTemplate::builder()`
//! - **Projection**: overlay URL-present values onto the defaults to get
//!   the `EffectiveFilters` a list view renders from
//! - **Controller**: read `filters()`, write `change_filter()`; the URL
//!   stays the single source of truth in between
//!
//! # Examples
//!
//! ```
//! use filtersync::{ChangeOptions, FilterController, FilterTemplate, MemoryLocation};
//!
//! let template = FilterTemplate::builder()
//!     .string("search", "")
//!     .string("category", "all")
//!     .number("page", 1.0)
//!     .build()
//!     .unwrap();
//!
//! let location = MemoryLocation::with_query("?search=test&category=books&page=2");
//! let controller = FilterController::new(template, &location);
//!
//! let filters = controller.filters();
//! assert_eq!(filters.get_str("search"), Some("test"));
//! assert_eq!(filters.get_str("category"), Some("books"));
//! assert_eq!(filters.get_number("page"), Some(2.0));
//!
//! // Changing a filter rewrites the query string in place
//! controller.change_filter("category", Some("movies".into()), ChangeOptions::resetting_skip());
//! assert_eq!(controller.filters().get_str("category"), Some("movies"));
//! ```

pub mod controller;
pub mod error;
pub mod projection;
pub mod types;

pub use controller::{ChangeOptions, FilterController};
pub use error::FilterError;
pub use projection::{namespaced_key, project};
pub use types::{
    EffectiveField, EffectiveFilters, FilterTemplate, FilterTemplateBuilder, TemplateField,
    validate_field_name, validate_namespace,
};
