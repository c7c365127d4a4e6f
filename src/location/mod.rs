//! Location port
//!
//! The address bar is ambient global state shared by every controller in a
//! process. Rather than reaching for a singleton, the crate takes it as an
//! injected collaborator: anything that can report a query string and accept
//! a replacement implements [`Location`]. That keeps the core logic testable
//! without a real address bar and lets independent controllers share one
//! location or use separate ones.
//!
//! Two implementations ship here:
//! - [`MemoryLocation`]: an in-process location, used both as the test
//!   double and as the embedding point for hosts that hold location state
//!   themselves (a TUI, a server-side renderer, a WASM shim).
//! - [`DetachedLocation`]: the "no URL context" degradation. Reads are
//!   empty, commits are dropped, and controllers stay fully usable.

use std::cell::RefCell;

/// Abstract "current location" collaborator
///
/// `query` returns the current query string without a leading `?`; an empty
/// string means no query. `replace_query` swaps the query component in
/// place: replace semantics, never a new history entry, so repeated filter
/// changes don't pollute back-button navigation.
pub trait Location {
    /// The current query string, without a leading `?`
    fn query(&self) -> String;

    /// Replace the query component with `query` (no leading `?`)
    fn replace_query(&self, query: &str);
}

/// In-process location holding its query string in memory
///
/// Interior mutability only; the sync protocol is single-threaded and
/// synchronous, so a `RefCell` is all the state management needed. Two
/// controllers borrowing the same `MemoryLocation` observe each other's
/// commits immediately.
#[derive(Debug, Default)]
pub struct MemoryLocation {
    query: RefCell<String>,
}

impl MemoryLocation {
    /// Create a location with an empty query string
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a location seeded with a query string
    ///
    /// A leading `?` is accepted and stripped.
    #[must_use]
    pub fn with_query(raw: &str) -> Self {
        let raw = raw.strip_prefix('?').unwrap_or(raw);
        Self {
            query: RefCell::new(raw.to_string()),
        }
    }
}

impl Location for MemoryLocation {
    fn query(&self) -> String {
        self.query.borrow().clone()
    }

    fn replace_query(&self, query: &str) {
        let query = query.strip_prefix('?').unwrap_or(query);
        *self.query.borrow_mut() = query.to_string();
    }
}

/// Location for contexts with no address bar at all
///
/// Reads return an empty query and commits are no-ops, so a controller
/// built against it projects pure template defaults and never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetachedLocation;

impl DetachedLocation {
    /// Create a detached location
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Location for DetachedLocation {
    fn query(&self) -> String {
        String::new()
    }

    fn replace_query(&self, _query: &str) {}
}
