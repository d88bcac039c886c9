//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Registration:
//!     add(pattern, handler, options)
//!     → pattern::compile
//!     → RouteEntry appended to this level
//!     → to(alias) lazily creates the entry's nested table
//!
//! Matching (per check):
//!     fragment + previously processed fragment
//!     → table.rs (first matching entry at this level)
//!     → arguments prepared per the level's `keys` option
//!     → nested table receives the unconsumed remainder
//!     → MatchNode tree for the dispatcher
//! ```
//!
//! # Design Decisions
//! - Insertion order is the only priority
//! - Each level owns its configuration; nesting copies it once
//! - Removal is per level; nested tables disappear with their entry

pub mod options;
pub mod table;

pub use options::{RouteOptions, Selector};
pub use table::RouteTable;
