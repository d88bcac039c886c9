//! Path-pattern compilation and argument extraction.
//!
//! # Data Flow
//! ```text
//! pattern string ("/docs/:section(/:sub)")
//!     → compiler.rs (tokenize, build anchored matcher)
//!     → RoutePattern (matcher + capture list)
//!
//! fragment ("/docs/2/3?first=1")
//!     → params.rs extract_params (captures, percent-decoded)
//!     → params.rs prepare_arguments (named mapping or positional values)
//!     → Vec<Argument> handed to the dispatcher
//! ```
//!
//! # Design Decisions
//! - Pure functions, no shared state
//! - Matchers are anchored at the fragment start and consume a prefix only;
//!   the unconsumed remainder belongs to nested tables
//! - Malformed patterns compile to a matcher that never matches
//! - The trailing query capture is always optional

pub mod compiler;
pub mod params;

pub use compiler::{compile, compile_strict, keys_of, Capture, PatternError, RoutePattern};
pub use params::{extract_params, parse_query, prepare_arguments, Argument, Params, Query};
