//! Dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! RouteTable::check(path)
//!     → Vec<MatchNode> (whole tree built up front)
//!     → engine.rs apply (depth-first, registration order)
//!         - gated node: skip callback, descend
//!         - sync handler: call, then act on the returned Signal
//!         - async handler: call with a Completion in its args;
//!           children run when the Completion fires
//!     → NavigationHooks (reject / redirect) back into the controller
//! ```
//!
//! # Design Decisions
//! - Stateless: everything a walk needs travels in the MatchNode tree
//! - Asynchronous handlers declare a `complete` parameter; nothing is
//!   inferred at call time
//! - A pending continuation only delays its own subtree

pub mod args;
pub mod engine;
pub mod handler;

pub use args::Args;
pub use engine::{apply, Completion, MatchNode, NavigationHooks};
pub use handler::{detect_async_index, Handler, HandlerId, Signal};
