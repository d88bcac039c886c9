//! Navigation subsystem.
//!
//! # Data Flow
//! ```text
//! route(path)
//!     → controller.rs check(path)
//!         → root RouteTable::check (match tree)
//!         → dispatch::apply (handlers)
//!     → unless rejected/redirected: navigate(path)
//!         → location.rs href_for (per mode)
//!         → Location::set_href
//!
//! External change:
//!     listener.rs polls Location
//!     → location.rs fragment_of (per mode)
//!     → controller.rs check(fragment)
//! ```
//!
//! # Design Decisions
//! - The last processed path is the only state dispatch depends on
//! - Rejection navigates back to the last committed path
//! - Environment access goes through the `Location` trait

pub mod controller;
pub mod listener;
pub mod location;

pub use controller::Router;
pub use listener::{Listener, MIN_POLL_PERIOD};
pub use location::{Location, MemoryLocation};
