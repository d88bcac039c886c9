//! Client-side fragment routing library.

pub mod config;
pub mod dispatch;
pub mod navigation;
pub mod observability;
pub mod pattern;
pub mod routing;

pub use config::schema::{ConfigOptions, LevelConfig, Mode};
pub use dispatch::{Args, Completion, Handler, Signal};
pub use navigation::{Listener, Location, MemoryLocation, Router};
pub use pattern::{compile, Argument, Params, Query, RoutePattern};
pub use routing::{RouteOptions, RouteTable, Selector};
