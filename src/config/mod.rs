//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! route file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks, strict pattern compilation)
//!     → RouterFile (validated)
//!     → routes.rs (register routes, configure nested levels)
//!
//! Programmatic use:
//!     ConfigOptions → RouteTable::config (one level at a time)
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Level options are patches; unset fields keep their value

pub mod loader;
pub mod routes;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use routes::{build_router, install_routes, InvocationObserver};
pub use schema::{Action, ConfigOptions, LevelConfig, Mode, ObservabilityConfig, RouteSpec, RouterFile};
pub use validation::ValidationError;
