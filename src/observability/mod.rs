//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured `tracing` events)
//!     → metrics.rs (counters through the `metrics` facade)
//!
//! Consumers:
//!     → the binary installs a tracing-subscriber registry
//!     → embedders install whichever metrics recorder they use
//! ```
//!
//! # Design Decisions
//! - The library never installs a subscriber or recorder itself
//! - Matching logs at trace level; dispatch decisions at debug level
//! - Metrics are cheap (atomic increments, no-ops without a recorder)

pub mod logging;
pub mod metrics;
