//! Configuration schema definitions.
//!
//! Per-level routing options plus the declarative route file format. All
//! types derive Serde traits for deserialization from TOML.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::navigation::location::clear_slashes;

/// Where the current fragment is read from and navigation is written to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// The location holds the path itself; nothing is derived.
    #[default]
    #[serde(alias = "node")]
    Manual,
    /// The fragment is the text after `#`.
    Hash,
    /// The fragment is the URL path below `root`.
    History,
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manual" | "node" => Ok(Mode::Manual),
            "hash" => Ok(Mode::Hash),
            "history" => Ok(Mode::History),
            other => Err(format!("unknown routing mode '{other}'")),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::Manual => "manual",
            Mode::Hash => "hash",
            Mode::History => "history",
        })
    }
}

/// Configuration of one routing level.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LevelConfig {
    pub mode: Mode,

    /// Deliver parameters as one named mapping instead of positionally.
    pub keys: bool,

    /// Path prefix below which history-mode fragments live. Always starts
    /// and ends with `/`.
    pub root: String,

    /// Invoke matched handlers even when their prefix did not change.
    pub rerouting: bool,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Manual,
            keys: true,
            root: "/".to_string(),
            rerouting: true,
        }
    }
}

impl LevelConfig {
    /// Apply the options that are set; the rest keep their value.
    pub fn merge(&mut self, options: &ConfigOptions) {
        if let Some(mode) = options.mode {
            self.mode = mode;
        }
        if let Some(keys) = options.keys {
            self.keys = keys;
        }
        if let Some(root) = options.root.as_deref().filter(|root| !root.is_empty()) {
            self.root = normalize_root(root);
        }
        if let Some(rerouting) = options.rerouting {
            self.rerouting = rerouting;
        }
    }
}

/// `app` / `/app` / `/app/` → `/app/`; empty → `/`.
pub fn normalize_root(root: &str) -> String {
    match clear_slashes(root) {
        "" => "/".to_string(),
        inner => format!("/{inner}/"),
    }
}

/// A partial [`LevelConfig`]. Unset fields leave the level untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ConfigOptions {
    pub mode: Option<Mode>,
    pub keys: Option<bool>,
    pub root: Option<String>,
    pub rerouting: Option<bool>,
}

impl ConfigOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn keys(mut self, keys: bool) -> Self {
        self.keys = Some(keys);
        self
    }

    pub fn root(mut self, root: impl Into<String>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn rerouting(mut self, rerouting: bool) -> Self {
        self.rerouting = Some(rerouting);
        self
    }
}

/// Root of a route file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RouterFile {
    /// Options for the root level.
    pub router: ConfigOptions,

    pub observability: ObservabilityConfig,

    /// Root-level routes in registration order.
    pub routes: Vec<RouteSpec>,
}

/// One declared route.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RouteSpec {
    /// Pattern string; absent for a default route.
    pub pattern: Option<String>,

    /// Alias used for removal and nesting. Defaults to the pattern.
    pub alias: Option<String>,

    /// What the handler signals once invoked.
    pub action: Action,

    /// Options for the nested level, applied after it is created.
    pub config: Option<ConfigOptions>,

    /// Nested routes, registered on this route's child table.
    pub children: Vec<RouteSpec>,
}

impl RouteSpec {
    /// Label used in logs and CLI output.
    pub fn label(&self) -> &str {
        self.alias
            .as_deref()
            .or(self.pattern.as_deref())
            .unwrap_or("<default>")
    }
}

/// Declarative handler outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    #[default]
    Continue,
    Reject,
    Redirect(String),
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default `tracing` filter when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: "fragment_router=info".to_string(),
        }
    }
}
