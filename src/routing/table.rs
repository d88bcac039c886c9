//! Route table for one nesting level.
//!
//! # Responsibilities
//! - Store compiled routes in registration order
//! - Find the first route matching a fragment prefix
//! - Hand the unconsumed remainder to the matched route's nested table
//! - Hold this level's configuration
//!
//! # Design Decisions
//! - First match wins; at most one node per level per check
//! - Nested tables copy the parent's configuration once, at creation
//! - Locks are released before recursing into nested tables

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::schema::{ConfigOptions, LevelConfig};
use crate::dispatch::{detect_async_index, Handler, MatchNode};
use crate::pattern::{compile, extract_params, prepare_arguments, RoutePattern};
use crate::routing::options::{RouteOptions, Selector};

struct RouteEntry {
    pattern: RoutePattern,
    handler: Handler,
    async_index: Option<usize>,
    alias: Option<String>,
    facade: Option<RouteTable>,
}

impl RouteEntry {
    fn selected_by(&self, selector: &Selector) -> bool {
        match selector {
            Selector::Text(text) => {
                self.alias.as_deref() == Some(text.as_str()) || self.pattern.as_str() == text.as_str()
            }
            Selector::Handler(id) => self.handler.id() == *id,
        }
    }
}

#[derive(Default)]
struct Level {
    routes: Vec<RouteEntry>,
    config: LevelConfig,
}

/// Shared handle to one level of the route tree.
///
/// Cloning yields another handle to the same level.
#[derive(Clone, Default)]
pub struct RouteTable {
    inner: Arc<RwLock<Level>>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: LevelConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Level {
                routes: Vec::new(),
                config,
            })),
        }
    }

    /// Register `handler` for `pattern`.
    pub fn add(&self, pattern: &str, handler: Handler) -> &Self {
        self.add_with(pattern, handler, RouteOptions::default())
    }

    pub fn add_with(&self, pattern: &str, handler: Handler, options: RouteOptions) -> &Self {
        let alias = options.alias.clone().unwrap_or_else(|| pattern.to_string());
        self.push(compile(pattern), handler, Some(alias), options)
    }

    /// Register a default route: matches whatever reaches this level.
    pub fn add_default(&self, handler: Handler) -> &Self {
        self.add_default_with(handler, RouteOptions::default())
    }

    pub fn add_default_with(&self, handler: Handler, options: RouteOptions) -> &Self {
        let alias = options.alias.clone();
        self.push(RoutePattern::any(), handler, alias, options)
    }

    fn push(
        &self,
        pattern: RoutePattern,
        handler: Handler,
        alias: Option<String>,
        options: RouteOptions,
    ) -> &Self {
        let async_index = options.async_index.or_else(|| detect_async_index(&handler));
        tracing::debug!(pattern = %pattern, alias = ?alias, async_index = ?async_index, "Route added");

        self.inner.write().routes.push(RouteEntry {
            pattern,
            handler,
            async_index,
            alias,
            facade: None,
        });
        self
    }

    /// Remove every entry at this level selected by `selector`.
    pub fn remove(&self, selector: impl Into<Selector>) -> &Self {
        let selector = selector.into();
        let mut level = self.inner.write();
        let before = level.routes.len();
        level.routes.retain(|entry| !entry.selected_by(&selector));
        tracing::debug!(selector = ?selector, removed = before - level.routes.len(), "Routes removed");
        self
    }

    /// Match `fragment` against this level and its nested tables.
    ///
    /// `previous` is the last processed path at the same depth; a node is
    /// marked for invocation when rerouting is on or its matched prefix
    /// differs from the same-length prefix of `previous`.
    pub fn check(&self, fragment: &str, previous: &str) -> Vec<MatchNode> {
        let mut nodes = Vec::new();
        self.check_into(fragment, &mut nodes, previous);
        nodes
    }

    fn check_into(&self, fragment: &str, out: &mut Vec<MatchNode>, previous: &str) {
        let (mut node, facade, consumed) = {
            let level = self.inner.read();
            let Some((entry, consumed)) = level
                .routes
                .iter()
                .find_map(|entry| entry.pattern.match_len(fragment).map(|len| (entry, len)))
            else {
                tracing::trace!(fragment, "No route matched");
                return;
            };

            let params = extract_params(&entry.pattern, fragment);
            let names = level.config.keys.then(|| entry.pattern.captures());
            let changed = fragment.as_bytes().get(..consumed) != previous.as_bytes().get(..consumed);

            let node = MatchNode {
                handler: entry.handler.clone(),
                async_index: entry.async_index,
                arguments: prepare_arguments(params, names),
                should_invoke: level.config.rerouting || changed,
                alias: entry.alias.clone(),
                children: Vec::new(),
            };
            tracing::trace!(
                fragment,
                pattern = %entry.pattern,
                changed,
                should_invoke = node.should_invoke,
                "Route matched"
            );
            (node, entry.facade.clone(), consumed)
        };

        if let Some(facade) = facade {
            let rest = &fragment[consumed..];
            let previous_rest = previous.get(consumed..).unwrap_or("");
            facade.check_into(rest, &mut node.children, previous_rest);
        }
        out.push(node);
    }

    /// Nested table of the first entry aliased `alias`, created on first
    /// use with a copy of this level's configuration.
    pub fn to(&self, alias: &str) -> Option<RouteTable> {
        let mut level = self.inner.write();
        let config = level.config.clone();
        let entry = level
            .routes
            .iter_mut()
            .find(|entry| entry.alias.as_deref() == Some(alias))?;

        let facade = entry
            .facade
            .get_or_insert_with(|| RouteTable::with_config(config));
        Some(facade.clone())
    }

    /// Merge `options` into this level's configuration only.
    pub fn config(&self, options: &ConfigOptions) -> &Self {
        self.inner.write().config.merge(options);
        self
    }

    /// Snapshot of this level's configuration.
    pub fn settings(&self) -> LevelConfig {
        self.inner.read().config.clone()
    }

    /// Remove every entry and restore the default configuration. Nested
    /// tables go away with their entries. The handle stays valid; this is
    /// not `Drop::drop`.
    pub fn drop(&self) -> &Self {
        let mut level = self.inner.write();
        level.routes.clear();
        level.config = LevelConfig::default();
        self
    }

    pub fn len(&self) -> usize {
        self.inner.read().routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().routes.is_empty()
    }
}

impl fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = self.inner.read();
        let aliases: Vec<_> = level.routes.iter().map(|entry| &entry.alias).collect();
        f.debug_struct("RouteTable")
            .field("config", &level.config)
            .field("aliases", &aliases)
            .finish()
    }
}
