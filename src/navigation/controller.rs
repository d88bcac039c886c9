//! Navigation controller.
//!
//! # Responsibilities
//! - Own the root route table and the location adapter
//! - Remember the last processed path for change detection
//! - Commit navigation unless a handler rejected or redirected it
//!
//! # Design Decisions
//! - `Router` is a cheap handle; clones share tables and state
//! - The match tree is built, and state updated, before any handler runs
//! - Navigation state is never locked while handlers run

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::task::AbortHandle;

use crate::config::schema::ConfigOptions;
use crate::dispatch::{apply, Handler, NavigationHooks};
use crate::navigation::location::{fragment_of, href_for, Location, MemoryLocation};
use crate::observability::metrics;
use crate::routing::{RouteOptions, RouteTable, Selector};

#[derive(Debug, Default)]
struct NavigationState {
    /// Last path handed to `check`.
    last_url: String,
    /// Last path written to the location.
    committed: String,
    /// Committed path before the last `navigate`.
    previous: String,
    /// Dispatch generation whose `route` wrote `committed`.
    committed_generation: Option<u64>,
    rollback: bool,
    /// Bumped by every dispatch; handlers act only on their own.
    generation: u64,
}

/// Public entry point: registration, dispatch and navigation.
#[derive(Clone)]
pub struct Router {
    root: RouteTable,
    state: Arc<Mutex<NavigationState>>,
    location: Arc<dyn Location>,
    poller: Arc<Mutex<Option<AbortHandle>>>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    /// A router backed by an in-memory location.
    pub fn new() -> Self {
        Self::with_location(Arc::new(MemoryLocation::default()))
    }

    pub fn with_location(location: Arc<dyn Location>) -> Self {
        Self {
            root: RouteTable::new(),
            state: Arc::new(Mutex::new(NavigationState::default())),
            location,
            poller: Arc::new(Mutex::new(None)),
        }
    }

    /// The root-level table.
    pub fn root(&self) -> &RouteTable {
        &self.root
    }

    pub fn location(&self) -> &Arc<dyn Location> {
        &self.location
    }

    pub fn add(&self, pattern: &str, handler: Handler) -> &Self {
        self.root.add(pattern, handler);
        self
    }

    pub fn add_with(&self, pattern: &str, handler: Handler, options: RouteOptions) -> &Self {
        self.root.add_with(pattern, handler, options);
        self
    }

    pub fn add_default(&self, handler: Handler) -> &Self {
        self.root.add_default(handler);
        self
    }

    pub fn add_default_with(&self, handler: Handler, options: RouteOptions) -> &Self {
        self.root.add_default_with(handler, options);
        self
    }

    pub fn remove(&self, selector: impl Into<Selector>) -> &Self {
        self.root.remove(selector);
        self
    }

    /// Configure the root level.
    pub fn config(&self, options: &ConfigOptions) -> &Self {
        self.root.config(options);
        self
    }

    /// Nested table of the root entry aliased `alias`.
    pub fn to(&self, alias: &str) -> Option<RouteTable> {
        self.root.to(alias)
    }

    /// Clear the root level and forget the last processed path.
    ///
    /// The router itself stays usable; this is not `Drop::drop`.
    pub fn drop(&self) -> &Self {
        self.state.lock().last_url.clear();
        self.root.drop();
        self
    }

    /// Dispatch `path` without committing navigation.
    pub fn check(&self, path: &str) -> &Self {
        self.dispatch(path);
        self
    }

    /// Run one dispatch of `path` and return its generation.
    fn dispatch(&self, path: &str) -> u64 {
        let (previous, generation) = {
            let mut state = self.state.lock();
            state.generation = state.generation.wrapping_add(1);
            let previous = std::mem::replace(&mut state.last_url, path.to_string());
            (previous, state.generation)
        };
        let nodes = self.root.check(path, &previous);
        tracing::debug!(path, previous = %previous, generation, matched = !nodes.is_empty(), "Checking path");

        let hooks: Arc<dyn NavigationHooks> = Arc::new(DispatchHooks {
            router: self.clone(),
            generation,
        });
        apply(nodes, &hooks);
        generation
    }

    /// Write `path` to the location without dispatching.
    pub fn navigate(&self, path: &str) -> &Self {
        self.commit(path, None);
        self
    }

    fn commit(&self, path: &str, generation: Option<u64>) {
        {
            let mut state = self.state.lock();
            state.previous = std::mem::replace(&mut state.committed, path.to_string());
            state.committed_generation = generation;
        }
        self.write_location(path);
    }

    fn write_location(&self, path: &str) {
        let config = self.root.settings();
        let href = href_for(&self.location.href(), path, &config);
        self.location.set_href(&href);

        tracing::debug!(path, href = %href, mode = %config.mode, "Navigated");
        metrics::record_navigation(config.mode);
    }

    /// Check `path`, then navigate to it unless a handler rejected it or
    /// routed somewhere else meanwhile.
    pub fn route(&self, path: &str) -> &Self {
        self.state.lock().rollback = false;
        let generation = self.dispatch(path);

        let commit = {
            let state = self.state.lock();
            !state.rollback && state.generation == generation
        };
        if commit {
            self.commit(path, Some(generation));
        } else {
            tracing::debug!(path, "Navigation not committed");
        }
        self
    }

    /// Current fragment read from the location.
    pub fn current(&self) -> String {
        fragment_of(&self.location.href(), &self.root.settings())
    }

    /// Last path handed to `check`.
    pub fn last_url(&self) -> String {
        self.state.lock().last_url.clone()
    }

    /// Last path committed through `navigate`.
    pub fn committed(&self) -> String {
        self.state.lock().committed.clone()
    }

    /// Whether a handler rejected navigation since the last `route`.
    pub fn rollback_requested(&self) -> bool {
        self.state.lock().rollback
    }

    /// Abort the running location poller, if any, and remember `handle` as
    /// the new one.
    pub(crate) fn replace_poller(&self, handle: Option<AbortHandle>) {
        if let Some(previous) = std::mem::replace(&mut *self.poller.lock(), handle) {
            previous.abort();
        }
    }
}

/// Navigation hooks bound to the dispatch that produced a match tree.
///
/// Signals from a dispatch that has since been superseded are dropped.
struct DispatchHooks {
    router: Router,
    generation: u64,
}

impl DispatchHooks {
    fn is_current(&self, state: &NavigationState) -> bool {
        state.generation == self.generation
    }
}

impl NavigationHooks for DispatchHooks {
    fn reject(&self) {
        let target = {
            let mut state = self.router.state.lock();
            if !self.is_current(&state) {
                tracing::debug!(generation = self.generation, "Ignoring rejection from a superseded dispatch");
                return;
            }
            // An asynchronous rejection arrives after its route committed.
            if state.committed_generation == Some(self.generation) {
                state.committed = std::mem::take(&mut state.previous);
                state.committed_generation = None;
            }
            state.rollback = true;
            state.last_url = state.committed.clone();
            state.committed.clone()
        };
        tracing::info!(target = %target, "Rolling back navigation");
        self.router.write_location(&target);
    }

    fn redirect(&self, path: &str) {
        let current = self.is_current(&self.router.state.lock());
        if !current {
            tracing::debug!(path, generation = self.generation, "Ignoring redirect from a superseded dispatch");
            return;
        }
        self.router.route(path);
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("root", &self.root)
            .field("state", &*self.state.lock())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::Signal;

    fn counter(log: &Arc<Mutex<String>>, mark: &'static str) -> Handler {
        let log = Arc::clone(log);
        Handler::new(move |_| log.lock().push_str(mark))
    }

    #[test]
    fn test_check_does_not_navigate() {
        let location = Arc::new(MemoryLocation::new(""));
        let router = Router::with_location(location.clone());
        let log = Arc::new(Mutex::new(String::new()));
        router.add("about", counter(&log, "1"));

        router.check("about");
        assert_eq!(*log.lock(), "1");
        assert_eq!(router.last_url(), "about");
        assert!(location.entries().is_empty());
    }

    #[test]
    fn test_route_commits() {
        let location = Arc::new(MemoryLocation::new(""));
        let router = Router::with_location(location.clone());
        router.add("about", Handler::new(|_| ()));

        router.route("about");
        assert_eq!(router.committed(), "about");
        assert_eq!(router.current(), "about");
        assert_eq!(location.entries(), vec!["about"]);
    }

    #[test]
    fn test_rejection_rolls_back() {
        let location = Arc::new(MemoryLocation::new(""));
        let router = Router::with_location(location.clone());
        router
            .add("home", Handler::new(|_| ()))
            .add("admin", Handler::new(|_| Signal::Reject));

        router.route("home");
        router.route("admin");

        assert!(router.rollback_requested());
        assert_eq!(router.committed(), "home");
        assert_eq!(router.current(), "home");
        assert_eq!(router.last_url(), "home");
        assert_eq!(location.entries(), vec!["home", "home"]);
    }

    fn parking(slot: &Arc<Mutex<Option<crate::dispatch::Completion>>>) -> Handler {
        let slot = Arc::clone(slot);
        Handler::with_signature(["complete"], move |mut args: crate::dispatch::Args| {
            *slot.lock() = args.take_completion();
        })
    }

    #[test]
    fn test_late_rejection_restores_previous_path() {
        let location = Arc::new(MemoryLocation::new(""));
        let router = Router::with_location(location.clone());
        let parked = Arc::new(Mutex::new(None));
        router.add("home", Handler::new(|_| ())).add("admin", parking(&parked));

        router.route("home").route("admin");
        parked.lock().take().unwrap().reject();

        assert!(router.rollback_requested());
        assert_eq!(router.committed(), "home");
        assert_eq!(router.last_url(), "home");
        assert_eq!(location.entries(), vec!["home", "admin", "home"]);
    }

    #[test]
    fn test_superseded_rejection_is_ignored() {
        let location = Arc::new(MemoryLocation::new(""));
        let router = Router::with_location(location.clone());
        let parked = Arc::new(Mutex::new(None));
        router
            .add("home", Handler::new(|_| ()))
            .add("admin", parking(&parked))
            .add("other", Handler::new(|_| ()));

        router.route("home").route("admin").route("other");
        parked.lock().take().unwrap().reject();

        assert!(!router.rollback_requested());
        assert_eq!(router.committed(), "other");
        assert_eq!(location.entries(), vec!["home", "admin", "other"]);
    }

    #[test]
    fn test_rejection_during_check_keeps_committed_path() {
        let location = Arc::new(MemoryLocation::new(""));
        let router = Router::with_location(location.clone());
        router
            .add("home", Handler::new(|_| ()))
            .add("admin", Handler::new(|_| Signal::Reject));

        router.route("home").check("admin");

        assert_eq!(router.committed(), "home");
        assert_eq!(router.last_url(), "home");
        assert_eq!(location.entries(), vec!["home", "home"]);
    }

    #[test]
    fn test_redirect_replaces_requested_path() {
        let location = Arc::new(MemoryLocation::new(""));
        let router = Router::with_location(location.clone());
        let log = Arc::new(Mutex::new(String::new()));
        router
            .add("old", Handler::new(|_| "new"))
            .add("new", counter(&log, "n"));

        router.route("old");

        assert_eq!(*log.lock(), "n");
        assert_eq!(router.committed(), "new");
        assert_eq!(location.entries(), vec!["new"]);
    }

    #[test]
    fn test_drop_forgets_last_url() {
        let router = Router::new();
        router.config(&ConfigOptions::new().rerouting(false));
        let log = Arc::new(Mutex::new(String::new()));
        router.add("about", counter(&log, "1"));
        router.check("about").check("about");
        assert_eq!(*log.lock(), "1");

        router.drop();
        assert_eq!(router.last_url(), "");
        assert!(router.root().is_empty());
    }
}
