//! Match-tree walk.
//!
//! Each node moves through: pending → gated (skip the callback, still
//! descend) | invoking (sync; the returned [`Signal`] decides descent) |
//! awaiting completion (async; descent waits for the [`Completion`]) →
//! resolved.

use std::fmt;
use std::sync::Arc;

use crate::dispatch::args::Args;
use crate::dispatch::handler::{Handler, Signal};
use crate::observability::metrics;
use crate::pattern::Argument;

/// Navigation side effects requested by handlers.
pub trait NavigationHooks: Send + Sync {
    /// Roll back to the last committed path.
    fn reject(&self);

    /// Route to `path` instead of the current match.
    fn redirect(&self, path: &str);
}

/// One matched route at one nesting level. Built per `check`, consumed by
/// [`apply`].
pub struct MatchNode {
    pub(crate) handler: Handler,
    pub(crate) async_index: Option<usize>,
    pub(crate) arguments: Vec<Argument>,
    pub(crate) should_invoke: bool,
    pub(crate) alias: Option<String>,
    pub(crate) children: Vec<MatchNode>,
}

impl MatchNode {
    pub fn handler(&self) -> &Handler {
        &self.handler
    }

    pub fn async_index(&self) -> Option<usize> {
        self.async_index
    }

    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    /// False when rerouting is off and the matched prefix is unchanged.
    pub fn should_invoke(&self) -> bool {
        self.should_invoke
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn children(&self) -> &[MatchNode] {
        &self.children
    }
}

impl fmt::Debug for MatchNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatchNode")
            .field("alias", &self.alias)
            .field("async_index", &self.async_index)
            .field("arguments", &self.arguments)
            .field("should_invoke", &self.should_invoke)
            .field("children", &self.children)
            .finish()
    }
}

/// Continuation handed to an asynchronous handler.
///
/// Completing consumes it, so the nested matches run at most once. Dropping
/// it without completing leaves them pending forever.
pub struct Completion {
    children: Vec<MatchNode>,
    hooks: Arc<dyn NavigationHooks>,
}

impl Completion {
    pub fn complete(self, signal: impl Into<Signal>) {
        resolve(signal.into(), self.children, &self.hooks);
    }

    /// Complete normally and descend into nested matches.
    pub fn done(self) {
        self.complete(Signal::Continue);
    }

    pub fn reject(self) {
        self.complete(Signal::Reject);
    }

    pub fn redirect(self, path: impl Into<String>) {
        self.complete(Signal::Redirect(path.into()));
    }
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion")
            .field("pending_children", &self.children.len())
            .finish_non_exhaustive()
    }
}

/// Walk `nodes` depth-first in order, invoking handlers.
pub fn apply(nodes: Vec<MatchNode>, hooks: &Arc<dyn NavigationHooks>) {
    for node in nodes {
        run(node, hooks);
    }
}

fn run(node: MatchNode, hooks: &Arc<dyn NavigationHooks>) {
    let MatchNode {
        handler,
        async_index,
        arguments,
        should_invoke,
        alias,
        children,
    } = node;

    if !should_invoke {
        tracing::trace!(route = ?alias, "Prefix unchanged, skipping handler");
        metrics::record_gated();
        apply(children, hooks);
        return;
    }

    let mut args = Args::new(arguments);
    match async_index {
        Some(index) => {
            tracing::debug!(route = ?alias, index, "Invoking async handler");
            metrics::record_invocation("async");
            args.insert_completion(
                index,
                Completion {
                    children,
                    hooks: Arc::clone(hooks),
                },
            );
            let ignored = handler.call(args);
            if ignored != Signal::Continue {
                tracing::debug!(route = ?alias, signal = ?ignored, "Async handler return value ignored");
            }
        }
        None => {
            tracing::debug!(route = ?alias, "Invoking handler");
            metrics::record_invocation("sync");
            let signal = handler.call(args);
            resolve(signal, children, hooks);
        }
    }
}

fn resolve(signal: Signal, children: Vec<MatchNode>, hooks: &Arc<dyn NavigationHooks>) {
    match signal {
        Signal::Continue => apply(children, hooks),
        Signal::Reject => {
            tracing::info!("Navigation rejected by handler");
            metrics::record_rejection();
            hooks.reject();
        }
        Signal::Redirect(path) => {
            tracing::info!(%path, "Handler redirected navigation");
            metrics::record_redirect();
            hooks.redirect(&path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingHooks {
        events: Mutex<Vec<String>>,
    }

    impl NavigationHooks for RecordingHooks {
        fn reject(&self) {
            self.events.lock().push("reject".into());
        }

        fn redirect(&self, path: &str) {
            self.events.lock().push(format!("redirect {path}"));
        }
    }

    fn node(handler: Handler, should_invoke: bool, children: Vec<MatchNode>) -> MatchNode {
        MatchNode {
            async_index: crate::dispatch::detect_async_index(&handler),
            handler,
            arguments: vec![Argument::Query(None)],
            should_invoke,
            alias: None,
            children,
        }
    }

    fn recorder(log: &Arc<Mutex<String>>, mark: &'static str, signal: Signal) -> Handler {
        let log = Arc::clone(log);
        Handler::new(move |_| {
            log.lock().push_str(mark);
            signal.clone()
        })
    }

    #[test]
    fn test_gated_node_still_descends() {
        let log = Arc::new(Mutex::new(String::new()));
        let tree = node(
            recorder(&log, "1", Signal::Continue),
            false,
            vec![node(recorder(&log, "2", Signal::Continue), true, Vec::new())],
        );
        let hooks: Arc<dyn NavigationHooks> = Arc::new(RecordingHooks::default());
        apply(vec![tree], &hooks);
        assert_eq!(*log.lock(), "2");
    }

    #[test]
    fn test_reject_stops_descent() {
        let log = Arc::new(Mutex::new(String::new()));
        let hooks = Arc::new(RecordingHooks::default());
        let tree = node(
            recorder(&log, "1", Signal::Reject),
            true,
            vec![node(recorder(&log, "2", Signal::Continue), true, Vec::new())],
        );
        let dyn_hooks: Arc<dyn NavigationHooks> = hooks.clone();
        apply(vec![tree], &dyn_hooks);
        assert_eq!(*log.lock(), "1");
        assert_eq!(*hooks.events.lock(), vec!["reject".to_string()]);
    }

    #[test]
    fn test_redirect_replaces_descent() {
        let log = Arc::new(Mutex::new(String::new()));
        let hooks = Arc::new(RecordingHooks::default());
        let tree = node(
            recorder(&log, "1", Signal::Redirect("/login".into())),
            true,
            vec![node(recorder(&log, "2", Signal::Continue), true, Vec::new())],
        );
        let dyn_hooks: Arc<dyn NavigationHooks> = hooks.clone();
        apply(vec![tree], &dyn_hooks);
        assert_eq!(*log.lock(), "1");
        assert_eq!(*hooks.events.lock(), vec!["redirect /login".to_string()]);
    }

    #[test]
    fn test_async_children_wait_for_completion() {
        let log = Arc::new(Mutex::new(String::new()));
        let parked: Arc<Mutex<Option<Completion>>> = Arc::new(Mutex::new(None));

        let parent = {
            let log = Arc::clone(&log);
            let parked = Arc::clone(&parked);
            Handler::with_signature(["query", "complete"], move |mut args: Args| {
                assert_eq!(args.completion_index(), Some(1));
                log.lock().push_str("1");
                *parked.lock() = args.take_completion();
            })
        };
        let tree = node(
            parent,
            true,
            vec![node(recorder(&log, "2", Signal::Continue), true, Vec::new())],
        );
        let hooks: Arc<dyn NavigationHooks> = Arc::new(RecordingHooks::default());
        apply(vec![tree], &hooks);
        assert_eq!(*log.lock(), "1");

        let completion = parked.lock().take().expect("completion parked");
        completion.done();
        assert_eq!(*log.lock(), "12");
    }

    #[test]
    fn test_completion_index_past_end_appends() {
        let seen = Arc::new(Mutex::new(None));
        let handler = {
            let seen = Arc::clone(&seen);
            Handler::with_signature(["a", "b", "c", "complete"], move |mut args: Args| {
                *seen.lock() = args.completion_index();
                if let Some(completion) = args.take_completion() {
                    completion.done();
                }
            })
        };
        let hooks: Arc<dyn NavigationHooks> = Arc::new(RecordingHooks::default());
        apply(vec![node(handler, true, Vec::new())], &hooks);
        assert_eq!(*seen.lock(), Some(1));
    }
}
