//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use fragment_router::config::InvocationObserver;
use fragment_router::dispatch::Args;
use fragment_router::Handler;
use parking_lot::Mutex;

/// Sequence of marks appended by handlers, in invocation order.
#[derive(Clone, Default)]
pub struct Sequence(Arc<Mutex<String>>);

impl Sequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// A synchronous handler appending `mark`.
    pub fn mark(&self, mark: &'static str) -> Handler {
        let log = Arc::clone(&self.0);
        Handler::new(move |_| log.lock().push_str(mark))
    }

    pub fn push(&self, mark: &str) {
        self.0.lock().push_str(mark);
    }

    pub fn get(&self) -> String {
        self.0.lock().clone()
    }
}

/// A handler storing the JSON rendering of every call's arguments.
pub fn capture_args() -> (Handler, Arc<Mutex<Vec<serde_json::Value>>>) {
    let calls: Arc<Mutex<Vec<serde_json::Value>>> = Arc::default();
    let sink = Arc::clone(&calls);
    let handler = Handler::new(move |args: Args| sink.lock().push(args.to_json()));
    (handler, calls)
}

/// An observer recording route labels.
pub fn label_observer() -> (InvocationObserver, Arc<Mutex<Vec<String>>>) {
    let labels: Arc<Mutex<Vec<String>>> = Arc::default();
    let sink = Arc::clone(&labels);
    let observer: InvocationObserver =
        Arc::new(move |label: &str, _: &Args| sink.lock().push(label.to_string()));
    (observer, labels)
}

/// Route file exercising nesting, per-level options and every action.
pub const ROUTE_FILE: &str = r#"
[router]
rerouting = false

[observability]
log_filter = "fragment_router=debug"

[[routes]]
pattern = "/about"

[[routes.children]]
pattern = "/docs/:page"

[[routes]]
pattern = "/admin"
action = "reject"

[[routes]]
pattern = "/old"
action = { redirect = "/about/docs/moved" }

[[routes]]
alias = "fallback"
"#;
