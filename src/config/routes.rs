//! Declarative route registration.

use std::sync::Arc;

use crate::config::schema::{Action, RouteSpec, RouterFile};
use crate::dispatch::{Args, Handler, Signal};
use crate::navigation::Router;
use crate::routing::{RouteOptions, RouteTable};

/// Called with the route label and arguments on every invocation.
pub type InvocationObserver = Arc<dyn Fn(&str, &Args) + Send + Sync>;

impl From<Action> for Signal {
    fn from(action: Action) -> Self {
        match action {
            Action::Continue => Signal::Continue,
            Action::Reject => Signal::Reject,
            Action::Redirect(path) => Signal::Redirect(path),
        }
    }
}

fn handler_for(spec: &RouteSpec, observer: &InvocationObserver) -> Handler {
    let label = spec.label().to_string();
    let action = spec.action.clone();
    let observer = Arc::clone(observer);
    Handler::new(move |args: Args| {
        observer(&label, &args);
        action.clone()
    })
}

/// Register `routes` on `table`, recursing into nested levels.
pub fn install_routes(table: &RouteTable, routes: &[RouteSpec], observer: &InvocationObserver) {
    for spec in routes {
        let handler = handler_for(spec, observer);
        let options = match &spec.alias {
            Some(alias) => RouteOptions::new().alias(alias.clone()),
            None => RouteOptions::new(),
        };
        match &spec.pattern {
            Some(pattern) => table.add_with(pattern, handler, options),
            None => table.add_default_with(handler, options),
        };

        if spec.children.is_empty() && spec.config.is_none() {
            continue;
        }
        let alias = spec.alias.as_deref().or(spec.pattern.as_deref());
        let Some(child) = alias.and_then(|alias| table.to(alias)) else {
            tracing::warn!(route = spec.label(), "Nested routes skipped: route has no alias");
            continue;
        };
        if let Some(options) = &spec.config {
            child.config(options);
        }
        install_routes(&child, &spec.children, observer);
    }
}

/// Build a router from a validated route file.
pub fn build_router(file: &RouterFile, router: Router, observer: &InvocationObserver) -> Router {
    router.config(&file.router);
    install_routes(router.root(), &file.routes, observer);
    tracing::info!(routes = router.root().len(), "Router built from route file");
    router
}

impl Router {
    /// A memory-backed router with every route of `file` registered.
    pub fn from_file_config(file: &RouterFile, observer: &InvocationObserver) -> Self {
        build_router(file, Router::new(), observer)
    }
}
