//! Registration options and removal selectors.

use crate::dispatch::{Handler, HandlerId};
use crate::pattern::RoutePattern;

/// Options accepted by `add_with` / `add_default_with`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteOptions {
    pub(crate) alias: Option<String>,
    pub(crate) async_index: Option<usize>,
}

impl RouteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identity for removal and nesting. Defaults to the pattern string.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Position of the continuation argument, overriding the handler's
    /// declared signature.
    pub fn async_index(mut self, index: usize) -> Self {
        self.async_index = Some(index);
        self
    }
}

/// What `remove` matches entries against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Equal to an entry's alias or to its compiled pattern text.
    Text(String),
    /// Same handler identity.
    Handler(HandlerId),
}

impl From<&str> for Selector {
    fn from(text: &str) -> Self {
        Selector::Text(text.to_string())
    }
}

impl From<String> for Selector {
    fn from(text: String) -> Self {
        Selector::Text(text)
    }
}

impl From<&Handler> for Selector {
    fn from(handler: &Handler) -> Self {
        Selector::Handler(handler.id())
    }
}

impl From<HandlerId> for Selector {
    fn from(id: HandlerId) -> Self {
        Selector::Handler(id)
    }
}

impl From<&RoutePattern> for Selector {
    fn from(pattern: &RoutePattern) -> Self {
        Selector::Text(pattern.as_str().to_string())
    }
}
