//! Route handlers and the signals they return.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::dispatch::args::Args;

/// Name of the declared parameter that marks a handler as asynchronous.
pub const COMPLETE_PARAM: &str = "complete";

static NEXT_HANDLER_ID: AtomicU64 = AtomicU64::new(1);

/// What the dispatcher does after a handler (or its continuation) resolves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Signal {
    /// Descend into the node's nested matches.
    #[default]
    Continue,
    /// Abort descent and roll navigation back to the last committed path.
    Reject,
    /// Abort descent and route to another path instead.
    Redirect(String),
}

impl From<()> for Signal {
    fn from(_: ()) -> Self {
        Signal::Continue
    }
}

impl From<String> for Signal {
    fn from(path: String) -> Self {
        Signal::Redirect(path)
    }
}

impl From<&str> for Signal {
    fn from(path: &str) -> Self {
        Signal::Redirect(path.to_string())
    }
}

/// Identity of a handler. Clones of a [`Handler`] share it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

type HandlerFn = dyn Fn(Args) -> Signal + Send + Sync;

/// A route callback together with its declared parameter list.
///
/// The declared signature is how a handler opts into the asynchronous
/// contract: a parameter named `complete` receives a
/// [`Completion`](crate::dispatch::Completion) at that position.
#[derive(Clone)]
pub struct Handler {
    id: HandlerId,
    signature: Arc<[String]>,
    func: Arc<HandlerFn>,
}

impl Handler {
    /// A synchronous handler.
    pub fn new<F, R>(f: F) -> Self
    where
        F: Fn(Args) -> R + Send + Sync + 'static,
        R: Into<Signal>,
    {
        Self::with_signature(std::iter::empty::<&str>(), f)
    }

    /// A handler with declared parameter names, e.g. `["params", "complete"]`.
    pub fn with_signature<I, S, F, R>(signature: I, f: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(Args) -> R + Send + Sync + 'static,
        R: Into<Signal>,
    {
        Self {
            id: HandlerId(NEXT_HANDLER_ID.fetch_add(1, Ordering::Relaxed)),
            signature: signature.into_iter().map(Into::into).collect(),
            func: Arc::new(move |args: Args| -> Signal { f(args).into() }),
        }
    }

    pub fn id(&self) -> HandlerId {
        self.id
    }

    /// Declared parameter names.
    pub fn signature(&self) -> &[String] {
        &self.signature
    }

    pub(crate) fn call(&self, args: Args) -> Signal {
        (self.func)(args)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("id", &self.id)
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

/// Position of the declared `complete` parameter, if any.
pub fn detect_async_index(handler: &Handler) -> Option<usize> {
    handler
        .signature()
        .iter()
        .position(|param| param.trim() == COMPLETE_PARAM)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_async_index() {
        let sync = Handler::new(|_| ());
        assert_eq!(detect_async_index(&sync), None);

        let first = Handler::with_signature(["complete"], |_| ());
        assert_eq!(detect_async_index(&first), Some(0));

        let middle = Handler::with_signature(["id", " complete ", "query"], |_| ());
        assert_eq!(detect_async_index(&middle), Some(1));

        let lookalike = Handler::with_signature(["completed", "done"], |_| ());
        assert_eq!(detect_async_index(&lookalike), None);
    }

    #[test]
    fn test_clones_share_identity() {
        let a = Handler::new(|_| ());
        let b = a.clone();
        let c = Handler::new(|_| ());
        assert_eq!(a.id(), b.id());
        assert_ne!(a.id(), c.id());
    }

    #[test]
    fn test_signal_conversions() {
        assert_eq!(Signal::from(()), Signal::Continue);
        assert_eq!(Signal::from("/login"), Signal::Redirect("/login".into()));
        assert_eq!(Signal::default(), Signal::Continue);
    }
}
