//! Argument list handed to a handler.

use std::fmt;

use serde_json::Value;

use crate::dispatch::engine::Completion;
use crate::pattern::{Argument, Params, Query};

enum Slot {
    Arg(Argument),
    Complete(Option<Completion>),
}

/// Ordered handler arguments.
///
/// Asynchronous handlers find their [`Completion`] in the slot matching the
/// declared `complete` parameter; [`Args::get`] returns `None` there.
pub struct Args {
    slots: Vec<Slot>,
}

impl Args {
    pub(crate) fn new(arguments: Vec<Argument>) -> Self {
        Self {
            slots: arguments.into_iter().map(Slot::Arg).collect(),
        }
    }

    /// Insert the continuation at `index`, appending when past the end.
    pub(crate) fn insert_completion(&mut self, index: usize, completion: Completion) {
        let index = index.min(self.slots.len());
        self.slots.insert(index, Slot::Complete(Some(completion)));
    }

    /// Number of slots, the completion slot included.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Argument> {
        match self.slots.get(index)? {
            Slot::Arg(argument) => Some(argument),
            Slot::Complete(_) => None,
        }
    }

    /// Prepared arguments in order, skipping the completion slot.
    pub fn arguments(&self) -> impl Iterator<Item = &Argument> {
        self.slots.iter().filter_map(|slot| match slot {
            Slot::Arg(argument) => Some(argument),
            Slot::Complete(_) => None,
        })
    }

    /// The named-parameter mapping, when delivered in named mode.
    pub fn params(&self) -> Option<&Params> {
        self.arguments().find_map(|argument| match argument {
            Argument::Params(params) => Some(params),
            _ => None,
        })
    }

    /// Positional value at `index`.
    pub fn value(&self, index: usize) -> Option<&str> {
        match self.get(index)? {
            Argument::Value(value) => value.as_deref(),
            _ => None,
        }
    }

    /// The query mapping, from either delivery mode.
    pub fn query(&self) -> Option<&Query> {
        self.arguments().find_map(|argument| match argument {
            Argument::Params(params) => params.query(),
            Argument::Query(query) => query.as_ref(),
            Argument::Value(_) => None,
        })
    }

    pub fn completion_index(&self) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| matches!(slot, Slot::Complete(_)))
    }

    /// Move the continuation out so it can be completed later.
    pub fn take_completion(&mut self) -> Option<Completion> {
        self.slots.iter_mut().find_map(|slot| match slot {
            Slot::Complete(completion) => completion.take(),
            Slot::Arg(_) => None,
        })
    }

    /// JSON rendering; the completion slot renders as `"<complete>"`.
    pub fn to_json(&self) -> Value {
        Value::Array(
            self.slots
                .iter()
                .map(|slot| match slot {
                    Slot::Arg(argument) => serde_json::to_value(argument).unwrap_or(Value::Null),
                    Slot::Complete(_) => Value::String("<complete>".to_string()),
                })
                .collect(),
        )
    }
}

impl fmt::Debug for Args {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        for slot in &self.slots {
            match slot {
                Slot::Arg(argument) => list.entry(argument),
                Slot::Complete(_) => list.entry(&"<complete>"),
            };
        }
        list.finish()
    }
}
