//! Dispatch-bound callback factory.
//!
//! Callbacks are memoized by `(action name, bound arguments)`: equal
//! inputs return a reference-equal `Callback`, so consumers comparing
//! callback identity to decide whether anything changed are never misled.
//! Bound arguments are restricted to primitives to keep that memoization
//! decidable — structural values must be decomposed by the caller.

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};

use axon_common::Action;
use axon_engine::Dispatcher;

/// A bound argument. Only primitive, equality-comparable values.
#[derive(Debug, Clone)]
pub enum Arg {
    Null,
    Bool(bool),
    Int(i64),
    /// Compared and hashed by bit pattern, so NaN equals NaN here.
    Num(f64),
    Str(String),
}

impl Arg {
    pub fn to_value(&self) -> Value {
        match self {
            Arg::Null => Value::Null,
            Arg::Bool(b) => json!(b),
            Arg::Int(i) => json!(i),
            Arg::Num(n) => json!(n),
            Arg::Str(s) => json!(s),
        }
    }
}

impl PartialEq for Arg {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Arg::Null, Arg::Null) => true,
            (Arg::Bool(a), Arg::Bool(b)) => a == b,
            (Arg::Int(a), Arg::Int(b)) => a == b,
            (Arg::Num(a), Arg::Num(b)) => a.to_bits() == b.to_bits(),
            (Arg::Str(a), Arg::Str(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Arg {}

impl Hash for Arg {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Arg::Null => {}
            Arg::Bool(b) => b.hash(state),
            Arg::Int(i) => i.hash(state),
            Arg::Num(n) => n.to_bits().hash(state),
            Arg::Str(s) => s.hash(state),
        }
    }
}

impl From<bool> for Arg {
    fn from(v: bool) -> Self {
        Arg::Bool(v)
    }
}

impl From<i64> for Arg {
    fn from(v: i64) -> Self {
        Arg::Int(v)
    }
}

impl From<f64> for Arg {
    fn from(v: f64) -> Self {
        Arg::Num(v)
    }
}

impl From<&str> for Arg {
    fn from(v: &str) -> Self {
        Arg::Str(v.to_string())
    }
}

impl From<String> for Arg {
    fn from(v: String) -> Self {
        Arg::Str(v)
    }
}

/// A stable, dispatch-bound callback. Clones share identity; `PartialEq`
/// compares identity, not contents.
#[derive(Clone)]
pub struct Callback {
    inner: Arc<CallbackInner>,
}

struct CallbackInner {
    action: String,
    bound: Vec<Arg>,
    dispatcher: Dispatcher,
}

impl Callback {
    /// Dispatch with the bound arguments only.
    pub fn call(&self) {
        self.call_with(&[]);
    }

    /// Dispatch with trailing arguments appended after the bound ones —
    /// the unary/binary calling pattern.
    pub fn call_with(&self, rest: &[Arg]) {
        let payload = self
            .inner
            .bound
            .iter()
            .chain(rest)
            .map(Arg::to_value)
            .collect();
        self.inner
            .dispatcher
            .dispatch(Action::new(self.inner.action.as_str(), payload));
    }
}

impl PartialEq for Callback {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Callback {}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callback")
            .field("action", &self.inner.action)
            .field("bound", &self.inner.bound)
            .finish()
    }
}

/// Memoizing callback factory bound to one runtime.
pub struct Callbacks {
    dispatcher: Dispatcher,
    cache: Mutex<HashMap<(String, Vec<Arg>), Callback>>,
}

impl Callbacks {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Callback dispatching `action` with `bound` as the leading payload.
    /// Equal `(action, bound)` pairs return a reference-equal value.
    pub fn action(&self, action: impl Into<String>, bound: Vec<Arg>) -> Callback {
        let key = (action.into(), bound);
        let mut cache = self.cache.lock().unwrap();
        if let Some(callback) = cache.get(&key) {
            return callback.clone();
        }
        let callback = Callback {
            inner: Arc::new(CallbackInner {
                action: key.0.clone(),
                bound: key.1.clone(),
                dispatcher: self.dispatcher.clone(),
            }),
        };
        cache.insert(key, callback.clone());
        callback
    }
}
