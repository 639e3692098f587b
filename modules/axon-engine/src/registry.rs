//! Handler registry and namespace allocator.
//!
//! Modules register handlers at load time, keyed by action name; no
//! central list exists. The registry grows monotonically during the init
//! phase, then moves into the `Runtime` and is immutable afterwards.
//! There is no unregistration — handlers live for the process lifetime.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use anyhow::Result;
use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::Value;

use axon_common::AxonError;

use crate::runtime::Dispatcher;

/// Pure state transition: computes the namespace's next slice from the
/// action payload alone. Must not consult the previous slice value.
pub type ReduceFn = Arc<dyn Fn(&[Value]) -> Result<Value> + Send + Sync>;

/// Asynchronous effect body. Receives the payload and a dispatcher for
/// follow-up actions (recursive re-entry into the pipeline).
pub type EffectFn =
    Arc<dyn Fn(Vec<Value>, Dispatcher) -> BoxFuture<'static, Result<()>> + Send + Sync>;

/// A registered handler for one action name.
#[derive(Clone)]
pub enum Handler {
    /// Synchronous state transition owning one namespace slice.
    Reduce { namespace: String, f: ReduceFn },
    /// Asynchronous effect; optionally tracked under a loading key.
    Effect {
        loading_key: Option<String>,
        f: EffectFn,
    },
}

/// Handler table mapping action name to handlers in registration order.
#[derive(Default)]
pub struct Registry {
    handlers: HashMap<String, Vec<Handler>>,
    namespaces: HashMap<String, Value>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `namespace` and return a registrar scoped to it.
    ///
    /// Fails with [`AxonError::DuplicateNamespace`] if the namespace is
    /// already claimed — a startup-time programmer error that must abort
    /// module initialization.
    pub fn module(
        &mut self,
        namespace: impl Into<String>,
        initial_slice: Value,
    ) -> Result<ModuleRegistrar<'_>, AxonError> {
        let namespace = namespace.into();
        if self.namespaces.contains_key(&namespace) {
            return Err(AxonError::DuplicateNamespace(namespace));
        }
        self.namespaces.insert(namespace.clone(), initial_slice);
        Ok(ModuleRegistrar {
            registry: self,
            namespace,
        })
    }

    /// Register an effect not owned by any module (no namespace, untracked).
    pub fn effect<F, Fut>(&mut self, action: impl Into<String>, f: F)
    where
        F: Fn(Vec<Value>, Dispatcher) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        self.push(
            action.into(),
            Handler::Effect {
                loading_key: None,
                f: box_effect(f),
            },
        );
    }

    /// Handlers for one action name, in registration order.
    pub fn handlers(&self, action: &str) -> &[Handler] {
        self.handlers.get(action).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Namespace → initial slice, as claimed during registration.
    pub(crate) fn namespaces(&self) -> &HashMap<String, Value> {
        &self.namespaces
    }

    fn push(&mut self, action: String, handler: Handler) {
        self.handlers.entry(action).or_default().push(handler);
    }
}

/// Appends handlers for one claimed namespace.
pub struct ModuleRegistrar<'r> {
    registry: &'r mut Registry,
    namespace: String,
}

impl ModuleRegistrar<'_> {
    /// Register a synchronous state transition for `action`. The returned
    /// value becomes this module's slice whenever `action` is dispatched.
    pub fn reduce<F>(&mut self, action: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        self.registry.push(
            action.into(),
            Handler::Reduce {
                namespace: self.namespace.clone(),
                f: Arc::new(f),
            },
        );
        self
    }

    /// Register an asynchronous effect for `action`. Effects carry no
    /// namespace — they update state only by dispatching further actions.
    pub fn effect<F, Fut>(&mut self, action: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(Vec<Value>, Dispatcher) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        self.registry.push(
            action.into(),
            Handler::Effect {
                loading_key: None,
                f: box_effect(f),
            },
        );
        self
    }

    /// Register an effect whose in-flight status is reported under
    /// `loading_key`. The scheduler brackets each run with `@@LOADING`
    /// transitions; the release is unconditional.
    pub fn tracked_effect<F, Fut>(
        &mut self,
        action: impl Into<String>,
        loading_key: impl Into<String>,
        f: F,
    ) -> &mut Self
    where
        F: Fn(Vec<Value>, Dispatcher) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        self.registry.push(
            action.into(),
            Handler::Effect {
                loading_key: Some(loading_key.into()),
                f: box_effect(f),
            },
        );
        self
    }

    /// The namespace this registrar appends under.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }
}

impl fmt::Debug for ModuleRegistrar<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleRegistrar")
            .field("namespace", &self.namespace)
            .finish_non_exhaustive()
    }
}

fn box_effect<F, Fut>(f: F) -> EffectFn
where
    F: Fn(Vec<Value>, Dispatcher) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    Arc::new(move |payload, dispatcher| f(payload, dispatcher).boxed())
}
