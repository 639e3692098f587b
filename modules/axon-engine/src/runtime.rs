//! Runtime entry point and error interception.
//!
//! `Runtime::dispatch` is total at steady state: a failure anywhere in the
//! synchronous reduce step — or surfaced later from an effect task — is
//! converted into an `@@ERROR` action and re-dispatched instead of
//! propagating. The only error a well-formed program can observe directly
//! is `DuplicateNamespace` during registration.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::Notify;
use tracing::{debug, error};

use axon_common::{error_action, Action, ErrorReport, RuntimeConfig, ERROR_ACTION};

use crate::reducer::reduce;
use crate::registry::Registry;
use crate::scheduler::spawn_effects;
use crate::state::AppState;

pub(crate) struct RuntimeInner {
    pub(crate) registry: Registry,
    pub(crate) state: RwLock<Arc<AppState>>,
    pub(crate) in_flight: AtomicUsize,
    pub(crate) settled: Notify,
    pub(crate) config: RuntimeConfig,
}

impl RuntimeInner {
    /// Total dispatch: reduce synchronously under the state lock, convert
    /// failures to `@@ERROR`, then launch matching effects. The lock is
    /// never held across an effect task.
    pub(crate) fn dispatch(inner: &Arc<Self>, action: Action) {
        if inner.config.log_actions {
            debug!(action = %action.name, args = action.payload.len(), "dispatch");
        }

        let failures = {
            // Snapshots are replaced wholesale, so a poisoned cell still
            // holds a fully-formed value: recover the guard.
            let mut state = inner
                .state
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            let outcome = reduce(&inner.registry, &state, &action);
            *state = outcome.next;
            outcome.failures
        };

        for err in failures {
            if action.name == ERROR_ACTION {
                // A failing @@ERROR reduce must not synthesize another
                // @@ERROR. Log and drop.
                error!(error = %err, "error handler itself failed");
            } else {
                let report = ErrorReport::new(err.to_string()).with_origin(action.name.as_str());
                Self::dispatch(inner, error_action(&report));
            }
        }

        spawn_effects(inner, &action);
    }

    pub(crate) fn snapshot(&self) -> Arc<AppState> {
        Arc::clone(&self.state.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub(crate) fn dispatcher(self: &Arc<Self>) -> Dispatcher {
        Dispatcher {
            inner: Arc::clone(self),
        }
    }
}

/// The composed runtime: owns the sealed registry and the live state cell.
pub struct Runtime {
    inner: Arc<RuntimeInner>,
}

impl Runtime {
    /// Seal a registry into a runtime. Registration is over once this runs;
    /// the handler table is immutable for the rest of the process.
    pub fn new(registry: Registry) -> Self {
        Self::with_config(registry, RuntimeConfig::default())
    }

    pub fn with_config(registry: Registry, config: RuntimeConfig) -> Self {
        let state = Arc::new(AppState::initial(&registry));
        Self {
            inner: Arc::new(RuntimeInner {
                registry,
                state: RwLock::new(state),
                in_flight: AtomicUsize::new(0),
                settled: Notify::new(),
                config,
            }),
        }
    }

    /// Feed one action through the pipeline. Never fails at steady state:
    /// handler failures surface as `@@ERROR` actions, not errors. Must run
    /// inside a tokio runtime — effects are spawned tasks.
    pub fn dispatch(&self, action: Action) {
        RuntimeInner::dispatch(&self.inner, action);
    }

    /// Current state snapshot.
    pub fn state(&self) -> Arc<AppState> {
        self.inner.snapshot()
    }

    /// Cheap cloneable handle for effect handlers and the hook layer.
    pub fn dispatcher(&self) -> Dispatcher {
        self.inner.dispatcher()
    }

    /// Process-wide uncaught-error channel: convert an error captured
    /// outside any dispatch into an `@@ERROR` action.
    pub fn report_error(&self, err: anyhow::Error) {
        let report = ErrorReport::from_anyhow(&err, None);
        self.dispatch(error_action(&report));
    }

    /// Wait until every in-flight effect task has finished, including
    /// tasks launched by other effects. Completion fan-in seam; loading
    /// counters are back to rest when this returns.
    pub async fn settled(&self) {
        loop {
            let notified = self.inner.settled.notified();
            if self.inner.in_flight.load(Ordering::Acquire) == 0 {
                return;
            }
            notified.await;
        }
    }
}

/// Dispatch handle passed to effect handlers and the hook layer.
#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<RuntimeInner>,
}

impl Dispatcher {
    pub fn dispatch(&self, action: Action) {
        RuntimeInner::dispatch(&self.inner, action);
    }

    pub fn state(&self) -> Arc<AppState> {
        self.inner.snapshot()
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.inner.config
    }
}
