//! The reducer composer: pure, synchronous state updates.
//!
//! Evaluated in strict order, returning at the first matching category:
//! loading transitions, system-state initialization, then namespace
//! handler fan-out. No I/O, no suspension — one dispatch runs the whole
//! composition to completion before returning.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use anyhow::anyhow;
use serde_json::Value;

use axon_common::{Action, AxonError, INIT_STATE_ACTION, LOADING_ACTION};

use crate::registry::{Handler, Registry};
use crate::state::AppState;

/// Outcome of one composed reduce pass.
///
/// Failure isolation is per handler: `failures` carries one entry per
/// failing handler, and the remaining handlers still ran. The runtime
/// converts each entry into an `@@ERROR` dispatch.
pub struct ReduceOutcome {
    pub next: Arc<AppState>,
    pub failures: Vec<AxonError>,
}

impl ReduceOutcome {
    fn unchanged(prev: &Arc<AppState>) -> Self {
        Self {
            next: Arc::clone(prev),
            failures: Vec::new(),
        }
    }

    fn failed(prev: &Arc<AppState>, err: AxonError) -> Self {
        Self {
            next: Arc::clone(prev),
            failures: vec![err],
        }
    }
}

/// Compute the next state snapshot for one action.
///
/// Returns the previous `Arc` unchanged (pointer identity preserved) when
/// no reduce handler matches — the only case where identity is preserved.
/// An action with at least one matching reduce handler always yields a new
/// snapshot, even when the computed slices are structurally equal to the
/// old ones.
pub fn reduce(registry: &Registry, prev: &Arc<AppState>, action: &Action) -> ReduceOutcome {
    if action.name == LOADING_ACTION {
        let (key, delta) = match loading_payload(action) {
            Ok(parsed) => parsed,
            Err(err) => return ReduceOutcome::failed(prev, err),
        };
        let mut next = AppState::clone(prev);
        let counter = next.loading.entry(key.clone()).or_insert(0);
        if delta > 0 {
            *counter += 1;
        } else {
            match counter.checked_sub(1) {
                Some(v) => *counter = v,
                // Decrement below zero is a defect, reported rather than
                // clamped. The counter keeps its previous value.
                None => return ReduceOutcome::failed(prev, AxonError::LoadingUnderflow(key)),
            }
        }
        return ReduceOutcome {
            next: Arc::new(next),
            failures: Vec::new(),
        };
    }

    if action.name == INIT_STATE_ACTION {
        let Some(value) = action.payload.first().cloned() else {
            return ReduceOutcome::failed(
                prev,
                AxonError::InvalidPayload {
                    action: INIT_STATE_ACTION.to_string(),
                    reason: "missing state value".to_string(),
                },
            );
        };
        let mut next = AppState::clone(prev);
        next.system = Arc::new(value);
        return ReduceOutcome {
            next: Arc::new(next),
            failures: Vec::new(),
        };
    }

    let reducers: Vec<_> = registry
        .handlers(&action.name)
        .iter()
        .filter_map(|h| match h {
            Handler::Reduce { namespace, f } => Some((namespace, f)),
            Handler::Effect { .. } => None,
        })
        .collect();

    if reducers.is_empty() {
        return ReduceOutcome::unchanged(prev);
    }

    // Shallow copy: the slice map is cloned, the slices themselves stay
    // shared until a handler replaces its namespace.
    let mut next = AppState::clone(prev);
    let mut failures = Vec::new();
    for (namespace, f) in reducers {
        // Caught at the handler boundary, same policy as effect tasks: a
        // panicking handler must not unwind through the state lock.
        match catch_unwind(AssertUnwindSafe(|| f(&action.payload))) {
            Ok(Ok(slice)) => {
                next.slices.insert(namespace.clone(), Arc::new(slice));
            }
            Ok(Err(err)) => failures.push(AxonError::Handler(err)),
            Err(panic) => {
                failures.push(AxonError::Handler(anyhow!(panic_message(panic.as_ref()))));
            }
        }
    }
    ReduceOutcome {
        next: Arc::new(next),
        failures,
    }
}

pub(crate) fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "handler panicked".to_string()
    }
}

fn loading_payload(action: &Action) -> Result<(String, i64), AxonError> {
    let invalid = |reason: &str| AxonError::InvalidPayload {
        action: LOADING_ACTION.to_string(),
        reason: reason.to_string(),
    };
    let key = action
        .payload
        .first()
        .and_then(Value::as_str)
        .ok_or_else(|| invalid("missing key"))?;
    let delta = action
        .payload
        .get(1)
        .and_then(Value::as_i64)
        .ok_or_else(|| invalid("missing delta"))?;
    Ok((key.to_string(), delta))
}
