//! Effect scheduler: one independent task per matched handler.
//!
//! Tasks for the same action run concurrently with each other and with
//! unrelated dispatches; launch order is registration order, completion
//! order is unspecified. A failing task is captured at the task boundary
//! and funneled back into the pipeline as `@@ERROR` — siblings are
//! unaffected. Cancellation is not supported; tasks run to completion.

use std::panic::AssertUnwindSafe;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use futures::FutureExt;
use tracing::debug;

use axon_common::{error_action, loading_action, Action, ErrorReport};

use crate::reducer::panic_message;
use crate::registry::Handler;
use crate::runtime::RuntimeInner;

/// Launch every matching effect handler for `action`, in registration
/// order. Tracked handlers bracket the task with loading transitions; the
/// increment lands before the task body runs, the decrement lands when the
/// task finishes, whether it finished normally or by failure.
pub(crate) fn spawn_effects(inner: &Arc<RuntimeInner>, action: &Action) {
    for handler in inner.registry.handlers(&action.name) {
        let Handler::Effect { loading_key, f } = handler else {
            continue;
        };

        if let Some(key) = loading_key {
            RuntimeInner::dispatch(inner, loading_action(key, 1));
        }

        inner.in_flight.fetch_add(1, Ordering::AcqRel);
        let fut = f(action.payload.clone(), inner.dispatcher());
        let origin = action.name.clone();
        let loading_key = loading_key.clone();
        let inner = Arc::clone(inner);

        tokio::spawn(async move {
            let outcome = AssertUnwindSafe(fut).catch_unwind().await;
            match outcome {
                Ok(Ok(())) => {
                    debug!(action = %origin, "effect completed");
                }
                Ok(Err(err)) => {
                    let report = ErrorReport::from_anyhow(&err, Some(origin.as_str()));
                    RuntimeInner::dispatch(&inner, error_action(&report));
                }
                Err(panic) => {
                    let report =
                        ErrorReport::new(panic_message(panic.as_ref())).with_origin(origin.as_str());
                    RuntimeInner::dispatch(&inner, error_action(&report));
                }
            }

            // Guaranteed release, success or failure.
            if let Some(key) = loading_key {
                RuntimeInner::dispatch(&inner, loading_action(&key, -1));
            }
            if inner.in_flight.fetch_sub(1, Ordering::AcqRel) == 1 {
                inner.settled.notify_waiters();
            }
        });
    }
}
