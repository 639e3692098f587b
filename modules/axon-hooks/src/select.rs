//! Read-side selectors over state snapshots.

use axon_engine::{AppState, Dispatcher};

/// Apply a selector to the current snapshot.
pub fn select<T>(dispatcher: &Dispatcher, f: impl FnOnce(&AppState) -> T) -> T {
    f(&dispatcher.state())
}

/// Whether any work tracked under `key` is in flight.
pub fn is_loading(dispatcher: &Dispatcher, key: &str) -> bool {
    dispatcher.state().is_loading(key)
}

/// Loading status under the configured global key.
pub fn is_loading_global(dispatcher: &Dispatcher) -> bool {
    let key = dispatcher.config().global_loading_key.clone();
    dispatcher.state().is_loading(&key)
}
