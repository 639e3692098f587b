//! Application state, replaced wholesale on every matched dispatch.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::registry::Registry;

/// One immutable snapshot of application state.
///
/// Slices are `Arc`ed so an update copies the map, not the slices: a
/// namespace untouched by a dispatch stays reference-identical across
/// snapshots. Readers always observe a fully-formed snapshot — partial
/// updates are never visible.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Namespace → module-owned slice (opaque to the runtime).
    pub slices: HashMap<String, Arc<Value>>,

    /// Loading key → in-flight counter.
    pub loading: HashMap<String, u32>,

    /// System slice, replaced wholesale by `@@INIT_STATE`.
    pub system: Arc<Value>,
}

impl AppState {
    /// Initial state seeded from the registered namespaces.
    pub fn initial(registry: &Registry) -> Self {
        let slices = registry
            .namespaces()
            .iter()
            .map(|(ns, init)| (ns.clone(), Arc::new(init.clone())))
            .collect();
        Self {
            slices,
            loading: HashMap::new(),
            system: Arc::new(Value::Null),
        }
    }

    /// Slice owned by `namespace`, if registered.
    pub fn slice(&self, namespace: &str) -> Option<&Value> {
        self.slices.get(namespace).map(Arc::as_ref)
    }

    /// Whether any work tracked under `key` is in flight.
    pub fn is_loading(&self, key: &str) -> bool {
        self.loading.get(key).copied().unwrap_or(0) > 0
    }
}
