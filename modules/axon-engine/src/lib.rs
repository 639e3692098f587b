//! Action dispatch engine.
//!
//! Modules contribute handlers into a `Registry` during a defined
//! initialization phase; `Runtime::new` seals the registry and composes
//! one synchronous reducer plus a concurrent effect scheduler from it.
//! Handler failures never escape a dispatch call — they re-enter the
//! pipeline as `@@ERROR` actions.

pub mod reducer;
pub mod registry;
pub mod runtime;
pub mod state;

mod scheduler;

pub use reducer::{reduce, ReduceOutcome};
pub use registry::{Handler, ModuleRegistrar, Registry};
pub use runtime::{Dispatcher, Runtime};
pub use state::AppState;
