//! UI-facing hook layer: dispatch-bound callbacks and read-side selectors.
//!
//! The view layer never hand-builds action values — it asks [`Callbacks`]
//! for a bound callback and invokes it as a plain function, and reads
//! state through [`select`] and the loading selectors.

pub mod callback;
pub mod select;

pub use callback::{Arg, Callback, Callbacks};
pub use select::{is_loading, is_loading_global, select};
