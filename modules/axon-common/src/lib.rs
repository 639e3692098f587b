//! Leaf types shared across the axon runtime.
//!
//! Actions, reserved action constructors, the error taxonomy, runtime
//! configuration, the identity context, and the transport collaborator
//! contract. No dispatch logic lives here.

pub mod action;
pub mod config;
pub mod error;
pub mod identity;
pub mod transport;

pub use action::{
    error_action, init_state_action, loading_action, Action, ErrorReport, ERROR_ACTION,
    INIT_STATE_ACTION, LOADING_ACTION,
};
pub use config::RuntimeConfig;
pub use error::AxonError;
pub use identity::Identity;
pub use transport::{fill_path, ApiError, Transport};
