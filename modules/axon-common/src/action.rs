//! The action type and the reserved system actions.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Loading transition. Payload: `[key, delta]` with delta `+1` or `-1`.
pub const LOADING_ACTION: &str = "@@LOADING";

/// Wholesale system-state replacement. Payload: `[state]`.
pub const INIT_STATE_ACTION: &str = "@@INIT_STATE";

/// Captured failure re-entering the pipeline as data. Payload: `[ErrorReport]`.
pub const ERROR_ACTION: &str = "@@ERROR";

/// An immutable dispatched event: a name plus an ordered payload.
///
/// Payload arity is fixed per name for the process lifetime — handlers are
/// written against a fixed signature. Discarded after one pass through the
/// pipeline; no history is retained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub name: String,
    pub payload: Vec<Value>,
}

impl Action {
    /// Create an action. An empty name is a programmer error and panics
    /// with a clear message.
    pub fn new(name: impl Into<String>, payload: Vec<Value>) -> Self {
        let name = name.into();
        assert!(!name.is_empty(), "action name must not be empty");
        Self { name, payload }
    }
}

/// Build a loading transition for `key`. The scheduler dispatches `+1`
/// before launching a tracked effect and `-1` when it finishes.
pub fn loading_action(key: &str, delta: i64) -> Action {
    Action::new(LOADING_ACTION, vec![json!(key), json!(delta)])
}

/// Build a system-state replacement action.
pub fn init_state_action(state: Value) -> Action {
    Action::new(INIT_STATE_ACTION, vec![state])
}

/// A captured failure, carried as the `@@ERROR` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub message: String,
    /// Error chain / backtrace text, when available.
    pub detail: Option<String>,
    /// Name of the action whose handler failed, if the failure happened
    /// inside a dispatch.
    pub origin: Option<String>,
}

impl ErrorReport {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            detail: None,
            origin: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// Build a report from any error, capturing the full chain as detail.
    pub fn from_anyhow(err: &anyhow::Error, origin: Option<&str>) -> Self {
        Self {
            message: err.to_string(),
            detail: Some(format!("{err:?}")),
            origin: origin.map(str::to_string),
        }
    }
}

/// Build an `@@ERROR` action from a report.
pub fn error_action(report: &ErrorReport) -> Action {
    let payload = json!({
        "message": report.message,
        "detail": report.detail,
        "origin": report.origin,
    });
    Action::new(ERROR_ACTION, vec![payload])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_holds_name_and_payload() {
        let action = Action::new("FETCH_ITEM", vec![json!(42)]);
        assert_eq!(action.name, "FETCH_ITEM");
        assert_eq!(action.payload, vec![json!(42)]);
    }

    #[test]
    #[should_panic(expected = "action name must not be empty")]
    fn empty_action_name_panics() {
        Action::new("", vec![]);
    }

    #[test]
    fn loading_action_payload_shape() {
        let action = loading_action("item", 1);
        assert_eq!(action.name, LOADING_ACTION);
        assert_eq!(action.payload, vec![json!("item"), json!(1)]);
    }

    #[test]
    fn error_action_payload_round_trips() {
        let report = ErrorReport::new("boom")
            .with_detail("chain")
            .with_origin("FETCH_ITEM");
        let action = error_action(&report);
        assert_eq!(action.name, ERROR_ACTION);

        let parsed: ErrorReport = serde_json::from_value(action.payload[0].clone()).unwrap();
        assert_eq!(parsed, report);
    }

    #[test]
    fn from_anyhow_captures_chain() {
        let err = anyhow::anyhow!("inner").context("outer");
        let report = ErrorReport::from_anyhow(&err, Some("SAVE"));
        assert_eq!(report.message, "outer");
        assert!(report.detail.as_deref().unwrap().contains("inner"));
        assert_eq!(report.origin.as_deref(), Some("SAVE"));
    }
}
