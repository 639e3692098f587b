use std::env;

/// Runtime configuration loaded from environment variables.
/// Every variable is optional; the defaults suit production use.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Log every dispatched action at debug level.
    pub log_actions: bool,

    /// Loading key reported by the global loading selector.
    pub global_loading_key: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            log_actions: true,
            global_loading_key: "global".to_string(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            log_actions: env::var("AXON_LOG_ACTIONS")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(true),
            global_loading_key: env::var("AXON_GLOBAL_LOADING_KEY")
                .unwrap_or_else(|_| "global".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = RuntimeConfig::default();
        assert!(config.log_actions);
        assert_eq!(config.global_loading_key, "global");
    }
}
