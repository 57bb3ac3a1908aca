//! Configuration for the widget and its demo binary.
//!
//! Loads configuration from environment variables with sensible defaults.
//! Unparseable values fall back to the default.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use ticket_widget_runtime::StoreConfig;

/// Smallest usable feedback limit: a valid submit feeds back one `SubmissionCompleted`
pub const MIN_FEEDBACK_ACTIONS: usize = 1;

/// Widget configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetConfig {
    /// Log filter directive (`TICKET_WIDGET_LOG`, then `RUST_LOG`, default `info`)
    pub log_filter: String,
    /// Catalog JSON to load instead of the built-in demo catalog (`TICKET_WIDGET_CATALOG`)
    pub catalog_path: Option<PathBuf>,
    /// Refuse to add tiers the catalog does not offer (`TICKET_WIDGET_REJECT_UNKNOWN_TIERS`, default `true`)
    pub reject_unknown_tiers: bool,
    /// Store feedback limit (`TICKET_WIDGET_MAX_FEEDBACK`, default 64, at least 1)
    pub max_feedback_actions: usize,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            catalog_path: None,
            reject_unknown_tiers: true,
            max_feedback_actions: StoreConfig::DEFAULT_MAX_FEEDBACK_ACTIONS,
        }
    }
}

impl WidgetConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            log_filter: lookup("TICKET_WIDGET_LOG")
                .or_else(|| lookup("RUST_LOG"))
                .unwrap_or(defaults.log_filter),
            catalog_path: lookup("TICKET_WIDGET_CATALOG")
                .filter(|path| !path.trim().is_empty())
                .map(PathBuf::from),
            reject_unknown_tiers: lookup("TICKET_WIDGET_REJECT_UNKNOWN_TIERS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.reject_unknown_tiers),
            max_feedback_actions: lookup("TICKET_WIDGET_MAX_FEEDBACK")
                .and_then(|s| s.parse().ok())
                .filter(|&limit| limit >= MIN_FEEDBACK_ACTIONS)
                .unwrap_or(defaults.max_feedback_actions),
        }
    }

    /// Store configuration derived from this config
    ///
    /// The feedback limit is raised to [`MIN_FEEDBACK_ACTIONS`] if set lower.
    #[must_use]
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::default()
            .with_max_feedback_actions(self.max_feedback_actions.max(MIN_FEEDBACK_ACTIONS))
    }
}
