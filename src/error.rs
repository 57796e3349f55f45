//! Error type shared by the session core and both front ends.

use thiserror::Error;

/// Everything that can go wrong while starting or running a positioning session.
#[derive(Debug, Error)]
pub enum PositioningError {
    /// The selector matched no element on the page.
    #[error("element not found for selector: {selector}")]
    SelectorNotFound {
        /// The selector that was looked up.
        selector: String,
    },
    /// The selector could not be parsed by the page.
    #[error("invalid selector {selector}: {reason}")]
    InvalidSelector {
        /// The selector that was looked up.
        selector: String,
        /// Reason reported by the page.
        reason: String,
    },
    /// A DOM call failed.
    #[error("DOM operation failed: {0}")]
    Dom(String),
    /// Tool options were rejected by validation.
    #[error("invalid options: {0}")]
    InvalidConfig(String),
    /// Tool options could not be deserialized.
    #[error("malformed options: {0}")]
    ConfigFormat(#[from] serde_json::Error),
}

impl PositioningError {
    /// Whether this error is the selector-lookup failure that enable reports without throwing.
    pub fn is_lookup_failure(&self) -> bool {
        matches!(
            self,
            Self::SelectorNotFound { .. } | Self::InvalidSelector { .. }
        )
    }
}
