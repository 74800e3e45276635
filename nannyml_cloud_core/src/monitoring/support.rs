//! Enable flag plus the server's support verdict for one metric facet.

use serde::Deserialize;

/// Whether a facet is enabled, and whether the server supports it at all.
///
/// `is_supported` and `unsupported_reason` are facts reported by the server.
/// Only `enabled` can be changed, and only through the capability traits.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawSupportState")]
pub struct SupportState {
    enabled: bool,
    is_supported: bool,
    unsupported_reason: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSupportState {
    #[serde(default)]
    enabled: bool,
    #[serde(default = "default_supported")]
    is_supported: bool,
    #[serde(default, alias = "unsupportedReason")]
    support_reason: Option<String>,
}

fn default_supported() -> bool {
    true
}

impl From<RawSupportState> for SupportState {
    fn from(raw: RawSupportState) -> Self {
        // a reason only makes sense next to a negative verdict
        let unsupported_reason = if raw.is_supported {
            None
        } else {
            raw.support_reason
        };
        SupportState {
            enabled: raw.enabled,
            is_supported: raw.is_supported,
            unsupported_reason,
        }
    }
}

impl SupportState {
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_supported(&self) -> bool {
        self.is_supported
    }

    pub fn unsupported_reason(&self) -> Option<&str> {
        self.unsupported_reason.as_deref()
    }

    /// State for shapes where the server only reports `enabled`.
    pub(crate) fn from_enabled(enabled: bool) -> Self {
        SupportState {
            enabled,
            is_supported: true,
            unsupported_reason: None,
        }
    }

    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}
