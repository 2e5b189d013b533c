//! Canonical generation status vocabulary.
//!
//! Every status stored on a generation record uses one of the four values
//! here. The external provider reports its own vocabulary (`success`
//! instead of `succeeded`); [`GenerationStatus::from_provider`] is the
//! single place that mapping lives.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a generation record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationStatus {
    Queued,
    Running,
    Succeeded,
    Failed,
}

impl GenerationStatus {
    /// The stored string form of this status.
    pub fn as_str(self) -> &'static str {
        match self {
            GenerationStatus::Queued => "queued",
            GenerationStatus::Running => "running",
            GenerationStatus::Succeeded => "succeeded",
            GenerationStatus::Failed => "failed",
        }
    }

    /// Parse a stored status string. Returns `None` for unknown values.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "queued" => Some(GenerationStatus::Queued),
            "running" => Some(GenerationStatus::Running),
            "succeeded" => Some(GenerationStatus::Succeeded),
            "failed" => Some(GenerationStatus::Failed),
            _ => None,
        }
    }

    /// Whether this status is terminal. Terminal records are never moved
    /// back to a non-terminal status.
    pub fn is_terminal(self) -> bool {
        matches!(self, GenerationStatus::Succeeded | GenerationStatus::Failed)
    }

    /// Map the provider's status vocabulary onto the canonical one.
    ///
    /// The provider reports `success` for a finished prediction; anything
    /// unrecognized is treated as still running so a later poll can settle
    /// it.
    pub fn from_provider(provider_status: &str) -> Self {
        match provider_status {
            "success" => GenerationStatus::Succeeded,
            "failed" => GenerationStatus::Failed,
            "queued" => GenerationStatus::Queued,
            "running" => GenerationStatus::Running,
            _ => GenerationStatus::Running,
        }
    }
}

impl std::fmt::Display for GenerationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
