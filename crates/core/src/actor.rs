//! Structured identity for the party performing a ledger mutation.
//!
//! Transactions used to carry a free-form `performed_by` string; this enum
//! carries the same information structurally and owns the stored encoding,
//! so call sites cannot drift on the tag format.

/// Who performed a credit transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Actor {
    /// An internal code path (signup bonus, generation charge, refund).
    System,
    /// The payment-processor webhook reconciler.
    Webhook,
    /// An administrator, identified by user id.
    Admin(String),
    /// An end user acting on their own account, identified by user id.
    User(String),
}

impl Actor {
    /// The stored text form: `system`, `webhook`, `admin:<id>`, `user:<id>`.
    pub fn as_db_value(&self) -> String {
        match self {
            Actor::System => "system".to_string(),
            Actor::Webhook => "webhook".to_string(),
            Actor::Admin(id) => format!("admin:{id}"),
            Actor::User(id) => format!("user:{id}"),
        }
    }

    /// Parse a stored `performed_by` value. Returns `None` for unknown tags.
    pub fn parse(value: &str) -> Option<Actor> {
        if value == "system" {
            return Some(Actor::System);
        }
        if value == "webhook" {
            return Some(Actor::Webhook);
        }
        if let Some(id) = value.strip_prefix("admin:") {
            return Some(Actor::Admin(id.to_string()));
        }
        if let Some(id) = value.strip_prefix("user:") {
            return Some(Actor::User(id.to_string()));
        }
        None
    }
}

impl std::fmt::Display for Actor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.as_db_value())
    }
}
