//! Payment-webhook verification and event interpretation.
//!
//! This module lives in `core` (zero internal deps) so the signature check
//! and field-resolution rules are unit-testable without an HTTP stack. The
//! reconciler in the API crate composes these helpers with the ledger.

use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

// ---------------------------------------------------------------------------
// Event type constants
// ---------------------------------------------------------------------------

/// Order finalized; the payment succeeded.
pub const EVENT_ORDER_CREATED: &str = "order.created";
/// Checkout state change; only the `succeeded` sub-status grants credits.
pub const EVENT_CHECKOUT_UPDATED: &str = "checkout.updated";
/// The checkout sub-status that counts as a completed purchase.
pub const CHECKOUT_STATUS_SUCCEEDED: &str = "succeeded";

// ---------------------------------------------------------------------------
// Signature verification
// ---------------------------------------------------------------------------

/// Verify a `v1,<timestamp>,<hex-hmac>` webhook signature header.
///
/// The HMAC-SHA256 is computed over `"<timestamp>.<raw body>"` with the
/// shared secret. `raw_body` must be the exact bytes received on the wire;
/// re-serialized JSON will not verify. Comparison is constant-time via
/// [`Mac::verify_slice`].
pub fn verify_webhook_signature(raw_body: &[u8], header: &str, secret: &str) -> bool {
    let mut parts = header.split(',');
    let _version = parts.next();
    let (Some(timestamp), Some(provided)) = (parts.next(), parts.next()) else {
        return false;
    };

    let Some(provided_bytes) = hex::decode(provided) else {
        return false;
    };

    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return false,
    };
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(raw_body);

    mac.verify_slice(&provided_bytes).is_ok()
}

/// Compute the hex signature for a payload, as the processor would.
///
/// Used by tests and tooling to produce valid headers.
pub fn sign_webhook_payload(raw_body: &[u8], timestamp: &str, secret: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(raw_body);
    hex::encode(mac.finalize().into_bytes())
}

// ---------------------------------------------------------------------------
// hex helpers (no extra dep)
// ---------------------------------------------------------------------------

mod hex {
    /// Encode bytes as a lowercase hex string.
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes.as_ref().iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Decode a hex string into bytes. Returns `None` on odd length or
    /// non-hex characters.
    pub fn decode(s: &str) -> Option<Vec<u8>> {
        if s.len() % 2 != 0 {
            return None;
        }
        (0..s.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(s.get(i..i + 2)?, 16).ok())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Payment events
// ---------------------------------------------------------------------------

/// An inbound payment-processor event, parsed from the raw webhook body.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: PaymentEventData,
}

/// The payload of a checkout/order event. Most fields are optional because
/// the processor varies its shape between event types and API versions.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentEventData {
    pub id: Option<String>,
    pub status: Option<String>,
    pub product_id: Option<String>,
    pub product: Option<ProductRef>,
    pub customer_id: Option<String>,
    pub customer_email: Option<String>,
    pub customer: Option<CustomerRef>,
    pub user_id: Option<String>,
    pub metadata: Option<serde_json::Value>,
    /// Amount paid, in cents.
    pub amount: Option<i64>,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductRef {
    pub id: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CustomerRef {
    pub id: String,
    pub email: Option<String>,
}

impl PaymentEvent {
    /// Whether this event represents a completed purchase that should grant
    /// credits: `order.created`, or `checkout.updated` with a `succeeded`
    /// sub-status.
    pub fn grants_credits(&self) -> bool {
        self.event_type == EVENT_ORDER_CREATED
            || (self.event_type == EVENT_CHECKOUT_UPDATED
                && self.data.status.as_deref() == Some(CHECKOUT_STATUS_SUCCEEDED))
    }
}

impl PaymentEventData {
    /// Resolve the target user: a direct `user_id` field wins, then the
    /// `metadata.userId` link written at checkout time.
    pub fn resolve_user_id(&self) -> Option<String> {
        if let Some(id) = &self.user_id {
            return Some(id.clone());
        }
        self.metadata
            .as_ref()
            .and_then(|m| m.get("userId"))
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
    }

    /// Resolve the external product id: root field first, then the nested
    /// product object.
    pub fn resolve_product_id(&self) -> Option<String> {
        if let Some(id) = &self.product_id {
            return Some(id.clone());
        }
        self.product.as_ref().map(|p| p.id.clone())
    }

    /// Resolve the customer email: root field first, then the nested
    /// customer object.
    pub fn resolve_customer_email(&self) -> Option<String> {
        if let Some(email) = &self.customer_email {
            return Some(email.clone());
        }
        self.customer.as_ref().and_then(|c| c.email.clone())
    }
}

// ---------------------------------------------------------------------------
// Credit amount resolution
// ---------------------------------------------------------------------------

/// Fallback pricing when no catalog package matches the product id:
/// one credit per whole dollar paid.
pub fn credits_from_amount(amount_cents: i64) -> i32 {
    (amount_cents / 100).max(0) as i32
}
