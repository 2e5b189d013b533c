//! Shared response envelope types for API handlers.
//!
//! Authenticated API responses use a `{ "data": ... }` envelope. The
//! payment webhook endpoint is the one exception: its response shapes are
//! part of the processor-facing contract and are built ad hoc in that
//! handler.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
