//! Token validation for the opaque external auth service.
//!
//! Session issuance lives outside this system; the API only validates the
//! bearer tokens that service signs and extracts the user identity from
//! them.

pub mod jwt;
