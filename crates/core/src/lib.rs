//! Domain logic for the LogoLoco credit and generation backend.
//!
//! This crate holds the pure, I/O-free parts of the system: the model
//! catalog and request validation, the canonical generation status
//! vocabulary, the structured transaction actor, webhook signature
//! verification, and pagination clamps. Everything here is usable from the
//! repository layer, the API server, and any future CLI tooling without
//! pulling in a database or HTTP stack.

pub mod actor;
pub mod billing;
pub mod error;
pub mod generation;
pub mod pagination;
pub mod status;
pub mod types;
