//! HTTP gateway to the EachLabs image-generation API.
//!
//! All interaction with the external provider goes through this crate:
//! submitting a prediction, polling its status, shaping per-model inputs,
//! and normalizing the provider's response vocabulary into the canonical
//! one. The [`gateway::ImageProvider`] trait is the seam the orchestrator
//! depends on, so tests can substitute a scripted provider.

pub mod client;
pub mod gateway;
pub mod inputs;
pub mod normalize;

pub use client::{EachLabsClient, EachLabsConfig, ProviderError};
pub use gateway::ImageProvider;
pub use normalize::{ProviderStatusResult, ProviderSubmission};
