//! # BarbersBar Messaging Core
//!
//! Core messaging domain for the BarbersBar backend. This crate contains
//! the provider contracts, the messaging registry with fallback policy,
//! configuration types, and verification-code primitives that the
//! infrastructure and API layers build on.

pub mod config;
pub mod errors;
pub mod provider;
pub mod service;
pub mod types;
pub mod verification;

// Re-export commonly used types for convenience
pub use config::{MessagingConfig, MessagingConfigUpdate, ProviderSettings};
pub use errors::StoreError;
pub use provider::{mask_phone, MessageProvider, ProviderFactory};
pub use service::MessagingService;
pub use types::{MessageChannel, SendMessageParams, SendMessageResult};
pub use verification::{generate_verification_code, VerificationStore, VerifyOutcome};
