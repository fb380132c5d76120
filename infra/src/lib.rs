//! # Infrastructure Layer
//!
//! Concrete implementations of the messaging core's contracts: HTTP
//! adapters for the Vonage SMS gateway and the WhatsApp Business Cloud
//! API, a mock provider for development, the provider factory, and an
//! in-memory time-boxed verification code store.

pub mod providers;
pub mod store;

pub use providers::{HttpProviderFactory, MockProvider, VonageSmsProvider, WhatsAppProvider};
pub use store::InMemoryVerificationStore;
