//! # BarbersBar Messaging API
//!
//! HTTP surface of the messaging backend: the dispatch endpoint that
//! holds provider credentials server-side, sends verification messages
//! through the provider registry, and checks submitted codes against the
//! verification store.

pub mod app;
pub mod dto;
pub mod routes;

pub use app::{configure_routes, AppState};
