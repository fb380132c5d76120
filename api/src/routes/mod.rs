//! Dispatch endpoint handlers
//!
//! - `POST /sendSMS` — send a verification message through the provider
//!   registry and record the code for later verification
//! - `POST /verifySMS` — check a submitted code against the store

pub mod send_sms;
pub mod verify_sms;
