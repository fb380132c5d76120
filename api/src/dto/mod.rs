//! Request and response payloads for the dispatch endpoints

pub mod sms;
