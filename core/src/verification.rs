//! Verification codes
//!
//! Code generation plus the storage contract used by the dispatch
//! endpoint to make `verifySMS` a real check: codes are time-boxed,
//! single-use, and attempt-limited.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;

use crate::errors::StoreError;

/// How long a stored verification code stays valid
pub const CODE_TTL: Duration = Duration::from_secs(5 * 60);

/// Maximum failed comparisons before a code is invalidated
pub const MAX_ATTEMPTS: u32 = 3;

/// Generate a 6-digit numeric verification code
///
/// Uniform draw over [100000, 999999], so the code never has a leading
/// zero and always renders as exactly six digits.
pub fn generate_verification_code() -> String {
    rand::thread_rng().gen_range(100_000..=999_999).to_string()
}

/// Outcome of comparing a submitted code against the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// Code matched; the stored entry has been consumed
    Verified,
    /// Code did not match; the entry survives until attempts run out
    Mismatch { remaining_attempts: u32 },
    /// Too many failed attempts; the entry has been invalidated
    TooManyAttempts,
    /// No live code for this destination (never stored, expired, or used)
    NotFound,
}

/// Time-boxed storage of verification codes, keyed by destination
///
/// Implementations map a phone number to `{code, expiry, attempts}`.
/// Expired entries must behave exactly like absent ones.
#[async_trait]
pub trait VerificationStore: Send + Sync {
    /// Store `code` for `phone`, replacing any previous entry and
    /// resetting the attempt counter
    async fn store_code(&self, phone: &str, code: &str, ttl: Duration) -> Result<(), StoreError>;

    /// Compare `code` against the live entry for `phone`
    async fn verify_code(&self, phone: &str, code: &str) -> Result<VerifyOutcome, StoreError>;
}
