//! In-memory verification code store
//!
//! Time-boxed storage of verification codes keyed by destination, with
//! a 3-attempt limit per code. Expired entries behave exactly like
//! absent ones and are purged lazily on access.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use bb_core::verification::MAX_ATTEMPTS;
use bb_core::{mask_phone, StoreError, VerificationStore, VerifyOutcome};

struct StoredCode {
    code: String,
    expires_at: Instant,
    attempts: u32,
}

impl StoredCode {
    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// Process-local [`VerificationStore`] implementation
#[derive(Default)]
pub struct InMemoryVerificationStore {
    entries: RwLock<HashMap<String, StoredCode>>,
}

impl InMemoryVerificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (non-expired) entries
    pub async fn len(&self) -> usize {
        let entries = self.entries.read().await;
        entries.values().filter(|e| !e.is_expired()).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl VerificationStore for InMemoryVerificationStore {
    async fn store_code(&self, phone: &str, code: &str, ttl: Duration) -> Result<(), StoreError> {
        let mut entries = self.entries.write().await;

        // Opportunistic purge keeps the map from accumulating dead codes
        entries.retain(|_, entry| !entry.is_expired());

        entries.insert(
            phone.to_string(),
            StoredCode {
                code: code.to_string(),
                expires_at: Instant::now() + ttl,
                attempts: 0,
            },
        );

        info!(phone = %mask_phone(phone), "verification code stored");
        Ok(())
    }

    async fn verify_code(&self, phone: &str, code: &str) -> Result<VerifyOutcome, StoreError> {
        let mut entries = self.entries.write().await;

        // Take the entry out; it is only put back on a survivable mismatch
        let mut entry = match entries.remove(phone) {
            Some(entry) => entry,
            None => {
                debug!(phone = %mask_phone(phone), "no code on record");
                return Ok(VerifyOutcome::NotFound);
            }
        };

        if entry.is_expired() {
            debug!(phone = %mask_phone(phone), "code expired");
            return Ok(VerifyOutcome::NotFound);
        }

        if entry.code == code {
            // Single use: a verified code is consumed
            info!(phone = %mask_phone(phone), "verification code accepted");
            return Ok(VerifyOutcome::Verified);
        }

        entry.attempts += 1;
        if entry.attempts >= MAX_ATTEMPTS {
            warn!(phone = %mask_phone(phone), "verification attempts exhausted");
            return Ok(VerifyOutcome::TooManyAttempts);
        }

        let remaining_attempts = MAX_ATTEMPTS - entry.attempts;
        entries.insert(phone.to_string(), entry);
        warn!(
            phone = %mask_phone(phone),
            remaining = remaining_attempts,
            "verification code mismatch"
        );
        Ok(VerifyOutcome::Mismatch { remaining_attempts })
    }
}
