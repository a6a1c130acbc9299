use shared::constants::MIN_PHONE_DIGITS;
use shared::validation::normalize_phone;
use tracing::{debug, info};

use crate::error::{SpinError, TransportError};
use crate::logging::mask_phone;
use crate::transport::{send_with_retry, RetryPolicy};

/// Read-only source of truth for phones that already played.
#[allow(async_fn_in_trait)]
pub trait PhoneLookup {
    /// `phone` is always digits only.
    async fn exists(&self, phone: &str) -> Result<bool, TransportError>;
}

/// Advisory check run before a session may spin. The remote store stays
/// authoritative: two sessions checking the same phone at once can both pass.
pub struct DuplicateGuard<L> {
    lookup: L,
    retry: RetryPolicy,
}

impl<L: PhoneLookup> DuplicateGuard<L> {
    pub fn new(lookup: L, retry: RetryPolicy) -> Self {
        Self { lookup, retry }
    }

    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    pub async fn check(&self, phone: &str) -> Result<bool, SpinError> {
        let digits = normalize_phone(phone);
        if digits.len() < MIN_PHONE_DIGITS {
            debug!("Rejecting phone with {} digits before lookup", digits.len());
            return Err(SpinError::invalid_phone());
        }

        let lookup = &self.lookup;
        let query = digits.as_str();
        let exists = send_with_retry(&self.retry, "phone_lookup", move || lookup.exists(query)).await?;

        info!(
            event = "phone_lookup",
            phone = %mask_phone(&digits),
            exists = exists,
            "Phone lookup for {}: exists={}", mask_phone(&digits), exists
        );
        Ok(exists)
    }

    /// Fails with `DuplicatePhone` when the phone already has an entry.
    pub async fn ensure_clear(&self, phone: &str) -> Result<(), SpinError> {
        if self.check(phone).await? {
            return Err(SpinError::DuplicatePhone);
        }
        Ok(())
    }
}
