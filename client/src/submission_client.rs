use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use shared::identity::Identity;
use shared::wheel::is_no_prize;
use tracing::{debug, error, info};

use crate::error::{SpinError, TransportError};
use crate::logging::mask_phone;
use crate::transport::{send_with_retry_if, RetryPolicy};

/// Write-only sink that records finished entries. A successful dispatch means
/// the request went out, not that the entry is stored.
#[allow(async_fn_in_trait)]
pub trait SubmissionRelay {
    async fn dispatch(&self, identity: &Identity, prize: &str) -> Result<(), TransportError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SubmissionStatus {
    Success,
    Error,
}

/// How a submit call ended when it didn't fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Dispatched,
    /// Nothing to record: a losing spin or an incomplete identity.
    Skipped,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmissionRecord {
    pub identity: Identity,
    pub prize: String,
    pub submitted_at: DateTime<Utc>,
}

type SubmissionKey = (String, String);

pub struct SubmissionClient<R> {
    relay: R,
    retry: RetryPolicy,
    submitted: HashMap<SubmissionKey, SubmissionRecord>,
}

impl<R: SubmissionRelay> SubmissionClient<R> {
    pub fn new(relay: R, retry: RetryPolicy) -> Self {
        Self {
            relay,
            retry,
            submitted: HashMap::new(),
        }
    }

    pub fn relay(&self) -> &R {
        &self.relay
    }

    /// Reports `Success` for dispatched, skipped and already-submitted
    /// entries alike.
    pub async fn submit(&mut self, identity: &Identity, prize: &str) -> SubmissionStatus {
        match self.try_submit(identity, prize).await {
            Ok(_) | Err(SpinError::AlreadySubmitted) => SubmissionStatus::Success,
            Err(_) => SubmissionStatus::Error,
        }
    }

    /// Like `submit`, but hands back the failure so the caller can show it.
    /// A repeat of an already dispatched (phone, prize) pair comes back as
    /// `AlreadySubmitted` without touching the relay.
    pub async fn try_submit(&mut self, identity: &Identity, prize: &str) -> Result<Delivery, SpinError> {
        if is_no_prize(prize) {
            debug!("Skipping submission for a losing spin");
            return Ok(Delivery::Skipped);
        }
        if !identity.has_required_fields() {
            debug!("Skipping submission, identity is incomplete");
            return Ok(Delivery::Skipped);
        }

        let key = (identity.normalized_phone(), prize.to_string());
        if self.submitted.contains_key(&key) {
            debug!("Suppressing repeat submission for {}", mask_phone(&key.0));
            return Err(SpinError::AlreadySubmitted);
        }

        let relay = &self.relay;
        let result = send_with_retry_if(&self.retry, "submission", TransportError::is_resendable, move || {
            relay.dispatch(identity, prize)
        })
        .await;

        match result {
            Ok(()) => {
                info!(
                    event = "submission_dispatched",
                    phone = %mask_phone(&key.0),
                    prize = %prize,
                    "Entry dispatched for {}", mask_phone(&key.0)
                );
                let record = SubmissionRecord {
                    identity: identity.clone(),
                    prize: prize.to_string(),
                    submitted_at: Utc::now(),
                };
                self.submitted.insert(key, record);
                Ok(Delivery::Dispatched)
            }
            Err(e) => {
                error!(
                    event = "submission_failed",
                    phone = %mask_phone(&key.0),
                    "Failed to dispatch entry: {}", e
                );
                Err(e.into())
            }
        }
    }

    pub fn has_submitted(&self, phone: &str, prize: &str) -> bool {
        let key = (shared::validation::normalize_phone(phone), prize.to_string());
        self.submitted.contains_key(&key)
    }

    pub fn records(&self) -> impl Iterator<Item = &SubmissionRecord> {
        self.submitted.values()
    }

    /// Forgets every marker. Called when a play session ends.
    pub fn reset(&mut self) {
        self.submitted.clear();
    }
}
