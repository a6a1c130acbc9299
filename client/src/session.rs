use std::time::{Duration, Instant};

use rand::Rng;
use shared::identity::Identity;
use shared::wheel::{draw_angle, SpinOutcome, Wheel};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::clock::{Clock, TokioClock};
use crate::duplicate_guard::{DuplicateGuard, PhoneLookup};
use crate::error::SpinError;
use crate::logging::mask_phone;
use crate::submission_client::{SubmissionClient, SubmissionRelay, SubmissionStatus};

/// Everything one play knows about the player and their prize. Lives exactly
/// as long as the session that owns it.
#[derive(Debug, Clone)]
pub struct PlayContext {
    pub session_id: Uuid,
    pub identity: Identity,
    pub outcome: Option<SpinOutcome>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Spinning { angle: u16, resolves_at: Instant },
    Resolved,
    Submitted,
    /// The prize is kept; another `submit` resends the same outcome.
    SubmissionFailed { reason: String },
}

/// What the view needs to animate a spin that just started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpinStart {
    pub angle: u16,
    pub total_rotation: i32,
    pub resolves_at: Instant,
}

/// One play: `Idle -> Spinning -> Resolved -> Submitted`, with
/// `SubmissionFailed` as a retryable detour. A session only exists for a
/// validated identity whose phone the lookup service has not seen.
pub struct SpinSession<C = TokioClock> {
    context: PlayContext,
    state: SessionState,
    wheel: Wheel,
    spin_duration: Duration,
    clock: C,
}

impl<C: Clock> SpinSession<C> {
    pub async fn begin<L: PhoneLookup>(
        identity: Identity,
        guard: &DuplicateGuard<L>,
        clock: C,
        spin_duration: Duration,
    ) -> Result<Self, SpinError> {
        let identity = identity.validated()?;

        if let Err(e) = guard.ensure_clear(&identity.phone).await {
            warn!(
                event = "session_blocked",
                phone = %mask_phone(&identity.normalized_phone()),
                "Session not started: {}", e
            );
            return Err(e);
        }

        let session_id = Uuid::new_v4();
        info!(event = "session_started", session = %session_id, "Session {} started", session_id);

        Ok(Self {
            context: PlayContext {
                session_id,
                identity,
                outcome: None,
            },
            state: SessionState::Idle,
            wheel: Wheel::new(),
            spin_duration,
            clock,
        })
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn context(&self) -> &PlayContext {
        &self.context
    }

    pub fn outcome(&self) -> Option<&SpinOutcome> {
        self.context.outcome.as_ref()
    }

    pub fn wheel(&self) -> &Wheel {
        &self.wheel
    }

    pub fn spin<G: Rng + ?Sized>(&mut self, rng: &mut G) -> Option<SpinStart> {
        if self.state != SessionState::Idle {
            return self.drop_spin_request();
        }
        let angle = draw_angle(rng);
        self.spin_at(angle)
    }

    /// Starts a spin that lands on `angle`. Requests made while a spin runs,
    /// or after the prize is known, are dropped.
    pub fn spin_at(&mut self, angle: u16) -> Option<SpinStart> {
        if self.state != SessionState::Idle || !self.wheel.start_spin(angle % 360) {
            return self.drop_spin_request();
        }

        let angle = angle % 360;
        let resolves_at = self.clock.now() + self.spin_duration;
        self.state = SessionState::Spinning { angle, resolves_at };

        info!(
            event = "spin_started",
            session = %self.context.session_id,
            angle = angle,
            "Wheel spinning to {} degrees", angle
        );
        Some(SpinStart {
            angle,
            total_rotation: self.wheel.rotation,
            resolves_at,
        })
    }

    fn drop_spin_request(&self) -> Option<SpinStart> {
        match self.state {
            SessionState::Spinning { .. } => debug!("Spin already in progress, dropping request"),
            _ => debug!("Spin not available in state {:?}", self.state),
        }
        None
    }

    /// Resolves the spin once its duration has passed on the session clock.
    /// Returns the outcome only on the call that performs the transition.
    pub fn poll(&mut self) -> Option<SpinOutcome> {
        match self.state {
            SessionState::Spinning { angle, resolves_at } if self.clock.now() >= resolves_at => {
                Some(self.resolve(angle))
            }
            _ => None,
        }
    }

    // Prize comes from the drawn angle, never the decorated rotation.
    fn resolve(&mut self, angle: u16) -> SpinOutcome {
        let outcome = SpinOutcome::from_angle(angle);
        self.wheel.complete_spin();
        self.context.outcome = Some(outcome.clone());
        self.state = SessionState::Resolved;

        info!(
            event = "spin_resolved",
            session = %self.context.session_id,
            angle = angle,
            prize = %outcome.prize,
            "Spin resolved: {}", outcome.prize
        );
        outcome
    }

    pub async fn submit<R: SubmissionRelay>(
        &mut self,
        submitter: &mut SubmissionClient<R>,
    ) -> Result<SubmissionStatus, SpinError> {
        let outcome = match (&self.state, &self.context.outcome) {
            (SessionState::Resolved | SessionState::Submitted | SessionState::SubmissionFailed { .. }, Some(outcome)) => {
                outcome.clone()
            }
            _ => return Err(SpinError::NotResolved),
        };

        match submitter.try_submit(&self.context.identity, &outcome.prize).await {
            Ok(_) | Err(SpinError::AlreadySubmitted) => {
                self.state = SessionState::Submitted;
                Ok(SubmissionStatus::Success)
            }
            Err(e) => {
                warn!(
                    event = "submission_pending_retry",
                    session = %self.context.session_id,
                    "Submission failed, prize kept for retry: {}", e
                );
                self.state = SessionState::SubmissionFailed { reason: e.to_string() };
                Err(e)
            }
        }
    }

    /// Ends the play. The identity and prize are dropped and the submission
    /// markers are cleared.
    pub fn end<R: SubmissionRelay>(self, submitter: &mut SubmissionClient<R>) {
        submitter.reset();
        info!(event = "session_ended", session = %self.context.session_id, "Session {} ended", self.context.session_id);
    }
}

impl SpinSession<TokioClock> {
    /// Sleeps out the rest of the spin and resolves it. Only offered on the
    /// tokio clock, so the sleep and `poll` agree on when the spin ends. A
    /// spin can't be cancelled, so this always ends with a prize.
    pub async fn wait_for_outcome(&mut self) -> Result<SpinOutcome, SpinError> {
        let (angle, resolves_at) = match self.state {
            SessionState::Spinning { angle, resolves_at } => (angle, resolves_at),
            _ => return self.context.outcome.clone().ok_or(SpinError::NotResolved),
        };

        let remaining = resolves_at.saturating_duration_since(self.clock.now());
        tokio::time::sleep(remaining).await;
        Ok(self.resolve(angle))
    }
}
