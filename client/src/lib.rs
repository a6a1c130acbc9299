pub mod clock;
pub mod config;
pub mod duplicate_guard;
pub mod error;
pub mod http;
pub mod logging;
pub mod session;
pub mod submission_client;
pub mod transport;

pub use clock::{Clock, ManualClock, TokioClock};
pub use config::Config;
pub use duplicate_guard::{DuplicateGuard, PhoneLookup};
pub use error::{SpinError, TransportError};
pub use http::{HttpPhoneLookup, HttpRelay};
pub use session::{PlayContext, SessionState, SpinSession, SpinStart};
pub use submission_client::{SubmissionClient, SubmissionRelay, SubmissionStatus};
