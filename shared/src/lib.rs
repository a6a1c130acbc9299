pub mod constants;
pub mod identity;
pub mod stores;
pub mod submission;
pub mod validation;
pub mod wheel;
