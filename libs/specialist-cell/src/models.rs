use thiserror::Error;

use shared_models::records::{Specialist, Treatment};
use shared_store::StoreError;

/// Outcome of resolving a requested service name: the specialist who will
/// take the appointment and the treatment that defines it.
#[derive(Debug, Clone)]
pub struct ServiceMatch {
    pub specialist: Specialist,
    pub treatment: Treatment,
}

impl ServiceMatch {
    pub fn default_duration_minutes(&self) -> i32 {
        self.treatment.estimated_duration_minutes
    }
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("no specialist found for service: {0}")]
    ServiceNotFound(String),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}
