use thiserror::Error;

use shared_store::StoreError;

#[derive(Debug, Error)]
pub enum PatientError {
    #[error("patient name must include both first and last name")]
    IncompleteName,

    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}
