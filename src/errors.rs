use thiserror::Error;

// Clone is required so one hash/verify outcome can be delivered to both the
// returned future and an optional completion callback.
#[derive(Debug, Clone, Error)]
pub enum FieldHashError {
    #[error("Invalid field specification: {0}")]
    Configuration(String),

    #[error("Hashing error: {0}")]
    Hashing(String),

    #[error("No stored value at path: {0}")]
    MissingValue(String),

    #[error("Expected a string value at path: {0}")]
    NotAString(String),

    #[error("Hash task failed: {0}")]
    Task(String),
}

impl From<bcrypt::BcryptError> for FieldHashError {
    fn from(e: bcrypt::BcryptError) -> Self {
        Self::Hashing(e.to_string())
    }
}
