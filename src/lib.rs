pub mod accessors;
pub mod collection;
pub mod document;
pub mod errors;
pub mod field;
pub mod hashing;
pub mod hooks;
pub mod logger;
pub mod options;
pub mod plugin;
pub mod schema;
pub mod types;
pub mod update;

pub use accessors::{EncryptCallback, FieldAccessors, VerifyCallback};
pub use collection::Collection;
pub use document::Document;
pub use errors::FieldHashError;
pub use field::{FieldPath, ProtectedField};
pub use options::{FieldSpec, HashFieldsOptions};
pub use plugin::{DEFAULT_FIELD, hash_fields};
pub use schema::{PathKind, PathOptions, Schema};
pub use types::DocumentId;
pub use update::{UpdatePayload, UpdateReport};

/// Initializes the logging system.
///
/// This function should be called once at the beginning of the application's
/// execution, before any collections are used.
pub fn init() -> Result<(), Box<dyn std::error::Error>> {
    logger::init()?;
    Ok(())
}
