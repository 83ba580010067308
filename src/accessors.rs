use crate::document::Document;
use crate::errors::FieldHashError;
use crate::field::{FieldPath, ProtectedField};
use crate::hashing;
use bson::Bson;

pub type EncryptCallback = Box<dyn FnOnce(Result<String, FieldHashError>) + Send>;
pub type VerifyCallback = Box<dyn FnOnce(Result<bool, FieldHashError>) + Send>;

/// The operations installed for one protected field at plugin time, looked up
/// on the schema by the field's capitalized token. The `_with` variants take a
/// completion callback that observes the exact outcome the returned future
/// resolves to, including errors: one result, two observers.
#[derive(Debug, Clone)]
pub struct FieldAccessors {
    field: ProtectedField,
    default_rounds: Option<u32>,
}

impl FieldAccessors {
    pub(crate) fn new(field: ProtectedField, default_rounds: Option<u32>) -> Self {
        Self { field, default_rounds }
    }

    #[must_use]
    pub fn token(&self) -> String {
        self.field.token()
    }

    #[must_use]
    pub fn path(&self) -> &FieldPath {
        &self.field.path
    }

    #[must_use]
    pub fn cost(&self) -> u32 {
        hashing::resolve_cost(self.field.rounds, self.default_rounds)
    }

    /// Hashes a raw value with this field's cost factor.
    pub async fn encrypt(&self, plaintext: &str) -> Result<String, FieldHashError> {
        hashing::hash(plaintext, self.cost()).await
    }

    pub async fn encrypt_with(
        &self,
        plaintext: &str,
        cb: EncryptCallback,
    ) -> Result<String, FieldHashError> {
        let res = self.encrypt(plaintext).await;
        cb(res.clone());
        res
    }

    /// Compares `candidate` against the hash stored at this field's path on
    /// the given instance.
    pub async fn verify(&self, doc: &Document, candidate: &str) -> Result<bool, FieldHashError> {
        let stored = self.stored_hash(doc)?;
        hashing::compare(candidate, &stored).await
    }

    pub async fn verify_with(
        &self,
        doc: &Document,
        candidate: &str,
        cb: VerifyCallback,
    ) -> Result<bool, FieldHashError> {
        let res = self.verify(doc, candidate).await;
        cb(res.clone());
        res
    }

    /// Blocking form of [`verify`](Self::verify); no task is spawned and no
    /// callback wrapping applies.
    pub fn verify_sync(&self, doc: &Document, candidate: &str) -> Result<bool, FieldHashError> {
        let stored = self.stored_hash(doc)?;
        hashing::compare_sync(candidate, &stored)
    }

    fn stored_hash(&self, doc: &Document) -> Result<String, FieldHashError> {
        match self.field.path.get(doc.data()) {
            Some(Bson::String(s)) => Ok(s.clone()),
            Some(_) => Err(FieldHashError::NotAString(self.field.path.dotted())),
            None => Err(FieldHashError::MissingValue(self.field.path.dotted())),
        }
    }
}
