use crate::accessors::FieldAccessors;
use crate::document::Document;
use crate::errors::FieldHashError;
use crate::field::ProtectedField;
use crate::update::UpdatePayload;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathKind {
    String,
    Document,
    Other,
}

/// Per-path declaration options recognized by the plugin.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathOptions {
    /// Marks this path for hashing, equivalent to listing it in
    /// [`HashFieldsOptions::fields`](crate::options::HashFieldsOptions).
    #[serde(default)]
    pub hashed: bool,
    /// Per-field cost-factor override, consulted before the schema-level
    /// default.
    #[serde(default)]
    pub rounds: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct SchemaPath {
    pub name: String,
    pub kind: PathKind,
    pub options: PathOptions,
}

pub type HookFuture<'a> = Pin<Box<dyn Future<Output = Result<(), FieldHashError>> + Send + 'a>>;

/// Observes and mutates an instance before it is committed; returning an
/// error aborts the save.
pub trait PreSaveHook: Send + Sync {
    fn run<'a>(&'a self, doc: &'a mut Document) -> HookFuture<'a>;
}

/// Observes and mutates an update payload before it is applied; returning an
/// error aborts the update.
pub trait PreUpdateHook: Send + Sync {
    fn run<'a>(&'a self, payload: &'a mut UpdatePayload) -> HookFuture<'a>;
}

/// Declared paths, lifecycle hooks, and the per-field accessors installed by
/// the plugin. Declaration order is preserved for paths and hooks.
#[derive(Default)]
pub struct Schema {
    paths: Vec<SchemaPath>,
    accessors: HashMap<String, FieldAccessors>,
    protected: Vec<ProtectedField>,
    pre_save: Vec<Arc<dyn PreSaveHook>>,
    pre_update: Vec<Arc<dyn PreUpdateHook>>,
}

impl Schema {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a path. Re-declaring an existing name is a no-op.
    pub fn add_path(&mut self, name: &str, kind: PathKind, options: PathOptions) -> &mut Self {
        if self.path(name).is_none() {
            self.paths.push(SchemaPath { name: name.to_string(), kind, options });
        }
        self
    }

    #[must_use]
    pub fn path(&self, name: &str) -> Option<&SchemaPath> {
        self.paths.iter().find(|p| p.name == name)
    }

    pub fn each_path(&self) -> impl Iterator<Item = &SchemaPath> {
        self.paths.iter()
    }

    pub fn pre_save(&mut self, hook: Arc<dyn PreSaveHook>) {
        self.pre_save.push(hook);
    }

    pub fn pre_update(&mut self, hook: Arc<dyn PreUpdateHook>) {
        self.pre_update.push(hook);
    }

    pub async fn run_pre_save(&self, doc: &mut Document) -> Result<(), FieldHashError> {
        for hook in &self.pre_save {
            hook.run(doc).await?;
        }
        Ok(())
    }

    pub async fn run_pre_update(&self, payload: &mut UpdatePayload) -> Result<(), FieldHashError> {
        for hook in &self.pre_update {
            hook.run(payload).await?;
        }
        Ok(())
    }

    pub(crate) fn install_accessors(&mut self, accessors: FieldAccessors) {
        self.accessors.insert(accessors.token(), accessors);
    }

    pub(crate) fn set_protected(&mut self, fields: &[ProtectedField]) {
        self.protected = fields.to_vec();
    }

    /// The ordered protected field set, as resolved at plugin-install time.
    #[must_use]
    pub fn protected_fields(&self) -> &[ProtectedField] {
        &self.protected
    }

    /// Looks up the operations installed for a field by its capitalized token
    /// (e.g. `ProfilePin` for `profile.pin`).
    #[must_use]
    pub fn accessors(&self, token: &str) -> Option<&FieldAccessors> {
        self.accessors.get(token)
    }

    pub async fn encrypt_field(
        &self,
        token: &str,
        plaintext: &str,
    ) -> Result<String, FieldHashError> {
        self.lookup(token)?.encrypt(plaintext).await
    }

    pub async fn verify_field(
        &self,
        token: &str,
        doc: &Document,
        candidate: &str,
    ) -> Result<bool, FieldHashError> {
        self.lookup(token)?.verify(doc, candidate).await
    }

    pub fn verify_field_sync(
        &self,
        token: &str,
        doc: &Document,
        candidate: &str,
    ) -> Result<bool, FieldHashError> {
        self.lookup(token)?.verify_sync(doc, candidate)
    }

    fn lookup(&self, token: &str) -> Result<&FieldAccessors, FieldHashError> {
        self.accessors
            .get(token)
            .ok_or_else(|| FieldHashError::Configuration(format!("no hashed field for token: {token}")))
    }
}
