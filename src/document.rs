use crate::errors::FieldHashError;
use crate::field::FieldPath;
use crate::types::DocumentId;
use bson::{Bson, Document as BsonDocument};
use chrono::{DateTime, Utc};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq)]
pub struct Metadata {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Metadata {
    #[must_use]
    pub fn new() -> Self {
        let now = Utc::now();
        Self { created_at: now, updated_at: now }
    }
}

impl Default for Metadata {
    fn default() -> Self {
        Self::new()
    }
}

/// An instance conforming to a schema: a BSON payload plus tracking of which
/// dotted paths were set since the last save. On a new instance every leaf
/// path present at construction counts as modified.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: DocumentId,
    data: BsonDocument,
    pub metadata: Metadata,
    modified: HashSet<String>,
    is_new: bool,
}

impl Document {
    #[must_use]
    pub fn new(data: BsonDocument) -> Self {
        let mut modified = HashSet::new();
        collect_leaf_paths(&data, None, &mut modified);
        Self { id: DocumentId::new(), data, metadata: Metadata::new(), modified, is_new: true }
    }

    #[must_use]
    pub fn data(&self) -> &BsonDocument {
        &self.data
    }

    /// Reads the value at a dotted path. Unparseable paths read as absent.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Bson> {
        FieldPath::parse(path).ok()?.get(&self.data)
    }

    /// Writes a value at a dotted path and marks the path modified.
    pub fn set(&mut self, path: &str, value: impl Into<Bson>) -> Result<(), FieldHashError> {
        let parsed = FieldPath::parse(path)?;
        self.set_path(&parsed, value.into());
        self.modified.insert(parsed.dotted());
        Ok(())
    }

    /// Raw write that does not touch the modified set. Used by hooks writing
    /// hashes back and by store-side payload application.
    pub(crate) fn set_path(&mut self, path: &FieldPath, value: Bson) {
        path.set(&mut self.data, value);
        self.metadata.updated_at = Utc::now();
    }

    #[must_use]
    pub fn is_modified(&self, path: &str) -> bool {
        self.modified.contains(path)
    }

    #[must_use]
    pub fn is_new(&self) -> bool {
        self.is_new
    }

    #[must_use]
    pub fn modified_paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.modified.iter().cloned().collect();
        paths.sort();
        paths
    }

    pub(crate) fn clear_modified(&mut self) {
        self.modified.clear();
        self.is_new = false;
    }
}

fn collect_leaf_paths(doc: &BsonDocument, prefix: Option<&str>, out: &mut HashSet<String>) {
    for (key, value) in doc.iter() {
        let path = match prefix {
            Some(p) => format!("{p}.{key}"),
            None => key.to_string(),
        };
        match value {
            Bson::Document(d) => collect_leaf_paths(d, Some(&path), out),
            _ => {
                out.insert(path);
            }
        }
    }
}
