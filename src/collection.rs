use crate::document::Document;
use crate::errors::FieldHashError;
use crate::field::FieldPath;
use crate::schema::Schema;
use crate::types::DocumentId;
use crate::update::{UpdatePayload, UpdateReport};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// A named in-memory document store bound to a schema. Lifecycle hooks run to
/// completion before any mutation reaches the store, so an aborted save or
/// update leaves the store untouched.
pub struct Collection {
    name: Arc<RwLock<String>>,
    schema: Arc<Schema>,
    store: Arc<RwLock<HashMap<DocumentId, Document>>>,
}

impl Collection {
    #[must_use]
    pub fn new(name: String, schema: Arc<Schema>) -> Self {
        Collection {
            name: Arc::new(RwLock::new(name)),
            schema,
            store: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn set_name(&self, new_name: String) {
        *self.name.write() = new_name;
    }

    /// Returns the collection's name as a String (cloned), hiding the RwLock.
    #[must_use]
    pub fn name_str(&self) -> String {
        self.name.read().clone()
    }

    /// Runs pre-save hooks, then commits the instance and clears its
    /// modified-path tracking. A hook error aborts before the store is
    /// touched.
    pub async fn save(&self, doc: &mut Document) -> Result<DocumentId, FieldHashError> {
        self.schema.run_pre_save(doc).await?;
        doc.clear_modified();
        self.store.write().insert(doc.id.clone(), doc.clone());
        log::info!(target: "fieldhash::audit", "save collection={} id={}", self.name_str(), doc.id);
        Ok(doc.id.clone())
    }

    #[must_use]
    pub fn find_document(&self, id: &DocumentId) -> Option<Document> {
        self.store.read().get(id).cloned()
    }

    #[must_use]
    pub fn find_one<F>(&self, filter: F) -> Option<Document>
    where
        F: Fn(&Document) -> bool,
    {
        self.store.read().values().find(|d| filter(d)).cloned()
    }

    #[must_use]
    pub fn get_all_documents(&self) -> Vec<Document> {
        self.store.read().values().cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.store.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.read().is_empty()
    }

    /// Runs pre-update hooks on the payload, then applies it to every
    /// matching document. All-or-nothing: a hook error aborts before any
    /// document is touched.
    pub async fn update_many<F>(
        &self,
        filter: F,
        mut payload: UpdatePayload,
    ) -> Result<UpdateReport, FieldHashError>
    where
        F: Fn(&Document) -> bool,
    {
        self.schema.run_pre_update(&mut payload).await?;
        let mut store = self.store.write();
        let mut report = UpdateReport::default();
        for doc in store.values_mut() {
            if !filter(doc) {
                continue;
            }
            report.matched += 1;
            if apply_payload(doc, &payload)? {
                report.modified += 1;
            }
        }
        log::info!(
            target: "fieldhash::audit",
            "update collection={} matched={} modified={}",
            self.name_str(),
            report.matched,
            report.modified
        );
        Ok(report)
    }

    /// Like [`update_many`](Self::update_many) but stops after the first
    /// matching document.
    pub async fn update_one<F>(
        &self,
        filter: F,
        mut payload: UpdatePayload,
    ) -> Result<UpdateReport, FieldHashError>
    where
        F: Fn(&Document) -> bool,
    {
        self.schema.run_pre_update(&mut payload).await?;
        let mut store = self.store.write();
        for doc in store.values_mut() {
            if filter(doc) {
                let modified = apply_payload(doc, &payload)?;
                return Ok(UpdateReport { matched: 1, modified: u64::from(modified) });
            }
        }
        Ok(UpdateReport::default())
    }

    /// Find-and-update: applies the payload to the first matching document
    /// and returns its updated state. The same pre-update hooks run as for
    /// the plain update operations.
    pub async fn find_one_and_update<F>(
        &self,
        filter: F,
        mut payload: UpdatePayload,
    ) -> Result<Option<Document>, FieldHashError>
    where
        F: Fn(&Document) -> bool,
    {
        self.schema.run_pre_update(&mut payload).await?;
        let mut store = self.store.write();
        for doc in store.values_mut() {
            if filter(doc) {
                apply_payload(doc, &payload)?;
                return Ok(Some(doc.clone()));
            }
        }
        Ok(None)
    }
}

/// Applies the effective payload to a stored document. Dotted keys expand to
/// nested structure; top-level keys outside a present `$set` block never
/// reach this point.
fn apply_payload(doc: &mut Document, payload: &UpdatePayload) -> Result<bool, FieldHashError> {
    let mut changed = false;
    for (key, value) in payload.effective().iter() {
        let path = FieldPath::parse(key)?;
        let old = path.get(doc.data()).cloned();
        if old.as_ref() != Some(value) {
            doc.set_path(&path, value.clone());
            changed = true;
        }
    }
    Ok(changed)
}
