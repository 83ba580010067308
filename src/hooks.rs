//! Lifecycle hooks: the save-time and update-time hashers. Both start one
//! blocking hash task per changed field (initiation follows the protected
//! set's declared order), await the whole batch, and gate the write on every
//! task succeeding. The first failure aborts the operation; fields already
//! written back in the same attempt stay hashed in memory.

use crate::document::Document;
use crate::errors::FieldHashError;
use crate::field::ProtectedField;
use crate::hashing;
use crate::schema::{HookFuture, PreSaveHook, PreUpdateHook, Schema};
use crate::update::UpdatePayload;
use bson::Bson;
use std::sync::Arc;
use tokio::task::JoinSet;

pub(crate) fn install(
    schema: &mut Schema,
    fields: &Arc<[ProtectedField]>,
    default_rounds: Option<u32>,
) {
    schema.pre_save(Arc::new(SaveTimeHasher {
        fields: Arc::clone(fields),
        default_rounds,
    }));
    schema.pre_update(Arc::new(UpdateTimeHasher {
        fields: Arc::clone(fields),
        default_rounds,
    }));
}

/// Hashes every modified protected field on an instance before it is
/// committed.
pub struct SaveTimeHasher {
    fields: Arc<[ProtectedField]>,
    default_rounds: Option<u32>,
}

impl PreSaveHook for SaveTimeHasher {
    fn run<'a>(&'a self, doc: &'a mut Document) -> HookFuture<'a> {
        Box::pin(async move { hash_modified_fields(&self.fields, self.default_rounds, doc).await })
    }
}

async fn hash_modified_fields(
    fields: &[ProtectedField],
    default_rounds: Option<u32>,
    doc: &mut Document,
) -> Result<(), FieldHashError> {
    let mut pending: Vec<(usize, String)> = Vec::new();
    for (idx, field) in fields.iter().enumerate() {
        let path = field.path.dotted();
        if !doc.is_modified(&path) {
            continue;
        }
        match doc.get(&path) {
            Some(Bson::String(plain)) => pending.push((idx, plain.clone())),
            Some(_) => return Err(FieldHashError::NotAString(path)),
            None => return Err(FieldHashError::MissingValue(path)),
        }
    }
    if pending.is_empty() {
        return Ok(());
    }
    log::debug!("hashing {} modified field(s) before save", pending.len());

    let mut tasks = JoinSet::new();
    for (idx, plain) in pending {
        let cost = hashing::resolve_cost(fields[idx].rounds, default_rounds);
        tasks.spawn_blocking(move || (idx, hashing::hash_sync(&plain, cost)));
    }
    // Completion order is unordered; the save resumes only once every task
    // has reported.
    while let Some(joined) = tasks.join_next().await {
        let (idx, hashed) = joined.map_err(|e| FieldHashError::Task(e.to_string()))?;
        doc.set_path(&fields[idx].path, Bson::String(hashed?));
    }
    Ok(())
}

/// Hashes protected fields present in an update payload before the update is
/// applied. Scans the `$set` sub-document when one is present; a protected
/// field given as a top-level key alongside `$set` is not detected.
pub struct UpdateTimeHasher {
    fields: Arc<[ProtectedField]>,
    default_rounds: Option<u32>,
}

impl PreUpdateHook for UpdateTimeHasher {
    fn run<'a>(&'a self, payload: &'a mut UpdatePayload) -> HookFuture<'a> {
        Box::pin(async move { hash_update_fields(&self.fields, self.default_rounds, payload).await })
    }
}

async fn hash_update_fields(
    fields: &[ProtectedField],
    default_rounds: Option<u32>,
    payload: &mut UpdatePayload,
) -> Result<(), FieldHashError> {
    let mut pending: Vec<(usize, String)> = Vec::new();
    {
        let effective = payload.effective();
        for (idx, field) in fields.iter().enumerate() {
            // Payload keys are literal dotted strings.
            let key = field.path.dotted();
            match effective.get(&key) {
                Some(Bson::String(s)) if !s.is_empty() => pending.push((idx, s.clone())),
                Some(v) if is_truthy(v) => return Err(FieldHashError::NotAString(key)),
                _ => {}
            }
        }
    }
    if pending.is_empty() {
        return Ok(());
    }
    log::debug!("hashing {} field(s) in update payload", pending.len());

    let mut tasks = JoinSet::new();
    for (idx, plain) in pending {
        let cost = hashing::resolve_cost(fields[idx].rounds, default_rounds);
        tasks.spawn_blocking(move || (idx, hashing::hash_sync(&plain, cost)));
    }
    while let Some(joined) = tasks.join_next().await {
        let (idx, hashed) = joined.map_err(|e| FieldHashError::Task(e.to_string()))?;
        payload.effective_mut().insert(fields[idx].path.dotted(), Bson::String(hashed?));
    }
    Ok(())
}

fn is_truthy(v: &Bson) -> bool {
    match v {
        Bson::Null | Bson::Undefined => false,
        Bson::Boolean(b) => *b,
        Bson::String(s) => !s.is_empty(),
        Bson::Int32(i) => *i != 0,
        Bson::Int64(i) => *i != 0,
        Bson::Double(f) => *f != 0.0,
        _ => true,
    }
}
