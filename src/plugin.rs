//! Plugin entry point: resolves the protected field set, installs per-field
//! accessors, and registers the save-time and update-time hashing hooks.

use crate::accessors::FieldAccessors;
use crate::errors::FieldHashError;
use crate::field::{FieldPath, ProtectedField};
use crate::hooks;
use crate::options::{FieldSpec, HashFieldsOptions};
use crate::schema::{PathKind, PathOptions, Schema};
use std::sync::Arc;

/// Field protected when no fields are configured and no path carries the
/// `hashed` marker.
pub const DEFAULT_FIELD: &str = "password";

/// Applies field hashing to a schema. Runs once at schema-definition time.
pub fn hash_fields(schema: &mut Schema, options: &HashFieldsOptions) -> Result<(), FieldHashError> {
    let paths = collect_fields(schema, options)?;
    let mut protected = Vec::with_capacity(paths.len());
    for path in paths {
        ensure_path(schema, &path);
        let rounds = schema.path(&path.dotted()).and_then(|p| p.options.rounds);
        protected.push(ProtectedField { path, rounds });
    }
    let fields: Arc<[ProtectedField]> = protected.into();
    schema.set_protected(&fields);
    for field in fields.iter() {
        schema.install_accessors(FieldAccessors::new(field.clone(), options.rounds));
    }
    hooks::install(schema, &fields, options.rounds);
    log::info!("field hashing enabled for {} field(s)", fields.len());
    Ok(())
}

/// Deduplicated protected paths: configured fields first in declaration
/// order, then any marker-carrying schema paths not already listed, then the
/// default field if the set would otherwise be empty.
fn collect_fields(
    schema: &Schema,
    options: &HashFieldsOptions,
) -> Result<Vec<FieldPath>, FieldHashError> {
    let declared: Vec<&str> = match &options.fields {
        FieldSpec::Unset => Vec::new(),
        FieldSpec::One(name) => vec![name.as_str()],
        FieldSpec::Many(names) => names.iter().map(String::as_str).collect(),
    };
    let mut out: Vec<FieldPath> = Vec::new();
    for name in declared {
        let path = FieldPath::parse(name)?;
        if !out.contains(&path) {
            out.push(path);
        }
    }
    for schema_path in schema.each_path() {
        if schema_path.options.hashed {
            let path = FieldPath::parse(&schema_path.name)?;
            if !out.contains(&path) {
                out.push(path);
            }
        }
    }
    if out.is_empty() {
        out.push(FieldPath::parse(DEFAULT_FIELD)?);
    }
    Ok(out)
}

fn ensure_path(schema: &mut Schema, path: &FieldPath) {
    if schema.path(&path.dotted()).is_some() {
        return;
    }
    // Intermediate segments become nested placeholders; only the leaf is
    // string-typed.
    for depth in 1..path.segments().len() {
        let prefix = path.segments()[..depth].join(".");
        if schema.path(&prefix).is_none() {
            schema.add_path(&prefix, PathKind::Document, PathOptions::default());
        }
    }
    schema.add_path(&path.dotted(), PathKind::String, PathOptions::default());
}
