//! Thin adapter over the bcrypt capability: salted cost-factor hashing and
//! constant-time comparison, in blocking and task-offloaded forms. Plaintexts
//! are never logged and not retained beyond the call.

use crate::errors::FieldHashError;

/// Effective cost factor for a field: its own override, else the schema-level
/// default, else bcrypt's built-in default.
#[must_use]
pub fn resolve_cost(field_rounds: Option<u32>, default_rounds: Option<u32>) -> u32 {
    field_rounds.or(default_rounds).unwrap_or(bcrypt::DEFAULT_COST)
}

pub fn hash_sync(plaintext: &str, cost: u32) -> Result<String, FieldHashError> {
    Ok(bcrypt::hash(plaintext, cost)?)
}

pub fn compare_sync(candidate: &str, hashed: &str) -> Result<bool, FieldHashError> {
    Ok(bcrypt::verify(candidate, hashed)?)
}

/// Hashes on the blocking pool so callers suspend instead of stalling the
/// runtime on salt generation and key derivation.
pub async fn hash(plaintext: &str, cost: u32) -> Result<String, FieldHashError> {
    let plaintext = plaintext.to_owned();
    tokio::task::spawn_blocking(move || hash_sync(&plaintext, cost))
        .await
        .map_err(|e| FieldHashError::Task(e.to_string()))?
}

pub async fn compare(candidate: &str, hashed: &str) -> Result<bool, FieldHashError> {
    let candidate = candidate.to_owned();
    let hashed = hashed.to_owned();
    tokio::task::spawn_blocking(move || compare_sync(&candidate, &hashed))
        .await
        .map_err(|e| FieldHashError::Task(e.to_string()))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_cost_precedence() {
        assert_eq!(resolve_cost(Some(6), Some(10)), 6);
        assert_eq!(resolve_cost(None, Some(10)), 10);
        assert_eq!(resolve_cost(None, None), bcrypt::DEFAULT_COST);
    }

    #[test]
    fn hash_rejects_out_of_range_cost() {
        assert!(hash_sync("pw", 2).is_err());
    }
}
