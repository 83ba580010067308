use serde::{Deserialize, Serialize};

/// Which fields to protect. `Unset` falls back to any schema paths carrying
/// the `hashed` marker, and finally to the default `password` field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldSpec {
    #[default]
    Unset,
    One(String),
    Many(Vec<String>),
}

/// Plugin options, applied once at schema-definition time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HashFieldsOptions {
    #[serde(default)]
    pub fields: FieldSpec,
    /// Default cost factor for fields without their own override.
    #[serde(default)]
    pub rounds: Option<u32>,
}

impl HashFieldsOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.fields = FieldSpec::One(field.into());
        self
    }

    #[must_use]
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = FieldSpec::Many(fields.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_rounds(mut self, rounds: u32) -> Self {
        self.rounds = Some(rounds);
        self
    }
}
