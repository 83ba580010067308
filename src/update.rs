use bson::{Bson, Document as BsonDocument, doc};

pub(crate) const SET_OPERATOR: &str = "$set";

/// An in-flight partial update against zero or more stored documents.
///
/// When the payload carries a `$set` sub-document, that sub-document is the
/// effective payload: top-level keys outside `$set` are neither scanned for
/// protected fields nor applied. Keys of the effective payload are literal
/// dotted strings (`"profile.pin"`), expanded to nested structure only when
/// applied to a document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdatePayload {
    doc: BsonDocument,
}

impl UpdatePayload {
    #[must_use]
    pub fn new(doc: BsonDocument) -> Self {
        Self { doc }
    }

    /// Wraps the given fields in a `$set` sub-document.
    #[must_use]
    pub fn set(fields: BsonDocument) -> Self {
        Self { doc: doc! { "$set": fields } }
    }

    #[must_use]
    pub fn as_document(&self) -> &BsonDocument {
        &self.doc
    }

    /// The sub-document update operations apply to: the `$set` block when
    /// present, the whole payload otherwise.
    #[must_use]
    pub fn effective(&self) -> &BsonDocument {
        match self.doc.get(SET_OPERATOR) {
            Some(Bson::Document(d)) => d,
            _ => &self.doc,
        }
    }

    pub fn effective_mut(&mut self) -> &mut BsonDocument {
        if matches!(self.doc.get(SET_OPERATOR), Some(Bson::Document(_))) {
            match self.doc.get_mut(SET_OPERATOR) {
                Some(Bson::Document(d)) => d,
                _ => unreachable!(),
            }
        } else {
            &mut self.doc
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UpdateReport {
    pub matched: u64,
    pub modified: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effective_is_whole_payload_without_set() {
        let p = UpdatePayload::new(doc! { "password": "x", "email": "y" });
        assert_eq!(p.effective().get_str("password").unwrap(), "x");
        assert_eq!(p.effective().get_str("email").unwrap(), "y");
    }

    #[test]
    fn effective_is_set_block_when_present() {
        let p = UpdatePayload::new(doc! { "$set": { "password": "x" }, "email": "y" });
        assert_eq!(p.effective().get_str("password").unwrap(), "x");
        assert!(p.effective().get("email").is_none());
    }

    #[test]
    fn set_constructor_wraps_fields() {
        let p = UpdatePayload::set(doc! { "password": "x" });
        assert!(p.as_document().get_document(SET_OPERATOR).is_ok());
        assert_eq!(p.effective().get_str("password").unwrap(), "x");
    }
}
