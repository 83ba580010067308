use crate::errors::FieldHashError;
use bson::{Bson, Document as BsonDocument};

/// A dotted path addressing a (possibly nested) document property.
///
/// Held as an ordered segment sequence so get/set work generically against
/// nested BSON documents.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    /// Parses a dotted path. Empty paths and empty segments (`"a..b"`) are
    /// rejected at definition time rather than surfacing later as misses.
    pub fn parse(path: &str) -> Result<Self, FieldHashError> {
        let segments: Vec<String> = path.split('.').map(str::to_owned).collect();
        if segments.iter().any(String::is_empty) {
            return Err(FieldHashError::Configuration(format!("invalid field path: {path:?}")));
        }
        Ok(Self { segments })
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    #[must_use]
    pub fn dotted(&self) -> String {
        self.segments.join(".")
    }

    /// Accessor-name token: every segment capitalized and concatenated,
    /// e.g. `profile.password` -> `ProfilePassword`.
    #[must_use]
    pub fn token(&self) -> String {
        self.segments.iter().map(|seg| capitalize(seg)).collect()
    }

    /// Reads the value at this path, descending through nested documents.
    #[must_use]
    pub fn get<'a>(&self, doc: &'a BsonDocument) -> Option<&'a Bson> {
        let mut cur = doc;
        let (last, parents) = self.segments.split_last()?;
        for seg in parents {
            match cur.get(seg) {
                Some(Bson::Document(d)) => cur = d,
                _ => return None,
            }
        }
        cur.get(last)
    }

    /// Writes `value` at this path, materializing intermediate sub-documents
    /// as needed. A non-document intermediate value is replaced.
    pub fn set(&self, doc: &mut BsonDocument, value: Bson) {
        let Some((last, parents)) = self.segments.split_last() else {
            return;
        };
        let mut cur = doc;
        for seg in parents {
            cur = ensure_subdoc(cur, seg);
        }
        cur.insert(last.clone(), value);
    }
}

impl std::fmt::Display for FieldPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.dotted())
    }
}

/// A field whose value is hashed before persistence, with an optional
/// per-field cost-factor override. Built once at plugin-install time.
#[derive(Debug, Clone)]
pub struct ProtectedField {
    pub path: FieldPath,
    pub rounds: Option<u32>,
}

impl ProtectedField {
    #[must_use]
    pub fn token(&self) -> String {
        self.path.token()
    }
}

fn ensure_subdoc<'a>(root: &'a mut BsonDocument, key: &str) -> &'a mut BsonDocument {
    let needs_new = !matches!(root.get(key), Some(Bson::Document(_)));
    if needs_new {
        root.insert(key.to_string(), Bson::Document(BsonDocument::new()));
    }
    match root.get_mut(key) {
        Some(Bson::Document(d)) => d,
        _ => unreachable!(),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn token_capitalizes_each_segment() {
        assert_eq!(FieldPath::parse("password").unwrap().token(), "Password");
        assert_eq!(FieldPath::parse("profile.pin").unwrap().token(), "ProfilePin");
        assert_eq!(FieldPath::parse("secretAnswer").unwrap().token(), "SecretAnswer");
    }

    #[test]
    fn parse_rejects_empty_segments() {
        assert!(FieldPath::parse("").is_err());
        assert!(FieldPath::parse("a..b").is_err());
        assert!(FieldPath::parse(".password").is_err());
    }

    #[test]
    fn get_and_set_nested() {
        let path = FieldPath::parse("profile.pin").unwrap();
        let mut d = doc! { "name": "x" };
        assert!(path.get(&d).is_none());
        path.set(&mut d, Bson::String("1234".into()));
        assert_eq!(path.get(&d), Some(&Bson::String("1234".into())));
        // flat path untouched
        assert_eq!(d.get_str("name").unwrap(), "x");
    }

    #[test]
    fn set_replaces_non_document_intermediate() {
        let path = FieldPath::parse("a.b").unwrap();
        let mut d = doc! { "a": 1 };
        path.set(&mut d, Bson::Int32(2));
        assert_eq!(path.get(&d), Some(&Bson::Int32(2)));
    }
}
