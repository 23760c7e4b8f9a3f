// src/models.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// One saved login. The password is kept exactly as entered.
#[derive(Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct CredentialRecord {
    pub id: String,
    pub service_name: String,
    pub email: String,
    pub password: String,
}

// Keeps passwords out of logs and panic messages.
impl fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("id", &self.id)
            .field("service_name", &self.service_name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl CredentialRecord {
    pub fn new(id: String, service_name: String, email: String, password: String) -> Self {
        Self {
            id,
            service_name,
            email,
            password,
        }
    }

    /// Name of the first required field that is empty, if any.
    pub fn first_empty_field(&self) -> Option<&'static str> {
        [
            ("id", &self.id),
            ("service_name", &self.service_name),
            ("email", &self.email),
            ("password", &self.password),
        ]
        .into_iter()
        .find(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
    }
}

/// Insertion-ordered list of records, oldest first.
///
/// Serialized as a bare JSON array, without any envelope or version field.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct CredentialCollection {
    entries: Vec<CredentialRecord>,
}

impl CredentialCollection {
    pub fn new() -> Self {
        CredentialCollection::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CredentialRecord> {
        self.entries.iter()
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }

    /// First id that occurs more than once, if the collection is corrupt.
    pub fn find_duplicate_id(&self) -> Option<&str> {
        self.entries
            .iter()
            .enumerate()
            .find(|(i, entry)| self.entries[..*i].iter().any(|prev| prev.id == entry.id))
            .map(|(_, entry)| entry.id.as_str())
    }

    // Only the record store appends; callers must have checked the id first.
    pub(crate) fn push(&mut self, record: CredentialRecord) {
        self.entries.push(record);
    }
}

impl FromIterator<CredentialRecord> for CredentialCollection {
    fn from_iter<I: IntoIterator<Item = CredentialRecord>>(iter: I) -> Self {
        CredentialCollection {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for CredentialCollection {
    type Item = CredentialRecord;
    type IntoIter = std::vec::IntoIter<CredentialRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a CredentialCollection {
    type Item = &'a CredentialRecord;
    type IntoIter = std::slice::Iter<'a, CredentialRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Supplies globally unique record ids.
pub type IdGenerator = Box<dyn Fn() -> String + Send + Sync>;

pub fn uuid_v4_generator() -> IdGenerator {
    Box::new(|| Uuid::new_v4().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str) -> CredentialRecord {
        CredentialRecord::new(id.to_string(), "svc".to_string(), "a@b.io".to_string(), "pw".to_string())
    }

    #[test]
    fn test_first_empty_field_reports_in_order() {
        assert_eq!(record("1").first_empty_field(), None);

        let mut r = record("1");
        r.email.clear();
        r.password.clear();
        assert_eq!(r.first_empty_field(), Some("email"));

        assert_eq!(CredentialRecord::default().first_empty_field(), Some("id"));
    }

    #[test]
    fn test_debug_output_redacts_password() {
        let debug = format!("{:?}", record("1"));
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("\"pw\""));
    }

    #[test]
    fn test_collection_serializes_as_bare_array() {
        let collection: CredentialCollection = vec![record("1")].into_iter().collect();
        let json = serde_json::to_string(&collection).unwrap();
        assert_eq!(
            json,
            r#"[{"id":"1","service_name":"svc","email":"a@b.io","password":"pw"}]"#
        );
    }

    #[test]
    fn test_find_duplicate_id() {
        let ok: CredentialCollection = vec![record("1"), record("2")].into_iter().collect();
        assert_eq!(ok.find_duplicate_id(), None);

        let bad: CredentialCollection = vec![record("1"), record("2"), record("1")].into_iter().collect();
        assert_eq!(bad.find_duplicate_id(), Some("1"));
    }

    #[test]
    fn test_uuid_generator_yields_distinct_ids() {
        let generate = uuid_v4_generator();
        let a = generate();
        let b = generate();
        assert_ne!(a, b);
        assert!(Uuid::parse_str(&a).is_ok());
    }
}
