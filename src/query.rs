// src/query.rs
use crate::models::CredentialCollection;

/// Records whose service name contains `term`, in their original order.
///
/// Matching is case-sensitive code-point containment with no normalization.
/// An empty term matches every record.
pub fn filter(records: &CredentialCollection, term: &str) -> CredentialCollection {
    records
        .iter()
        .filter(|record| record.service_name.contains(term))
        .cloned()
        .collect()
}
