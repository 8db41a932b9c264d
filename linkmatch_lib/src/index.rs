//! In-memory candidate index over the contact registry.
//!
//! Built once per matching pass from a full registry snapshot and never
//! mutated during the pass. The registry is small enough that a full
//! rebuild per pass beats maintaining an incremental index.

use std::collections::HashMap;

use crate::normalize::NormalizedName;
use crate::types::Contact;

/// A registry contact with its precomputed normalized name.
#[derive(Debug, Clone)]
pub struct IndexedContact {
    pub contact: Contact,
    pub name: NormalizedName,
}

/// Read-only lookup view used by the matcher.
pub struct CandidateIndex {
    contacts: Vec<IndexedContact>,
    /// Lowercased email -> indices into `contacts`. A key can map to
    /// several contacts; the matcher reports that as ambiguity.
    by_email: HashMap<String, Vec<usize>>,
}

impl CandidateIndex {
    pub fn new(contacts: Vec<Contact>) -> Self {
        let contacts: Vec<IndexedContact> = contacts
            .into_iter()
            .map(|contact| {
                let name = NormalizedName::new(&contact.first_name, &contact.last_name);
                IndexedContact { contact, name }
            })
            .collect();

        let mut by_email: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, entry) in contacts.iter().enumerate() {
            if let Some(email) = entry.contact.email.as_deref() {
                let key = email.trim().to_lowercase();
                if !key.is_empty() {
                    by_email.entry(key).or_default().push(i);
                }
            }
        }

        Self { contacts, by_email }
    }

    /// Case-insensitive exact email lookup. Empty slice when nothing matches.
    pub fn lookup_email(&self, email: &str) -> &[usize] {
        self.by_email
            .get(&email.trim().to_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn contacts(&self) -> &[IndexedContact] {
        &self.contacts
    }

    pub fn get(&self, idx: usize) -> &IndexedContact {
        &self.contacts[idx]
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(id: &str, first: &str, last: &str, email: Option<&str>) -> Contact {
        Contact {
            id: id.into(),
            first_name: first.into(),
            last_name: last.into(),
            email: email.map(String::from),
            linkedin_url: None,
        }
    }

    #[test]
    fn precomputes_normalized_names() {
        let index = CandidateIndex::new(vec![contact("c1", "  Jenny ", "LEE", None)]);
        assert_eq!(index.get(0).name.full, "jenny lee");
    }

    #[test]
    fn email_lookup_is_case_insensitive() {
        let index = CandidateIndex::new(vec![contact("c1", "Bob", "Smith", Some("Bob@Example.com"))]);
        assert_eq!(index.lookup_email("bob@example.com"), &[0]);
        assert_eq!(index.lookup_email("  BOB@EXAMPLE.COM  "), &[0]);
        assert!(index.lookup_email("other@example.com").is_empty());
    }

    #[test]
    fn shared_email_maps_to_all_contacts() {
        let index = CandidateIndex::new(vec![
            contact("c1", "Bob", "Smith", Some("team@example.com")),
            contact("c2", "Ann", "Jones", Some("TEAM@example.com")),
        ]);
        assert_eq!(index.lookup_email("team@example.com"), &[0, 1]);
    }

    #[test]
    fn blank_email_is_not_indexed() {
        let index = CandidateIndex::new(vec![contact("c1", "Bob", "Smith", Some("   "))]);
        assert!(index.lookup_email("").is_empty());
        assert!(index.lookup_email("   ").is_empty());
    }
}
