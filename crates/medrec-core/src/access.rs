//! # Access-Control Normalization
//!
//! Callers supply the access-control list in one of three forms: not at
//! all, as a JSON-encoded array of strings, or as a comma-separated string.
//! [`AccessControlList::normalize`] folds all three into the ordered list
//! the ledger stores.
//!
//! ## Invariant
//!
//! The normalized list is never empty: absent input defaults to the owning
//! patient alone. Duplicate entries are preserved verbatim — deduplication
//! is a policy decision this layer does not take.

use serde::{Deserialize, Serialize};

/// Ordered list of identities permitted to read a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessControlList(Vec<String>);

impl AccessControlList {
    /// Normalize raw caller input into an access-control list.
    ///
    /// - `None` or all-whitespace input → `[patient_id]`.
    /// - A string parsing as a JSON array of strings → that array, verbatim.
    /// - Anything else → comma-split with trimming and empty-entry removal;
    ///   if nothing survives the split, falls back to `[patient_id]`.
    pub fn normalize(raw: Option<&str>, patient_id: &str) -> Self {
        let default = || Self(vec![patient_id.to_string()]);

        let raw = match raw {
            Some(s) if !s.trim().is_empty() => s.trim(),
            _ => return default(),
        };

        if let Ok(parsed) = serde_json::from_str::<Vec<String>>(raw) {
            if parsed.is_empty() {
                return default();
            }
            return Self(parsed);
        }

        let split: Vec<String> = raw
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        if split.is_empty() {
            default()
        } else {
            Self(split)
        }
    }

    /// Construct from an already-normalized list. Used when reading records
    /// back from the ledger, whose stored lists are taken as-is.
    pub fn from_entries(entries: Vec<String>) -> Self {
        Self(entries)
    }

    /// The identities in this list, in order.
    pub fn entries(&self) -> &[String] {
        &self.0
    }

    /// Consume into the inner vector (wire marshalling).
    pub fn into_entries(self) -> Vec<String> {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(raw: Option<&str>) -> Vec<String> {
        AccessControlList::normalize(raw, "p1").into_entries()
    }

    #[test]
    fn absent_defaults_to_patient() {
        assert_eq!(entries(None), vec!["p1"]);
    }

    #[test]
    fn blank_defaults_to_patient() {
        assert_eq!(entries(Some("   ")), vec!["p1"]);
    }

    #[test]
    fn json_array_parsed_verbatim() {
        assert_eq!(
            entries(Some(r#"["p1","dr-2","dr-2"]"#)),
            vec!["p1", "dr-2", "dr-2"],
            "duplicates must be preserved"
        );
    }

    #[test]
    fn empty_json_array_falls_back_to_patient() {
        assert_eq!(entries(Some("[]")), vec!["p1"]);
    }

    #[test]
    fn comma_list_trimmed() {
        assert_eq!(entries(Some("a, b ,c")), vec!["a", "b", "c"]);
    }

    #[test]
    fn comma_list_drops_empty_segments() {
        assert_eq!(entries(Some("a,,b,")), vec!["a", "b"]);
    }

    #[test]
    fn malformed_json_falls_back_to_comma_split() {
        // Unterminated array is not valid JSON; comma-splitting still
        // yields usable entries.
        assert_eq!(entries(Some(r#"["a","b"#)), vec![r#"["a""#, r#""b"#]);
    }

    #[test]
    fn comma_only_falls_back_to_patient() {
        assert_eq!(entries(Some(",,,")), vec!["p1"]);
    }

    #[test]
    fn never_empty_after_normalization() {
        for raw in [None, Some(""), Some("[]"), Some(",")] {
            assert!(!AccessControlList::normalize(raw, "p1").is_empty());
        }
    }
}
