//! Document filters understood by every store backend.

use serde_json::Value;

/// Raw JSON document as held by a store backend.
pub type Document = serde_json::Map<String, Value>;

/// Selects documents by an integer-valued top-level field.
///
/// Field names are the stored JSON names (`"id"`, `"userId"`, `"postId"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Every document in the collection.
    All,
    /// Documents whose `field` equals the value.
    Eq(&'static str, i64),
    /// Documents whose `field` equals any of the values.
    In(&'static str, Vec<i64>),
}

impl Filter {
    /// Returns `true` if `doc` is selected by this filter.
    #[must_use]
    pub fn matches(&self, doc: &Document) -> bool {
        match self {
            Self::All => true,
            Self::Eq(field, expected) => int_field(doc, field) == Some(*expected),
            Self::In(field, values) => {
                int_field(doc, field).is_some_and(|value| values.contains(&value))
            }
        }
    }
}

fn int_field(doc: &Document, field: &str) -> Option<i64> {
    doc.get(field).and_then(Value::as_i64)
}
