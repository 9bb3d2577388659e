use std::cmp::Ordering;

use common::DocumentId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A schema-less document: a JSON object.
pub type Document = serde_json::Map<String, Value>;

/// Field under which every stored document exposes its identifier.
pub const ID_FIELD: &str = "_id";

/// Outcome of an `insert_one`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertOneResult {
    pub inserted_id: DocumentId,
}

/// Outcome of an `update_one`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateResult {
    /// Number of documents the filter matched (0 or 1).
    pub matched_count: u64,
    /// Number of documents whose contents actually changed (0 or 1).
    pub modified_count: u64,
}

/// Outcome of a `delete_one`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResult {
    pub deleted_count: u64,
}

/// Reads the identifier of a stored document, if it carries a valid one.
pub fn document_id(doc: &Document) -> Option<DocumentId> {
    doc.get(ID_FIELD)
        .and_then(Value::as_str)
        .and_then(|s| DocumentId::parse_str(s).ok())
}

/// Applies a field-set merge: every key of `fields` except `_id` overwrites
/// the stored value. Returns whether anything changed.
pub fn merge_fields(target: &mut Document, fields: &Document) -> bool {
    let mut modified = false;
    for (key, value) in fields {
        if key == ID_FIELD {
            continue;
        }
        if target.get(key) != Some(value) {
            target.insert(key.clone(), value.clone());
            modified = true;
        }
    }
    modified
}

/// Orders JSON values the way the document database does for sorting:
/// missing/null first, then numbers, strings, objects, arrays, booleans.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(v: Option<&Value>) -> u8 {
        match v {
            None | Some(Value::Null) => 0,
            Some(Value::Number(_)) => 1,
            Some(Value::String(_)) => 2,
            Some(Value::Object(_)) => 3,
            Some(Value::Array(_)) => 4,
            Some(Value::Bool(_)) => 5,
        }
    }

    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn merge_overwrites_only_supplied_fields() {
        let mut stored = doc(json!({"name": "Rex", "price": 10, "category": "dog"}));
        let changed = merge_fields(&mut stored, &doc(json!({"price": 12})));

        assert!(changed);
        assert_eq!(stored, doc(json!({"name": "Rex", "price": 12, "category": "dog"})));
    }

    #[test]
    fn merge_ignores_id_field() {
        let id = DocumentId::new();
        let mut stored = doc(json!({"_id": id.to_hex(), "name": "Rex"}));
        let changed = merge_fields(&mut stored, &doc(json!({"_id": "ffffffffffffffffffffffff"})));

        assert!(!changed);
        assert_eq!(document_id(&stored), Some(id));
    }

    #[test]
    fn merge_with_identical_values_reports_unmodified() {
        let mut stored = doc(json!({"role": "admin"}));
        assert!(!merge_fields(&mut stored, &doc(json!({"role": "admin"}))));
    }

    #[test]
    fn compare_puts_missing_before_values() {
        let v = json!("2026-01-01T00:00:00.000Z");
        assert_eq!(compare_values(None, Some(&v)), Ordering::Less);
        assert_eq!(compare_values(Some(&Value::Null), None), Ordering::Equal);
    }

    #[test]
    fn compare_numbers_numerically() {
        assert_eq!(
            compare_values(Some(&json!(9)), Some(&json!(10.5))),
            Ordering::Less
        );
    }
}
