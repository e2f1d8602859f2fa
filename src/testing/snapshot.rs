//! Item snapshots read from a live list
//!
//! The page hands back `element.items` as loosely-typed JSON: an array of
//! objects, with `null` for slots the virtualized list has not loaded yet.
//! [`ItemSnapshot`] pins that down to an ordered list of optional records
//! whose fields are all strings.

use std::collections::BTreeMap;

use serde_json::Value;

/// Field name to stringified value
pub type Record = BTreeMap<String, String>;

/// Point-in-time view of a list's item slots
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemSnapshot {
    slots: Vec<Option<Record>>,
}

impl ItemSnapshot {
    /// Normalize a script result into a snapshot
    ///
    /// Anything other than an array yields an empty snapshot: an undefined
    /// `items` property and a list that has not rendered yet look the same
    /// from here, and both are valid transient states.
    pub fn from_value(value: &Value) -> Self {
        let Some(items) = value.as_array() else {
            tracing::debug!("items is not a collection ({}), using empty snapshot", kind(value));
            return Self::default();
        };

        let slots = items
            .iter()
            .map(|item| match item {
                Value::Null => None,
                Value::Object(map) => Some(
                    map.iter()
                        .map(|(k, v)| (k.clone(), stringify(v)))
                        .collect(),
                ),
                // Plain values become a single-field record so they still count as loaded
                other => Some(Record::from([("value".to_string(), stringify(other))])),
            })
            .collect();

        Self { slots }
    }

    pub fn from_slots(slots: Vec<Option<Record>>) -> Self {
        Self { slots }
    }

    /// Number of materialized slots, loaded or not
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slot at `index`; `None` when out of range
    pub fn slot(&self, index: usize) -> Option<Option<&Record>> {
        self.slots.get(index).map(Option::as_ref)
    }

    /// The record at `index`, if the slot exists and is loaded
    pub fn record(&self, index: usize) -> Option<&Record> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Whether the slot exists and holds no data yet
    pub fn is_absent(&self, index: usize) -> bool {
        matches!(self.slots.get(index), Some(None))
    }

    /// Whether the slot exists and holds a record
    pub fn is_present(&self, index: usize) -> bool {
        matches!(self.slots.get(index), Some(Some(_)))
    }

    /// Field value of the record at `index`
    pub fn field(&self, index: usize, name: &str) -> Option<&str> {
        self.record(index)
            .and_then(|r| r.get(name))
            .map(String::as_str)
    }

    /// Number of loaded slots
    pub fn present_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Resolve a possibly negative index against the snapshot length
    ///
    /// Negative values count back from the end, so `-32` is `len - 32`.
    /// Results are clamped at zero.
    pub fn resolve(&self, index: isize) -> usize {
        if index >= 0 {
            index as usize
        } else {
            self.len().saturating_sub(index.unsigned_abs())
        }
    }
}

/// Render a JSON value the way a JVM-side `String.valueOf` would see it
/// after a browser driver converted it
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(u) = n.as_u64() {
                u.to_string()
            } else {
                match n.as_f64() {
                    // Drivers hand integral doubles back as longs
                    Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                        (f as i64).to_string()
                    }
                    Some(f) => f.to_string(),
                    None => n.to_string(),
                }
            }
        }
        other => other.to_string(),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_slots_and_records() {
        let snap = ItemSnapshot::from_value(&json!([
            { "label": "Item 1" },
            null,
            { "label": "Item 3" }
        ]));

        assert_eq!(snap.len(), 3);
        assert!(snap.is_present(0));
        assert!(snap.is_absent(1));
        assert_eq!(snap.field(2, "label"), Some("Item 3"));
        assert_eq!(snap.present_count(), 2);
    }

    #[test]
    fn test_fields_are_stringified() {
        let snap = ItemSnapshot::from_value(&json!([
            { "key": 1, "age": 2.0, "ratio": 0.5, "active": true, "nick": null }
        ]));

        let record = snap.record(0).unwrap();
        assert_eq!(record["key"], "1");
        assert_eq!(record["age"], "2");
        assert_eq!(record["ratio"], "0.5");
        assert_eq!(record["active"], "true");
        assert_eq!(record["nick"], "null");
    }

    #[test]
    fn test_non_collection_is_empty() {
        for value in [json!(null), json!("oops"), json!({ "label": "x" }), json!(42)] {
            let snap = ItemSnapshot::from_value(&value);
            assert!(snap.is_empty(), "{} should give an empty snapshot", value);
        }
    }

    #[test]
    fn test_plain_items_count_as_present() {
        let snap = ItemSnapshot::from_value(&json!(["a", 7]));
        assert_eq!(snap.field(0, "value"), Some("a"));
        assert_eq!(snap.field(1, "value"), Some("7"));
    }

    #[test]
    fn test_out_of_range_is_neither_present_nor_absent() {
        let snap = ItemSnapshot::from_value(&json!([null]));
        assert!(!snap.is_present(5));
        assert!(!snap.is_absent(5));
        assert_eq!(snap.slot(5), None);
        assert_eq!(snap.slot(0), Some(None));
    }

    #[test]
    fn test_resolve_negative_indices() {
        let snap = ItemSnapshot::from_slots(vec![None; 100]);
        assert_eq!(snap.resolve(0), 0);
        assert_eq!(snap.resolve(32), 32);
        assert_eq!(snap.resolve(-32), 68);
        assert_eq!(snap.resolve(-500), 0);
    }

    #[test]
    fn test_reading_twice_is_identical() {
        let raw = json!([{ "label": "Item 1" }, null]);
        assert_eq!(ItemSnapshot::from_value(&raw), ItemSnapshot::from_value(&raw));
    }
}
