//! Assertions over item snapshots
//!
//! Each check stops at the first offending slot and names its index.

use std::collections::BTreeMap;

use crate::common::{Error, Result};

use super::snapshot::ItemSnapshot;

/// Placeholder replaced by the 1-based slot number in field templates
pub const SLOT_NUMBER: &str = "{n}";

/// The snapshot has exactly `expected` slots
pub fn assert_length(snapshot: &ItemSnapshot, expected: usize) -> Result<()> {
    if snapshot.len() != expected {
        return Err(Error::TestAssertion(format!(
            "Expected {} items, got {}",
            expected,
            snapshot.len()
        )));
    }
    Ok(())
}

/// Every slot in `[start, end)` is loaded and labelled `prefix + (index + 1)`
pub fn assert_present_range(
    snapshot: &ItemSnapshot,
    start: usize,
    end: usize,
    label_prefix: &str,
) -> Result<()> {
    check_range(start, end)?;
    for i in start..end {
        let record = match snapshot.slot(i) {
            Some(Some(record)) => record,
            Some(None) => {
                return Err(Error::TestAssertion(format!(
                    "Object at index {} is null, when it shouldn't be",
                    i
                )))
            }
            None => return Err(out_of_range(snapshot, i)),
        };

        let expected = format!("{}{}", label_prefix, i + 1);
        let actual = record.get("label").map(String::as_str);
        if actual != Some(expected.as_str()) {
            return Err(Error::TestAssertion(format!(
                "The label of the object at index {} is wrong: expected '{}', got {}",
                i,
                expected,
                quoted(actual)
            )));
        }
    }
    Ok(())
}

/// Every slot in `[start, end)` exists and holds no data
pub fn assert_absent_range(snapshot: &ItemSnapshot, start: usize, end: usize) -> Result<()> {
    check_range(start, end)?;
    for i in start..end {
        match snapshot.slot(i) {
            Some(None) => {}
            Some(Some(_)) => {
                return Err(Error::TestAssertion(format!(
                    "Object at index {} is not null, when it should be",
                    i
                )))
            }
            None => return Err(out_of_range(snapshot, i)),
        }
    }
    Ok(())
}

/// Every slot in `[start, end)` is loaded and matches the field templates
///
/// `{n}` in a template expands to the 1-based slot number, so
/// `name: "Person {n}"` expects `Person 1`, `Person 2`, ...
pub fn assert_fields(
    snapshot: &ItemSnapshot,
    start: usize,
    end: usize,
    fields: &BTreeMap<String, String>,
) -> Result<()> {
    check_range(start, end)?;
    for i in start..end {
        let record = match snapshot.slot(i) {
            Some(Some(record)) => record,
            Some(None) => {
                return Err(Error::TestAssertion(format!(
                    "Object at index {} is null, when it shouldn't be",
                    i
                )))
            }
            None => return Err(out_of_range(snapshot, i)),
        };

        for (name, template) in fields {
            let expected = expand_template(template, i + 1);
            let actual = record.get(name).map(String::as_str);
            if actual != Some(expected.as_str()) {
                return Err(Error::TestAssertion(format!(
                    "Field '{}' of the object at index {} is wrong: expected '{}', got {}",
                    name,
                    i,
                    expected,
                    quoted(actual)
                )));
            }
        }
    }
    Ok(())
}

/// Two reads with nothing in between returned the same slots
pub fn assert_unchanged(before: &ItemSnapshot, after: &ItemSnapshot) -> Result<()> {
    if before.len() != after.len() {
        return Err(Error::TestAssertion(format!(
            "Snapshot changed without interaction: {} items, then {}",
            before.len(),
            after.len()
        )));
    }
    if let Some(i) = (0..before.len()).find(|&i| before.slot(i) != after.slot(i)) {
        return Err(Error::TestAssertion(format!(
            "Snapshot changed without interaction at index {}",
            i
        )));
    }
    Ok(())
}

/// Expand `{n}` placeholders with a slot number
pub fn expand_template(template: &str, number: usize) -> String {
    template.replace(SLOT_NUMBER, &number.to_string())
}

/// An inverted range would check nothing and pass
fn check_range(start: usize, end: usize) -> Result<()> {
    if start > end {
        return Err(Error::TestAssertion(format!(
            "Range [{}, {}) is inverted",
            start, end
        )));
    }
    Ok(())
}

fn out_of_range(snapshot: &ItemSnapshot, index: usize) -> Error {
    Error::TestAssertion(format!(
        "Object at index {} does not exist (only {} items)",
        index,
        snapshot.len()
    ))
}

fn quoted(value: Option<&str>) -> String {
    match value {
        Some(v) => format!("'{}'", v),
        None => "no value".to_string(),
    }
}
