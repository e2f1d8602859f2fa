//! Test scenario configuration types
//!
//! Defines the data structures for deserializing YAML test scenarios.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::Deserialize;

use crate::common::{Error, Result};

use super::snapshot::ItemSnapshot;

/// A complete test scenario, loaded from YAML or built in
#[derive(Deserialize, Debug, Clone)]
pub struct TestScenario {
    /// Name of the test scenario
    pub name: String,
    /// Optional description of what the test verifies
    pub description: Option<String>,
    /// Element id of the list under test
    pub list: String,
    /// The sequence of test steps to execute
    pub steps: Vec<TestStep>,
}

impl TestScenario {
    /// Load a scenario from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        Self::parse(&content)
    }

    /// Parse a scenario from YAML text
    pub fn parse(content: &str) -> Result<Self> {
        let scenario: TestScenario = serde_yaml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse test scenario: {}", e)))?;
        if scenario.list.trim().is_empty() {
            return Err(Error::Config(format!(
                "Scenario '{}' does not name a list",
                scenario.name
            )));
        }
        for (i, step) in scenario.steps.iter().enumerate() {
            if let TestStep::Trigger {
                button,
                until: None,
                timeout: Some(_),
            } = step
            {
                return Err(Error::Config(format!(
                    "Step {} clicks '{}' with a timeout but no 'until' condition to wait for",
                    i + 1,
                    button
                )));
            }
        }
        Ok(scenario)
    }
}

/// A single test step in the execution flow
///
/// Expectations apply to the most recent snapshot of the scenario's list,
/// which is read on first use and replaced by `read`, and by `trigger` or
/// `await` when they wait on a condition. A `trigger` without a condition
/// and a `scroll` discard it, so the next expectation reads afresh.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum TestStep {
    /// Re-read the list's items
    Read,
    /// The snapshot has exactly this many slots
    ExpectLength { length: usize },
    /// Slots in range are loaded and labelled `prefix + (index + 1)`
    ExpectPresent {
        from: isize,
        to: Option<isize>,
        prefix: String,
    },
    /// Slots in range hold no data
    ExpectAbsent { from: isize, to: Option<isize> },
    /// Slots in range match field templates (`{n}` is the 1-based slot number)
    ExpectFields {
        from: isize,
        to: Option<isize>,
        fields: BTreeMap<String, String>,
    },
    /// A fresh read equals the current snapshot
    ExpectUnchanged,
    /// The visible text of an element
    ExpectText { element: String, text: String },
    /// Click a control, optionally waiting for the list to reach a state
    Trigger {
        button: String,
        until: Option<Condition>,
        /// Timeout in seconds (default from config)
        timeout: Option<u64>,
    },
    /// Scroll the list's viewport vertically
    Scroll { by: i64 },
    /// Wait for the list to reach a state without interacting
    Await {
        until: Condition,
        /// Timeout in seconds (default from config)
        timeout: Option<u64>,
    },
}

impl fmt::Display for TestStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestStep::Read => write!(f, "read items"),
            TestStep::ExpectLength { length } => write!(f, "expect {} items", length),
            TestStep::ExpectPresent { from, to, prefix } => {
                write!(f, "expect [{}) present as '{}N'", SlotRange::new(*from, *to), prefix)
            }
            TestStep::ExpectAbsent { from, to } => {
                write!(f, "expect [{}) absent", SlotRange::new(*from, *to))
            }
            TestStep::ExpectFields { from, to, fields } => {
                let names: Vec<&str> = fields.keys().map(String::as_str).collect();
                write!(
                    f,
                    "expect [{}) fields {}",
                    SlotRange::new(*from, *to),
                    names.join(", ")
                )
            }
            TestStep::ExpectUnchanged => write!(f, "expect unchanged on re-read"),
            TestStep::ExpectText { element, text } => {
                write!(f, "expect '{}' text '{}'", element, text)
            }
            TestStep::Trigger { button, until, .. } => match until {
                Some(cond) => write!(f, "click '{}' until {}", button, cond),
                None => write!(f, "click '{}'", button),
            },
            TestStep::Scroll { by } => write!(f, "scroll by {}px", by),
            TestStep::Await { until, .. } => write!(f, "await {}", until),
        }
    }
}

/// Half-open slot range whose bounds may count from the end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotRange {
    pub from: isize,
    /// None means the snapshot length
    pub to: Option<isize>,
}

impl SlotRange {
    pub fn new(from: isize, to: Option<isize>) -> Self {
        Self { from, to }
    }

    /// Concrete `[start, end)` for a snapshot
    ///
    /// Fails when a negative bound reaches past the first slot or the
    /// bounds cross, since either would leave slots unchecked.
    pub fn resolve(&self, snapshot: &ItemSnapshot) -> Result<(usize, usize)> {
        let bound = |i: isize| {
            resolve_slot(snapshot, i).ok_or_else(|| {
                Error::TestAssertion(format!(
                    "Range [{}) reaches before the first of {} items",
                    self,
                    snapshot.len()
                ))
            })
        };
        let start = bound(self.from)?;
        let end = match self.to {
            Some(to) => bound(to)?,
            None => snapshot.len(),
        };
        if start > end {
            return Err(Error::TestAssertion(format!(
                "Range [{}) is inverted on {} items",
                self,
                snapshot.len()
            )));
        }
        Ok((start, end))
    }
}

impl fmt::Display for SlotRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bound = |i: isize| {
            if i < 0 {
                format!("len{}", i)
            } else {
                i.to_string()
            }
        };
        match self.to {
            Some(to) => write!(f, "{}, {}", bound(self.from), bound(to)),
            None => write!(f, "{}, len", bound(self.from)),
        }
    }
}

/// A state of the list to wait for
///
/// Written in YAML as a single-key map: `{ length: 2 }`, `{ absent: 0 }`,
/// `{ present: -1 }`.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(try_from = "ConditionSpec")]
pub enum Condition {
    /// The snapshot has exactly this many slots
    Length(usize),
    /// The slot exists and holds no data
    Absent(isize),
    /// The slot exists and holds a record
    Present(isize),
}

impl Condition {
    pub fn holds(&self, snapshot: &ItemSnapshot) -> bool {
        match *self {
            Condition::Length(n) => snapshot.len() == n,
            Condition::Absent(i) => resolve_slot(snapshot, i).is_some_and(|i| snapshot.is_absent(i)),
            Condition::Present(i) => {
                resolve_slot(snapshot, i).is_some_and(|i| snapshot.is_present(i))
            }
        }
    }
}

/// A negative index past the start names no slot at all
fn resolve_slot(snapshot: &ItemSnapshot, index: isize) -> Option<usize> {
    if index < 0 && index.unsigned_abs() > snapshot.len() {
        None
    } else {
        Some(snapshot.resolve(index))
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Length(n) => write!(f, "length == {}", n),
            Condition::Absent(i) => write!(f, "slot {} absent", i),
            Condition::Present(i) => write!(f, "slot {} present", i),
        }
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ConditionSpec {
    length: Option<usize>,
    absent: Option<isize>,
    present: Option<isize>,
}

impl TryFrom<ConditionSpec> for Condition {
    type Error = String;

    fn try_from(spec: ConditionSpec) -> std::result::Result<Self, Self::Error> {
        match (spec.length, spec.absent, spec.present) {
            (Some(n), None, None) => Ok(Condition::Length(n)),
            (None, Some(i), None) => Ok(Condition::Absent(i)),
            (None, None, Some(i)) => Ok(Condition::Present(i)),
            _ => Err("condition needs exactly one of 'length', 'absent', 'present'".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const LAZY: &str = r#"
name: lazy
description: Lazy-loaded list shifts its window on scroll
list: lazy-loaded
steps:
  - action: expect_length
    length: 100
  - action: expect_text
    element: lazy-loaded-message
    text: Sent 32 items
  - action: expect_present
    from: 0
    to: 32
    prefix: "Item "
  - action: expect_absent
    from: 32
  - action: scroll
    by: 10000
  - action: await
    until: { absent: 0 }
    timeout: 5
  - action: expect_present
    from: -32
    prefix: "Item "
  - action: trigger
    button: lazy-loaded-reset
"#;

    #[test]
    fn test_parse_yaml_scenario() {
        let scenario = TestScenario::parse(LAZY).unwrap();
        assert_eq!(scenario.name, "lazy");
        assert_eq!(scenario.list, "lazy-loaded");
        assert_eq!(scenario.steps.len(), 8);

        assert_eq!(scenario.steps[0], TestStep::ExpectLength { length: 100 });
        assert_eq!(
            scenario.steps[3],
            TestStep::ExpectAbsent { from: 32, to: None }
        );
        assert_eq!(
            scenario.steps[5],
            TestStep::Await {
                until: Condition::Absent(0),
                timeout: Some(5)
            }
        );
        assert_eq!(
            scenario.steps[7],
            TestStep::Trigger {
                button: "lazy-loaded-reset".to_string(),
                until: None,
                timeout: None
            }
        );
    }

    #[test]
    fn test_condition_needs_exactly_one_key() {
        let yaml = r#"
name: bad
list: x
steps:
  - action: await
    until: { length: 2, absent: 0 }
"#;
        assert!(TestScenario::parse(yaml).is_err());

        let yaml = r#"
name: bad
list: x
steps:
  - action: await
    until: { size: 2 }
"#;
        assert!(TestScenario::parse(yaml).is_err());
    }

    #[test]
    fn test_missing_list_is_rejected() {
        let yaml = "name: nolist\nlist: \"\"\nsteps: []\n";
        let err = TestScenario::parse(yaml).unwrap_err();
        assert!(err.to_string().contains("does not name a list"));
    }

    #[test]
    fn test_unknown_action_is_rejected() {
        let yaml = "name: x\nlist: y\nsteps:\n  - action: teleport\n";
        assert!(TestScenario::parse(yaml).is_err());
    }

    #[test]
    fn test_conditions() {
        let snap = ItemSnapshot::from_value(&json!([null, { "label": "Item 2" }]));
        assert!(Condition::Length(2).holds(&snap));
        assert!(!Condition::Length(3).holds(&snap));
        assert!(Condition::Absent(0).holds(&snap));
        assert!(Condition::Present(-1).holds(&snap));
        assert!(!Condition::Present(0).holds(&snap));
        // Out of range never holds
        assert!(!Condition::Absent(5).holds(&snap));
        assert!(!Condition::Absent(-3).holds(&snap));
        assert!(!Condition::Absent(0).holds(&ItemSnapshot::default()));
    }

    #[test]
    fn test_slot_range_resolution() {
        let snap = ItemSnapshot::from_slots(vec![None; 100]);
        assert_eq!(SlotRange::new(0, Some(32)).resolve(&snap).unwrap(), (0, 32));
        assert_eq!(SlotRange::new(32, None).resolve(&snap).unwrap(), (32, 100));
        assert_eq!(SlotRange::new(0, Some(-32)).resolve(&snap).unwrap(), (0, 68));
        assert_eq!(SlotRange::new(-32, None).resolve(&snap).unwrap(), (68, 100));
        assert_eq!(SlotRange::new(0, Some(0)).resolve(&snap).unwrap(), (0, 0));
    }

    #[test]
    fn test_slot_range_rejects_unchecked_ranges() {
        let snap = ItemSnapshot::from_slots(vec![None; 100]);

        let err = SlotRange::new(90, Some(10)).resolve(&snap).unwrap_err();
        assert!(err.is_assertion());
        assert_eq!(
            err.to_string(),
            "Test assertion failed: Range [90, 10) is inverted on 100 items"
        );

        let err = SlotRange::new(-500, None).resolve(&snap).unwrap_err();
        assert!(err.to_string().contains("reaches before the first of 100 items"));

        assert!(SlotRange::new(0, Some(-101)).resolve(&snap).is_err());
        assert!(SlotRange::new(-32, Some(10)).resolve(&snap).is_err());
    }

    #[test]
    fn test_trigger_timeout_needs_condition() {
        let yaml = r#"
name: stray-timeout
list: list-with-strings
steps:
  - action: trigger
    button: list-with-strings-2-items
    timeout: 5
"#;
        let err = TestScenario::parse(yaml).unwrap_err();
        assert!(
            err.to_string().contains("Step 1 clicks 'list-with-strings-2-items'"),
            "{}",
            err
        );

        let yaml = r#"
name: waits
list: list-with-strings
steps:
  - action: trigger
    button: list-with-strings-2-items
    until: { length: 2 }
    timeout: 5
"#;
        assert!(TestScenario::parse(yaml).is_ok());
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let err = TestScenario::load(Path::new("/nonexistent/scenario.yaml")).unwrap_err();
        assert!(matches!(err, Error::FileRead { .. }), "{}", err);
        assert!(err.to_string().contains("/nonexistent/scenario.yaml"));
    }

    #[test]
    fn test_step_display() {
        let step = TestStep::ExpectPresent {
            from: -32,
            to: None,
            prefix: "Item ".to_string(),
        };
        assert_eq!(step.to_string(), "expect [len-32, len) present as 'Item N'");

        let step = TestStep::Trigger {
            button: "list-with-strings-2-items".to_string(),
            until: Some(Condition::Length(2)),
            timeout: None,
        };
        assert_eq!(
            step.to_string(),
            "click 'list-with-strings-2-items' until length == 2"
        );
    }
}
