//! Built-in scenarios for the iron-list demo page
//!
//! Each list on the page has its own scenario. Lists backed by a plain
//! dataset go through the same swap sequence: three items, two from the
//! alternate dataset, three again, then none.

use std::collections::BTreeMap;

use super::config::{Condition, TestScenario, TestStep};

/// Every built-in scenario, in page order
pub fn builtin() -> Vec<TestScenario> {
    vec![
        dataset_swap(
            "list-with-strings",
            "List backed by a list of strings",
            "Item ",
            "Another item ",
        ),
        dataset_swap(
            "dataprovider-with-strings",
            "List backed by a data provider of strings",
            "Item ",
            "Another item ",
        ),
        dataset_swap(
            "dataprovider-with-people",
            "Template from a value provider over people",
            "Person ",
            "",
        ),
        template_renderer_with_people(),
        lazy_loaded(),
    ]
}

/// Look up a built-in scenario by name
pub fn find(name: &str) -> Option<TestScenario> {
    builtin().into_iter().find(|s| s.name == name)
}

fn present(from: isize, to: Option<isize>, prefix: &str) -> TestStep {
    TestStep::ExpectPresent {
        from,
        to,
        prefix: prefix.to_string(),
    }
}

fn click_until_length(button: String, length: usize) -> TestStep {
    TestStep::Trigger {
        button,
        until: Some(Condition::Length(length)),
        timeout: None,
    }
}

fn fields(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Initial load, shrink to 2, grow back to 3, clear to 0
///
/// Controls are the list id suffixed with `-2-items`, `-3-items` and
/// `-0-items`.
pub fn dataset_swap(
    list: &str,
    description: &str,
    first_prefix: &str,
    second_prefix: &str,
) -> TestScenario {
    TestScenario {
        name: list.to_string(),
        description: Some(description.to_string()),
        list: list.to_string(),
        steps: vec![
            TestStep::Read,
            TestStep::ExpectLength { length: 3 },
            present(0, Some(3), first_prefix),
            TestStep::ExpectUnchanged,
            click_until_length(format!("{}-2-items", list), 2),
            present(0, Some(2), second_prefix),
            click_until_length(format!("{}-3-items", list), 3),
            present(0, Some(3), first_prefix),
            click_until_length(format!("{}-0-items", list), 0),
        ],
    }
}

/// Records rendered through a template, then the first one updated in place
///
/// The update is applied synchronously by the page, so the click is not
/// followed by a wait.
pub fn template_renderer_with_people() -> TestScenario {
    let list = "template-renderer-with-people";
    TestScenario {
        name: list.to_string(),
        description: Some("Template renderer over people with an in-place update".to_string()),
        list: list.to_string(),
        steps: vec![
            TestStep::Read,
            TestStep::ExpectLength { length: 3 },
            TestStep::ExpectFields {
                from: 0,
                to: Some(3),
                fields: fields(&[
                    ("key", "{n}"),
                    ("name", "Person {n}"),
                    ("age", "{n}"),
                    ("user", "person_{n}"),
                ]),
            },
            TestStep::Trigger {
                button: format!("{}-update-item", list),
                until: None,
                timeout: None,
            },
            TestStep::Read,
            TestStep::ExpectFields {
                from: 0,
                to: Some(1),
                fields: fields(&[("name", "Person 1 Updated"), ("user", "person_1_updated")]),
            },
            TestStep::ExpectFields {
                from: 1,
                to: Some(3),
                fields: fields(&[("name", "Person {n}"), ("user", "person_{n}")]),
            },
        ],
    }
}

/// 100 preallocated slots of which the first 32 are loaded; scrolling to
/// the bottom moves the loaded window to the last 32
pub fn lazy_loaded() -> TestScenario {
    let list = "lazy-loaded";
    TestScenario {
        name: list.to_string(),
        description: Some("Lazy loading moves the loaded window on scroll".to_string()),
        list: list.to_string(),
        steps: vec![
            TestStep::Read,
            TestStep::ExpectLength { length: 100 },
            TestStep::ExpectText {
                element: format!("{}-message", list),
                text: "Sent 32 items".to_string(),
            },
            present(0, Some(32), "Item "),
            TestStep::ExpectAbsent { from: 32, to: None },
            TestStep::Scroll { by: 10000 },
            TestStep::Await {
                until: Condition::Absent(0),
                timeout: None,
            },
            TestStep::Read,
            TestStep::ExpectLength { length: 100 },
            TestStep::ExpectAbsent {
                from: 0,
                to: Some(-32),
            },
            present(-32, None, "Item "),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_names_are_list_ids() {
        let names: Vec<String> = builtin().into_iter().map(|s| s.name).collect();
        assert_eq!(
            names,
            vec![
                "list-with-strings",
                "dataprovider-with-strings",
                "dataprovider-with-people",
                "template-renderer-with-people",
                "lazy-loaded",
            ]
        );
        for scenario in builtin() {
            assert_eq!(scenario.name, scenario.list);
        }
    }

    #[test]
    fn test_dataset_swap_controls() {
        let scenario = find("list-with-strings").unwrap();
        let buttons: Vec<&str> = scenario
            .steps
            .iter()
            .filter_map(|s| match s {
                TestStep::Trigger { button, .. } => Some(button.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(
            buttons,
            vec![
                "list-with-strings-2-items",
                "list-with-strings-3-items",
                "list-with-strings-0-items",
            ]
        );
    }

    #[test]
    fn test_people_second_set_has_bare_numbers() {
        let scenario = find("dataprovider-with-people").unwrap();
        assert!(scenario.steps.contains(&present(0, Some(2), "")));
    }

    #[test]
    fn test_lazy_total_is_checked_after_scroll() {
        let steps = lazy_loaded().steps;
        let scroll = steps
            .iter()
            .position(|s| matches!(s, TestStep::Scroll { .. }))
            .unwrap();
        let lengths: Vec<usize> = steps[scroll..]
            .iter()
            .filter_map(|s| match s {
                TestStep::ExpectLength { length } => Some(*length),
                _ => None,
            })
            .collect();
        assert_eq!(lengths, vec![100]);
    }

    #[test]
    fn test_unknown_scenario() {
        assert!(find("no-such-list").is_none());
    }
}
