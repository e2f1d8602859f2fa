//! WebDriver payload helpers
//!
//! Session capabilities and element-reference conversion between
//! `fantoccini` elements and the [`ElementRef`]s the rest of the suite
//! passes around.

use fantoccini::elements::Element;
use serde_json::{json, Map, Value};

use crate::common::config::WebDriverConfig;
use crate::common::{Error, Result};

use super::ElementRef;

/// Key under which W3C drivers serialize element references
pub const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// Key used by pre-W3C (JSON wire protocol) drivers
const LEGACY_ELEMENT_KEY: &str = "ELEMENT";

/// Serialize an element reference as a script argument
pub fn element_to_value(element: &ElementRef) -> Value {
    json!({ ELEMENT_KEY: element.id() })
}

/// Extract an element id from a serialized element reference
pub fn element_from_value(value: &Value) -> Option<ElementRef> {
    let obj = value.as_object()?;
    obj.get(ELEMENT_KEY)
        .or_else(|| obj.get(LEGACY_ELEMENT_KEY))
        .and_then(|v| v.as_str())
        .map(ElementRef::new)
}

/// The WebDriver id of a located element
pub fn element_ref(element: &Element) -> Result<ElementRef> {
    let value = serde_json::to_value(element)
        .map_err(|e| Error::webdriver("find elements", &e.to_string()))?;
    element_from_value(&value)
        .ok_or_else(|| Error::webdriver("find elements", &format!("malformed element: {}", value)))
}

/// Session capabilities for the configured browser
///
/// Headless mode and extra arguments go into the vendor options block the
/// browser's driver reads.
pub fn capabilities(config: &WebDriverConfig) -> Map<String, Value> {
    let browser = config.browser.to_lowercase();
    let mut args = config.args.clone();

    let options_key = match browser.as_str() {
        "firefox" => {
            if config.headless {
                args.push("-headless".to_string());
            }
            "moz:firefoxOptions"
        }
        "edge" | "msedge" | "microsoftedge" => {
            if config.headless {
                args.push("--headless=new".to_string());
            }
            "ms:edgeOptions"
        }
        _ => {
            if config.headless {
                args.push("--headless=new".to_string());
            }
            "goog:chromeOptions"
        }
    };

    let mut caps = Map::new();
    caps.insert("browserName".to_string(), Value::String(browser));
    caps.insert(options_key.to_string(), json!({ "args": args }));
    caps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_reference_keys() {
        let w3c = json!({ ELEMENT_KEY: "abc" });
        assert_eq!(element_from_value(&w3c), Some(ElementRef::new("abc")));

        let legacy = json!({ "ELEMENT": "def" });
        assert_eq!(element_from_value(&legacy), Some(ElementRef::new("def")));

        assert_eq!(element_from_value(&json!("abc")), None);
    }

    #[test]
    fn test_script_argument_uses_w3c_key() {
        let arg = element_to_value(&ElementRef::new("e1"));
        assert_eq!(arg, json!({ ELEMENT_KEY: "e1" }));
    }

    #[test]
    fn test_capabilities_headless_chrome() {
        let config = WebDriverConfig {
            headless: true,
            args: vec!["--no-sandbox".to_string()],
            ..Default::default()
        };
        let caps = capabilities(&config);
        assert_eq!(caps["browserName"], "chrome");
        assert_eq!(
            caps["goog:chromeOptions"]["args"],
            json!(["--no-sandbox", "--headless=new"])
        );
    }

    #[test]
    fn test_capabilities_firefox() {
        let config = WebDriverConfig {
            browser: "Firefox".to_string(),
            headless: true,
            ..Default::default()
        };
        let caps = capabilities(&config);
        assert_eq!(caps["browserName"], "firefox");
        assert_eq!(caps["moz:firefoxOptions"]["args"], json!(["-headless"]));
        assert!(!caps.contains_key("goog:chromeOptions"));
    }
}
