//! Configuration file handling

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use super::paths::config_path;
use super::Result;

/// Main configuration structure
#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    /// WebDriver endpoint and browser settings
    #[serde(default)]
    pub webdriver: WebDriverConfig,

    /// Demo application under test
    #[serde(default)]
    pub app: AppConfig,

    /// Timeout settings
    #[serde(default)]
    pub timeouts: Timeouts,
}

/// WebDriver endpoint and browser capabilities
#[derive(Debug, Deserialize, Clone)]
pub struct WebDriverConfig {
    /// Base URL of the WebDriver server (chromedriver, geckodriver, selenium)
    #[serde(default = "default_webdriver_url")]
    pub url: String,

    /// Browser name sent in the session capabilities
    #[serde(default = "default_browser")]
    pub browser: String,

    /// Run the browser without a visible window
    #[serde(default)]
    pub headless: bool,

    /// Extra command-line arguments for the browser
    #[serde(default)]
    pub args: Vec<String>,
}

impl Default for WebDriverConfig {
    fn default() -> Self {
        Self {
            url: default_webdriver_url(),
            browser: default_browser(),
            headless: false,
            args: Vec::new(),
        }
    }
}

fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_browser() -> String {
    "chrome".to_string()
}

/// Location of the demo page hosting the lists
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Root URL of the running demo application
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the iron-list test view, relative to `base_url`
    #[serde(default = "default_test_path")]
    pub test_path: String,

    /// Tag name that must be present before the page counts as loaded
    #[serde(default = "default_list_tag")]
    pub list_tag: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            test_path: default_test_path(),
            list_tag: default_list_tag(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8888".to_string()
}

fn default_test_path() -> String {
    "iron-list-test".to_string()
}

fn default_list_tag() -> String {
    "iron-list".to_string()
}

impl AppConfig {
    /// Full URL of the test view
    pub fn page_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.test_path.trim_start_matches('/')
        )
    }
}

/// Timeout settings
#[derive(Debug, Deserialize, Clone)]
pub struct Timeouts {
    /// Delay between two reads while waiting for a condition
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    /// Default bound for waiting on a condition
    #[serde(default = "default_wait")]
    pub wait_secs: u64,

    /// Timeout for a single WebDriver HTTP request
    #[serde(default = "default_request")]
    pub request_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval(),
            wait_secs: default_wait(),
            request_secs: default_request(),
        }
    }
}

fn default_poll_interval() -> u64 {
    500
}
fn default_wait() -> u64 {
    10
}
fn default_request() -> u64 {
    30
}

impl Timeouts {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn wait(&self) -> Duration {
        Duration::from_secs(self.wait_secs)
    }

    pub fn request(&self) -> Duration {
        Duration::from_secs(self.request_secs)
    }
}

impl Config {
    /// Load configuration from the default config file
    ///
    /// Returns default configuration if file doesn't exist
    pub fn load() -> Result<Self> {
        match config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| super::Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| super::Error::ConfigParse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.webdriver.url, "http://localhost:4444");
        assert_eq!(config.webdriver.browser, "chrome");
        assert!(!config.webdriver.headless);
        assert_eq!(config.app.test_path, "iron-list-test");
        assert_eq!(config.app.list_tag, "iron-list");
        assert_eq!(config.timeouts.poll_interval(), Duration::from_millis(500));
        assert_eq!(config.timeouts.wait(), Duration::from_secs(10));
    }

    #[test]
    fn test_partial_sections() {
        let config = Config::parse(
            r#"
[webdriver]
url = "http://127.0.0.1:9515"
headless = true
args = ["--window-size=1280,800"]

[timeouts]
wait_secs = 3
"#,
        )
        .unwrap();

        assert_eq!(config.webdriver.url, "http://127.0.0.1:9515");
        assert!(config.webdriver.headless);
        assert_eq!(config.webdriver.args, vec!["--window-size=1280,800"]);
        assert_eq!(config.webdriver.browser, "chrome");
        assert_eq!(config.timeouts.wait_secs, 3);
        assert_eq!(config.timeouts.poll_interval_ms, 500);
    }

    #[test]
    fn test_page_url_joins_cleanly() {
        let app = AppConfig {
            base_url: "http://localhost:8080/".to_string(),
            test_path: "/iron-list-test".to_string(),
            list_tag: default_list_tag(),
        };
        assert_eq!(app.page_url(), "http://localhost:8080/iron-list-test");
    }

    #[test]
    fn test_invalid_config_is_parse_error() {
        let err = Config::parse("[timeouts]\nwait_secs = \"soon\"").unwrap_err();
        assert!(matches!(err, crate::common::Error::ConfigParse(_)));
    }
}
