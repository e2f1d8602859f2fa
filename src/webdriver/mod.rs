//! Browser session boundary
//!
//! The scenario driver talks to the page only through the [`Page`] trait:
//! locate elements, evaluate a script and get its value back, click, and
//! read text. [`WebDriverSession`] implements it over the W3C WebDriver
//! HTTP protocol; tests substitute an in-memory page.

mod client;
pub mod protocol;

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

use crate::common::{Error, Result};

pub use client::WebDriverSession;

/// Opaque reference to an element in the live page
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementRef(String);

impl ElementRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The WebDriver element id
    pub fn id(&self) -> &str {
        &self.0
    }
}

/// Element locator strategy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum By {
    /// Element with the given `id` attribute
    Id(String),
    /// Elements with the given tag name
    TagName(String),
    /// Raw CSS selector
    Css(String),
}

impl By {
    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    pub fn tag_name(tag: impl Into<String>) -> Self {
        Self::TagName(tag.into())
    }

    /// Translate into a CSS selector, the one strategy every driver supports
    ///
    /// Ids go through an attribute selector so values starting with a digit
    /// or containing CSS metacharacters still match.
    pub fn to_css(&self) -> String {
        match self {
            By::Id(id) => format!("[id=\"{}\"]", id.replace('\\', "\\\\").replace('"', "\\\"")),
            By::TagName(tag) => tag.clone(),
            By::Css(selector) => selector.clone(),
        }
    }
}

impl fmt::Display for By {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            By::Id(id) => write!(f, "id '{}'", id),
            By::TagName(tag) => write!(f, "tag <{}>", tag),
            By::Css(selector) => write!(f, "selector '{}'", selector),
        }
    }
}

/// A live page the scenarios interact with
#[async_trait]
pub trait Page: Send {
    /// Navigate to an absolute URL
    async fn open(&mut self, url: &str) -> Result<()>;

    /// Locate all elements matching the locator, possibly none
    async fn find_elements(&mut self, by: &By) -> Result<Vec<ElementRef>>;

    /// Locate the first element matching the locator
    async fn find_element(&mut self, by: &By) -> Result<ElementRef> {
        self.find_elements(by)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::ElementNotFound(by.to_string()))
    }

    /// Run a script in the page and return its value
    ///
    /// Elements in `args` are visible to the script as `arguments[i]`.
    async fn execute_script(&mut self, script: &str, args: &[ElementRef]) -> Result<Value>;

    /// Click an element
    async fn click(&mut self, element: &ElementRef) -> Result<()>;

    /// Visible text of an element
    async fn text(&mut self, element: &ElementRef) -> Result<String>;

    /// End the browser session
    async fn close(&mut self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_locator_is_attribute_selector() {
        assert_eq!(By::id("lazy-loaded").to_css(), "[id=\"lazy-loaded\"]");
        assert_eq!(By::id("a\"b").to_css(), "[id=\"a\\\"b\"]");
    }

    #[test]
    fn test_tag_and_css_pass_through() {
        assert_eq!(By::tag_name("iron-list").to_css(), "iron-list");
        assert_eq!(By::Css("div > span".into()).to_css(), "div > span");
    }

    #[test]
    fn test_display_names_strategy() {
        assert_eq!(By::id("x").to_string(), "id 'x'");
        assert_eq!(By::tag_name("iron-list").to_string(), "tag <iron-list>");
    }
}
