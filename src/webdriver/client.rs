//! WebDriver session
//!
//! A [`Page`] backed by a `fantoccini` client connected to a WebDriver
//! server such as chromedriver, geckodriver or a Selenium grid.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use fantoccini::elements::Element;
use fantoccini::error::CmdError;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::Value;

use crate::common::config::WebDriverConfig;
use crate::common::{Error, Result};

use super::protocol;
use super::{By, ElementRef, Page};

/// An open browser session on a WebDriver server
pub struct WebDriverSession {
    /// None once the session has been deleted
    client: Option<Client>,
    /// Elements located since the last navigation, by WebDriver id
    elements: HashMap<String, Element>,
    request_timeout: Duration,
}

impl WebDriverSession {
    /// Create a new browser session
    pub async fn start(config: &WebDriverConfig, request_timeout: Duration) -> Result<Self> {
        let mut builder = ClientBuilder::native();
        builder.capabilities(protocol::capabilities(config));

        let unreachable = |message: String| Error::WebDriverUnreachable {
            url: config.url.clone(),
            message,
        };
        let client = match tokio::time::timeout(request_timeout, builder.connect(&config.url)).await
        {
            Ok(Ok(client)) => client,
            Ok(Err(e)) => return Err(unreachable(e.to_string())),
            Err(_) => {
                return Err(unreachable(format!(
                    "no response within {}s",
                    request_timeout.as_secs()
                )))
            }
        };

        tracing::info!(browser = %config.browser, url = %config.url, "WebDriver session started");

        Ok(Self {
            client: Some(client),
            elements: HashMap::new(),
            request_timeout,
        })
    }

    fn client(&self) -> Result<&Client> {
        self.client.as_ref().ok_or(Error::SessionClosed)
    }

    fn element(&self, element: &ElementRef) -> Result<&Element> {
        self.client()?;
        self.elements
            .get(element.id())
            .ok_or_else(|| Error::ElementNotFound(format!("element {}", element.id())))
    }
}

/// Await a command within the request timeout and map its error
async fn bounded<T, F>(timeout: Duration, command: &str, fut: F) -> Result<T>
where
    F: Future<Output = std::result::Result<T, CmdError>>,
{
    tracing::debug!("WebDriver >>> {}", command);
    match tokio::time::timeout(timeout, fut).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => {
            tracing::debug!("WebDriver <<< {} failed: {}", command, e);
            Err(command_error(command, e))
        }
        Err(_) => Err(Error::webdriver(
            command,
            &format!("no response within {}s", timeout.as_secs()),
        )),
    }
}

/// `no such element` gets its own variant so callers can tell a missing
/// element apart from a broken session
fn command_error(command: &str, err: CmdError) -> Error {
    if err.is_no_such_element() {
        Error::ElementNotFound(format!("{} ({})", command, err))
    } else {
        Error::webdriver(command, &err.to_string())
    }
}

#[async_trait]
impl Page for WebDriverSession {
    async fn open(&mut self, url: &str) -> Result<()> {
        tracing::info!("Opening {}", url);
        let client = self.client()?;
        bounded(self.request_timeout, "navigate", client.goto(url)).await?;
        // References from the previous document are stale now
        self.elements.clear();
        Ok(())
    }

    async fn find_elements(&mut self, by: &By) -> Result<Vec<ElementRef>> {
        let css = by.to_css();
        let client = self.client()?;
        let found = bounded(
            self.request_timeout,
            "find elements",
            client.find_all(Locator::Css(&css)),
        )
        .await?;

        let mut refs = Vec::with_capacity(found.len());
        for element in found {
            let element_ref = protocol::element_ref(&element)?;
            self.elements.insert(element_ref.id().to_string(), element);
            refs.push(element_ref);
        }
        tracing::trace!("Found {} elements for {}", refs.len(), by);
        Ok(refs)
    }

    async fn execute_script(&mut self, script: &str, args: &[ElementRef]) -> Result<Value> {
        let client = self.client()?;
        let args = args.iter().map(protocol::element_to_value).collect();
        let value = bounded(self.request_timeout, "execute script", client.execute(script, args)).await?;
        tracing::debug!("WebDriver <<< execute script: {}", value);
        Ok(value)
    }

    async fn click(&mut self, element: &ElementRef) -> Result<()> {
        let element = self.element(element)?;
        bounded(self.request_timeout, "click", element.click()).await
    }

    async fn text(&mut self, element: &ElementRef) -> Result<String> {
        let element = self.element(element)?;
        bounded(self.request_timeout, "get text", element.text()).await
    }

    async fn close(&mut self) -> Result<()> {
        let Some(client) = self.client.take() else {
            return Ok(());
        };
        self.elements.clear();
        let result = bounded(self.request_timeout, "delete session", client.close()).await;
        tracing::info!("WebDriver session closed");
        result
    }
}
