//! Scenario driver
//!
//! Wraps a [`Page`] with the operations scenarios are written in: read a
//! list's items, click a control, and wait for the list to settle.

use std::time::Duration;

use crate::common::config::AppConfig;
use crate::common::Result;
use crate::webdriver::{By, ElementRef, Page};

use super::snapshot::ItemSnapshot;
use super::wait::WaitPolicy;

/// Script returning the backing items of the element passed as `arguments[0]`
pub const ITEMS_SCRIPT: &str = "return arguments[0].items;";

const SCROLL_INTO_VIEW_SCRIPT: &str = "arguments[0].scrollIntoView();";

/// A list element located on the page
#[derive(Debug, Clone)]
pub struct ListHandle {
    pub id: String,
    pub element: ElementRef,
}

/// Drives one page through list scenarios
pub struct ScenarioDriver<P: Page> {
    page: P,
    app: AppConfig,
    wait: WaitPolicy,
}

impl<P: Page> ScenarioDriver<P> {
    pub fn new(page: P, app: AppConfig, wait: WaitPolicy) -> Self {
        Self { page, app, wait }
    }

    pub fn page_mut(&mut self) -> &mut P {
        &mut self.page
    }

    /// Load the test view and wait until a list element has rendered
    pub async fn open(&mut self) -> Result<()> {
        let url = self.app.page_url();
        self.page.open(&url).await?;

        let tag = By::tag_name(self.app.list_tag.clone());
        let mut deadline = self.wait.start(format!("{} to appear on {}", tag, url));
        loop {
            if !self.page.find_elements(&tag).await?.is_empty() {
                return Ok(());
            }
            deadline.tick().await?;
        }
    }

    /// Locate a list by element id
    pub async fn list(&mut self, id: &str) -> Result<ListHandle> {
        let element = self.page.find_element(&By::id(id)).await?;
        Ok(ListHandle {
            id: id.to_string(),
            element,
        })
    }

    /// Read the list's current item slots
    pub async fn read_snapshot(&mut self, list: &ListHandle) -> Result<ItemSnapshot> {
        let value = self
            .page
            .execute_script(ITEMS_SCRIPT, std::slice::from_ref(&list.element))
            .await?;
        let snapshot = ItemSnapshot::from_value(&value);
        tracing::trace!(
            list = %list.id,
            len = snapshot.len(),
            present = snapshot.present_count(),
            "Read snapshot"
        );
        Ok(snapshot)
    }

    /// Visible text of the element with the given id
    pub async fn read_text(&mut self, element_id: &str) -> Result<String> {
        let element = self.page.find_element(&By::id(element_id)).await?;
        self.page.text(&element).await
    }

    /// Scroll a control into view and click it
    pub async fn trigger(&mut self, button_id: &str) -> Result<()> {
        let button = self.page.find_element(&By::id(button_id)).await?;
        self.page
            .execute_script(SCROLL_INTO_VIEW_SCRIPT, std::slice::from_ref(&button))
            .await?;
        self.page.click(&button).await?;
        tracing::debug!("Clicked '{}'", button_id);
        Ok(())
    }

    /// Click a control, then wait until the list satisfies `predicate`
    ///
    /// Returns the snapshot that satisfied it.
    pub async fn trigger_and_await<F>(
        &mut self,
        button_id: &str,
        list: &ListHandle,
        what: &str,
        predicate: F,
    ) -> Result<ItemSnapshot>
    where
        F: Fn(&ItemSnapshot) -> bool,
    {
        self.trigger(button_id).await?;
        self.await_snapshot(list, what, predicate, None).await
    }

    /// Poll the list until `predicate` holds or the wait times out
    ///
    /// `timeout` overrides the configured bound for this wait only.
    pub async fn await_snapshot<F>(
        &mut self,
        list: &ListHandle,
        what: &str,
        predicate: F,
        timeout: Option<Duration>,
    ) -> Result<ItemSnapshot>
    where
        F: Fn(&ItemSnapshot) -> bool,
    {
        let policy = match timeout {
            Some(t) => self.wait.with_timeout(t),
            None => self.wait,
        };
        let mut deadline = policy.start(format!("{} on '{}'", what, list.id));

        loop {
            let snapshot = self.read_snapshot(list).await?;
            if predicate(&snapshot) {
                tracing::debug!(
                    list = %list.id,
                    elapsed_ms = deadline.elapsed().as_millis() as u64,
                    "Condition met: {}",
                    what
                );
                return Ok(snapshot);
            }
            deadline.tick().await?;
        }
    }

    /// Scroll the list's viewport vertically by `dy` pixels
    pub async fn scroll_by(&mut self, list: &ListHandle, dy: i64) -> Result<()> {
        let script = format!("arguments[0].scrollBy(0,{});", dy);
        self.page
            .execute_script(&script, std::slice::from_ref(&list.element))
            .await?;
        Ok(())
    }

    /// End the browser session
    pub async fn close(&mut self) -> Result<()> {
        self.page.close().await
    }
}
