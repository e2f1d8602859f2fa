//! iron-list end-to-end suite
//!
//! Drives a demo page hosting virtualized iron-list elements through a
//! WebDriver server, reads each list's backing items, and checks them
//! before and after the page's dataset-changing controls are clicked.

pub mod cli;
pub mod commands;
pub mod common;
pub mod testing;
pub mod webdriver;

// Re-export commonly used types for tests
pub use common::{Config, Error, Result};
pub use testing::{ItemSnapshot, ScenarioDriver, TestScenario, TestStep};
pub use webdriver::{By, ElementRef, Page};
