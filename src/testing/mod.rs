//! E2E Test Runner
//!
//! Reads item snapshots from iron-list elements through the browser
//! session, asserts on them, and clicks the page's controls to swap the
//! datasets under test. Scenarios are plain data: built in for the demo
//! page, or loaded from YAML.

pub mod assertions;
mod config;
mod driver;
mod runner;
pub mod snapshot;
pub mod suite;
mod wait;

pub use config::*;
pub use driver::{ListHandle, ScenarioDriver, ITEMS_SCRIPT};
pub use runner::{print_summary, run_scenario, run_suite, TestResult};
pub use snapshot::{ItemSnapshot, Record};
pub use wait::{Deadline, WaitPolicy};
