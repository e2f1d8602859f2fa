//! Test runner implementation
//!
//! Executes scenarios step by step against a live page. The first failing
//! step ends its scenario; the next scenario starts from a freshly loaded
//! page.

use std::time::Duration;

use colored::Colorize;

use crate::common::{Error, Result};
use crate::webdriver::Page;

use super::assertions;
use super::config::{Condition, SlotRange, TestScenario, TestStep};
use super::driver::{ListHandle, ScenarioDriver};
use super::snapshot::ItemSnapshot;

/// Result of a test run
#[derive(Debug)]
pub struct TestResult {
    pub name: String,
    pub passed: bool,
    pub steps_run: usize,
    pub steps_total: usize,
    pub error: Option<String>,
}

/// Per-scenario state carried between steps
struct ScenarioState {
    list: ListHandle,
    /// Most recent snapshot; read lazily by the first expectation
    snapshot: Option<ItemSnapshot>,
}

impl ScenarioState {
    async fn current<P: Page>(&mut self, driver: &mut ScenarioDriver<P>) -> Result<&ItemSnapshot> {
        let snapshot = match self.snapshot.take() {
            Some(s) => s,
            None => driver.read_snapshot(&self.list).await?,
        };
        Ok(self.snapshot.insert(snapshot))
    }
}

/// Run one scenario on a freshly opened page
pub async fn run_scenario<P: Page>(
    driver: &mut ScenarioDriver<P>,
    scenario: &TestScenario,
    verbose: bool,
) -> TestResult {
    let steps_total = scenario.steps.len();

    println!(
        "\n{} {}",
        "Running Test:".blue().bold(),
        scenario.name.white().bold()
    );

    if let Some(desc) = &scenario.description {
        println!("  {}", desc.dimmed());
    }

    let fail = |steps_run: usize, e: Error| TestResult {
        name: scenario.name.clone(),
        passed: false,
        steps_run,
        steps_total,
        error: Some(e.to_string()),
    };

    if let Err(e) = driver.open().await {
        println!("  {} Opening page: {}", "✗".red(), e);
        return fail(0, e);
    }

    let list = match driver.list(&scenario.list).await {
        Ok(list) => list,
        Err(e) => {
            println!("  {} Locating list '{}': {}", "✗".red(), scenario.list, e);
            return fail(0, e);
        }
    };

    if verbose {
        println!("  List: {}", scenario.list.dimmed());
    }

    let mut state = ScenarioState {
        list,
        snapshot: None,
    };

    println!("\n{}", "Steps:".cyan());

    for (i, step) in scenario.steps.iter().enumerate() {
        let step_num = i + 1;

        if let Err(e) = execute_step(driver, &mut state, step, verbose).await {
            let e = e.on_list(&scenario.list);
            println!("  {} Step {}: {}", "✗".red(), step_num, e);
            tracing::debug!(scenario = %scenario.name, step = step_num, "Step failed: {}", e);
            return fail(step_num, e);
        }

        println!("  {} Step {}: {}", "✓".green(), step_num, step.to_string().dimmed());
    }

    println!(
        "\n{} {}\n",
        "✓".green().bold(),
        "Test Passed".green().bold()
    );

    TestResult {
        name: scenario.name.clone(),
        passed: true,
        steps_run: steps_total,
        steps_total,
        error: None,
    }
}

/// Run scenarios one after another on the same session
pub async fn run_suite<P: Page>(
    driver: &mut ScenarioDriver<P>,
    scenarios: &[TestScenario],
    verbose: bool,
) -> Vec<TestResult> {
    let mut results = Vec::with_capacity(scenarios.len());
    for scenario in scenarios {
        results.push(run_scenario(driver, scenario, verbose).await);
    }
    results
}

/// Print a one-line-per-scenario summary
pub fn print_summary(results: &[TestResult]) {
    let passed = results.iter().filter(|r| r.passed).count();

    println!("{}", "Summary:".cyan());
    for result in results {
        if result.passed {
            println!("  {} {}", "✓".green(), result.name);
        } else {
            println!(
                "  {} {} (step {}/{}): {}",
                "✗".red(),
                result.name,
                result.steps_run,
                result.steps_total,
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    let line = format!("{} passed, {} failed", passed, results.len() - passed);
    if passed == results.len() {
        println!("\n{}\n", line.green().bold());
    } else {
        println!("\n{}\n", line.red().bold());
    }
}

/// Execute a single test step
async fn execute_step<P: Page>(
    driver: &mut ScenarioDriver<P>,
    state: &mut ScenarioState,
    step: &TestStep,
    verbose: bool,
) -> Result<()> {
    match step {
        TestStep::Read => {
            let snapshot = driver.read_snapshot(&state.list).await?;
            if verbose {
                println!(
                    "    {} items, {} loaded",
                    snapshot.len(),
                    snapshot.present_count()
                );
            }
            state.snapshot = Some(snapshot);
            Ok(())
        }
        TestStep::ExpectLength { length } => {
            let snapshot = state.current(driver).await?;
            assertions::assert_length(snapshot, *length)
        }
        TestStep::ExpectPresent { from, to, prefix } => {
            let snapshot = state.current(driver).await?;
            let (start, end) = SlotRange::new(*from, *to).resolve(snapshot)?;
            assertions::assert_present_range(snapshot, start, end, prefix)
        }
        TestStep::ExpectAbsent { from, to } => {
            let snapshot = state.current(driver).await?;
            let (start, end) = SlotRange::new(*from, *to).resolve(snapshot)?;
            assertions::assert_absent_range(snapshot, start, end)
        }
        TestStep::ExpectFields { from, to, fields } => {
            let snapshot = state.current(driver).await?;
            let (start, end) = SlotRange::new(*from, *to).resolve(snapshot)?;
            assertions::assert_fields(snapshot, start, end, fields)
        }
        TestStep::ExpectUnchanged => {
            let before = state.current(driver).await?.clone();
            let after = driver.read_snapshot(&state.list).await?;
            assertions::assert_unchanged(&before, &after)
        }
        TestStep::ExpectText { element, text } => {
            let actual = driver.read_text(element).await?;
            if &actual != text {
                return Err(Error::TestAssertion(format!(
                    "Element '{}': expected text '{}', got '{}'",
                    element, text, actual
                )));
            }
            Ok(())
        }
        TestStep::Trigger {
            button,
            until,
            timeout,
        } => {
            driver.trigger(button).await?;
            match until {
                Some(cond) => await_condition(driver, state, cond, *timeout).await,
                None => {
                    // The click may have changed the list; expectations re-read
                    state.snapshot = None;
                    Ok(())
                }
            }
        }
        TestStep::Scroll { by } => {
            driver.scroll_by(&state.list, *by).await?;
            state.snapshot = None;
            Ok(())
        }
        TestStep::Await { until, timeout } => {
            await_condition(driver, state, until, *timeout).await
        }
    }
}

async fn await_condition<P: Page>(
    driver: &mut ScenarioDriver<P>,
    state: &mut ScenarioState,
    cond: &Condition,
    timeout: Option<u64>,
) -> Result<()> {
    let snapshot = driver
        .await_snapshot(
            &state.list,
            &cond.to_string(),
            |s| cond.holds(s),
            timeout.map(Duration::from_secs),
        )
        .await?;
    state.snapshot = Some(snapshot);
    Ok(())
}
