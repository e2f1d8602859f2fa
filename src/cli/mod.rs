//! CLI command handling
//!
//! Resolves configuration, opens the browser session and hands scenarios
//! to the runner.

use std::path::PathBuf;

use colored::Colorize;

use crate::commands::Commands;
use crate::common::{Config, Error, Result};
use crate::testing::{self, ScenarioDriver, TestScenario, WaitPolicy};
use crate::webdriver::WebDriverSession;

/// Dispatch a CLI command
pub async fn dispatch(command: Commands, config: Config) -> Result<()> {
    match command {
        Commands::Run {
            scenarios,
            files,
            webdriver,
            base_url,
            headless,
            timeout,
            verbose,
        } => {
            let mut config = config;
            if let Some(url) = webdriver {
                config.webdriver.url = url;
            }
            if let Some(url) = base_url {
                config.app.base_url = url;
            }
            if headless {
                config.webdriver.headless = true;
            }
            if let Some(secs) = timeout {
                config.timeouts.wait_secs = secs;
            }

            let selected = select_scenarios(&scenarios, &files)?;
            run(&config, &selected, verbose).await
        }

        Commands::List => {
            for scenario in testing::suite::builtin() {
                println!(
                    "{:<32} {}",
                    scenario.name,
                    scenario.description.as_deref().unwrap_or("").dimmed()
                );
            }
            Ok(())
        }

        Commands::Check { path } => {
            let scenario = TestScenario::load(&path)?;
            println!(
                "{} {} (list '{}')",
                "Scenario:".blue().bold(),
                scenario.name.white().bold(),
                scenario.list
            );
            if let Some(desc) = &scenario.description {
                println!("  {}", desc.dimmed());
            }
            for (i, step) in scenario.steps.iter().enumerate() {
                println!("  {}. {}", i + 1, step);
            }
            Ok(())
        }
    }
}

/// Resolve scenario names and files into the list to run
///
/// With neither names nor files, every built-in scenario runs.
pub fn select_scenarios(names: &[String], files: &[PathBuf]) -> Result<Vec<TestScenario>> {
    let mut selected = Vec::new();

    if names.is_empty() && files.is_empty() {
        return Ok(testing::suite::builtin());
    }

    for name in names {
        let scenario = testing::suite::find(name).ok_or_else(|| {
            let known: Vec<String> = testing::suite::builtin()
                .into_iter()
                .map(|s| s.name)
                .collect();
            Error::Config(format!(
                "Unknown scenario '{}'. Available: {}",
                name,
                known.join(", ")
            ))
        })?;
        selected.push(scenario);
    }

    for path in files {
        selected.push(TestScenario::load(path)?);
    }

    Ok(selected)
}

async fn run(config: &Config, scenarios: &[TestScenario], verbose: bool) -> Result<()> {
    let session = WebDriverSession::start(&config.webdriver, config.timeouts.request()).await?;
    let mut driver = ScenarioDriver::new(
        session,
        config.app.clone(),
        WaitPolicy::from_timeouts(&config.timeouts),
    );

    let results = testing::run_suite(&mut driver, scenarios, verbose).await;

    if let Err(e) = driver.close().await {
        tracing::warn!("Failed to close browser session: {}", e);
    }

    testing::print_summary(&results);

    let failed = results.iter().filter(|r| !r.passed).count();
    if failed > 0 {
        return Err(Error::TestAssertion(format!(
            "{} of {} scenarios failed",
            failed,
            results.len()
        )));
    }
    Ok(())
}
