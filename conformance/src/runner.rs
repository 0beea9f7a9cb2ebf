//! Runs the scenario catalogue against one backend and collects the outcomes.

use std::error::Error;
use std::fmt;

use tracing::{info, warn};

use crate::client::BackendClient;
use crate::error::ConformanceError;
use crate::suite::{catalogue, Scenario};

#[derive(Debug)]
pub struct ScenarioOutcome {
    pub group: &'static str,
    pub title: &'static str,
    pub result: Result<(), ConformanceError>,
}

impl ScenarioOutcome {
    pub fn passed(&self) -> bool {
        self.result.is_ok()
    }
}

#[derive(Debug)]
pub struct SuiteReport {
    pub api_root: String,
    pub outcomes: Vec<ScenarioOutcome>,
}

impl SuiteReport {
    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.passed()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &ScenarioOutcome> {
        self.outcomes.iter().filter(|o| !o.passed())
    }
}

/// Runs every catalogued scenario whose group title contains `group_filter`.
///
/// Scenarios run strictly one after another; a failure ends that scenario
/// only, and the next one starts from its own setup.
pub fn run_suite(client: &BackendClient, group_filter: Option<&str>) -> SuiteReport {
    let scenarios: Vec<Scenario> = catalogue()
        .into_iter()
        .filter(|s| group_filter.is_none_or(|f| s.group.contains(f)))
        .collect();
    run_scenarios(client, &scenarios)
}

pub fn run_scenarios(client: &BackendClient, scenarios: &[Scenario]) -> SuiteReport {
    let outcomes = scenarios
        .iter()
        .map(|scenario| {
            let result = scenario.execute(client);
            match &result {
                Ok(()) => info!(group = scenario.group, scenario = scenario.title, "passed"),
                Err(err) => warn!(
                    group = scenario.group,
                    scenario = scenario.title,
                    error = %err,
                    "failed"
                ),
            }
            ScenarioOutcome {
                group: scenario.group,
                title: scenario.title,
                result,
            }
        })
        .collect();

    SuiteReport {
        api_root: client.api_root().to_string(),
        outcomes,
    }
}

/// The error and its sources, one per line, without blank padding.
fn describe(err: &ConformanceError) -> Vec<String> {
    let mut lines: Vec<String> = err
        .to_string()
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect();
    let mut source = err.source();
    while let Some(cause) = source {
        lines.push(format!("caused by: {cause}"));
        source = cause.source();
    }
    lines
}

impl fmt::Display for SuiteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Todo-Tag backend at {}", self.api_root)?;
        let mut group = None;
        for outcome in &self.outcomes {
            if group != Some(outcome.group) {
                group = Some(outcome.group);
                writeln!(f)?;
                writeln!(f, "  {}", outcome.group)?;
            }
            match &outcome.result {
                Ok(()) => writeln!(f, "    ✓ {}", outcome.title)?,
                Err(err) => {
                    writeln!(f, "    ✗ {}", outcome.title)?;
                    for line in describe(err) {
                        writeln!(f, "        {line}")?;
                    }
                }
            }
        }
        writeln!(f)?;
        writeln!(f, "{} passing, {} failing", self.passed(), self.failed())
    }
}
