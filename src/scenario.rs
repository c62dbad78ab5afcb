//! Hooks run around each BDD scenario
//!
//! `before_scenario` announces the feature and scenario and hands out a fresh
//! per-scenario context; `after_scenario` logs the final status and any
//! failed steps.

use crate::api::ApiResponse;
use crate::logging::{self, Logger};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Name of the registry logger used by [`ScenarioHooks::new`]
pub const LOGGER_NAME: &str = "api_harness::scenario";

/// Outcome of a single step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepReport {
    pub name: String,
    pub failed: bool,
}

impl StepReport {
    pub fn passed<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            failed: false,
        }
    }

    pub fn failed<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            failed: true,
        }
    }
}

/// Steps executed for one scenario, in order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub name: String,
    pub steps: Vec<StepReport>,
}

impl ScenarioReport {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    pub fn push(&mut self, step: StepReport) {
        self.steps.push(step);
    }

    pub fn failed_steps(&self) -> Vec<&str> {
        self.steps
            .iter()
            .filter(|step| step.failed)
            .map(|step| step.name.as_str())
            .collect()
    }

    pub fn status(&self) -> ScenarioStatus {
        if self.steps.iter().any(|step| step.failed) {
            ScenarioStatus::Failed
        } else {
            ScenarioStatus::Success
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScenarioStatus {
    Success,
    Failed,
}

impl fmt::Display for ScenarioStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => f.write_str("SUCCESS"),
            Self::Failed => f.write_str("FAILED"),
        }
    }
}

/// Mutable state shared between the steps of one scenario
#[derive(Debug, Clone, Default)]
pub struct ScenarioContext {
    pub context: HashMap<String, serde_json::Value>,
    pub tags: HashMap<String, String>,
    pub body: serde_json::Value,
    pub response: Option<ApiResponse>,
}

pub struct ScenarioHooks {
    logger: Arc<Logger>,
}

impl ScenarioHooks {
    pub fn new() -> Self {
        Self::with_logger(logging::logger(LOGGER_NAME))
    }

    pub fn with_logger(logger: Arc<Logger>) -> Self {
        Self { logger }
    }

    pub fn before_scenario(&self, feature: &str, scenario: &str) -> ScenarioContext {
        self.logger.info(format!("STARTED FEATURE \"{}\"", feature));
        self.logger.info(format!("STARTED SCENARIO \"{}\"", scenario));
        ScenarioContext::default()
    }

    pub fn after_scenario(&self, report: &ScenarioReport) -> ScenarioStatus {
        let status = report.status();
        self.logger.info(format!(
            "FINISHED SCENARIO \"{}\" WITH STATUS: {}\n",
            report.name, status
        ));

        let failed = report.failed_steps();
        if !failed.is_empty() {
            self.logger
                .info(format!("Failed Steps: {}", failed.join(", ")));
        }

        status
    }
}

impl Default for ScenarioHooks {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hooks() -> (ScenarioHooks, logging::CaptureWriter) {
        let (logger, sink) = Logger::in_memory("scenario");
        (ScenarioHooks::with_logger(Arc::new(logger)), sink)
    }

    #[test]
    fn test_before_scenario_logs_and_resets_context() {
        let (hooks, sink) = hooks();

        let context = hooks.before_scenario("Users API", "List users");

        let lines = sink.lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("STARTED FEATURE \"Users API\""));
        assert!(lines[1].ends_with("STARTED SCENARIO \"List users\""));
        assert!(context.context.is_empty());
        assert!(context.tags.is_empty());
        assert!(context.body.is_null());
        assert!(context.response.is_none());
    }

    #[test]
    fn test_after_scenario_success() {
        let (hooks, sink) = hooks();
        let mut report = ScenarioReport::new("List users");
        report.push(StepReport::passed("Given an API"));
        report.push(StepReport::passed("Then status is 200"));

        assert_eq!(hooks.after_scenario(&report), ScenarioStatus::Success);
        let lines = sink.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("FINISHED SCENARIO \"List users\" WITH STATUS: SUCCESS"));
    }

    #[test]
    fn test_after_scenario_lists_failed_steps() {
        let (hooks, sink) = hooks();
        let mut report = ScenarioReport::new("Create user");
        report.push(StepReport::passed("Given an API"));
        report.push(StepReport::failed("When I post a user"));
        report.push(StepReport::failed("Then status is 201"));

        assert_eq!(hooks.after_scenario(&report), ScenarioStatus::Failed);
        let lines = sink.lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("WITH STATUS: FAILED"));
        assert!(lines[1].ends_with("Failed Steps: When I post a user, Then status is 201"));
    }

    #[test]
    fn test_empty_scenario_succeeds() {
        assert_eq!(ScenarioReport::new("empty").status(), ScenarioStatus::Success);
    }
}
