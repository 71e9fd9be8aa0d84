//! Mock services for testing
//!
//! This module provides a scripted process runner that answers commands with
//! canned outcomes and records every call for later verification.

#![allow(dead_code)]

use async_trait::async_trait;
use repos_service::domain::value_objects::execution_mode::ExecutionMode;
use repos_service::infrastructure::diagnostics::MemorySink;
use repos_service::infrastructure::process::{CommandLine, ExecutionOutcome, ProcessRunner};
use repos_service::{domain::entities::ServiceConfig, RepoService};
use std::sync::{Arc, Mutex};

/// A command the runner was asked to execute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub command: String,
    pub argv: Vec<String>,
    pub mode: ExecutionMode,
}

/// Process runner answering from a script of (needle, outcome) rules
///
/// The first rule whose needle occurs in the rendered command wins. Unmatched
/// commands succeed with empty output.
pub struct ScriptedRunner {
    rules: Mutex<Vec<(String, ExecutionOutcome)>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl ScriptedRunner {
    /// Create a runner where every command succeeds silently
    pub fn new() -> Self {
        Self {
            rules: Mutex::new(Vec::new()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Answer commands containing `needle` with `outcome`
    pub fn respond(self, needle: &str, outcome: ExecutionOutcome) -> Self {
        self.rules
            .lock()
            .unwrap()
            .push((needle.to_string(), outcome));
        self
    }

    /// Get call history for verification
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Rendered commands in call order
    pub fn commands(&self) -> Vec<String> {
        self.calls().into_iter().map(|call| call.command).collect()
    }
}

impl Default for ScriptedRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProcessRunner for ScriptedRunner {
    async fn run(&self, command: &CommandLine, mode: ExecutionMode) -> ExecutionOutcome {
        let rendered = command.render();
        self.calls.lock().unwrap().push(RecordedCall {
            command: rendered.clone(),
            argv: command.argv().into_iter().map(String::from).collect(),
            mode,
        });

        self.rules
            .lock()
            .unwrap()
            .iter()
            .find(|(needle, _)| rendered.contains(needle.as_str()))
            .map(|(_, outcome)| outcome.clone())
            .unwrap_or_default()
    }
}

/// Service wired to a scripted runner and an in-memory sink
pub struct ScriptedService {
    pub service: RepoService,
    pub runner: Arc<ScriptedRunner>,
    pub sink: Arc<MemorySink>,
}

impl ScriptedService {
    pub fn new(config: ServiceConfig, runner: ScriptedRunner) -> Self {
        let runner = Arc::new(runner);
        let sink = Arc::new(MemorySink::new());
        let service = RepoService::with_components(config, runner.clone(), sink.clone());
        Self {
            service,
            runner,
            sink,
        }
    }

    pub fn with_defaults(runner: ScriptedRunner) -> Self {
        Self::new(ServiceConfig::default(), runner)
    }
}
