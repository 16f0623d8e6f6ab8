// crates/sanity-harness/src/scenario.rs
// ============================================================================
// Module: Scenario Model
// Description: Immutable description of one named subject-binary check.
// Purpose: Declare binary, arguments, timing, setup, and evaluation up front.
// Dependencies: std
// ============================================================================

//! ## Overview
//! A [`Scenario`] is built once at registration and consumed once per suite
//! run. Arguments may reference the scenario's working directory with the
//! [`SCOPE_TOKEN`] placeholder; any scenario that uses the token, declares
//! setup steps, or watches paths is given its own [`crate::ResourceScope`].

use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use crate::assertions::Verdict;
use crate::locator::BinaryRef;
use crate::probe::Observation;
use crate::runner::RunResult;

/// Placeholder replaced by the scope root when arguments are rendered.
pub const SCOPE_TOKEN: &str = "{scope}";

// ============================================================================
// SECTION: Types
// ============================================================================

/// How a scenario's subject process is driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Wait up to the scenario timeout, killing the process on expiry.
    Bounded,
    /// Observe for the scenario timeout, then stop with this grace period.
    Supervised {
        /// Time allowed for a cooperative exit before the forceful kill.
        grace: Duration,
    },
}

/// Maps captured evidence to one or more verdicts.
pub type Evaluator = fn(&Evidence<'_>) -> Vec<Verdict>;

/// What a scenario does with its binary.
#[derive(Debug, Clone, Copy)]
pub enum Action {
    /// Only probe existence and executability.
    Locate,
    /// Run the binary and evaluate the captured evidence.
    Run {
        /// Bounded or supervised execution.
        mode: RunMode,
        /// Evidence evaluator.
        evaluate: Evaluator,
    },
}

/// Preparation performed inside the scope before the binary starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupStep {
    /// Create a directory (with parents).
    CreateDir(PathBuf),
    /// Write a UTF-8 file (creating parents).
    WriteFile {
        /// Scope-relative file path.
        path: PathBuf,
        /// File contents.
        contents: String,
    },
}

/// Evidence handed to a scenario's evaluator.
#[derive(Debug)]
pub struct Evidence<'a> {
    /// Scenario being evaluated.
    pub scenario: &'a Scenario,
    /// Captured run result.
    pub run: &'a RunResult,
    /// Scope root, when the scenario has one; still present on disk.
    pub scope: Option<&'a Path>,
    /// Paths seen while a supervised process ran.
    pub observation: &'a Observation,
}

impl Evidence<'_> {
    /// Returns the subject binary.
    #[must_use]
    pub const fn binary(&self) -> &BinaryRef {
        &self.scenario.binary
    }

    /// Resolves a scope-relative path; `None` without a scope.
    #[must_use]
    pub fn scope_path(&self, relative: impl AsRef<Path>) -> Option<PathBuf> {
        self.scope.map(|root| root.join(relative))
    }
}

// ============================================================================
// SECTION: Scenario
// ============================================================================

/// One named check against a subject binary.
#[derive(Debug, Clone)]
pub struct Scenario {
    /// Transcript section this scenario prints under.
    section: String,
    /// Display name used in SKIP and error messages.
    name: String,
    /// Subject binary.
    binary: BinaryRef,
    /// Locate or run.
    action: Action,
    /// Argument templates.
    args: Vec<String>,
    /// Bounded deadline or supervised observation window.
    timeout: Duration,
    /// Whether a resource scope is required.
    needs_scope: bool,
    /// Scope preparation steps.
    setup: Vec<SetupStep>,
    /// Scope-relative paths to watch while supervised.
    watch: Vec<PathBuf>,
}

impl Scenario {
    /// Declares an existence/executability check.
    #[must_use]
    pub fn locate(section: impl Into<String>, binary: BinaryRef) -> Self {
        let name = binary.name().to_string();
        Self::build(section.into(), name, binary, Action::Locate, Vec::new(), Duration::ZERO)
    }

    /// Declares a bounded run that must finish within `timeout`.
    #[must_use]
    pub fn bounded<I, S>(
        section: impl Into<String>,
        name: impl Into<String>,
        binary: BinaryRef,
        args: I,
        timeout: Duration,
        evaluate: Evaluator,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let action = Action::Run {
            mode: RunMode::Bounded,
            evaluate,
        };
        let args = args.into_iter().map(Into::into).collect();
        Self::build(section.into(), name.into(), binary, action, args, timeout)
    }

    /// Declares a supervised run observed for `window` and then stopped.
    #[must_use]
    pub fn supervised<I, S>(
        section: impl Into<String>,
        name: impl Into<String>,
        binary: BinaryRef,
        args: I,
        window: Duration,
        grace: Duration,
        evaluate: Evaluator,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let action = Action::Run {
            mode: RunMode::Supervised {
                grace,
            },
            evaluate,
        };
        let args = args.into_iter().map(Into::into).collect();
        Self::build(section.into(), name.into(), binary, action, args, window)
    }

    /// Shared constructor.
    fn build(
        section: String,
        name: String,
        binary: BinaryRef,
        action: Action,
        args: Vec<String>,
        timeout: Duration,
    ) -> Self {
        let needs_scope = args.iter().any(|arg| arg.contains(SCOPE_TOKEN));
        Self {
            section,
            name,
            binary,
            action,
            args,
            timeout,
            needs_scope,
            setup: Vec::new(),
            watch: Vec::new(),
        }
    }

    /// Adds a setup step (implies a scope).
    #[must_use]
    pub fn with_setup(mut self, step: SetupStep) -> Self {
        self.needs_scope = true;
        self.setup.push(step);
        self
    }

    /// Watches a scope-relative path while supervised (implies a scope).
    #[must_use]
    pub fn watching(mut self, relative: impl Into<PathBuf>) -> Self {
        self.needs_scope = true;
        self.watch.push(relative.into());
        self
    }

    /// Returns the transcript section.
    #[must_use]
    pub fn section(&self) -> &str {
        &self.section
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the subject binary.
    #[must_use]
    pub const fn binary(&self) -> &BinaryRef {
        &self.binary
    }

    /// Returns the action.
    #[must_use]
    pub const fn action(&self) -> Action {
        self.action
    }

    /// Returns the unrendered argument templates.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Returns the bounded deadline or supervised observation window.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns true when the scenario needs its own working directory.
    #[must_use]
    pub const fn needs_scope(&self) -> bool {
        self.needs_scope
    }

    /// Returns the setup steps.
    #[must_use]
    pub fn setup(&self) -> &[SetupStep] {
        &self.setup
    }

    /// Returns the watched scope-relative paths.
    #[must_use]
    pub fn watch(&self) -> &[PathBuf] {
        &self.watch
    }

    /// Substitutes [`SCOPE_TOKEN`] with the scope root.
    #[must_use]
    pub fn render_args(&self, scope: Option<&Path>) -> Vec<String> {
        let root = scope.map(|root| root.display().to_string());
        self.args
            .iter()
            .map(|arg| match &root {
                Some(root) => arg.replace(SCOPE_TOKEN, root),
                None => arg.clone(),
            })
            .collect()
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
