//! The verbose lifecycle reporter.

use super::{build_output, indent, ColorConfig, Output};
use crate::report::{HookDesc, Reporter, SuiteDesc, Summary, TestDesc};
use std::io::Write as _;
use std::time::Duration;

/// Reporter that traces every suite edge, test outcome, and hook, with
/// no closing summary.
pub struct DebugReporter {
    out: Output,
}

impl DebugReporter {
    /// Creates the reporter writing to the standard output.
    pub fn new(color: ColorConfig) -> Self {
        Self::with_output(build_output(None, color))
    }

    pub(crate) fn with_output(out: Output) -> Self {
        Self { out }
    }

    pub(crate) fn boxed(out: Output) -> Box<dyn Reporter> {
        Box::new(Self::with_output(out))
    }
}

impl Reporter for DebugReporter {
    fn start(&mut self) {
        let _ = writeln!(self.out, "starting tests");
    }

    fn suite_start(&mut self, suite: &SuiteDesc<'_>, summary: &Summary) {
        let _ = writeln!(
            self.out,
            "\n{}entering suite '{}'",
            indent(summary.open_suites()),
            suite.name()
        );
    }

    fn suite_end(&mut self, suite: &SuiteDesc<'_>, summary: &Summary) {
        let depth = if suite.is_root() {
            0
        } else {
            summary.open_suites() + 1
        };
        let _ = writeln!(
            self.out,
            "{}exiting suite '{}'\n",
            indent(depth),
            suite.name()
        );
    }

    fn test_pass(&mut self, test: &TestDesc<'_>, summary: &Summary) {
        let _ = writeln!(
            self.out,
            "{}test '{}' passed",
            indent(summary.open_suites() + 1),
            test.name()
        );
    }

    fn test_fail(&mut self, test: &TestDesc<'_>, summary: &Summary) {
        let _ = writeln!(
            self.out,
            "{}test '{}' failed ({})",
            indent(summary.open_suites() + 1),
            test.name(),
            summary.num_failures()
        );
    }

    fn test_pending(&mut self, test: &TestDesc<'_>, summary: &Summary) {
        let _ = writeln!(
            self.out,
            "{}test '{}' pending",
            indent(summary.open_suites()),
            test.name()
        );
    }

    fn hook_pass(&mut self, hook: &HookDesc<'_>, summary: &Summary) {
        let _ = writeln!(
            self.out,
            "{}ran hook '{}'",
            indent(summary.open_suites() + 1),
            hook.name()
        );
    }

    fn hook_fail(&mut self, hook: &HookDesc<'_>, summary: &Summary) {
        let _ = writeln!(
            self.out,
            "{}hook '{}' failed ({})",
            indent(summary.open_suites() + 1),
            hook.name(),
            summary.num_failures()
        );
    }

    fn end(&mut self, elapsed: Duration, _summary: &Summary) {
        let _ = writeln!(
            self.out,
            "stopped running tests, took {:012.6} seconds",
            elapsed.as_secs_f64()
        );
    }
}
