//! The hierarchical list reporter.

use super::{build_output, indent, write_summary, ColorConfig, Output, CHECK_SYMBOL};
use crate::report::{Reporter, SuiteDesc, Summary, TestDesc};
use std::io::Write as _;
use std::time::Duration;

/// The standard reporter: an indented list of suites and tests as they
/// run, followed by the summary.
pub struct DefaultReporter {
    out: Output,
}

impl DefaultReporter {
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

impl Reporter for DefaultReporter {
    fn start(&mut self) {
        let _ = writeln!(self.out);
    }

    fn suite_start(&mut self, suite: &SuiteDesc<'_>, summary: &Summary) {
        if suite.is_root() {
            return;
        }
        let _ = writeln!(
            self.out,
            "{}{}",
            indent(summary.open_suites()),
            suite.name()
        );
    }

    fn test_pass(&mut self, test: &TestDesc<'_>, summary: &Summary) {
        let _ = writeln!(
            self.out,
            "{}{} {}",
            indent(summary.open_suites() + 1),
            CHECK_SYMBOL,
            test.name()
        );
    }

    fn test_fail(&mut self, test: &TestDesc<'_>, summary: &Summary) {
        let _ = writeln!(
            self.out,
            "{}{}) {}",
            indent(summary.open_suites() + 1),
            summary.num_failures(),
            test.name()
        );
    }

    fn test_pending(&mut self, test: &TestDesc<'_>, summary: &Summary) {
        let _ = writeln!(
            self.out,
            "{}- {}",
            indent(summary.open_suites()),
            test.name()
        );
    }

    fn end(&mut self, elapsed: Duration, summary: &Summary) {
        let _ = write_summary(&mut *self.out, summary, elapsed);
    }
}
