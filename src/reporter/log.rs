//! The `log` facade reporter.

use super::{format_duration_short, Output};
use crate::report::{HookDesc, Reporter, SuiteDesc, Summary, TestDesc};
use std::time::Duration;

/// Reporter that forwards every event to the [`log`] facade instead of
/// writing to a stream. Useful when the surrounding application already
/// owns the terminal.
pub struct LogReporter {
    _p: (),
}

impl LogReporter {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self { _p: () }
    }

    pub(crate) fn boxed(_out: Output) -> Box<dyn Reporter> {
        Box::new(Self::new())
    }
}

impl Reporter for LogReporter {
    fn start(&mut self) {
        log::info!("starting tests");
    }

    fn suite_start(&mut self, suite: &SuiteDesc<'_>, _: &Summary) {
        log::info!("entering suite '{}'", suite.name());
    }

    fn suite_end(&mut self, suite: &SuiteDesc<'_>, _: &Summary) {
        log::info!("exiting suite '{}'", suite.name());
    }

    fn test_pass(&mut self, test: &TestDesc<'_>, _: &Summary) {
        log::info!("{}: ok", test.name());
    }

    fn test_fail(&mut self, test: &TestDesc<'_>, summary: &Summary) {
        match summary.failures().last() {
            Some(entry) => log::error!("{}: FAILED\n{}", test.name(), entry.failure()),
            None => log::error!("{}: FAILED", test.name()),
        }
    }

    fn test_pending(&mut self, test: &TestDesc<'_>, _: &Summary) {
        log::info!("{}: skipped", test.name());
    }

    fn hook_pass(&mut self, hook: &HookDesc<'_>, _: &Summary) {
        log::trace!("ran hook '{}'", hook.name());
    }

    fn hook_fail(&mut self, hook: &HookDesc<'_>, summary: &Summary) {
        match summary.failures().last() {
            Some(entry) => log::error!("hook '{}' FAILED\n{}", hook.name(), entry.failure()),
            None => log::error!("hook '{}' FAILED", hook.name()),
        }
    }

    fn end(&mut self, elapsed: Duration, summary: &Summary) {
        if summary.is_passed() {
            log::info!("test status: ok, took {}", format_duration_short(elapsed));
        } else {
            log::error!("test status: FAILED, took {}", format_duration_short(elapsed));
        }
    }
}
