//! Reporting surface shared by the engine and the built-in reporters.

use crate::fixture::{FixtureId, HookKind, Tree};
use crate::outcome::Failure;
use crate::runner::RunOptions;
use std::time::Duration;

/// Totals accumulated while a run progresses.
///
/// Counters are bumped before the matching reporter callback fires, so a
/// callback always observes totals that already include its own event.
#[derive(Debug, Default)]
pub struct Summary {
    pub(crate) suites: usize,
    pub(crate) open_suites: usize,
    pub(crate) tests: usize,
    pub(crate) passes: usize,
    pub(crate) pending: usize,
    pub(crate) failures: Vec<FailureEntry>,
}

impl Summary {
    /// Creates an empty summary.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of suites entered so far, the root excluded.
    #[inline]
    pub fn suites(&self) -> usize {
        self.suites
    }

    /// Number of suites currently open, the root excluded.
    #[inline]
    pub fn open_suites(&self) -> usize {
        self.open_suites
    }

    /// Number of tests finished so far, pending ones included.
    #[inline]
    pub fn tests(&self) -> usize {
        self.tests
    }

    #[inline]
    pub fn passes(&self) -> usize {
        self.passes
    }

    #[inline]
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Failures recorded so far, from tests and hooks alike.
    #[inline]
    pub fn failures(&self) -> &[FailureEntry] {
        &self.failures
    }

    #[inline]
    pub fn num_failures(&self) -> usize {
        self.failures.len()
    }

    /// Whether the run has not recorded a single failure.
    pub fn is_passed(&self) -> bool {
        self.failures.is_empty()
    }
}

/// One recorded failure together with the fixture it came from.
#[derive(Debug)]
pub struct FailureEntry {
    pub(crate) name: String,
    pub(crate) failure: Failure,
}

impl FailureEntry {
    /// Name of the failed test, or the keyword of the failed hook.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn failure(&self) -> &Failure {
        &self.failure
    }
}

/// Suite description passed to reporter callbacks.
#[derive(Debug, Clone, Copy)]
pub struct SuiteDesc<'a> {
    pub(crate) name: &'a str,
    pub(crate) is_root: bool,
}

impl SuiteDesc<'_> {
    #[inline]
    pub fn name(&self) -> &str {
        self.name
    }

    /// Whether this is the implicit outermost suite.
    #[inline]
    pub fn is_root(&self) -> bool {
        self.is_root
    }
}

/// Test description passed to reporter callbacks.
#[derive(Debug, Clone, Copy)]
pub struct TestDesc<'a> {
    pub(crate) name: &'a str,
}

impl TestDesc<'_> {
    #[inline]
    pub fn name(&self) -> &str {
        self.name
    }
}

/// Hook description passed to reporter callbacks.
#[derive(Debug, Clone, Copy)]
pub struct HookDesc<'a> {
    pub(crate) name: &'a str,
    pub(crate) kind: HookKind,
}

impl HookDesc<'_> {
    #[inline]
    pub fn name(&self) -> &str {
        self.name
    }

    #[inline]
    pub fn kind(&self) -> HookKind {
        self.kind
    }
}

/// Receiver of run lifecycle events.
///
/// All methods default to doing nothing, so a reporter only implements
/// the events it cares about. The failure behind a `test_fail` or
/// `hook_fail` event is the last entry of `summary.failures()`.
pub trait Reporter {
    /// The run is about to start.
    fn start(&mut self) {}

    /// A suite has been entered.
    fn suite_start(&mut self, _suite: &SuiteDesc<'_>, _summary: &Summary) {}

    /// A suite has been left again.
    fn suite_end(&mut self, _suite: &SuiteDesc<'_>, _summary: &Summary) {}

    fn test_pass(&mut self, _test: &TestDesc<'_>, _summary: &Summary) {}

    fn test_fail(&mut self, _test: &TestDesc<'_>, _summary: &Summary) {}

    /// A skipped test has been recorded without running.
    fn test_pending(&mut self, _test: &TestDesc<'_>, _summary: &Summary) {}

    fn hook_pass(&mut self, _hook: &HookDesc<'_>, _summary: &Summary) {}

    /// A hook failed. The run bails right after this event.
    fn hook_fail(&mut self, _hook: &HookDesc<'_>, _summary: &Summary) {}

    /// The run finished or bailed, `elapsed` after it started.
    fn end(&mut self, _elapsed: Duration, _summary: &Summary) {}
}

macro_rules! impl_reporter_body {
    () => {
        fn start(&mut self) {
            (**self).start()
        }

        fn suite_start(&mut self, suite: &SuiteDesc<'_>, summary: &Summary) {
            (**self).suite_start(suite, summary)
        }

        fn suite_end(&mut self, suite: &SuiteDesc<'_>, summary: &Summary) {
            (**self).suite_end(suite, summary)
        }

        fn test_pass(&mut self, test: &TestDesc<'_>, summary: &Summary) {
            (**self).test_pass(test, summary)
        }

        fn test_fail(&mut self, test: &TestDesc<'_>, summary: &Summary) {
            (**self).test_fail(test, summary)
        }

        fn test_pending(&mut self, test: &TestDesc<'_>, summary: &Summary) {
            (**self).test_pending(test, summary)
        }

        fn hook_pass(&mut self, hook: &HookDesc<'_>, summary: &Summary) {
            (**self).hook_pass(hook, summary)
        }

        fn hook_fail(&mut self, hook: &HookDesc<'_>, summary: &Summary) {
            (**self).hook_fail(hook, summary)
        }

        fn end(&mut self, elapsed: Duration, summary: &Summary) {
            (**self).end(elapsed, summary)
        }
    };
}

impl<R: ?Sized + Reporter> Reporter for &mut R {
    impl_reporter_body!();
}

impl<R: ?Sized + Reporter> Reporter for Box<R> {
    impl_reporter_body!();
}

/// Drives reporter callbacks and keeps the running totals.
///
/// The root suite is excluded from the suite counters on both edges so
/// the depth can never underflow.
pub(crate) struct Driver<'a> {
    reporter: &'a mut dyn Reporter,
    summary: Summary,
    pub(crate) options: RunOptions,
}

impl<'a> Driver<'a> {
    pub(crate) fn new(reporter: &'a mut dyn Reporter, options: RunOptions) -> Self {
        Self {
            reporter,
            summary: Summary::empty(),
            options,
        }
    }

    pub(crate) fn start(&mut self) {
        self.reporter.start();
    }

    pub(crate) fn suite_start(&mut self, tree: &Tree, id: FixtureId) {
        let is_root = tree.is_root(id);
        if !is_root {
            self.summary.suites += 1;
            self.summary.open_suites += 1;
        }
        self.reporter.suite_start(
            &SuiteDesc {
                name: tree.name(id),
                is_root,
            },
            &self.summary,
        );
    }

    pub(crate) fn suite_end(&mut self, tree: &Tree, id: FixtureId) {
        let is_root = tree.is_root(id);
        if !is_root {
            self.summary.open_suites -= 1;
        }
        self.reporter.suite_end(
            &SuiteDesc {
                name: tree.name(id),
                is_root,
            },
            &self.summary,
        );
    }

    pub(crate) fn test_pass(&mut self, tree: &Tree, id: FixtureId) {
        self.summary.tests += 1;
        self.summary.passes += 1;
        self.reporter
            .test_pass(&TestDesc { name: tree.name(id) }, &self.summary);
    }

    pub(crate) fn test_fail(&mut self, tree: &Tree, id: FixtureId, failure: Failure) {
        self.summary.tests += 1;
        self.summary.failures.push(FailureEntry {
            name: tree.name(id).to_owned(),
            failure,
        });
        self.reporter
            .test_fail(&TestDesc { name: tree.name(id) }, &self.summary);
    }

    pub(crate) fn test_pending(&mut self, tree: &Tree, id: FixtureId) {
        self.summary.tests += 1;
        self.summary.pending += 1;
        self.reporter
            .test_pending(&TestDesc { name: tree.name(id) }, &self.summary);
    }

    pub(crate) fn hook_pass(&mut self, tree: &Tree, id: FixtureId) {
        self.reporter.hook_pass(
            &HookDesc {
                name: tree.name(id),
                kind: tree.hook_kind(id),
            },
            &self.summary,
        );
    }

    pub(crate) fn hook_fail(&mut self, tree: &Tree, id: FixtureId, failure: Failure) {
        self.summary.failures.push(FailureEntry {
            name: tree.name(id).to_owned(),
            failure,
        });
        self.reporter.hook_fail(
            &HookDesc {
                name: tree.name(id),
                kind: tree.hook_kind(id),
            },
            &self.summary,
        );
    }

    pub(crate) fn end(&mut self, elapsed: Duration) {
        self.reporter.end(elapsed, &self.summary);
    }

    pub(crate) fn summary(&self) -> &Summary {
        &self.summary
    }

    #[cfg(test)]
    pub(crate) fn into_summary(self) -> Summary {
        self.summary
    }
}
