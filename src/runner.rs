//! The test runner holding the fixture tree and the run configuration.

use crate::capture;
use crate::fixture::{Context, FixtureId, Tree};
use crate::registry::{Registry, RegistryError};
use crate::report::{Driver, Reporter};
use crate::reporter::{self, ColorConfig, ReporterDef, UnknownReporter, REPORTERS};
use crate::suite::run_suite;
use std::any::TypeId;
use std::collections::HashSet;
use std::fmt::Debug;
use std::io::{self, Write};
use std::sync::Once;
use std::time::Instant;

/// Knobs consulted while a run is in progress.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct RunOptions {
    pub(crate) bail: bool,
}

/// Owns the root suite and runs everything registered under it.
///
/// A fresh runner starts with an empty root suite. Fixtures are added
/// through the registration methods (or [`Runner::register`] for nested
/// suites), the run is configured through the setters, and
/// [`Runner::run_tests`] executes the whole tree and reports the result.
///
/// ```
/// let mut runner = cortado::Runner::new();
/// let test = runner.test("arithmetic still works", |_cx| 2 + 2)?;
/// runner.returns(test, 4);
/// assert!(runner.run_tests());
/// # Ok::<(), cortado::RegistryError>(())
/// ```
pub struct Runner {
    tree: Tree,
    wrapped: HashSet<TypeId>,
    options: RunOptions,
    reporter: &'static ReporterDef,
    color: ColorConfig,
    output: Option<Box<dyn Write>>,
    stdout: Option<Box<dyn Write>>,
}

impl Default for Runner {
    fn default() -> Self {
        Self::new()
    }
}

impl Runner {
    /// Creates a runner with an empty root suite and the default reporter.
    pub fn new() -> Self {
        Self {
            tree: Tree::new(),
            wrapped: HashSet::new(),
            options: RunOptions::default(),
            reporter: &REPORTERS[0],
            color: ColorConfig::default(),
            output: None,
            stdout: None,
        }
    }

    fn root_registry(&mut self) -> Registry<'_> {
        let root = self.tree.root();
        Registry::new(&mut self.tree, &mut self.wrapped, root)
    }

    /// Hands `body` a registry scoped to the root suite.
    ///
    /// This is the entry point used by [`cli::run_tests`](crate::cli::run_tests)
    /// and the natural place to describe a whole tree in one closure.
    pub fn register<F>(&mut self, body: F) -> Result<(), RegistryError>
    where
        F: FnOnce(&mut Registry<'_>) -> Result<(), RegistryError>,
    {
        body(&mut self.root_registry())
    }

    /// Registers a suite under the root. See [`Registry::suite`].
    pub fn suite<F>(&mut self, name: &str, body: F) -> Result<FixtureId, RegistryError>
    where
        F: FnOnce(&mut Registry<'_>) -> Result<(), RegistryError> + 'static,
    {
        self.root_registry().suite(name, body)
    }

    /// Registers a test under the root. See [`Registry::test`].
    pub fn test<F, R>(&mut self, desc: &str, body: F) -> Result<FixtureId, RegistryError>
    where
        F: FnMut(&mut Context<'_>) -> R + 'static,
        R: Debug + 'static,
    {
        self.root_registry().test(desc, body)
    }

    /// Registers a one-time setup on the root suite.
    pub fn suite_setup<F>(&mut self, body: F) -> Result<FixtureId, RegistryError>
    where
        F: FnMut(&mut Context<'_>) + 'static,
    {
        self.root_registry().suite_setup(body)
    }

    /// Registers a one-time teardown on the root suite.
    pub fn suite_teardown<F>(&mut self, body: F) -> Result<FixtureId, RegistryError>
    where
        F: FnMut(&mut Context<'_>) + 'static,
    {
        self.root_registry().suite_teardown(body)
    }

    /// Registers a per-test setup on the root suite.
    pub fn setup<F>(&mut self, body: F) -> Result<FixtureId, RegistryError>
    where
        F: FnMut(&mut Context<'_>) + 'static,
    {
        self.root_registry().setup(body)
    }

    /// Registers a per-test teardown on the root suite.
    pub fn teardown<F>(&mut self, body: F) -> Result<FixtureId, RegistryError>
    where
        F: FnMut(&mut Context<'_>) + 'static,
    {
        self.root_registry().teardown(body)
    }

    /// Marks a fixture as skipped.
    pub fn skip(&mut self, id: FixtureId) {
        self.root_registry().skip(id);
    }

    /// Marks a fixture as skipped when `condition` holds.
    pub fn skip_if(&mut self, id: FixtureId, condition: bool) {
        self.root_registry().skip_if(id, condition);
    }

    /// Expects the test to panic with a message containing `pattern`.
    pub fn raises(&mut self, id: FixtureId, pattern: impl Into<String>) {
        self.root_registry().raises(id, pattern);
    }

    /// Expects the test to return `value`.
    pub fn returns<T>(&mut self, id: FixtureId, value: T)
    where
        T: PartialEq + Debug + 'static,
    {
        self.root_registry().returns(id, value);
    }

    /// Expects the test to return a float within `tolerance` of `value`.
    pub fn returns_approx(&mut self, id: FixtureId, value: f64, tolerance: f64) {
        self.root_registry().returns_approx(id, value, tolerance);
    }

    /// Mocha-style alias for [`Runner::suite`].
    pub fn describe<F>(&mut self, name: &str, body: F) -> Result<FixtureId, RegistryError>
    where
        F: FnOnce(&mut Registry<'_>) -> Result<(), RegistryError> + 'static,
    {
        self.suite(name, body)
    }

    /// Mocha-style alias for [`Runner::test`].
    pub fn it<F, R>(&mut self, desc: &str, body: F) -> Result<FixtureId, RegistryError>
    where
        F: FnMut(&mut Context<'_>) -> R + 'static,
        R: Debug + 'static,
    {
        self.test(desc, body)
    }

    /// Mocha-style alias for [`Runner::suite_setup`].
    pub fn before<F>(&mut self, body: F) -> Result<FixtureId, RegistryError>
    where
        F: FnMut(&mut Context<'_>) + 'static,
    {
        self.suite_setup(body)
    }

    /// Mocha-style alias for [`Runner::suite_teardown`].
    pub fn after<F>(&mut self, body: F) -> Result<FixtureId, RegistryError>
    where
        F: FnMut(&mut Context<'_>) + 'static,
    {
        self.suite_teardown(body)
    }

    /// Mocha-style alias for [`Runner::setup`].
    pub fn before_each<F>(&mut self, body: F) -> Result<FixtureId, RegistryError>
    where
        F: FnMut(&mut Context<'_>) + 'static,
    {
        self.setup(body)
    }

    /// Mocha-style alias for [`Runner::teardown`].
    pub fn after_each<F>(&mut self, body: F) -> Result<FixtureId, RegistryError>
    where
        F: FnMut(&mut Context<'_>) + 'static,
    {
        self.teardown(body)
    }

    /// Stops the run at the first failure.
    pub fn bail(&mut self, bail: bool) {
        self.options.bail = bail;
    }

    /// Selects one of the built-in reporters by name.
    ///
    /// The available names are listed by [`reporters`](crate::reporters).
    pub fn reporter(&mut self, name: &str) -> Result<(), UnknownReporter> {
        self.reporter = reporter::by_name(name).ok_or_else(|| UnknownReporter(name.to_owned()))?;
        Ok(())
    }

    /// Controls whether the reporter output is colored.
    pub fn color(&mut self, color: ColorConfig) {
        self.color = color;
    }

    /// Redirects the reporter output away from the process stdout.
    ///
    /// The sink is handed to the reporter on the next [`Runner::run_tests`]
    /// call and consumed by it; later runs print to stdout again.
    pub fn output(&mut self, sink: impl Write + 'static) {
        self.output = Some(Box::new(sink));
    }

    /// Collects everything the fixtures print through [`print!`](crate::print)
    /// and [`println!`](crate::println) into `sink` instead of stdout.
    ///
    /// The sink is installed for the duration of the run and handed back to
    /// the runner afterwards, so it stays in effect for later runs.
    pub fn stdout(&mut self, sink: impl Write + 'static) {
        self.stdout = Some(Box::new(sink));
    }

    /// Runs the whole tree with the configured reporter.
    ///
    /// Returns `true` when no test or hook failed.
    ///
    /// Every run starts from fresh counters, but skip marks on the
    /// fixtures are never cleared: a fixture skipped in one run stays
    /// skipped in every later run of the same runner.
    pub fn run_tests(&mut self) -> bool {
        let output = reporter::build_output(self.output.take(), self.color);
        let mut reporter = (self.reporter.build)(output);
        self.run_with(&mut *reporter)
    }

    /// Runs the whole tree with a caller-supplied reporter.
    ///
    /// Counters reset per run while skip marks persist, as described on
    /// [`Runner::run_tests`].
    pub fn run_with(&mut self, reporter: &mut dyn Reporter) -> bool {
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            maybe_unwind::set_hook();
        });

        let mut driver = Driver::new(reporter, self.options);
        driver.start();

        let started = Instant::now();
        let redirect = self.stdout.take().map(capture::Redirect::install);
        let root = self.tree.root();
        let _ = run_suite(&mut self.tree, root, &mut driver);
        if let Some(redirect) = redirect {
            self.stdout = redirect.uninstall();
        }

        driver.end(started.elapsed());
        driver.summary().is_passed()
    }

    /// Writes the registered tree to `w`, one fixture per line.
    ///
    /// Suites appear bare at their nesting depth and tests carry a
    /// `: test` suffix, followed by a count of the tests found.
    pub fn write_list(&self, w: &mut dyn io::Write) -> io::Result<()> {
        fn plural_suffix(n: usize) -> &'static str {
            match n {
                1 => "",
                _ => "s",
            }
        }

        fn walk(
            tree: &Tree,
            id: FixtureId,
            depth: usize,
            num_tests: &mut usize,
            w: &mut dyn io::Write,
        ) -> io::Result<()> {
            for &child in &tree.suite(id).children {
                if tree.nodes[child.0].is_suite() {
                    writeln!(w, "{}{}", reporter::indent(depth), tree.name(child))?;
                    walk(tree, child, depth + 1, num_tests, w)?;
                } else {
                    *num_tests += 1;
                    writeln!(w, "{}{}: test", reporter::indent(depth), tree.name(child))?;
                }
            }
            Ok(())
        }

        let mut num_tests = 0;
        walk(&self.tree, self.tree.root(), 0, &mut num_tests, w)?;

        if num_tests != 0 {
            writeln!(w)?;
        }
        writeln!(w, "{} test{}", num_tests, plural_suffix(num_tests))
    }
}
