/*!
A Mocha-flavored unit testing framework with nested suites, hooks, and
pluggable reporters.

Fixtures are registered on a [`Runner`] and executed depth first. Suites
nest freely, hooks wrap the tests of their own suite and of every suite
below it, and expectations turn panics and return values into pass or
fail verdicts.

```
let mut runner = cortado::Runner::new();

runner.suite("arithmetic", |s| {
    s.setup(|_cx| cortado::println!("fresh numbers"))?;

    let sum = s.test("addition", |_cx| 2 + 2)?;
    s.returns(sum, 4);

    let boom = s.test("overflow is loud", |_cx| -> u32 { panic!("overflow") })?;
    s.raises(boom, "overflow");

    Ok(())
})?;

assert!(runner.run_tests());
# Ok::<(), cortado::RegistryError>(())
```

Test binaries hand the whole tree to [`cli::run_tests`], which layers
command line flags over the same machinery:

```no_run
fn main() {
    cortado::cli::run_tests(|r| {
        r.it("works", |_cx| {})?;
        Ok(())
    });
}
```
!*/

mod fixture;
mod hook;
mod outcome;
mod registry;
mod report;
mod reporter;
mod runner;
mod suite;

#[doc(hidden)]
pub mod capture;
pub mod cli;

pub use crate::fixture::{Context, FixtureId, HookKind};
pub use crate::outcome::Failure;
pub use crate::registry::{Registry, RegistryError};
pub use crate::report::{FailureEntry, HookDesc, Reporter, SuiteDesc, Summary, TestDesc};
pub use crate::reporter::{
    reporters, ColorConfig, DebugReporter, DefaultReporter, LogReporter, MinReporter,
    UnknownReporter,
};
pub use crate::runner::Runner;
