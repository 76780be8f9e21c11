//! Components for building a test binary around a [`Runner`](crate::Runner).

mod args;
mod exit_status;

pub use self::exit_status::ExitStatus;

use self::args::Args;
use crate::registry::{Registry, RegistryError};
use crate::runner::Runner;

/// Parses the command line, registers `body` on a fresh runner, and runs
/// the tree, terminating the process with the resulting status.
///
/// ```no_run
/// fn main() {
///     cortado::cli::run_tests(|r| {
///         let test = r.test("two plus two", |_cx| 2 + 2)?;
///         r.returns(test, 4);
///         Ok(())
///     });
/// }
/// ```
pub fn run_tests<F>(body: F) -> !
where
    F: FnOnce(&mut Registry<'_>) -> Result<(), RegistryError>,
{
    run_tests_inner(body).exit();
}

fn run_tests_inner<F>(body: F) -> ExitStatus
where
    F: FnOnce(&mut Registry<'_>) -> Result<(), RegistryError>,
{
    let args = match Args::from_env() {
        Ok(args) => args,
        Err(st) => return st,
    };

    let mut runner = Runner::new();
    runner.bail(args.bail);
    runner.color(args.color);

    if let Some(name) = &args.reporter {
        if let Err(err) = runner.reporter(name) {
            eprintln!("CLI argument error: {}", err);
            eprintln!("available reporters:");
            for (name, description) in crate::reporters() {
                eprintln!("  {} - {}", name, description);
            }
            return ExitStatus::FAILED;
        }
    }

    if let Err(err) = runner.register(body) {
        eprintln!("registry error: {}", err);
        return ExitStatus::FAILED;
    }

    if args.list {
        let stdout = std::io::stdout();
        let _ = runner.write_list(&mut stdout.lock());
        return ExitStatus::OK;
    }

    ExitStatus::from_passed(runner.run_tests())
}
