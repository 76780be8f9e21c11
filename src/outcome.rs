//! Outcomes produced while running fixtures.

use maybe_unwind::Unwind;
use std::fmt;

/// Whether traversal may continue after a fixture has finished.
///
/// A hook failure always bails. A test failure bails only when the runner
/// was configured with [`bail`](crate::Runner::bail). Callers must not
/// drop the value on the floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub(crate) enum Flow {
    Continue,
    Bail,
}

impl Flow {
    #[inline]
    pub(crate) fn is_bail(self) -> bool {
        matches!(self, Flow::Bail)
    }
}

/// Reason a test or hook was recorded as failed.
#[derive(Debug)]
pub enum Failure {
    /// The body panicked and no expectation absorbed the panic.
    Panicked(Unwind),
    /// The test was expected to panic but returned normally.
    DidNotRaise {
        /// Substring the panic message was expected to contain.
        expected: String,
    },
    /// The test returned a value other than the expected one.
    DidNotReturn {
        /// Debug rendering of the expected value.
        expected: String,
        /// Debug rendering of the value the body actually returned.
        actual: String,
        /// Whether the comparison was the approximate one.
        approx: bool,
    },
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::Panicked(unwind) => {
                write!(f, "{}", unwind.payload_str())?;
                if let Some(location) = unwind.location() {
                    write!(
                        f,
                        "\nat {}:{}:{}",
                        location.file(),
                        location.line(),
                        location.column()
                    )?;
                }
                Ok(())
            }
            Failure::DidNotRaise { expected } => write!(
                f,
                "Expected test to panic with a message containing {:?}",
                expected
            ),
            Failure::DidNotReturn {
                expected,
                actual,
                approx: false,
            } => write!(f, "Expected test to return {}, actual: {}", expected, actual),
            Failure::DidNotReturn {
                expected,
                actual,
                approx: true,
            } => write!(
                f,
                "Expected test to return approximately {}, actual: {}",
                expected, actual
            ),
        }
    }
}
