//! The minimum output reporter.

use super::{build_output, write_summary, ColorConfig, Output};
use crate::report::{Reporter, Summary};
use std::io::Write as _;
use std::time::Duration;

/// Reporter with minimal output. Nothing is printed while the run is in
/// progress; the summary appears once at the end, wrapped in blank lines.
pub struct MinReporter {
    out: Output,
}

impl MinReporter {
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

impl Reporter for MinReporter {
    fn end(&mut self, elapsed: Duration, summary: &Summary) {
        let _ = writeln!(self.out);
        let _ = write_summary(&mut *self.out, summary, elapsed);
        let _ = writeln!(self.out);
    }
}
