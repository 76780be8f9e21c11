//! Built-in reporters and their shared output plumbing.

mod debug;
mod default;
mod log;
mod min;

pub use self::{
    debug::DebugReporter, default::DefaultReporter, log::LogReporter, min::MinReporter,
};

use crate::report::{Reporter, Summary};
use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;
use std::time::Duration;
use termcolor::{Ansi, Color, ColorChoice, ColorSpec, NoColor, StandardStream, WriteColor};
use thiserror::Error;

#[cfg(not(windows))]
pub(crate) const CHECK_SYMBOL: &str = "✓";
#[cfg(windows)]
pub(crate) const CHECK_SYMBOL: &str = "√";

/// The color configuration for report output.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ColorConfig {
    Auto,
    Always,
    Never,
}

impl Default for ColorConfig {
    fn default() -> Self {
        ColorConfig::Auto
    }
}

impl FromStr for ColorConfig {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(ColorConfig::Auto),
            "always" => Ok(ColorConfig::Always),
            "never" => Ok(ColorConfig::Never),
            v => Err(anyhow::anyhow!(
                "argument for --color must be auto, always, or never (was {})",
                v
            )),
        }
    }
}

/// The stream a reporter writes to.
pub(crate) type Output = Box<dyn WriteColor>;

/// Builds the report stream. The standard output follows the usual color
/// detection; a custom sink is colored only under `Always`.
pub(crate) fn build_output(sink: Option<Box<dyn Write>>, color: ColorConfig) -> Output {
    match sink {
        None => {
            let choice = match color {
                ColorConfig::Auto => ColorChoice::Auto,
                ColorConfig::Always => ColorChoice::Always,
                ColorConfig::Never => ColorChoice::Never,
            };
            Box::new(StandardStream::stdout(choice))
        }
        Some(sink) => match color {
            ColorConfig::Always => Box::new(Ansi::new(sink)),
            _ => Box::new(NoColor::new(sink)),
        },
    }
}

pub(crate) struct Colored<T> {
    val: T,
    spec: Option<ColorSpec>,
}

impl<T> Colored<T> {
    pub(crate) fn fg(mut self, color: Color) -> Self {
        self.spec
            .get_or_insert_with(ColorSpec::new)
            .set_fg(Some(color));
        self
    }

    pub(crate) fn intense(mut self) -> Self {
        self.spec
            .get_or_insert_with(ColorSpec::new)
            .set_intense(true);
        self
    }

    pub(crate) fn fmt_colored<W: ?Sized>(&self, w: &mut W) -> io::Result<()>
    where
        T: fmt::Display,
        W: WriteColor,
    {
        if let Some(spec) = &self.spec {
            w.set_color(spec)?;
        }
        write!(w, "{}", self.val)?;
        if self.spec.is_some() {
            w.reset()?;
        }
        Ok(())
    }
}

pub(crate) fn colored<T>(val: T) -> Colored<T> {
    Colored { val, spec: None }
}

pub(crate) fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

/// Short human form of an elapsed duration, `1µs` at minimum.
pub(crate) fn format_duration_short(elapsed: Duration) -> String {
    let secs = elapsed.as_secs_f64();
    if secs >= 3600.0 {
        format!("{}h", (secs / 3600.0).round() as u64)
    } else if secs >= 60.0 {
        format!("{}m", (secs / 60.0).round() as u64)
    } else if secs >= 1.0 {
        format!("{}s", secs.round() as u64)
    } else if secs >= 1e-3 {
        format!("{}ms", (secs * 1e3).round() as u64)
    } else {
        format!("{}µs", ((secs * 1e6).round() as u64).max(1))
    }
}

/// Writes the closing summary: the totals first, then every failure with
/// its number, name, and detail lines.
pub(crate) fn write_summary(
    w: &mut dyn WriteColor,
    summary: &Summary,
    elapsed: Duration,
) -> io::Result<()> {
    if summary.passes() > 0 {
        colored(format!("  {} passing", summary.passes()))
            .fg(Color::Green)
            .fmt_colored(w)?;
        write!(w, " ")?;
        colored(format!("({})", format_duration_short(elapsed)))
            .fg(Color::Black)
            .intense()
            .fmt_colored(w)?;
        writeln!(w)?;
    }

    if summary.pending() > 0 {
        colored(format!("  {} pending", summary.pending()))
            .fg(Color::Cyan)
            .fmt_colored(w)?;
        writeln!(w)?;
    }

    if summary.num_failures() > 0 {
        colored(format!("  {} failing", summary.num_failures()))
            .fg(Color::Red)
            .fmt_colored(w)?;
        writeln!(w)?;
    }

    for (i, entry) in summary.failures().iter().enumerate() {
        writeln!(w)?;
        writeln!(w, "  {}) {}", i + 1, entry.name())?;
        let detail = entry.failure().to_string();
        for line in detail.lines() {
            let line = if line.starts_with("at ") {
                colored(format!("     {}", line)).fg(Color::Black).intense()
            } else {
                colored(format!("     {}", line)).fg(Color::Red)
            };
            line.fmt_colored(w)?;
            writeln!(w)?;
        }
    }

    Ok(())
}

pub(crate) struct ReporterDef {
    pub(crate) name: &'static str,
    pub(crate) description: &'static str,
    pub(crate) build: fn(Output) -> Box<dyn Reporter>,
}

pub(crate) static REPORTERS: &[ReporterDef] = &[
    ReporterDef {
        name: "default",
        description: "hierarchical list",
        build: DefaultReporter::boxed,
    },
    ReporterDef {
        name: "min",
        description: "minimum output",
        build: MinReporter::boxed,
    },
    ReporterDef {
        name: "debug",
        description: "verbose output for debugging the runner",
        build: DebugReporter::boxed,
    },
    ReporterDef {
        name: "log",
        description: "events through the log facade",
        build: LogReporter::boxed,
    },
];

pub(crate) fn by_name(name: &str) -> Option<&'static ReporterDef> {
    REPORTERS.iter().find(|def| def.name == name)
}

/// Name and description of every built-in reporter, in lookup order.
pub fn reporters() -> impl Iterator<Item = (&'static str, &'static str)> {
    REPORTERS.iter().map(|def| (def.name, def.description))
}

/// The reporter name handed to [`Runner::reporter`](crate::Runner::reporter)
/// is not one of the built-ins.
#[derive(Debug, Error)]
#[error("unknown reporter: {0}")]
pub struct UnknownReporter(pub(crate) String);

impl UnknownReporter {
    /// The rejected name.
    pub fn name(&self) -> &str {
        &self.0
    }
}
