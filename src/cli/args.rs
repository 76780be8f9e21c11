//! Definition of command line interface.

use crate::cli::exit_status::ExitStatus;
use crate::reporter::ColorConfig;
use getopts::Options;
use std::path::Path;

/// Command line arguments.
#[derive(Debug)]
pub struct Args {
    pub list: bool,
    pub bail: bool,
    pub reporter: Option<String>,
    pub color: ColorConfig,
}

impl Args {
    /// Parse command line arguments.
    pub fn from_env() -> Result<Self, ExitStatus> {
        let args: Vec<_> = std::env::args().collect();
        let parser = Parser::new(&args[..]);
        match parser.parse() {
            Ok(Some(args)) => Ok(args),
            Ok(None) => {
                parser.print_usage();
                Err(ExitStatus::OK)
            }
            Err(err) => {
                eprintln!("CLI argument error: {}", err);
                Err(ExitStatus::FAILED)
            }
        }
    }
}

struct Parser<'a> {
    args: &'a [String],
    opts: Options,
}

impl<'a> Parser<'a> {
    fn new(args: &'a [String]) -> Self {
        let mut reporter_help = String::from("Configure the report format:");
        for (name, description) in crate::reporters() {
            reporter_help.push_str(&format!("\n                {} = {};", name, description));
        }

        let mut opts = Options::new();
        opts.optflag("h", "help", "Display this message (longer with --help)");
        opts.optflag("", "list", "List all registered suites and tests");
        opts.optflag("b", "bail", "Stop running after the first failure");
        opts.optopt("", "reporter", &reporter_help, "NAME");
        opts.optopt(
            "",
            "color",
            "Configure coloring of output:
                auto   = colorize if stdout is a tty (default);
                always = always colorize output;
                never  = never colorize output;",
            "auto|always|never",
        );

        Self { args, opts }
    }

    fn print_usage(&self) {
        let binary = &self.args[0];
        let progname = Path::new(binary)
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or(binary);

        let message = format!("Usage: {} [OPTIONS]", progname);
        eprintln!("{}", self.opts.usage(&message));
    }

    fn parse(&self) -> anyhow::Result<Option<Args>> {
        let args = &self.args[..];

        let matches = self.opts.parse(args.get(1..).unwrap_or(args))?;
        if matches.opt_present("h") {
            return Ok(None);
        }

        let list = matches.opt_present("list");
        let bail = matches.opt_present("bail");
        let reporter = matches.opt_str("reporter");
        let color = matches.opt_get("color")?.unwrap_or(ColorConfig::Auto);

        Ok(Some(Args {
            list,
            bail,
            reporter,
            color,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(argv: &[&str]) -> anyhow::Result<Option<Args>> {
        let args: Vec<String> = argv.iter().map(|s| s.to_string()).collect();
        Parser::new(&args[..]).parse()
    }

    #[test]
    fn flags_land_in_their_fields() {
        let args = parse(&["prog", "--bail", "--reporter", "min", "--color", "never"])
            .unwrap()
            .unwrap();
        assert!(args.bail);
        assert!(!args.list);
        assert_eq!(args.reporter.as_deref(), Some("min"));
        assert_eq!(args.color, ColorConfig::Never);
    }

    #[test]
    fn defaults_apply_without_flags() {
        let args = parse(&["prog"]).unwrap().unwrap();
        assert!(!args.bail);
        assert!(!args.list);
        assert_eq!(args.reporter, None);
        assert_eq!(args.color, ColorConfig::Auto);
    }

    #[test]
    fn help_short_circuits_to_usage() {
        assert!(parse(&["prog", "-h"]).unwrap().is_none());
    }

    #[test]
    fn a_bad_color_value_is_an_error() {
        let err = parse(&["prog", "--color", "sometimes"]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "argument for --color must be auto, always, or never (was sometimes)"
        );
    }
}
