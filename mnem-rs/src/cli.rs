//! Command-line argument parsing.
//!
//! Usage:
//!   mnem [-L <dir>]... [--max-depth <n>] [--no-prompt] [-v]... [<file>]

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::config::DEFAULT_MAX_DEPTH;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "mnem", version, about = "Run a mnemonic script")]
pub struct CliArgs {
    /// Script to run (default: main.txt).
    ///
    /// Collected as a list so that extra paths are reported by the
    /// interpreter instead of as a usage error.
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Extra directory searched by `imp`/`ias` (repeatable, searched first).
    #[arg(short = 'L', long = "lib", value_name = "DIR")]
    pub lib_dirs: Vec<PathBuf>,

    /// Maximum nesting of function calls.
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    /// Never print the `inp` prompt, even on a terminal.
    #[arg(long)]
    pub no_prompt: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Parse `std::env::args_os()`.
pub fn parse_args() -> Result<CliArgs, clap::Error> {
    CliArgs::try_parse()
}

/// Parse arguments without the program name (exposed for testing).
pub fn parse_argv<I, T>(argv: I) -> Result<CliArgs, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let program = std::iter::once(OsString::from("mnem"));
    CliArgs::try_parse_from(program.chain(argv.into_iter().map(Into::into)))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_args() {
        let a = parse_argv::<_, &str>([]).unwrap();
        assert!(a.files.is_empty());
        assert!(a.lib_dirs.is_empty());
        assert_eq!(a.max_depth, DEFAULT_MAX_DEPTH);
        assert!(!a.no_prompt);
        assert_eq!(a.verbose, 0);
    }

    #[test]
    fn single_file() {
        let a = parse_argv(["prog.txt"]).unwrap();
        assert_eq!(a.files, vec![PathBuf::from("prog.txt")]);
    }

    #[test]
    fn extra_files_are_collected() {
        let a = parse_argv(["a.txt", "b.txt"]).unwrap();
        assert_eq!(a.files.len(), 2);
    }

    #[test]
    fn lib_dirs_repeat() {
        let a = parse_argv(["-L", "/one", "--lib", "/two", "-L/three"]).unwrap();
        assert_eq!(
            a.lib_dirs,
            vec![
                PathBuf::from("/one"),
                PathBuf::from("/two"),
                PathBuf::from("/three")
            ]
        );
    }

    #[test]
    fn verbosity_counts() {
        let a = parse_argv(["-vvv"]).unwrap();
        assert_eq!(a.verbose, 3);
    }

    #[test]
    fn max_depth_and_prompt() {
        let a = parse_argv(["--max-depth", "8", "--no-prompt", "x.txt"]).unwrap();
        assert_eq!(a.max_depth, 8);
        assert!(a.no_prompt);
    }

    #[test]
    fn bad_depth_rejected() {
        assert!(parse_argv(["--max-depth", "lots"]).is_err());
    }

    #[test]
    fn unknown_flag_rejected() {
        assert!(parse_argv(["--bogus"]).is_err());
    }
}
