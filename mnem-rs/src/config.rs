//! Run configuration: which script, where imports look, call-depth limit.
//!
//! Library directories are searched in this order:
//!
//! | Source | Example |
//! |--------|---------|
//! | `-L <dir>` flags, in the order given | `mnem -L ./lib prog.txt` |
//! | `MNEM_PATH`, split like `PATH` | `MNEM_PATH=/opt/mnem:/usr/share/mnem` |
//! | platform data directory | `~/.local/share/mnem/lib` |

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use crate::cli::CliArgs;
use crate::script::{ErrorKind, ScriptError};

/// Script run when no path is given.
pub const DEFAULT_SCRIPT: &str = "main.txt";
pub const DEFAULT_MAX_DEPTH: usize = 256;
/// Environment variable holding extra library directories.
pub const PATH_ENV: &str = "MNEM_PATH";

#[derive(Debug, Clone)]
pub struct Config {
    pub script: PathBuf,
    pub lib_dirs: Vec<PathBuf>,
    pub max_depth: usize,
    /// Print the `inp` prompt before reading.
    pub prompt: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            script: PathBuf::from(DEFAULT_SCRIPT),
            lib_dirs: Vec::new(),
            max_depth: DEFAULT_MAX_DEPTH,
            prompt: false,
        }
    }
}

impl Config {
    /// Build the configuration for a command-line run.
    pub fn from_args(args: &CliArgs) -> Result<Config, ScriptError> {
        if args.files.len() > 1 {
            return Err(ScriptError::new(
                ErrorKind::Config,
                "only takes in 1 parameter (fileName)",
            ));
        }
        Ok(Config {
            script: args
                .files
                .first()
                .cloned()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SCRIPT)),
            lib_dirs: library_dirs(&args.lib_dirs),
            max_depth: args.max_depth,
            prompt: !args.no_prompt && stdin_is_tty(),
        })
    }

    /// Find an importable file: as given, then next to the importing file,
    /// then in each library directory.
    pub fn locate(&self, file: &str, from: Option<&Path>) -> Option<PathBuf> {
        let requested = PathBuf::from(file);
        std::iter::once(requested)
            .chain(from.map(|dir| dir.join(file)))
            .chain(self.lib_dirs.iter().map(|dir| dir.join(file)))
            .find(|candidate| candidate.is_file())
    }
}

/// CLI directories first, then `MNEM_PATH`, then the platform data dir.
pub fn library_dirs(cli: &[PathBuf]) -> Vec<PathBuf> {
    let mut dirs = cli.to_vec();
    if let Some(paths) = std::env::var_os(PATH_ENV) {
        dirs.extend(std::env::split_paths(&paths).filter(|p| !p.as_os_str().is_empty()));
    }
    if let Some(project) = ProjectDirs::from("", "", "mnem") {
        dirs.push(project.data_dir().join("lib"));
    }
    dirs
}

pub fn stdin_is_tty() -> bool {
    // SAFETY: isatty only inspects the descriptor.
    unsafe { libc::isatty(libc::STDIN_FILENO) != 0 }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
