//! Source preprocessing: raw text → [`Instruction`] sequence → [`Script`].
//!
//! The language is line oriented.  Before a line is split, every space is
//! removed and `_` stands in for a literal space, so `out "Hello_world"`
//! prints `Hello world`.  A `;` separates several statements on one physical
//! line; each of them reports that physical line in diagnostics.

use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tracing::debug;

use super::error::{ErrorKind, Result, ScriptError};
use super::func::{extract_functions, FunctionTable};

// ── Instruction ───────────────────────────────────────────────────────────────

/// One statement: a three-character mnemonic and its parameter tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub mnemonic: String,
    pub params: Vec<String>,
    /// 1-based physical line in the originating source.
    pub line: usize,
}

impl Instruction {
    /// Split one preprocessed logical line into mnemonic and parameters.
    pub(crate) fn parse(logical: &str, line: usize) -> Self {
        let split = logical
            .char_indices()
            .nth(3)
            .map(|(i, _)| i)
            .unwrap_or(logical.len());
        let (mnemonic, rest) = logical.split_at(split);
        let params = if rest.is_empty() {
            Vec::new()
        } else {
            rest.split(',').map(str::to_owned).collect()
        };
        Instruction {
            mnemonic: mnemonic.to_owned(),
            params,
            line,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.mnemonic)?;
        if !self.params.is_empty() {
            write!(f, " {}", self.params.join(","))?;
        }
        Ok(())
    }
}

// ── Tokenizer ─────────────────────────────────────────────────────────────────

/// Turn source text into instructions, in source order.
pub fn tokenize(src: &str) -> Vec<Instruction> {
    let mut out = Vec::new();
    for (idx, raw) in src.lines().enumerate() {
        let cleaned: String = raw
            .chars()
            .filter(|&c| c != ' ')
            .map(|c| if c == '_' { ' ' } else { c })
            .collect();
        for logical in cleaned.split(';').filter(|s| !s.is_empty()) {
            out.push(Instruction::parse(logical, idx + 1));
        }
    }
    out
}

/// Read a source file, mapping any I/O failure to a `File` error.
pub fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|_| {
        ScriptError::new(
            ErrorKind::File,
            format!("unable to read file: '{}'", path.display()),
        )
    })
}

// ── Script ────────────────────────────────────────────────────────────────────

/// A loaded source file: its top-level program and its function table.
///
/// Loading never executes anything; imports reuse this to pull function
/// definitions out of other files.
#[derive(Debug, Clone)]
pub struct Script {
    path: Option<PathBuf>,
    program: Rc<[Instruction]>,
    functions: Rc<FunctionTable>,
}

impl Script {
    /// Tokenize and extract functions from `src`.  `origin` is the file the
    /// text came from; imports inside it resolve relative to its directory.
    pub fn parse(src: &str, origin: Option<&Path>) -> Result<Script> {
        let dir = origin.map(|p| p.parent().unwrap_or(Path::new("")).to_path_buf());
        let (program, functions) = extract_functions(tokenize(src), dir.as_deref())?;
        debug!(
            path = ?origin,
            instructions = program.len(),
            functions = functions.len(),
            "loaded script"
        );
        Ok(Script {
            path: origin.map(Path::to_path_buf),
            program: program.into(),
            functions: Rc::new(functions),
        })
    }

    pub fn load(path: &Path) -> Result<Script> {
        let src = read_source(path)?;
        Script::parse(&src, Some(path))
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Directory imports are resolved against.
    pub fn dir(&self) -> Option<&Path> {
        self.path.as_deref().map(|p| p.parent().unwrap_or(Path::new("")))
    }

    pub fn program(&self) -> &[Instruction] {
        &self.program
    }

    pub fn functions(&self) -> &FunctionTable {
        &self.functions
    }

    pub(crate) fn program_rc(&self) -> Rc<[Instruction]> {
        Rc::clone(&self.program)
    }

    pub(crate) fn functions_rc(&self) -> Rc<FunctionTable> {
        Rc::clone(&self.functions)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
