//! Error taxonomy and diagnostic formatting.
//!
//! Every error is fatal.  Command handlers report a [`Failure`] tag; the
//! control-flow engine turns it into a [`ScriptError`] carrying the line of
//! the instruction that failed.  Errors raised inside a function call keep
//! the innermost line as they propagate out through the callers.
//!
//! Rendered form: `<Kind> Error[: description][ || line <n>]`.

use std::fmt;

use thiserror::Error;

use super::expr::ExprError;
use super::source::Instruction;

/// Crate-wide result type for loading and running scripts.
pub type Result<T> = std::result::Result<T, ScriptError>;

// ── ErrorKind ─────────────────────────────────────────────────────────────────

/// Classification of a fatal diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Source file could not be read.
    File,
    /// Unknown mnemonic, wrong arity, failed cast, disallowed destination.
    Type,
    /// Subscript out of range.
    Index,
    /// Undeclared read, re-assignment, parameter-count mismatch.
    Variable,
    /// Loop body runs past the end of the program.
    Loop,
    /// Name collision or missing name on import.
    Import,
    /// Malformed `fun`/`ret` block.
    Function,
    /// Raised by `err`.
    User,
    /// Any other handler failure.
    Generic,
    /// Bad command-line usage (entry point only).
    Config,
}

impl ErrorKind {
    pub fn label(self) -> &'static str {
        match self {
            ErrorKind::File => "File",
            ErrorKind::Type => "Type",
            ErrorKind::Index => "Index",
            ErrorKind::Variable => "Variable",
            ErrorKind::Loop => "Loop",
            ErrorKind::Import => "Import",
            ErrorKind::Function => "Function",
            ErrorKind::User => "User",
            ErrorKind::Generic => "Generic",
            ErrorKind::Config => "Interpreter",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ── ScriptError ───────────────────────────────────────────────────────────────

/// A fatal diagnostic, ready to print.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} Error{}{}", describe(.description), at_line(.line))]
pub struct ScriptError {
    pub kind: ErrorKind,
    pub description: String,
    /// 1-based source line of the failing instruction, when known.
    pub line: Option<usize>,
}

fn describe(description: &str) -> String {
    if description.is_empty() {
        String::new()
    } else {
        format!(": {description}")
    }
}

fn at_line(line: &Option<usize>) -> String {
    line.map(|n| format!(" || line {n}")).unwrap_or_default()
}

impl ScriptError {
    pub fn new(kind: ErrorKind, description: impl Into<String>) -> Self {
        ScriptError {
            kind,
            description: description.into(),
            line: None,
        }
    }

    /// Attach `line` unless a (more specific) line is already recorded.
    pub fn with_line(mut self, line: usize) -> Self {
        self.line.get_or_insert(line);
        self
    }
}

// ── Failure ───────────────────────────────────────────────────────────────────

/// Outcome of a failed command handler, before it is tied to an instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum Failure {
    /// Write to a variable that already holds a value.
    Redeclared(String),
    /// Read of a name that is not bound.
    Undeclared,
    /// Read of a name declared with a kind but never given a value.
    Unassigned(String),
    /// A parameter could not be converted to the type the command needs.
    BadType,
    /// Wrong number of parameters for the command.
    Arity,
    /// Subscript out of range.
    BadIndex,
    /// `err` was executed.
    User,
    /// Anything else; the detail is folded into the message.
    Generic(String),
    /// A fully described error that only lacks a line number.
    Fault(ErrorKind, String),
    /// An error already diagnosed in a nested context.
    Raised(ScriptError),
}

impl Failure {
    pub fn fault(kind: ErrorKind, description: impl Into<String>) -> Self {
        Failure::Fault(kind, description.into())
    }

    /// Build the diagnostic for this failure as raised by `inst`.
    pub fn diagnose(self, inst: &Instruction) -> ScriptError {
        let (kind, description) = match self {
            Failure::Redeclared(name) => (
                ErrorKind::Variable,
                format!("variable '{name}' has already been declared"),
            ),
            Failure::Undeclared => (
                ErrorKind::Variable,
                "attempting to use an undeclared variable".to_owned(),
            ),
            Failure::Unassigned(name) => (
                ErrorKind::Variable,
                format!("variable '{name}' has been declared but not assigned"),
            ),
            Failure::BadType => (ErrorKind::Type, "incorrect parameter type".to_owned()),
            Failure::Arity => (
                ErrorKind::Type,
                format!(
                    "incorrect parameter type or number of parameters for command '{}'",
                    inst.mnemonic
                ),
            ),
            Failure::BadIndex => (
                ErrorKind::Index,
                format!("invalid index while executing '{inst}'"),
            ),
            Failure::User => (ErrorKind::User, inst.params.join(",")),
            Failure::Generic(detail) if detail.is_empty() => {
                (ErrorKind::Generic, format!("executing '{inst}'"))
            }
            Failure::Generic(detail) => (
                ErrorKind::Generic,
                format!("{detail} while executing '{inst}'"),
            ),
            Failure::Fault(kind, description) => (kind, description),
            Failure::Raised(err) => return err.with_line(inst.line),
        };
        ScriptError::new(kind, description).with_line(inst.line)
    }
}

impl From<ScriptError> for Failure {
    fn from(err: ScriptError) -> Self {
        Failure::Raised(err)
    }
}

impl From<ExprError> for Failure {
    fn from(err: ExprError) -> Self {
        match err {
            ExprError::Name(_) => Failure::Undeclared,
            ExprError::Type(_) => Failure::BadType,
            ExprError::Syntax(_) | ExprError::ZeroDivision | ExprError::Overflow => {
                Failure::Generic(err.to_string())
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
