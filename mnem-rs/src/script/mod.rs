//! The mnemonic scripting language.
//!
//! A program is a sequence of lines, each `mnemonic p1, p2, …`.  Loading
//! splits the source into [`Instruction`]s, lifts `fun`…`ret` blocks into a
//! [`FunctionTable`] and leaves the remaining top-level program to the
//! [`Interpreter`].
//!
//! - [`source`] and [`func`]: tokenising and function extraction
//! - [`value`] and [`expr`]: typed values and the expression evaluator
//! - [`store`] and [`dispatch`]: variable bindings and the store commands
//! - [`interp`]: control flow, calls, imports and console I/O
//!
//! # Quick start
//!
//! ```rust
//! use mnem::config::Config;
//! use mnem::console::BufferConsole;
//! use mnem::script::Interpreter;
//!
//! let mut interp = Interpreter::with_console(BufferConsole::new(), Config::default());
//! let script = interp.load_str("int x, 6\nmul y, x, 7\nout y", None).unwrap();
//! interp.run(&script).unwrap();
//! assert_eq!(interp.console.lines(), vec!["42.0"]);
//! ```

pub mod dispatch;
pub mod error;
pub mod expr;
pub mod func;
pub mod interp;
pub mod source;
pub mod store;
pub mod value;

// Re-exports for convenience.
pub use error::{ErrorKind, Result, ScriptError};
pub use func::{FunctionDef, FunctionTable};
pub use interp::Interpreter;
pub use source::{Instruction, Script};
pub use store::{Slot, VarStore};
pub use value::{Binding, Kind, Value};
