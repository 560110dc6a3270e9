//! Function definitions and the per-file function table.
//!
//! A definition is the block `fun name, retVar, params…` … `ret`.  Blocks are
//! lifted out of the instruction stream before anything runs, so a function
//! may be called from lines that precede its definition.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use super::error::{ErrorKind, Result, ScriptError};
use super::source::Instruction;

/// A callable block lifted out of a source file.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    /// Variable the body must assign before returning.
    pub ret: String,
    pub params: Vec<String>,
    pub body: Rc<[Instruction]>,
    /// Directory of the defining file; imports in the body resolve here.
    pub origin: Option<PathBuf>,
}

/// Name → definition.  Definitions are shared, never copied.
#[derive(Debug, Clone, Default)]
pub struct FunctionTable {
    defs: HashMap<String, Rc<FunctionDef>>,
}

impl FunctionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Rc<FunctionDef>> {
        self.defs.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.defs.contains_key(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, def: Rc<FunctionDef>) {
        self.defs.insert(name.into(), def);
    }

    /// Function names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.defs.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

fn function_error(message: impl Into<String>, line: usize) -> ScriptError {
    ScriptError::new(ErrorKind::Function, message).with_line(line)
}

/// Split `instrs` into the top-level program and the function table.
pub fn extract_functions(
    instrs: Vec<Instruction>,
    origin: Option<&Path>,
) -> Result<(Vec<Instruction>, FunctionTable)> {
    let mut program = Vec::with_capacity(instrs.len());
    let mut table = FunctionTable::new();
    let mut iter = instrs.into_iter();

    while let Some(inst) = iter.next() {
        match inst.mnemonic.as_str() {
            "fun" => {
                let mut body = Vec::new();
                let mut closed = false;
                for next in iter.by_ref() {
                    match next.mnemonic.as_str() {
                        "ret" => {
                            closed = true;
                            break;
                        }
                        "fun" => {
                            return Err(function_error(
                                "nested function definitions are not supported",
                                next.line,
                            ))
                        }
                        _ => body.push(next),
                    }
                }
                if !closed {
                    return Err(function_error("missing return statement", inst.line));
                }

                let mut header = inst.params.into_iter();
                let name = header.next().unwrap_or_default();
                if name.is_empty() {
                    return Err(function_error("no function name given", inst.line));
                }
                if table.contains(&name) {
                    return Err(function_error(
                        format!("function '{name}' has already been defined"),
                        inst.line,
                    ));
                }
                let ret = header.next().unwrap_or_default();
                if ret.is_empty() {
                    return Err(function_error(
                        format!("no return variable given for function '{name}'"),
                        inst.line,
                    ));
                }

                let def = FunctionDef {
                    ret,
                    params: header.collect(),
                    body: body.into(),
                    origin: origin.map(Path::to_path_buf),
                };
                table.insert(name, Rc::new(def));
            }
            "ret" => return Err(function_error("return with no function", inst.line)),
            _ => program.push(inst),
        }
    }
    Ok((program, table))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
