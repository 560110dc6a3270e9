//! mnem: an interpreter for a line-oriented language of three-letter
//! mnemonics with typed single-assignment variables, counted loops,
//! functions and file imports.

pub mod cli;
pub mod config;
pub mod console;
pub mod script;
