//! Per-frame variable store with single assignment.
//!
//! A name is absent, declared with a kind but no value, or bound to a
//! concrete [`Value`].  Concrete bindings never change: the only way to reuse
//! a name is `del` followed by a fresh write.

use std::collections::HashMap;

use super::error::Failure;
use super::expr;
use super::value::{Binding, Kind, Value};

/// State of a name, detached from the store so callers can branch on it and
/// then write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Absent,
    Unset(Kind),
    Set,
}

#[derive(Debug, Clone, Default)]
pub struct VarStore {
    vars: HashMap<String, Binding>,
}

impl VarStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slot(&self, name: &str) -> Slot {
        match self.vars.get(name) {
            None => Slot::Absent,
            Some(Binding::Unset(kind)) => Slot::Unset(*kind),
            Some(Binding::Value(_)) => Slot::Set,
        }
    }

    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.vars.get(name)
    }

    /// The concrete value of `name`, if it has one.
    pub fn value(&self, name: &str) -> Option<&Value> {
        match self.vars.get(name) {
            Some(Binding::Value(v)) => Some(v),
            _ => None,
        }
    }

    /// Resolve a token that may name a variable.  `Ok(None)` means the token
    /// is not a variable; reading an unassigned declaration is an error.
    pub fn lookup(&self, name: &str) -> Result<Option<&Value>, Failure> {
        match self.vars.get(name) {
            None => Ok(None),
            Some(Binding::Unset(_)) => Err(Failure::Unassigned(name.to_owned())),
            Some(Binding::Value(v)) => Ok(Some(v)),
        }
    }

    /// Like [`lookup`](Self::lookup), but the token must be a variable.
    pub fn require(&self, name: &str) -> Result<&Value, Failure> {
        self.lookup(name)?.ok_or(Failure::Undeclared)
    }

    /// Write `value`; an unset declaration casts it to the declared kind.
    pub fn declare_or_set(&mut self, name: &str, value: Value) -> Result<(), Failure> {
        let value = match self.slot(name) {
            Slot::Absent => value,
            Slot::Unset(kind) => value.cast(kind)?,
            Slot::Set => return Err(Failure::Redeclared(name.to_owned())),
        };
        self.vars.insert(name.to_owned(), Binding::Value(value));
        Ok(())
    }

    /// Declare `name` with a kind and no value.
    pub fn declare_kind(&mut self, name: &str, kind: Kind) -> Result<(), Failure> {
        if self.slot(name) == Slot::Set {
            return Err(Failure::Redeclared(name.to_owned()));
        }
        self.vars.insert(name.to_owned(), Binding::Unset(kind));
        Ok(())
    }

    /// Remove a binding; returns whether one existed.
    pub fn remove(&mut self, name: &str) -> bool {
        self.vars.remove(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    // ── Token resolution ──────────────────────────────────────────────────────

    /// A variable's value as a float, else the token as a float literal.
    pub fn operand(&self, token: &str) -> Result<f64, Failure> {
        match self.lookup(token)? {
            Some(v) => v.as_f64().ok_or(Failure::BadType),
            None => token.parse().map_err(|_| Failure::BadType),
        }
    }

    /// A variable's value as an integer, else the token as an integer literal.
    pub fn integer(&self, token: &str) -> Result<i64, Failure> {
        match self.lookup(token)? {
            Some(Value::Int(n)) => Ok(*n),
            Some(Value::Bool(b)) => Ok(i64::from(*b)),
            Some(Value::Str(s)) => s.trim().parse().map_err(|_| Failure::BadType),
            Some(_) => Err(Failure::BadType),
            None => token.parse().map_err(|_| Failure::BadType),
        }
    }

    /// A variable's value, else the token itself as text.
    pub fn value_or_text(&self, token: &str) -> Result<Value, Failure> {
        Ok(match self.lookup(token)? {
            Some(v) => v.clone(),
            None => Value::Str(token.to_owned()),
        })
    }

    /// A variable's display form, else the display form of the token
    /// evaluated as a literal expression.
    pub fn render(&self, token: &str) -> Result<String, Failure> {
        match self.lookup(token)? {
            Some(v) => Ok(v.to_string()),
            None => Ok(expr::eval_str(token)?.to_string()),
        }
    }

    /// Build relation-expression text: variables become literals, other
    /// tokens are copied verbatim, every piece padded with spaces.
    pub fn relation(&self, tokens: &[String]) -> Result<String, Failure> {
        let mut text = String::new();
        for token in tokens {
            text.push(' ');
            match self.lookup(token)? {
                Some(v) => text.push_str(&v.literal()),
                None => text.push_str(token),
            }
            text.push(' ');
        }
        Ok(text)
    }

    pub fn evaluate(&self, tokens: &[String]) -> Result<Value, Failure> {
        Ok(expr::eval_str(&self.relation(tokens)?)?)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
