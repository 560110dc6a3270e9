//! The command table and the built-ins that only touch the variable store.
//!
//! [`Command::lookup`] maps a mnemonic onto a closed set of commands, each
//! with a fixed parameter-count range checked before it runs.  Commands that
//! need the console, the function table or the file system are executed by
//! the interpreter; everything else lives here and works on a [`VarStore`].

use std::time::{SystemTime, UNIX_EPOCH};

use super::error::Failure;
use super::expr;
use super::store::{Slot, VarStore};
use super::value::{Kind, Value};

// ── Command table ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Import,
    ImportAs,
    Out,
    Input,
    Seconds,
    Arith(ArithOp),
    Declare(Kind),
    Pop,
    Put,
    Index,
    Length,
    Copy,
    Delete,
    Unassigned,
    Relation,
    Raise,
    Comment,
    RunIf,
    Run,
    /// Handled by the control-flow engine itself.
    For,
}

impl Command {
    pub fn lookup(mnemonic: &str) -> Option<Command> {
        Some(match mnemonic {
            "imp" => Command::Import,
            "ias" => Command::ImportAs,
            "out" => Command::Out,
            "inp" => Command::Input,
            "sec" => Command::Seconds,
            "add" => Command::Arith(ArithOp::Add),
            "sub" => Command::Arith(ArithOp::Sub),
            "mul" => Command::Arith(ArithOp::Mul),
            "div" => Command::Arith(ArithOp::Div),
            "pop" => Command::Pop,
            "put" => Command::Put,
            "idx" => Command::Index,
            "len" => Command::Length,
            "cpy" => Command::Copy,
            "del" => Command::Delete,
            "val" => Command::Unassigned,
            "rel" => Command::Relation,
            "err" => Command::Raise,
            "com" => Command::Comment,
            "rif" => Command::RunIf,
            "run" => Command::Run,
            "for" => Command::For,
            other => return Kind::from_mnemonic(other).map(Command::Declare),
        })
    }

    /// Inclusive bounds on the parameter count; `None` is unbounded.
    pub fn arity(self) -> (usize, Option<usize>) {
        match self {
            Command::Out | Command::Raise | Command::Comment => (0, None),
            Command::Import | Command::ImportAs | Command::Delete => (1, None),
            Command::Input => (1, Some(1)),
            Command::Seconds => (1, Some(2)),
            Command::Arith(_) => (3, None),
            Command::Declare(Kind::Int | Kind::Dbl) => (1, Some(2)),
            Command::Declare(_) => (1, None),
            Command::Pop | Command::Length | Command::Copy | Command::Unassigned | Command::For => {
                (2, Some(2))
            }
            Command::Put | Command::Index => (3, Some(3)),
            Command::Relation | Command::Run => (2, None),
            Command::RunIf => (3, None),
        }
    }

    pub fn accepts(self, count: usize) -> bool {
        let (min, max) = self.arity();
        let pairs_ok = self != Command::ImportAs || count % 2 == 1;
        count >= min && max.map_or(true, |m| count <= m) && pairs_ok
    }
}

// ── Arithmetic ────────────────────────────────────────────────────────────────

/// `add/sub/mul/div dest, a, b, rest…`
pub fn arithmetic(vars: &mut VarStore, op: ArithOp, params: &[String]) -> Result<(), Failure> {
    let [dest, operands @ ..] = params else {
        return Err(Failure::Arity);
    };
    match vars.slot(dest) {
        Slot::Set => return Err(Failure::Redeclared(dest.clone())),
        Slot::Unset(Kind::Str) if op == ArithOp::Add => {
            let text = operands
                .iter()
                .map(|t| vars.render(t))
                .collect::<Result<String, _>>()?;
            return vars.declare_or_set(dest, Value::Str(text));
        }
        Slot::Absent | Slot::Unset(Kind::Int | Kind::Dbl) => {}
        Slot::Unset(_) => return Err(Failure::BadType),
    }

    let nums = operands
        .iter()
        .map(|t| vars.operand(t))
        .collect::<Result<Vec<f64>, _>>()?;
    let (first, rest) = nums.split_first().ok_or(Failure::Arity)?;
    let result = match op {
        ArithOp::Add => nums.iter().sum(),
        ArithOp::Sub => rest.iter().fold(*first, |acc, x| acc - x),
        ArithOp::Mul => nums.iter().product(),
        ArithOp::Div => {
            let mut acc = *first;
            for divisor in rest {
                if *divisor == 0.0 {
                    return Err(Failure::Generic("division by zero".into()));
                }
                acc /= divisor;
            }
            acc
        }
    };
    vars.declare_or_set(dest, Value::Double(result))
}

/// `sec dest[, start]`: seconds since the Unix epoch, minus `start`.
pub fn seconds(vars: &mut VarStore, params: &[String]) -> Result<(), Failure> {
    let [dest, start @ ..] = params else {
        return Err(Failure::Arity);
    };
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0);
    let start = match start.first() {
        Some(token) => vars.operand(token)?,
        None => 0.0,
    };
    vars.declare_or_set(dest, Value::Double(now - start))
}

// ── Declarations ──────────────────────────────────────────────────────────────

/// `int/str/dbl/boo/ils/sls/dls/bls/vls name[, value…]`
pub fn declare(vars: &mut VarStore, kind: Kind, params: &[String]) -> Result<(), Failure> {
    let [name, values @ ..] = params else {
        return Err(Failure::Arity);
    };
    if values.is_empty() {
        return vars.declare_kind(name, kind);
    }
    let value = match kind {
        Kind::Int => Value::Int(values[0].parse().map_err(|_| Failure::BadType)?),
        Kind::Dbl => Value::Double(values[0].parse().map_err(|_| Failure::BadType)?),
        Kind::Str => Value::Str(vars.evaluate(values)?.to_string()),
        Kind::Boo => Value::Bool(vars.evaluate(values)?.truthy()),
        _ => build_list(vars, kind, values)?,
    };
    vars.declare_or_set(name, value)
}

fn build_list(vars: &VarStore, kind: Kind, items: &[String]) -> Result<Value, Failure> {
    let values = items
        .iter()
        .map(|item| list_item(vars, kind, item))
        .collect::<Result<Vec<_>, _>>()?;
    Value::VarList(values).cast(kind)
}

fn list_item(vars: &VarStore, kind: Kind, item: &str) -> Result<Value, Failure> {
    if let Some(v) = vars.lookup(item)? {
        return Ok(match kind {
            Kind::BoolList => Value::Bool(v.truthy()),
            _ => v.clone(),
        });
    }
    match kind {
        Kind::IntList => item.parse().map(Value::Int).map_err(|_| Failure::BadType),
        Kind::DblList => item.parse().map(Value::Double).map_err(|_| Failure::BadType),
        Kind::StrList => Ok(Value::Str(item.to_owned())),
        Kind::BoolList => Ok(Value::Bool(expr::eval_str(item)?.truthy())),
        _ => Ok(expr::eval_str(item)?),
    }
}

// ── Lists and text ────────────────────────────────────────────────────────────

/// `pop dest, list`: the list without its last element.
pub fn pop(vars: &mut VarStore, params: &[String]) -> Result<(), Failure> {
    let [dest, list] = params else {
        return Err(Failure::Arity);
    };
    let shorter = vars
        .require(list)?
        .clone()
        .without_last()
        .ok_or(Failure::BadType)?;
    vars.declare_or_set(dest, shorter)
}

/// `put dest, a, b`: concatenate, append or prepend.
pub fn put(vars: &mut VarStore, params: &[String]) -> Result<(), Failure> {
    let [dest, a, b] = params else {
        return Err(Failure::Arity);
    };
    let a = vars.require(a)?.clone();
    let b = vars.require(b)?.clone();
    let joined = match (a.is_list(), b.is_list()) {
        (true, true) => a.concat(b),
        (true, false) => a.push_back(b),
        (false, true) => b.push_front(a),
        (false, false) => None,
    };
    vars.declare_or_set(dest, joined.ok_or(Failure::BadType)?)
}

/// `idx dest, x, i`
pub fn index(vars: &mut VarStore, params: &[String]) -> Result<(), Failure> {
    let [dest, target, i] = params else {
        return Err(Failure::Arity);
    };
    let i = vars.integer(i)?;
    let item = vars.require(target)?.index(i)?;
    vars.declare_or_set(dest, item)
}

/// `len dest, x`
pub fn length(vars: &mut VarStore, params: &[String]) -> Result<(), Failure> {
    let [dest, target] = params else {
        return Err(Failure::Arity);
    };
    let len = vars.require(target)?.len().ok_or(Failure::BadType)?;
    vars.declare_or_set(dest, Value::Int(len as i64))
}

// ── Variables ─────────────────────────────────────────────────────────────────

/// `cpy dest, src`
pub fn copy(vars: &mut VarStore, params: &[String]) -> Result<(), Failure> {
    let [dest, src] = params else {
        return Err(Failure::Arity);
    };
    let value = vars.require(src)?.clone();
    vars.declare_or_set(dest, value)
}

/// `del names…`
pub fn delete(vars: &mut VarStore, params: &[String]) -> Result<(), Failure> {
    for name in params {
        if !vars.remove(name) {
            return Err(Failure::Undeclared);
        }
    }
    Ok(())
}

/// `val dest, name`: whether `name` is declared but still unassigned.
pub fn unassigned(vars: &mut VarStore, params: &[String]) -> Result<(), Failure> {
    let [dest, name] = params else {
        return Err(Failure::Arity);
    };
    let unset = matches!(vars.slot(name), Slot::Unset(_));
    vars.declare_or_set(dest, Value::Bool(unset))
}

/// `rel dest, tokens…`
pub fn relation(vars: &mut VarStore, params: &[String]) -> Result<(), Failure> {
    let [dest, tokens @ ..] = params else {
        return Err(Failure::Arity);
    };
    let value = vars.evaluate(tokens)?;
    vars.declare_or_set(dest, value)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
