//! Runtime values and the kinds a variable can be declared with.
//!
//! Every declaring mnemonic names one of nine [`Kind`]s.  A variable that has
//! been declared but not yet given a value is a [`Binding::Unset`] carrying
//! only its kind; a real value is never stored in the same slot as a tag.

use std::cmp::Ordering;
use std::fmt;

use super::error::Failure;
use super::expr::{self, ExprError};

// ── Kind ──────────────────────────────────────────────────────────────────────

/// Declarable type of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Int,
    Str,
    Dbl,
    Boo,
    IntList,
    StrList,
    DblList,
    BoolList,
    VarList,
}

impl Kind {
    pub const ALL: [Kind; 9] = [
        Kind::Int,
        Kind::Str,
        Kind::Dbl,
        Kind::Boo,
        Kind::IntList,
        Kind::StrList,
        Kind::DblList,
        Kind::BoolList,
        Kind::VarList,
    ];

    /// The declaring mnemonic (`int`, `sls`, …).
    pub fn mnemonic(self) -> &'static str {
        match self {
            Kind::Int => "int",
            Kind::Str => "str",
            Kind::Dbl => "dbl",
            Kind::Boo => "boo",
            Kind::IntList => "ils",
            Kind::StrList => "sls",
            Kind::DblList => "dls",
            Kind::BoolList => "bls",
            Kind::VarList => "vls",
        }
    }

    pub fn from_mnemonic(mnemonic: &str) -> Option<Kind> {
        Kind::ALL.into_iter().find(|k| k.mnemonic() == mnemonic)
    }

    pub fn is_list(self) -> bool {
        matches!(
            self,
            Kind::IntList | Kind::StrList | Kind::DblList | Kind::BoolList | Kind::VarList
        )
    }

    /// Element kind of a typed list.
    pub fn element(self) -> Option<Kind> {
        match self {
            Kind::IntList => Some(Kind::Int),
            Kind::StrList => Some(Kind::Str),
            Kind::DblList => Some(Kind::Dbl),
            Kind::BoolList => Some(Kind::Boo),
            _ => None,
        }
    }

    /// Typed list kind whose elements are of this scalar kind.
    pub fn list(self) -> Option<Kind> {
        match self {
            Kind::Int => Some(Kind::IntList),
            Kind::Str => Some(Kind::StrList),
            Kind::Dbl => Some(Kind::DblList),
            Kind::Boo => Some(Kind::BoolList),
            _ => None,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

// ── Binding ───────────────────────────────────────────────────────────────────

/// What a declared name holds.
#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    /// Declared with a kind, awaiting its first (and only) value.
    Unset(Kind),
    Value(Value),
}

// ── Value ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Double(f64),
    Str(String),
    Bool(bool),
    IntList(Vec<i64>),
    StrList(Vec<String>),
    DblList(Vec<f64>),
    BoolList(Vec<bool>),
    VarList(Vec<Value>),
}

/// Largest text, in bytes, that `*` may build by repetition.
const MAX_REPEAT_LEN: usize = 1 << 26;

/// Display form of a double: integral values keep a trailing `.0`.
fn format_double(x: f64) -> String {
    if x.is_nan() {
        "nan".to_owned()
    } else if x.is_infinite() {
        String::from(if x > 0.0 { "inf" } else { "-inf" })
    } else if x.fract() == 0.0 && x.abs() < 1e16 {
        format!("{x:.1}")
    } else if x.abs() >= 1e16 {
        format!("{x:e}")
    } else {
        format!("{x}")
    }
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

fn list_literal(items: impl Iterator<Item = String>) -> String {
    format!("[{}]", items.collect::<Vec<_>>().join(", "))
}

fn bool_literal(b: bool) -> String {
    String::from(if b { "True" } else { "False" })
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s),
            other => f.write_str(&other.literal()),
        }
    }
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Int(_) => Kind::Int,
            Value::Double(_) => Kind::Dbl,
            Value::Str(_) => Kind::Str,
            Value::Bool(_) => Kind::Boo,
            Value::IntList(_) => Kind::IntList,
            Value::StrList(_) => Kind::StrList,
            Value::DblList(_) => Kind::DblList,
            Value::BoolList(_) => Kind::BoolList,
            Value::VarList(_) => Kind::VarList,
        }
    }

    pub fn is_list(&self) -> bool {
        self.kind().is_list()
    }

    /// Type name used in expression error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Double(_) => "float",
            Value::Str(_) => "str",
            Value::Bool(_) => "bool",
            _ => "list",
        }
    }

    /// Text that the expression parser reads back as an equal value.
    pub fn literal(&self) -> String {
        match self {
            Value::Int(n) => n.to_string(),
            Value::Double(x) => format_double(*x),
            Value::Str(s) => quote(s),
            Value::Bool(b) => bool_literal(*b),
            Value::IntList(v) => list_literal(v.iter().map(i64::to_string)),
            Value::StrList(v) => list_literal(v.iter().map(|s| quote(s))),
            Value::DblList(v) => list_literal(v.iter().map(|x| format_double(*x))),
            Value::BoolList(v) => list_literal(v.iter().map(|b| bool_literal(*b))),
            Value::VarList(v) => list_literal(v.iter().map(Value::literal)),
        }
    }

    /// Zero, empty text and empty lists are false; everything else is true.
    pub fn truthy(&self) -> bool {
        match self {
            Value::Int(n) => *n != 0,
            Value::Double(x) => *x != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::Bool(b) => *b,
            Value::IntList(v) => !v.is_empty(),
            Value::StrList(v) => !v.is_empty(),
            Value::DblList(v) => !v.is_empty(),
            Value::BoolList(v) => !v.is_empty(),
            Value::VarList(v) => !v.is_empty(),
        }
    }

    /// Numeric reading of a scalar; text must parse as a float.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Double(x) => Some(*x),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::Str(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Elements of a list as individual values.
    pub fn into_items(self) -> Option<Vec<Value>> {
        match self {
            Value::IntList(v) => Some(v.into_iter().map(Value::Int).collect()),
            Value::StrList(v) => Some(v.into_iter().map(Value::Str).collect()),
            Value::DblList(v) => Some(v.into_iter().map(Value::Double).collect()),
            Value::BoolList(v) => Some(v.into_iter().map(Value::Bool).collect()),
            Value::VarList(v) => Some(v),
            _ => None,
        }
    }

    /// Length of a list, or the character count of text.
    pub fn len(&self) -> Option<usize> {
        match self {
            Value::Str(s) => Some(s.chars().count()),
            Value::IntList(v) => Some(v.len()),
            Value::StrList(v) => Some(v.len()),
            Value::DblList(v) => Some(v.len()),
            Value::BoolList(v) => Some(v.len()),
            Value::VarList(v) => Some(v.len()),
            _ => None,
        }
    }

    /// Element `i` of a list or character `i` of text; negative `i` counts
    /// from the end.
    pub fn index(&self, i: i64) -> Result<Value, Failure> {
        let len = self.len().ok_or(Failure::BadType)?;
        let pos = if i < 0 { i + len as i64 } else { i };
        let pos = usize::try_from(pos)
            .ok()
            .filter(|&p| p < len)
            .ok_or(Failure::BadIndex)?;
        Ok(match self {
            Value::Str(s) => Value::Str(s.chars().nth(pos).map(String::from).unwrap_or_default()),
            Value::IntList(v) => Value::Int(v[pos]),
            Value::StrList(v) => Value::Str(v[pos].clone()),
            Value::DblList(v) => Value::Double(v[pos]),
            Value::BoolList(v) => Value::Bool(v[pos]),
            Value::VarList(v) => v[pos].clone(),
            _ => return Err(Failure::BadType),
        })
    }

    // ── List construction ─────────────────────────────────────────────────────

    /// Build a list of `kind`, falling back to a `VarList` when some element
    /// does not already have the element kind.
    pub fn list_of(kind: Kind, items: Vec<Value>) -> Value {
        match kind.element() {
            Some(elem) if items.iter().all(|v| v.kind() == elem) => Value::VarList(items.clone())
                .cast(kind)
                .unwrap_or(Value::VarList(items)),
            _ => Value::VarList(items),
        }
    }

    /// Build a list whose kind is inferred from its elements.
    pub fn list_from(items: Vec<Value>) -> Value {
        let kind = items
            .first()
            .and_then(|v| v.kind().list())
            .unwrap_or(Kind::VarList);
        Value::list_of(kind, items)
    }

    /// Concatenate two lists; the kind survives only when both agree.
    pub fn concat(self, rhs: Value) -> Option<Value> {
        let kind = if self.kind() == rhs.kind() {
            self.kind()
        } else {
            Kind::VarList
        };
        let mut items = self.into_items()?;
        items.extend(rhs.into_items()?);
        Some(Value::list_of(kind, items))
    }

    pub fn push_back(self, item: Value) -> Option<Value> {
        let kind = self.kind();
        let mut items = self.into_items()?;
        items.push(item);
        Some(Value::list_of(kind, items))
    }

    pub fn push_front(self, item: Value) -> Option<Value> {
        let kind = self.kind();
        let mut items = self.into_items()?;
        items.insert(0, item);
        Some(Value::list_of(kind, items))
    }

    /// The list without its last element (empty stays empty).
    pub fn without_last(self) -> Option<Value> {
        let kind = self.kind();
        let mut items = self.into_items()?;
        items.pop();
        Some(Value::list_of(kind, items))
    }

    // ── Casting ───────────────────────────────────────────────────────────────

    /// Convert into `kind` for assignment to a variable declared with it.
    pub fn cast(self, kind: Kind) -> Result<Value, Failure> {
        Ok(match kind {
            Kind::Int => Value::Int(self.into_int()?),
            Kind::Dbl => Value::Double(self.into_double()?),
            Kind::Str => Value::Str(self.to_string()),
            Kind::Boo => Value::Bool(self.into_bool()?),
            Kind::IntList => Value::IntList(self.cast_items(Value::into_int)?),
            Kind::StrList => Value::StrList(self.cast_items(|v| Ok(v.to_string()))?),
            Kind::DblList => Value::DblList(self.cast_items(Value::into_double)?),
            Kind::BoolList => Value::BoolList(self.cast_items(Value::into_bool)?),
            Kind::VarList => Value::VarList(self.into_items().ok_or(Failure::BadType)?),
        })
    }

    fn cast_items<T>(self, f: impl Fn(Value) -> Result<T, Failure>) -> Result<Vec<T>, Failure> {
        self.into_items()
            .ok_or(Failure::BadType)?
            .into_iter()
            .map(f)
            .collect()
    }

    fn into_int(self) -> Result<i64, Failure> {
        match self {
            Value::Int(n) => Ok(n),
            Value::Double(x) if x.is_finite() => Ok(x.trunc() as i64),
            Value::Bool(b) => Ok(i64::from(b)),
            Value::Str(s) => s.trim().parse().map_err(|_| Failure::BadType),
            _ => Err(Failure::BadType),
        }
    }

    fn into_double(self) -> Result<f64, Failure> {
        self.as_f64().ok_or(Failure::BadType)
    }

    fn into_bool(self) -> Result<bool, Failure> {
        match self {
            Value::Str(s) => Ok(expr::eval_str(&s)?.truthy()),
            other => Ok(other.truthy()),
        }
    }

    // ── Expression arithmetic ─────────────────────────────────────────────────

    fn number(&self) -> Option<Number> {
        match self {
            Value::Int(n) => Some(Number::Int(*n)),
            Value::Bool(b) => Some(Number::Int(i64::from(*b))),
            Value::Double(x) => Some(Number::Float(*x)),
            _ => None,
        }
    }

    pub fn arith_add(&self, rhs: &Value) -> Result<Value, ExprError> {
        match (self, rhs) {
            (Value::Str(a), Value::Str(b)) => Ok(Value::Str(format!("{a}{b}"))),
            (a, b) if a.is_list() && b.is_list() => a
                .clone()
                .concat(b.clone())
                .ok_or_else(|| unsupported("+", a, b)),
            _ => numeric(self, rhs, "+", i64::checked_add, |a, b| a + b),
        }
    }

    pub fn arith_sub(&self, rhs: &Value) -> Result<Value, ExprError> {
        numeric(self, rhs, "-", i64::checked_sub, |a, b| a - b)
    }

    pub fn arith_mul(&self, rhs: &Value) -> Result<Value, ExprError> {
        match (self, rhs) {
            (Value::Str(s), Value::Int(n)) | (Value::Int(n), Value::Str(s)) => {
                let count = usize::try_from(*n).unwrap_or(0);
                match s.len().checked_mul(count) {
                    Some(size) if size <= MAX_REPEAT_LEN => Ok(Value::Str(s.repeat(count))),
                    _ => Err(ExprError::Overflow),
                }
            }
            _ => numeric(self, rhs, "*", i64::checked_mul, |a, b| a * b),
        }
    }

    /// True division: the result is always a double.
    pub fn arith_div(&self, rhs: &Value) -> Result<Value, ExprError> {
        match (self.number(), rhs.number()) {
            (Some(a), Some(b)) => {
                if b.as_f64() == 0.0 {
                    return Err(ExprError::ZeroDivision);
                }
                Ok(Value::Double(a.as_f64() / b.as_f64()))
            }
            _ => Err(unsupported("/", self, rhs)),
        }
    }

    /// Remainder with the sign of the divisor.
    pub fn arith_rem(&self, rhs: &Value) -> Result<Value, ExprError> {
        match (self.number(), rhs.number()) {
            (Some(Number::Int(a)), Some(Number::Int(b))) => {
                if b == 0 {
                    return Err(ExprError::ZeroDivision);
                }
                let r = a.checked_rem(b).ok_or(ExprError::Overflow)?;
                Ok(Value::Int(if r != 0 && (r < 0) != (b < 0) { r + b } else { r }))
            }
            (Some(a), Some(b)) => {
                let (a, b) = (a.as_f64(), b.as_f64());
                if b == 0.0 {
                    return Err(ExprError::ZeroDivision);
                }
                let r = a % b;
                Ok(Value::Double(if r != 0.0 && (r < 0.0) != (b < 0.0) { r + b } else { r }))
            }
            _ => Err(unsupported("%", self, rhs)),
        }
    }

    pub fn arith_neg(&self) -> Result<Value, ExprError> {
        match self.number() {
            Some(Number::Int(n)) => n.checked_neg().map(Value::Int).ok_or(ExprError::Overflow),
            Some(Number::Float(x)) => Ok(Value::Double(-x)),
            None => Err(ExprError::Type(format!(
                "bad operand type for unary -: '{}'",
                self.type_name()
            ))),
        }
    }

    /// Equality as the expression language sees it: numbers compare by value
    /// across int/float/bool, unrelated types are simply unequal.
    pub fn loose_eq(&self, rhs: &Value) -> bool {
        match (self.number(), rhs.number()) {
            (Some(Number::Int(a)), Some(Number::Int(b))) => a == b,
            (Some(a), Some(b)) => a.as_f64() == b.as_f64(),
            _ => match (self, rhs) {
                (Value::Str(a), Value::Str(b)) => a == b,
                (a, b) if a.is_list() && b.is_list() => {
                    match (a.clone().into_items(), b.clone().into_items()) {
                        (Some(x), Some(y)) => {
                            x.len() == y.len() && x.iter().zip(&y).all(|(p, q)| p.loose_eq(q))
                        }
                        _ => false,
                    }
                }
                _ => false,
            },
        }
    }

    /// Ordering for `<`, `<=`, `>`, `>=`.  Lists compare element-wise.
    /// `None` means unordered (a NaN is involved): every ordering test is
    /// false.
    pub fn compare(&self, rhs: &Value) -> Result<Option<Ordering>, ExprError> {
        match (self.number(), rhs.number()) {
            (Some(Number::Int(a)), Some(Number::Int(b))) => return Ok(Some(a.cmp(&b))),
            (Some(a), Some(b)) => return Ok(a.as_f64().partial_cmp(&b.as_f64())),
            _ => {}
        }
        match (self, rhs) {
            (Value::Str(a), Value::Str(b)) => Ok(Some(a.cmp(b))),
            (a, b) if a.is_list() && b.is_list() => {
                let x = a.clone().into_items().unwrap_or_default();
                let y = b.clone().into_items().unwrap_or_default();
                for (p, q) in x.iter().zip(&y) {
                    if !p.loose_eq(q) {
                        return p.compare(q);
                    }
                }
                Ok(Some(x.len().cmp(&y.len())))
            }
            _ => Err(ExprError::Type(format!(
                "ordering not supported between '{}' and '{}'",
                self.type_name(),
                rhs.type_name()
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    fn as_f64(self) -> f64 {
        match self {
            Number::Int(n) => n as f64,
            Number::Float(x) => x,
        }
    }
}

fn numeric(
    lhs: &Value,
    rhs: &Value,
    symbol: &str,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> Result<Value, ExprError> {
    match (lhs.number(), rhs.number()) {
        (Some(Number::Int(a)), Some(Number::Int(b))) => {
            int_op(a, b).map(Value::Int).ok_or(ExprError::Overflow)
        }
        (Some(a), Some(b)) => Ok(Value::Double(float_op(a.as_f64(), b.as_f64()))),
        _ => Err(unsupported(symbol, lhs, rhs)),
    }
}

fn unsupported(symbol: &str, lhs: &Value, rhs: &Value) -> ExprError {
    ExprError::Type(format!(
        "unsupported operand type(s) for {symbol}: '{}' and '{}'",
        lhs.type_name(),
        rhs.type_name()
    ))
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Double(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_owned())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
