//! Relation-expression lexer, AST, parser, and evaluator.
//!
//! `rel`, the valued forms of `str`/`boo`, `bls`/`vls` items and literal
//! `out` tokens all end up here.  Variables have already been replaced by
//! literal text, so the evaluator needs no context: an identifier that
//! survives to evaluation is an undeclared name.
//!
//! Operator precedence (lowest → highest):
//!   or  →  and  →  not  →  comparison  →  additive  →  multiplicative  →
//!   unary  →  primary

use thiserror::Error;

use super::value::Value;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExprError {
    #[error("invalid syntax: {0}")]
    Syntax(String),
    #[error("name '{0}' is not defined")]
    Name(String),
    #[error("{0}")]
    Type(String),
    #[error("division by zero")]
    ZeroDivision,
    #[error("integer overflow")]
    Overflow,
}

// ── Token ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    Int(i64),
    Float(f64),
    Str(String),
    Ident(String),
    True,
    False,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,

    // Comparison
    Eq, // ==
    Ne, // !=
    Lt,
    Le,
    Gt,
    Ge,

    // Logical keywords
    And,
    Or,
    Not,

    // Misc
    Comma,
    LParen,
    RParen,
    LBracket,
    RBracket,
    /// Unrecognised input character; the parser reports it.
    Unknown(char),
    Eof,
}

// ── Lexer ─────────────────────────────────────────────────────────────────────

struct Lexer {
    src: Vec<char>,
    pos: usize,
}

impl Lexer {
    fn new(src: &str) -> Self {
        Lexer {
            src: src.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.src.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.src.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek();
        if ch.is_some() {
            self.pos += 1;
        }
        ch
    }

    fn eat(&mut self, ch: char) -> bool {
        if self.peek() == Some(ch) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn take_digits(&mut self, s: &mut String) {
        while let Some(c) = self.peek().filter(char::is_ascii_digit) {
            s.push(c);
            self.pos += 1;
        }
    }

    fn read_number(&mut self, first: char) -> Token {
        let mut s = String::from(first);
        let mut is_float = first == '.';

        self.take_digits(&mut s);
        if !is_float && self.eat('.') {
            is_float = true;
            s.push('.');
            self.take_digits(&mut s);
        }
        let exponent = match (self.peek(), self.peek_at(1), self.peek_at(2)) {
            (Some('e' | 'E'), Some(d), _) if d.is_ascii_digit() => true,
            (Some('e' | 'E'), Some('+' | '-'), Some(d)) if d.is_ascii_digit() => true,
            _ => false,
        };
        if exponent {
            is_float = true;
            s.push('e');
            self.pos += 1;
            if let Some(sign) = self.peek().filter(|c| matches!(c, '+' | '-')) {
                s.push(sign);
                self.pos += 1;
            }
            self.take_digits(&mut s);
        }

        // Integer literals too wide for i64 degrade to floats.
        if !is_float {
            if let Ok(n) = s.parse::<i64>() {
                return Token::Int(n);
            }
        }
        s.parse().map(Token::Float).unwrap_or(Token::Unknown(first))
    }

    fn read_string(&mut self, quote: char) -> Result<Token, ExprError> {
        let mut s = String::new();
        loop {
            match self.advance() {
                None => return Err(ExprError::Syntax("unterminated string literal".into())),
                Some('\\') => match self.advance() {
                    Some('n') => s.push('\n'),
                    Some('t') => s.push('\t'),
                    Some(c) => s.push(c),
                    None => {
                        return Err(ExprError::Syntax("unterminated string literal".into()))
                    }
                },
                Some(c) if c == quote => break,
                Some(c) => s.push(c),
            }
        }
        Ok(Token::Str(s))
    }

    fn read_ident(&mut self, first: char) -> Token {
        let mut s = String::from(first);
        while let Some(c) = self.peek().filter(|c| c.is_alphanumeric() || *c == '_') {
            s.push(c);
            self.pos += 1;
        }
        match s.as_str() {
            "True" => Token::True,
            "False" => Token::False,
            "and" => Token::And,
            "or" => Token::Or,
            "not" => Token::Not,
            _ => Token::Ident(s),
        }
    }

    fn next_token(&mut self) -> Result<Token, ExprError> {
        self.skip_ws();
        let ch = match self.advance() {
            None => return Ok(Token::Eof),
            Some(c) => c,
        };

        Ok(match ch {
            '0'..='9' => self.read_number(ch),
            '.' if self.peek().is_some_and(|c| c.is_ascii_digit()) => self.read_number(ch),
            '"' | '\'' => return self.read_string(ch),
            c if c.is_alphabetic() || c == '_' => self.read_ident(c),
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '%' => Token::Percent,
            '=' if self.eat('=') => Token::Eq,
            '!' if self.eat('=') => Token::Ne,
            '<' => {
                if self.eat('=') {
                    Token::Le
                } else {
                    Token::Lt
                }
            }
            '>' => {
                if self.eat('=') {
                    Token::Ge
                } else {
                    Token::Gt
                }
            }
            ',' => Token::Comma,
            '(' => Token::LParen,
            ')' => Token::RParen,
            '[' => Token::LBracket,
            ']' => Token::RBracket,
            c => Token::Unknown(c),
        })
    }

    fn tokenize(mut self) -> Result<Vec<Token>, ExprError> {
        let mut tokens = Vec::new();
        loop {
            let t = self.next_token()?;
            let done = matches!(t, Token::Eof);
            tokens.push(t);
            if done {
                break;
            }
        }
        Ok(tokens)
    }
}

// ── AST ───────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Value),
    Name(String),
    Neg(Box<Expr>),
    Not(Box<Expr>),
    Binary(BinOp, Box<Expr>, Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    List(Vec<Expr>),
}

// ── Parser ────────────────────────────────────────────────────────────────────

/// Deepest expression tree the parser will build.
const MAX_NESTING: usize = 200;

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    /// Depth of the node being parsed; bounded by [`MAX_NESTING`].
    depth: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Parser {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    fn descend(&mut self) -> Result<(), ExprError> {
        if self.depth >= MAX_NESTING {
            return Err(ExprError::Syntax("too deeply nested".into()));
        }
        self.depth += 1;
        Ok(())
    }

    fn peek(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&Token::Eof)
    }

    fn advance(&mut self) -> Token {
        let t = self.tokens.get(self.pos).cloned().unwrap_or(Token::Eof);
        self.pos += 1;
        t
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == expected {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: &Token) -> Result<(), ExprError> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(ExprError::Syntax(format!(
                "expected {expected:?}, found {:?}",
                self.peek()
            )))
        }
    }

    // ── Grammar ───────────────────────────────────────────────────────────────

    fn parse_expr(&mut self) -> Result<Expr, ExprError> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> Result<Expr, ExprError> {
        let start = self.depth;
        let mut lhs = self.parse_and()?;
        while self.eat(&Token::Or) {
            self.descend()?;
            let rhs = self.parse_and()?;
            lhs = Expr::Or(Box::new(lhs), Box::new(rhs));
        }
        self.depth = start;
        Ok(lhs)
    }

    fn parse_and(&mut self) -> Result<Expr, ExprError> {
        let start = self.depth;
        let mut lhs = self.parse_not()?;
        while self.eat(&Token::And) {
            self.descend()?;
            let rhs = self.parse_not()?;
            lhs = Expr::And(Box::new(lhs), Box::new(rhs));
        }
        self.depth = start;
        Ok(lhs)
    }

    fn parse_not(&mut self) -> Result<Expr, ExprError> {
        if self.eat(&Token::Not) {
            self.descend()?;
            let inner = self.parse_not()?;
            self.depth -= 1;
            Ok(Expr::Not(Box::new(inner)))
        } else {
            self.parse_comparison()
        }
    }

    fn parse_comparison(&mut self) -> Result<Expr, ExprError> {
        let start = self.depth;
        let mut lhs = self.parse_additive()?;
        loop {
            let op = match self.peek() {
                Token::Eq => BinOp::Eq,
                Token::Ne => BinOp::Ne,
                Token::Lt => BinOp::Lt,
                Token::Le => BinOp::Le,
                Token::Gt => BinOp::Gt,
                Token::Ge => BinOp::Ge,
                _ => break,
            };
            self.pos += 1;
            self.descend()?;
            let rhs = self.parse_additive()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        self.depth = start;
        Ok(lhs)
    }

    fn parse_additive(&mut self) -> Result<Expr, ExprError> {
        let start = self.depth;
        let mut lhs = self.parse_multiplicative()?;
        loop {
            let op = match self.peek() {
                Token::Plus => BinOp::Add,
                Token::Minus => BinOp::Sub,
                _ => break,
            };
            self.pos += 1;
            self.descend()?;
            let rhs = self.parse_multiplicative()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        self.depth = start;
        Ok(lhs)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, ExprError> {
        let start = self.depth;
        let mut lhs = self.parse_unary()?;
        loop {
            let op = match self.peek() {
                Token::Star => BinOp::Mul,
                Token::Slash => BinOp::Div,
                Token::Percent => BinOp::Rem,
                _ => break,
            };
            self.pos += 1;
            self.descend()?;
            let rhs = self.parse_unary()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        self.depth = start;
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Expr, ExprError> {
        if self.eat(&Token::Minus) {
            self.descend()?;
            let inner = self.parse_unary()?;
            self.depth -= 1;
            Ok(Expr::Neg(Box::new(inner)))
        } else {
            self.parse_primary()
        }
    }

    fn parse_primary(&mut self) -> Result<Expr, ExprError> {
        match self.advance() {
            Token::Int(n) => Ok(Expr::Literal(Value::Int(n))),
            Token::Float(x) => Ok(Expr::Literal(Value::Double(x))),
            Token::Str(s) => Ok(Expr::Literal(Value::Str(s))),
            Token::True => Ok(Expr::Literal(Value::Bool(true))),
            Token::False => Ok(Expr::Literal(Value::Bool(false))),
            Token::Ident(name) => Ok(Expr::Name(name)),
            Token::LParen => {
                self.descend()?;
                let inner = self.parse_expr()?;
                self.expect(&Token::RParen)?;
                self.depth -= 1;
                Ok(inner)
            }
            Token::LBracket => {
                self.descend()?;
                let mut items = Vec::new();
                while self.peek() != &Token::RBracket {
                    items.push(self.parse_expr()?);
                    if !self.eat(&Token::Comma) {
                        break;
                    }
                }
                self.expect(&Token::RBracket)?;
                self.depth -= 1;
                Ok(Expr::List(items))
            }
            other => Err(ExprError::Syntax(format!("unexpected token {other:?}"))),
        }
    }
}

/// Parse an expression; the whole input must be consumed.
pub fn parse_expr(src: &str) -> Result<Expr, ExprError> {
    let tokens = Lexer::new(src).tokenize()?;
    let mut parser = Parser::new(tokens);
    let expr = parser.parse_expr()?;
    if parser.peek() != &Token::Eof {
        return Err(ExprError::Syntax(format!(
            "unexpected token {:?}",
            parser.peek()
        )));
    }
    Ok(expr)
}

// ── Evaluator ─────────────────────────────────────────────────────────────────

pub fn eval_expr(expr: &Expr) -> Result<Value, ExprError> {
    match expr {
        Expr::Literal(v) => Ok(v.clone()),

        Expr::Name(name) => Err(ExprError::Name(name.clone())),

        Expr::Neg(inner) => eval_expr(inner)?.arith_neg(),

        Expr::Not(inner) => Ok(Value::Bool(!eval_expr(inner)?.truthy())),

        // `and`/`or` yield the operand that decided the result.
        Expr::And(lhs, rhs) => {
            let l = eval_expr(lhs)?;
            if l.truthy() {
                eval_expr(rhs)
            } else {
                Ok(l)
            }
        }
        Expr::Or(lhs, rhs) => {
            let l = eval_expr(lhs)?;
            if l.truthy() {
                Ok(l)
            } else {
                eval_expr(rhs)
            }
        }

        Expr::Binary(op, lhs, rhs) => {
            let l = eval_expr(lhs)?;
            let r = eval_expr(rhs)?;
            eval_binop(*op, &l, &r)
        }

        Expr::List(items) => {
            let values = items.iter().map(eval_expr).collect::<Result<Vec<_>, _>>()?;
            Ok(Value::list_from(values))
        }
    }
}

fn eval_binop(op: BinOp, l: &Value, r: &Value) -> Result<Value, ExprError> {
    use std::cmp::Ordering::{Equal, Greater, Less};
    Ok(match op {
        BinOp::Add => l.arith_add(r)?,
        BinOp::Sub => l.arith_sub(r)?,
        BinOp::Mul => l.arith_mul(r)?,
        BinOp::Div => l.arith_div(r)?,
        BinOp::Rem => l.arith_rem(r)?,
        BinOp::Eq => Value::Bool(l.loose_eq(r)),
        BinOp::Ne => Value::Bool(!l.loose_eq(r)),
        BinOp::Lt => Value::Bool(matches!(l.compare(r)?, Some(Less))),
        BinOp::Le => Value::Bool(matches!(l.compare(r)?, Some(Less | Equal))),
        BinOp::Gt => Value::Bool(matches!(l.compare(r)?, Some(Greater))),
        BinOp::Ge => Value::Bool(matches!(l.compare(r)?, Some(Greater | Equal))),
    })
}

/// Parse and evaluate in one step.
pub fn eval_str(src: &str) -> Result<Value, ExprError> {
    eval_expr(&parse_expr(src)?)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
