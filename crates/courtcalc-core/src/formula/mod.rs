// Formula parsing and evaluation.
//
// Pipeline: formula string -> Lexer -> tokens -> Parser -> Expr -> eval.

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod token;

use std::ops::Index;

use thiserror::Error;

use crate::stat::Stat;
use ast::Expr;

/// Why a formula could not be parsed. Positions are byte offsets into the
/// formula text.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormulaError {
    #[error("formula is empty")]
    Empty,

    #[error("unexpected character `{ch}` at position {pos}")]
    UnexpectedChar { ch: char, pos: usize },

    #[error("invalid number `{text}` at position {pos}")]
    InvalidNumber { text: String, pos: usize },

    #[error("unknown stat `{name}` at position {pos}")]
    UnknownStat { name: String, pos: usize },

    #[error("function calls are not supported (`{name}` at position {pos})")]
    FunctionCall { name: String, pos: usize },

    #[error("unexpected {found} at position {pos}, expected {expected}")]
    UnexpectedToken {
        found: String,
        expected: &'static str,
        pos: usize,
    },

    #[error("parenthesis opened at position {pos} is never closed")]
    UnclosedParen { pos: usize },

    #[error("formula nests deeper than {max_depth} levels at position {pos}")]
    TooDeep { max_depth: usize, pos: usize },
}

/// Why a parsed formula produced no usable value for one set of bindings.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum EvalError {
    #[error("formula produced a non-finite value ({0})")]
    NonFinite(f64),
}

/// Per-player values for every stat, indexed by [`Stat`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatBindings([f64; Stat::COUNT]);

impl StatBindings {
    pub fn zeroed() -> Self {
        StatBindings([0.0; Stat::COUNT])
    }

    pub fn get(&self, stat: Stat) -> f64 {
        self.0[stat.index()]
    }

    pub fn set(&mut self, stat: Stat, value: f64) {
        self.0[stat.index()] = value;
    }
}

impl Default for StatBindings {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl Index<Stat> for StatBindings {
    type Output = f64;

    fn index(&self, stat: Stat) -> &f64 {
        &self.0[stat.index()]
    }
}

/// A parsed formula. Parse once, evaluate against many players.
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    source: String,
    expr: Expr,
}

impl Formula {
    pub fn parse(source: &str) -> Result<Self, FormulaError> {
        let expr = parser::parse(source)?;
        Ok(Formula {
            source: source.to_string(),
            expr,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// Distinct stats referenced by the formula, in table order.
    pub fn stats(&self) -> Vec<Stat> {
        let mut used = [false; Stat::COUNT];
        self.expr.for_each_stat(&mut |s| used[s.index()] = true);
        Stat::ALL.into_iter().filter(|s| used[s.index()]).collect()
    }

    /// Evaluate against one player's bindings. NaN and infinities are
    /// errors, never values.
    pub fn evaluate(&self, bindings: &StatBindings) -> Result<f64, EvalError> {
        let value = self.expr.eval(bindings);
        if value.is_finite() {
            Ok(value)
        } else {
            Err(EvalError::NonFinite(value))
        }
    }
}

impl std::str::FromStr for Formula {
    type Err = FormulaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Formula::parse(s)
    }
}
