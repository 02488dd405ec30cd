// Expression tree over a closed operator set.

use super::StatBindings;
use crate::stat::Stat;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Plus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

impl BinaryOp {
    /// Comparisons evaluate to `1.0` (true) or `0.0` (false) so they can be
    /// summed, e.g. `(PTS >= 10) + (AST >= 10)`.
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge | BinaryOp::Eq | BinaryOp::Ne
        )
    }

    pub fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            BinaryOp::Add => lhs + rhs,
            BinaryOp::Sub => lhs - rhs,
            BinaryOp::Mul => lhs * rhs,
            BinaryOp::Div => lhs / rhs,
            BinaryOp::Lt => truth(lhs < rhs),
            BinaryOp::Le => truth(lhs <= rhs),
            BinaryOp::Gt => truth(lhs > rhs),
            BinaryOp::Ge => truth(lhs >= rhs),
            BinaryOp::Eq => truth(lhs == rhs),
            BinaryOp::Ne => truth(lhs != rhs),
        }
    }
}

fn truth(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Stat(Stat),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

impl Expr {
    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Expr::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// Evaluate with IEEE semantics. Division by zero yields an infinity or
    /// NaN here; rejecting those is the caller's job.
    pub fn eval(&self, bindings: &StatBindings) -> f64 {
        match self {
            Expr::Number(n) => *n,
            Expr::Stat(stat) => bindings[*stat],
            Expr::Unary { op, operand } => {
                let v = operand.eval(bindings);
                match op {
                    UnaryOp::Neg => -v,
                    UnaryOp::Plus => v,
                }
            }
            Expr::Binary { op, lhs, rhs } => op.apply(lhs.eval(bindings), rhs.eval(bindings)),
        }
    }

    /// Call `f` for every stat reference, left to right.
    pub fn for_each_stat(&self, f: &mut impl FnMut(Stat)) {
        match self {
            Expr::Number(_) => {}
            Expr::Stat(stat) => f(*stat),
            Expr::Unary { operand, .. } => operand.for_each_stat(f),
            Expr::Binary { lhs, rhs, .. } => {
                lhs.for_each_stat(f);
                rhs.for_each_stat(f);
            }
        }
    }
}
