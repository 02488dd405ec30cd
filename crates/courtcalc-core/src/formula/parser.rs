// Recursive-descent formula parser.
//
// Precedence, loosest first:
//   comparison  := additive (( < | <= | > | >= | == | != ) additive)*
//   additive    := term (( + | - ) term)*
//   term        := unary (( * | / ) unary)*
//   unary       := ( - | + ) unary | primary
//   primary     := number | stat | "(" comparison ")"

use super::ast::{BinaryOp, Expr, UnaryOp};
use super::lexer::Lexer;
use super::token::{Token, TokenKind};
use super::FormulaError;
use crate::stat::Stat;

/// Deepest expression tree (and parenthesis or unary nesting) accepted.
/// Parsing, evaluation and drop all recurse over the tree.
pub const MAX_DEPTH: usize = 256;

/// A parsed subexpression and the height of its tree.
type Node = (Expr, usize);

/// Parse a formula into an expression tree, resolving every identifier to
/// a [`Stat`].
pub fn parse(src: &str) -> Result<Expr, FormulaError> {
    let tokens = Lexer::new(src).tokenize()?;
    Parser::new(tokens).parse_formula()
}

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    /// `tokens` must end with `Eof`, as produced by [`Lexer::tokenize`].
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    pub fn parse_formula(mut self) -> Result<Expr, FormulaError> {
        if self.peek().kind == TokenKind::Eof {
            return Err(FormulaError::Empty);
        }
        let (expr, _) = self.comparison()?;
        let tok = self.peek();
        if tok.kind != TokenKind::Eof {
            return Err(FormulaError::UnexpectedToken {
                found: tok.kind.to_string(),
                expected: "an operator or end of formula",
                pos: tok.pos,
            });
        }
        Ok(expr)
    }

    fn peek(&self) -> &Token {
        // The lexer guarantees a trailing Eof, and `advance` never steps past it.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token {
        let tok = self.peek().clone();
        if tok.kind != TokenKind::Eof {
            self.pos += 1;
        }
        tok
    }

    /// Step into a parenthesized group or unary operand.
    fn enter(&mut self, pos: usize) -> Result<(), FormulaError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(too_deep(pos));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn comparison(&mut self) -> Result<Node, FormulaError> {
        let mut lhs = self.additive()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Less => BinaryOp::Lt,
                TokenKind::LessEq => BinaryOp::Le,
                TokenKind::Greater => BinaryOp::Gt,
                TokenKind::GreaterEq => BinaryOp::Ge,
                TokenKind::EqEq => BinaryOp::Eq,
                TokenKind::NotEq => BinaryOp::Ne,
                _ => return Ok(lhs),
            };
            let pos = self.advance().pos;
            let rhs = self.additive()?;
            lhs = join(op, lhs, rhs, pos)?;
        }
    }

    fn additive(&mut self) -> Result<Node, FormulaError> {
        let mut lhs = self.term()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => return Ok(lhs),
            };
            let pos = self.advance().pos;
            let rhs = self.term()?;
            lhs = join(op, lhs, rhs, pos)?;
        }
    }

    fn term(&mut self) -> Result<Node, FormulaError> {
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                _ => return Ok(lhs),
            };
            let pos = self.advance().pos;
            let rhs = self.unary()?;
            lhs = join(op, lhs, rhs, pos)?;
        }
    }

    fn unary(&mut self) -> Result<Node, FormulaError> {
        let op = match self.peek().kind {
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Plus => UnaryOp::Plus,
            _ => return self.primary(),
        };
        let pos = self.advance().pos;
        self.enter(pos)?;
        let (operand, height) = self.unary()?;
        self.leave();
        Ok((Expr::unary(op, operand), height + 1))
    }

    fn primary(&mut self) -> Result<Node, FormulaError> {
        let tok = self.advance();
        match tok.kind {
            TokenKind::Number(n) => Ok((Expr::Number(n), 1)),
            TokenKind::Ident(name) => {
                if self.peek().kind == TokenKind::LParen {
                    return Err(FormulaError::FunctionCall { name, pos: tok.pos });
                }
                Stat::from_symbol(&name)
                    .map(|stat| (Expr::Stat(stat), 1))
                    .ok_or(FormulaError::UnknownStat { name, pos: tok.pos })
            }
            TokenKind::LParen => {
                self.enter(tok.pos)?;
                let inner = self.comparison()?;
                self.leave();
                let close = self.advance();
                match close.kind {
                    TokenKind::RParen => Ok(inner),
                    TokenKind::Eof => Err(FormulaError::UnclosedParen { pos: tok.pos }),
                    other => Err(FormulaError::UnexpectedToken {
                        found: other.to_string(),
                        expected: "`)`",
                        pos: close.pos,
                    }),
                }
            }
            other => Err(FormulaError::UnexpectedToken {
                found: other.to_string(),
                expected: "a number, stat, or `(`",
                pos: tok.pos,
            }),
        }
    }
}

fn too_deep(pos: usize) -> FormulaError {
    FormulaError::TooDeep {
        max_depth: MAX_DEPTH,
        pos,
    }
}

/// Build a binary node, rejecting trees taller than [`MAX_DEPTH`]. Long
/// left-associative chains such as `PTS + PTS + ...` grow the tree without
/// nesting, so height is checked here as well as in `enter`.
fn join(op: BinaryOp, (lhs, lh): Node, (rhs, rh): Node, pos: usize) -> Result<Node, FormulaError> {
    let height = lh.max(rh) + 1;
    if height > MAX_DEPTH {
        return Err(too_deep(pos));
    }
    Ok((Expr::binary(op, lhs, rhs), height))
}
