//! Expression syntax tree.

use crate::error::Span;
use smol_str::SmolStr;

/// A literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    String(String),
    Bool(bool),
    Null,
    Undefined,
}

/// A property in an object literal.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub key: SmolStr,
    pub value: Expr,
    /// `{ a }` rather than `{ a: a }`.
    pub shorthand: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Neg,
    Plus,
    Typeof,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Lt,
    Gt,
    LtEq,
    GtEq,
    Eq,
    NotEq,
    StrictEq,
    StrictNotEq,
    In,
}

/// Short-circuiting operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
    Nullish,
}

/// An expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Literal),
    /// A free identifier.
    Ident(SmolStr, Span),
    Array(Vec<Expr>),
    Object(Vec<Property>),
    /// `object.property`. The property name is not an identifier reference.
    Member {
        object: Box<Expr>,
        property: SmolStr,
    },
    /// `object[index]`.
    Index {
        object: Box<Expr>,
        index: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
        /// Span of the callee.
        span: Span,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Logical {
        op: LogicalOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Conditional {
        test: Box<Expr>,
        consequent: Box<Expr>,
        alternate: Box<Expr>,
    },
}

impl Expr {
    /// Visit this expression and every subexpression, parents first.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Expr)) {
        visit(self);
        match self {
            Expr::Literal(_) | Expr::Ident(..) => {}
            Expr::Array(items) => {
                for item in items {
                    item.walk(visit);
                }
            }
            Expr::Object(props) => {
                for prop in props {
                    prop.value.walk(visit);
                }
            }
            Expr::Member { object, .. } => object.walk(visit),
            Expr::Index { object, index } => {
                object.walk(visit);
                index.walk(visit);
            }
            Expr::Call { callee, args, .. } => {
                callee.walk(visit);
                for arg in args {
                    arg.walk(visit);
                }
            }
            Expr::Unary { operand, .. } => operand.walk(visit),
            Expr::Binary { left, right, .. } | Expr::Logical { left, right, .. } => {
                left.walk(visit);
                right.walk(visit);
            }
            Expr::Conditional {
                test,
                consequent,
                alternate,
            } => {
                test.walk(visit);
                consequent.walk(visit);
                alternate.walk(visit);
            }
        }
    }
}
