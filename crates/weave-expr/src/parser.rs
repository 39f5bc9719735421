//! Recursive-descent parser for template expressions.
//!
//! Precedence, loosest first:
//!
//! ```text
//! conditional   a ? b : c
//! logical-or    ||  ??
//! logical-and   &&
//! equality      ==  !=  ===  !==
//! relational    <  >  <=  >=  in
//! additive      +  -
//! multiplicative *  /  %
//! unary         !  -  +  typeof
//! postfix       a.b  a[b]  a(b)
//! primary
//! ```

use crate::ast::{BinaryOp, Expr, Literal, LogicalOp, Property, UnaryOp};
use crate::error::{ParseError, ParseResult, Span};
use crate::lexer::{tokenize, Punct, Token, TokenKind};
use smol_str::SmolStr;

/// Parse a complete expression. Trailing tokens are an error.
pub fn parse_expression(source: &str) -> ParseResult<Expr> {
    let tokens = tokenize(source)?;
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.parse_conditional()?;
    let token = parser.peek();
    if token.kind != TokenKind::Eof {
        return Err(ParseError::unexpected_token(
            "end of expression",
            &token.kind.to_string(),
            token.span,
        ));
    }
    Ok(expr)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        // The token list always ends with Eof.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn previous_span(&self) -> Span {
        self.tokens[self.pos.saturating_sub(1)].span
    }

    fn is_punct(&self, punct: Punct) -> bool {
        self.peek().kind == TokenKind::Punct(punct)
    }

    fn is_keyword(&self, keyword: &str) -> bool {
        matches!(&self.peek().kind, TokenKind::Ident(name) if name == keyword)
    }

    fn eat(&mut self, punct: Punct) -> bool {
        if self.is_punct(punct) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, punct: Punct) -> ParseResult<Span> {
        let token = self.advance();
        if token.kind == TokenKind::Punct(punct) {
            return Ok(token.span);
        }
        let expected = format!("`{}`", punct.as_str());
        Err(unexpected(&expected, &token))
    }

    fn parse_conditional(&mut self) -> ParseResult<Expr> {
        let test = self.parse_or()?;
        if !self.eat(Punct::Question) {
            return Ok(test);
        }
        let consequent = self.parse_conditional()?;
        self.expect(Punct::Colon)?;
        let alternate = self.parse_conditional()?;
        Ok(Expr::Conditional {
            test: Box::new(test),
            consequent: Box::new(consequent),
            alternate: Box::new(alternate),
        })
    }

    fn parse_or(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_and()?;
        loop {
            let op = if self.eat(Punct::OrOr) {
                LogicalOp::Or
            } else if self.eat(Punct::QuestionQuestion) {
                LogicalOp::Nullish
            } else {
                return Ok(left);
            };
            let right = self.parse_and()?;
            left = Expr::Logical {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
    }

    fn parse_and(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_equality()?;
        while self.eat(Punct::AndAnd) {
            let right = self.parse_equality()?;
            left = Expr::Logical {
                op: LogicalOp::And,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_equality(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_relational()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Punct(Punct::EqEq) => BinaryOp::Eq,
                TokenKind::Punct(Punct::NotEq) => BinaryOp::NotEq,
                TokenKind::Punct(Punct::EqEqEq) => BinaryOp::StrictEq,
                TokenKind::Punct(Punct::NotEqEq) => BinaryOp::StrictNotEq,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_relational()?;
            left = binary(op, left, right);
        }
    }

    fn parse_relational(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_additive()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Punct(Punct::Lt) => BinaryOp::Lt,
                TokenKind::Punct(Punct::Gt) => BinaryOp::Gt,
                TokenKind::Punct(Punct::LtEq) => BinaryOp::LtEq,
                TokenKind::Punct(Punct::GtEq) => BinaryOp::GtEq,
                _ if self.is_keyword("in") => BinaryOp::In,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_additive()?;
            left = binary(op, left, right);
        }
    }

    fn parse_additive(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Punct(Punct::Plus) => BinaryOp::Add,
                TokenKind::Punct(Punct::Minus) => BinaryOp::Sub,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            left = binary(op, left, right);
        }
    }

    fn parse_multiplicative(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Punct(Punct::Star) => BinaryOp::Mul,
                TokenKind::Punct(Punct::Slash) => BinaryOp::Div,
                TokenKind::Punct(Punct::Percent) => BinaryOp::Rem,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_unary()?;
            left = binary(op, left, right);
        }
    }

    fn parse_unary(&mut self) -> ParseResult<Expr> {
        let op = match self.peek().kind {
            TokenKind::Punct(Punct::Bang) => UnaryOp::Not,
            TokenKind::Punct(Punct::Minus) => UnaryOp::Neg,
            TokenKind::Punct(Punct::Plus) => UnaryOp::Plus,
            _ if self.is_keyword("typeof") => UnaryOp::Typeof,
            _ => return self.parse_postfix(),
        };
        self.advance();
        let operand = self.parse_unary()?;
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    fn parse_postfix(&mut self) -> ParseResult<Expr> {
        let start = self.peek().span;
        let mut expr = self.parse_primary()?;
        let mut end = self.previous_span();
        loop {
            if self.eat(Punct::Dot) {
                let token = self.advance();
                let property = match token.kind {
                    TokenKind::Ident(ref name) => name.clone(),
                    _ => return Err(unexpected("property name", &token)),
                };
                end = token.span;
                expr = Expr::Member {
                    object: Box::new(expr),
                    property,
                };
            } else if self.eat(Punct::LBracket) {
                let index = self.parse_conditional()?;
                end = self.expect(Punct::RBracket)?;
                expr = Expr::Index {
                    object: Box::new(expr),
                    index: Box::new(index),
                };
            } else if self.eat(Punct::LParen) {
                let (args, close) = self.parse_list(Punct::RParen)?;
                expr = Expr::Call {
                    callee: Box::new(expr),
                    args,
                    span: start.merge(end),
                };
                end = close;
            } else {
                return Ok(expr);
            }
        }
    }

    /// Comma-separated expressions up to `close`, allowing a trailing comma.
    fn parse_list(&mut self, close: Punct) -> ParseResult<(Vec<Expr>, Span)> {
        let mut items = Vec::new();
        loop {
            if self.is_punct(close) {
                break;
            }
            items.push(self.parse_conditional()?);
            if !self.eat(Punct::Comma) {
                break;
            }
        }
        let end = self.expect(close)?;
        Ok((items, end))
    }

    fn parse_primary(&mut self) -> ParseResult<Expr> {
        let token = self.advance();
        match token.kind {
            TokenKind::Number(n) => Ok(Expr::Literal(Literal::Number(n))),
            TokenKind::String(s) => Ok(Expr::Literal(Literal::String(s))),
            TokenKind::Ident(name) => Ok(match name.as_str() {
                "true" => Expr::Literal(Literal::Bool(true)),
                "false" => Expr::Literal(Literal::Bool(false)),
                "null" => Expr::Literal(Literal::Null),
                "undefined" => Expr::Literal(Literal::Undefined),
                "in" | "typeof" => {
                    return Err(unexpected("expression", &token_with(name.clone(), token.span)))
                }
                _ => Expr::Ident(name.clone(), token.span),
            }),
            TokenKind::Punct(Punct::LParen) => {
                let expr = self.parse_conditional()?;
                self.expect(Punct::RParen)?;
                Ok(expr)
            }
            TokenKind::Punct(Punct::LBracket) => {
                let (items, _) = self.parse_list(Punct::RBracket)?;
                Ok(Expr::Array(items))
            }
            TokenKind::Punct(Punct::LBrace) => self.parse_object(),
            _ => Err(unexpected("expression", &token)),
        }
    }

    fn parse_object(&mut self) -> ParseResult<Expr> {
        let mut props = Vec::new();
        loop {
            if self.is_punct(Punct::RBrace) {
                break;
            }
            let token = self.advance();
            let (key, key_span, is_ident) = match token.kind {
                TokenKind::Ident(name) => (name, token.span, true),
                TokenKind::String(s) => (SmolStr::from(s), token.span, false),
                TokenKind::Number(n) => (
                    SmolStr::from(crate::value::format_number(n)),
                    token.span,
                    false,
                ),
                _ => return Err(unexpected("property name", &token)),
            };

            if self.eat(Punct::Colon) {
                let value = self.parse_conditional()?;
                props.push(Property {
                    key,
                    value,
                    shorthand: false,
                });
            } else if is_ident {
                props.push(Property {
                    value: Expr::Ident(key.clone(), key_span),
                    key,
                    shorthand: true,
                });
            } else {
                let next = self.peek().clone();
                return Err(unexpected("`:`", &next));
            }

            if !self.eat(Punct::Comma) {
                break;
            }
        }
        self.expect(Punct::RBrace)?;
        Ok(Expr::Object(props))
    }
}

fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    Expr::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}

fn token_with(name: SmolStr, span: Span) -> Token {
    Token {
        kind: TokenKind::Ident(name),
        span,
    }
}

fn unexpected(expected: &str, found: &Token) -> ParseError {
    if found.kind == TokenKind::Eof {
        ParseError::unexpected_end(expected, found.span)
    } else {
        ParseError::unexpected_token(expected, &found.kind.to_string(), found.span)
    }
}
