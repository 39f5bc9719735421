//! Lexer for template expressions.

use crate::error::{ParseError, ParseResult, Span};
use smol_str::SmolStr;
use std::fmt;

/// A token with its source span.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

/// Token kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Number(f64),
    String(String),
    Ident(SmolStr),
    Punct(Punct),
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "number `{}`", n),
            Self::String(_) => write!(f, "string literal"),
            Self::Ident(name) => write!(f, "`{}`", name),
            Self::Punct(p) => write!(f, "`{}`", p.as_str()),
            Self::Eof => write!(f, "end of expression"),
        }
    }
}

/// Punctuators and operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Punct {
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Dot,
    Colon,
    Question,
    QuestionQuestion,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Bang,
    Lt,
    Gt,
    LtEq,
    GtEq,
    EqEq,
    NotEq,
    EqEqEq,
    NotEqEq,
    AndAnd,
    OrOr,
}

impl Punct {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LParen => "(",
            Self::RParen => ")",
            Self::LBracket => "[",
            Self::RBracket => "]",
            Self::LBrace => "{",
            Self::RBrace => "}",
            Self::Comma => ",",
            Self::Dot => ".",
            Self::Colon => ":",
            Self::Question => "?",
            Self::QuestionQuestion => "??",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Percent => "%",
            Self::Bang => "!",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::LtEq => "<=",
            Self::GtEq => ">=",
            Self::EqEq => "==",
            Self::NotEq => "!=",
            Self::EqEqEq => "===",
            Self::NotEqEq => "!==",
            Self::AndAnd => "&&",
            Self::OrOr => "||",
        }
    }
}

/// Longest operators first so `===` wins over `==`.
const PUNCTS: &[(&str, Punct)] = &[
    ("===", Punct::EqEqEq),
    ("!==", Punct::NotEqEq),
    ("==", Punct::EqEq),
    ("!=", Punct::NotEq),
    ("<=", Punct::LtEq),
    (">=", Punct::GtEq),
    ("&&", Punct::AndAnd),
    ("||", Punct::OrOr),
    ("??", Punct::QuestionQuestion),
    ("(", Punct::LParen),
    (")", Punct::RParen),
    ("[", Punct::LBracket),
    ("]", Punct::RBracket),
    ("{", Punct::LBrace),
    ("}", Punct::RBrace),
    (",", Punct::Comma),
    (".", Punct::Dot),
    (":", Punct::Colon),
    ("?", Punct::Question),
    ("+", Punct::Plus),
    ("-", Punct::Minus),
    ("*", Punct::Star),
    ("/", Punct::Slash),
    ("%", Punct::Percent),
    ("!", Punct::Bang),
    ("<", Punct::Lt),
    (">", Punct::Gt),
];

/// Tokenize an expression. The last token is always `Eof`.
pub fn tokenize(source: &str) -> ParseResult<Vec<Token>> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
    }
}

/// A lexer for expression source.
pub struct Lexer<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source, pos: 0 }
    }

    fn remaining(&self) -> &'a str {
        &self.source[self.pos..]
    }

    fn peek_char(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.remaining().chars().nth(1)
    }

    fn next_char(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn consume_while<F>(&mut self, pred: F) -> &'a str
    where
        F: Fn(char) -> bool,
    {
        let start = self.pos;
        while let Some(c) = self.peek_char() {
            if pred(c) {
                self.next_char();
            } else {
                break;
            }
        }
        &self.source[start..self.pos]
    }

    fn span_from(&self, start: usize) -> Span {
        Span::from_range(start..self.pos)
    }

    /// Lex the next token.
    pub fn next_token(&mut self) -> ParseResult<Token> {
        self.consume_while(char::is_whitespace);
        let start = self.pos;

        let Some(c) = self.peek_char() else {
            return Ok(Token {
                kind: TokenKind::Eof,
                span: Span::from_range(start..start),
            });
        };

        let kind = if c.is_ascii_digit()
            || (c == '.' && self.peek_second().is_some_and(|n| n.is_ascii_digit()))
        {
            self.lex_number()?
        } else if c == '"' || c == '\'' {
            self.lex_string()?
        } else if is_ident_start(c) {
            TokenKind::Ident(self.consume_while(is_ident_continue).into())
        } else if let Some((text, punct)) = PUNCTS
            .iter()
            .find(|(text, _)| self.remaining().starts_with(text))
        {
            self.pos += text.len();
            TokenKind::Punct(*punct)
        } else {
            self.next_char();
            return Err(ParseError::invalid_character(c, self.span_from(start)));
        };

        Ok(Token {
            kind,
            span: self.span_from(start),
        })
    }

    fn lex_number(&mut self) -> ParseResult<TokenKind> {
        let start = self.pos;

        let rest = self.remaining();
        if rest.starts_with("0x") || rest.starts_with("0X") {
            self.pos += 2;
            let digits = self.consume_while(|c| c.is_ascii_hexdigit());
            let value = u64::from_str_radix(digits, 16)
                .map_err(|_| ParseError::invalid_number(&self.source[start..self.pos], self.span_from(start)))?;
            self.reject_ident_suffix(start)?;
            return Ok(TokenKind::Number(value as f64));
        }

        self.consume_while(|c| c.is_ascii_digit());
        if self.peek_char() == Some('.') {
            self.next_char();
            self.consume_while(|c| c.is_ascii_digit());
        }
        if matches!(self.peek_char(), Some('e' | 'E')) {
            let save = self.pos;
            self.next_char();
            if matches!(self.peek_char(), Some('+' | '-')) {
                self.next_char();
            }
            if self.consume_while(|c| c.is_ascii_digit()).is_empty() {
                self.pos = save;
            }
        }
        self.reject_ident_suffix(start)?;

        let text = &self.source[start..self.pos];
        text.parse::<f64>()
            .map(TokenKind::Number)
            .map_err(|_| ParseError::invalid_number(text, self.span_from(start)))
    }

    /// `3in` and `1px` are not numbers.
    fn reject_ident_suffix(&mut self, start: usize) -> ParseResult<()> {
        if self.peek_char().is_some_and(is_ident_start) {
            self.consume_while(is_ident_continue);
            let text = &self.source[start..self.pos];
            return Err(ParseError::invalid_number(text, self.span_from(start)));
        }
        Ok(())
    }

    fn lex_string(&mut self) -> ParseResult<TokenKind> {
        let start = self.pos;
        let quote = self.next_char();
        let mut value = String::new();

        loop {
            let Some(c) = self.next_char() else {
                return Err(ParseError::unterminated_string(self.span_from(start)));
            };
            match c {
                c if Some(c) == quote => break,
                '\n' | '\r' => return Err(ParseError::unterminated_string(self.span_from(start))),
                '\\' => {
                    let Some(escaped) = self.next_char() else {
                        return Err(ParseError::unterminated_string(self.span_from(start)));
                    };
                    match escaped {
                        'n' => value.push('\n'),
                        't' => value.push('\t'),
                        'r' => value.push('\r'),
                        'b' => value.push('\u{8}'),
                        'f' => value.push('\u{c}'),
                        'v' => value.push('\u{b}'),
                        '0' => value.push('\0'),
                        'x' => value.push(self.lex_hex_escape(2, start)?),
                        'u' => value.push(self.lex_unicode_escape(start)?),
                        // Line continuation.
                        '\n' => {}
                        '\r' => {
                            if self.peek_char() == Some('\n') {
                                self.next_char();
                            }
                        }
                        other => value.push(other),
                    }
                }
                c => value.push(c),
            }
        }

        Ok(TokenKind::String(value))
    }

    fn lex_hex_escape(&mut self, len: usize, start: usize) -> ParseResult<char> {
        let digits_start = self.pos;
        for _ in 0..len {
            match self.peek_char() {
                Some(c) if c.is_ascii_hexdigit() => {
                    self.next_char();
                }
                _ => return Err(self.invalid_escape(start)),
            }
        }
        let code = u32::from_str_radix(&self.source[digits_start..self.pos], 16)
            .map_err(|_| self.invalid_escape(start))?;
        char::from_u32(code).ok_or_else(|| self.invalid_escape(start))
    }

    fn lex_unicode_escape(&mut self, start: usize) -> ParseResult<char> {
        if self.peek_char() != Some('{') {
            return self.lex_hex_escape(4, start);
        }
        self.next_char();
        let digits = self.consume_while(|c| c.is_ascii_hexdigit());
        if self.next_char() != Some('}') || digits.is_empty() {
            return Err(self.invalid_escape(start));
        }
        u32::from_str_radix(digits, 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| self.invalid_escape(start))
    }

    fn invalid_escape(&self, start: usize) -> ParseError {
        ParseError::new(
            "Invalid escape sequence",
            self.span_from(start),
            crate::error::ParseErrorCode::UnexpectedToken,
        )
    }
}

pub fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$' || (!c.is_ascii() && c.is_alphabetic())
}

pub fn is_ident_continue(c: char) -> bool {
    is_ident_start(c) || c.is_ascii_digit()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseErrorCode;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_tokenize_operators_longest_first() {
        assert_eq!(
            kinds("a === b !== c"),
            vec![
                TokenKind::Ident("a".into()),
                TokenKind::Punct(Punct::EqEqEq),
                TokenKind::Ident("b".into()),
                TokenKind::Punct(Punct::NotEqEq),
                TokenKind::Ident("c".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_tokenize_numbers() {
        assert_eq!(
            kinds("1 2.5 .5 1e3 0x1F"),
            vec![
                TokenKind::Number(1.0),
                TokenKind::Number(2.5),
                TokenKind::Number(0.5),
                TokenKind::Number(1000.0),
                TokenKind::Number(31.0),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_tokenize_member_access() {
        assert_eq!(
            kinds("a.b"),
            vec![
                TokenKind::Ident("a".into()),
                TokenKind::Punct(Punct::Dot),
                TokenKind::Ident("b".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_tokenize_strings() {
        assert_eq!(
            kinds(r#"'it\'s' "a\"b\\c\n" '\x41B\u{43}'"#),
            vec![
                TokenKind::String("it's".into()),
                TokenKind::String("a\"b\\c\n".into()),
                TokenKind::String("ABC".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_tokenize_unterminated_string() {
        let err = tokenize("'abc").unwrap_err();
        assert_eq!(err.code, ParseErrorCode::UnterminatedString);
    }

    #[test]
    fn test_tokenize_invalid_number() {
        let err = tokenize("3in").unwrap_err();
        assert_eq!(err.code, ParseErrorCode::InvalidNumber);
    }

    #[test]
    fn test_tokenize_invalid_character() {
        let err = tokenize("a # b").unwrap_err();
        assert_eq!(err.code, ParseErrorCode::InvalidCharacter);
        assert_eq!(err.span, Span::new(2, 3));
    }
}
