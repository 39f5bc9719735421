//! Lenient HTML markup parser.
//!
//! Mirrors what a browser does for the fragments template authors write:
//! nothing here is an error. A stray `<` is text, unclosed elements close at
//! end of input, and an end tag closes every element up to its matching start
//! tag.

use crate::entities::decode_entities;
use crate::node::{is_void_element, Attribute, Element, Node};
use smol_str::SmolStr;

/// Parse markup into a fragment whose children are the top-level nodes.
pub fn parse_markup(source: &str) -> Node {
    let mut parser = MarkupParser::new(source);
    Node::Fragment(parser.parse())
}

/// Parser for HTML fragments.
struct MarkupParser<'a> {
    source: &'a str,
    pos: usize,
    /// Tags of the currently open elements, outermost first.
    open: Vec<SmolStr>,
}

/// Why a child list stopped.
enum Stop {
    /// End of input.
    Eof,
    /// The end tag of the innermost open element was consumed.
    Closed,
    /// An ancestor must close (or a sibling must open); nothing was consumed.
    Unwind,
}

impl<'a> MarkupParser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            open: Vec::new(),
        }
    }

    fn parse(&mut self) -> Vec<Node> {
        let mut nodes = Vec::new();
        // Nothing is open at the top level, so only EOF ends this list.
        self.parse_children(&mut nodes);
        nodes
    }

    /// Get remaining source.
    fn remaining(&self) -> &'a str {
        &self.source[self.pos..]
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn starts_with(&self, s: &str) -> bool {
        self.remaining().starts_with(s)
    }

    fn consume(&mut self, s: &str) -> bool {
        if self.starts_with(s) {
            self.pos += s.len();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Read until predicate is false.
    fn read_while<F: Fn(char) -> bool>(&mut self, pred: F) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if pred(c) {
                self.advance();
            } else {
                break;
            }
        }
        &self.source[start..self.pos]
    }

    /// Read until string is found (not consumed).
    fn read_until(&mut self, s: &str) -> &'a str {
        let start = self.pos;
        match self.remaining().find(s) {
            Some(offset) => self.pos += offset,
            None => self.pos = self.source.len(),
        }
        &self.source[start..self.pos]
    }

    /// Whether the input at the cursor opens markup rather than text.
    fn at_markup(&self) -> bool {
        let rest = self.remaining();
        let mut chars = rest.chars();
        if chars.next() != Some('<') {
            return false;
        }
        match chars.next() {
            Some(c) if c.is_ascii_alphabetic() || c == '!' => true,
            Some('/') => chars.next().is_some_and(|c| c.is_ascii_alphabetic()),
            _ => false,
        }
    }

    /// Parse children into `nodes` until an end tag, an implied close, or EOF.
    fn parse_children(&mut self, nodes: &mut Vec<Node>) -> Stop {
        loop {
            if self.is_eof() {
                return Stop::Eof;
            }

            if self.starts_with("</") && self.at_markup() {
                let name = self.peek_end_tag_name();
                match self.open.iter().rposition(|t| *t == name) {
                    Some(pos) if pos + 1 == self.open.len() => {
                        self.skip_end_tag();
                        return Stop::Closed;
                    }
                    Some(_) => return Stop::Unwind,
                    None => {
                        // Stray end tag.
                        self.skip_end_tag();
                        continue;
                    }
                }
            }

            if self.starts_with("<!--") {
                nodes.push(self.parse_comment());
                continue;
            }

            if self.starts_with("<!") {
                // Doctype or bogus comment.
                self.read_until(">");
                self.consume(">");
                continue;
            }

            if self.at_markup() {
                let tag = self.peek_start_tag_name();
                if let Some(current) = self.open.last() {
                    if closes_implicitly(current, &tag) {
                        return Stop::Unwind;
                    }
                }
                if let Some(node) = self.parse_element() {
                    nodes.push(node);
                }
                continue;
            }

            let text = self.parse_text();
            if !text.is_empty() {
                // Adjacent text runs merge, as they would in a document.
                if let Some(Node::Text(prev)) = nodes.last_mut() {
                    prev.push_str(&text);
                } else {
                    nodes.push(Node::Text(text));
                }
            }
        }
    }

    fn peek_start_tag_name(&self) -> SmolStr {
        tag_name_of(&self.remaining()[1..])
    }

    fn peek_end_tag_name(&self) -> SmolStr {
        tag_name_of(&self.remaining()[2..])
    }

    fn skip_end_tag(&mut self) {
        self.read_until(">");
        self.consume(">");
    }

    fn parse_comment(&mut self) -> Node {
        self.consume("<!--");
        let content = self.read_until("-->");
        self.consume("-->");
        Node::Comment(content.to_string())
    }

    /// Parse a text run up to the next piece of markup.
    fn parse_text(&mut self) -> String {
        let start = self.pos;
        // Always make progress, even on a `<` that is not markup.
        self.advance();
        while !self.is_eof() && !self.at_markup() {
            self.advance();
        }
        decode_entities(&self.source[start..self.pos])
    }

    fn parse_element(&mut self) -> Option<Node> {
        self.consume("<");
        let tag: SmolStr = self
            .read_while(is_tag_name_char)
            .to_ascii_lowercase()
            .into();
        if tag.is_empty() {
            return None;
        }

        let attrs = self.parse_attributes();
        let self_closing = self.consume("/>");
        if !self_closing {
            self.consume(">");
        }

        let mut element = Element {
            tag: tag.clone(),
            attrs,
            children: Vec::new(),
        };

        if self_closing || is_void_element(&tag) {
            return Some(Node::Element(element));
        }

        if is_raw_text_element(&tag) {
            let close = format!("</{}", tag);
            let start = self.pos;
            match find_ignore_ascii_case(self.remaining(), &close) {
                Some(offset) => self.pos += offset,
                None => self.pos = self.source.len(),
            }
            let content = &self.source[start..self.pos];
            if !content.is_empty() {
                element.children.push(Node::Text(content.to_string()));
            }
            if !self.is_eof() {
                self.skip_end_tag();
            }
            return Some(Node::Element(element));
        }

        self.open.push(tag);
        self.parse_children(&mut element.children);
        self.open.pop();

        Some(Node::Element(element))
    }

    /// Parse attributes up to `>` or `/>`. Names are lower-cased; the first
    /// occurrence of a duplicated name wins.
    fn parse_attributes(&mut self) -> Vec<Attribute> {
        let mut attrs: Vec<Attribute> = Vec::new();

        loop {
            self.skip_whitespace();

            if self.is_eof() || self.starts_with(">") || self.starts_with("/>") {
                break;
            }

            let name = self.read_while(is_attr_name_char).to_ascii_lowercase();
            if name.is_empty() {
                // `/` not followed by `>`, or a stray quote.
                self.advance();
                continue;
            }

            self.skip_whitespace();
            let value = if self.consume("=") {
                self.skip_whitespace();
                self.parse_attribute_value()
            } else {
                String::new()
            };

            if !attrs.iter().any(|a| a.name == name) {
                attrs.push(Attribute::new(name, value));
            }
        }

        attrs
    }

    fn parse_attribute_value(&mut self) -> String {
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.advance();
                let start = self.pos;
                match self.remaining().find(quote) {
                    Some(offset) => self.pos += offset,
                    None => self.pos = self.source.len(),
                }
                let raw = &self.source[start..self.pos];
                self.advance();
                decode_entities(raw)
            }
            _ => {
                let raw = self.read_while(|c| !c.is_whitespace() && c != '>');
                decode_entities(raw)
            }
        }
    }
}

fn is_tag_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == ':' || c == '.'
}

fn is_attr_name_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '/' | '>' | '=' | '"' | '\'' | '<')
}

fn tag_name_of(rest: &str) -> SmolStr {
    let end = rest
        .find(|c: char| !is_tag_name_char(c))
        .unwrap_or(rest.len());
    rest[..end].to_ascii_lowercase().into()
}

/// Elements whose content is not parsed as markup.
fn is_raw_text_element(tag: &str) -> bool {
    matches!(tag, "script" | "style")
}

/// Whether opening `next` while `current` is open ends `current`.
fn closes_implicitly(current: &str, next: &str) -> bool {
    match current {
        "li" => next == "li",
        "p" => matches!(
            next,
            "p" | "div" | "ul" | "ol" | "table" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6"
                | "section" | "article" | "header" | "footer" | "pre" | "blockquote"
        ),
        "option" => matches!(next, "option" | "optgroup"),
        "dt" | "dd" => matches!(next, "dt" | "dd"),
        "tr" => next == "tr",
        "td" | "th" => matches!(next, "td" | "th" | "tr"),
        _ => false,
    }
}

fn find_ignore_ascii_case(haystack: &str, needle: &str) -> Option<usize> {
    let hay = haystack.as_bytes();
    let needle = needle.as_bytes();
    if needle.len() > hay.len() {
        return None;
    }
    (0..=hay.len() - needle.len()).find(|&i| hay[i..i + needle.len()].eq_ignore_ascii_case(needle))
}
