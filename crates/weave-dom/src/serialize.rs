//! HTML serialization.

use crate::entities::{escape_attribute, escape_text};
use crate::node::{Element, Node};
use std::fmt;

impl Node {
    /// Serialize this node (outer HTML). A fragment serializes its children.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        write_node(self, false, &mut out);
        out
    }

    /// Serialize with one element per line, indented by depth.
    ///
    /// Whitespace-only text is dropped, so this is for display only.
    pub fn to_pretty_html(&self) -> String {
        let mut out = String::new();
        write_pretty(self, 0, &mut out);
        out
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_html())
    }
}

fn write_node(node: &Node, raw_text: bool, out: &mut String) {
    match node {
        Node::Element(el) => write_element(el, out),
        Node::Text(text) if raw_text => out.push_str(text),
        Node::Text(text) => escape_text(text, out),
        Node::Comment(text) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
        Node::Fragment(children) => {
            for child in children {
                write_node(child, raw_text, out);
            }
        }
    }
}

fn write_start_tag(el: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&el.tag);
    for attr in &el.attrs {
        out.push(' ');
        out.push_str(&attr.name);
        out.push_str("=\"");
        escape_attribute(&attr.value, out);
        out.push('"');
    }
    out.push('>');
}

fn write_element(el: &Element, out: &mut String) {
    write_start_tag(el, out);
    if el.is_void() {
        return;
    }
    let raw_text = matches!(el.tag.as_str(), "script" | "style");
    for child in &el.children {
        write_node(child, raw_text, out);
    }
    out.push_str("</");
    out.push_str(&el.tag);
    out.push('>');
}

fn write_pretty(node: &Node, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    match node {
        Node::Fragment(children) => {
            for child in children {
                write_pretty(child, depth, out);
            }
        }
        Node::Text(text) => {
            let text = text.trim();
            if !text.is_empty() {
                out.push_str(&indent);
                escape_text(text, out);
                out.push('\n');
            }
        }
        Node::Comment(_) => {
            out.push_str(&indent);
            write_node(node, false, out);
            out.push('\n');
        }
        Node::Element(el) => {
            out.push_str(&indent);
            let inline = el.children.iter().all(|c| matches!(c, Node::Text(_)));
            if inline || el.is_void() {
                write_element(el, out);
                out.push('\n');
                return;
            }
            write_start_tag(el, out);
            out.push('\n');
            for child in &el.children {
                write_pretty(child, depth + 1, out);
            }
            out.push_str(&indent);
            out.push_str("</");
            out.push_str(&el.tag);
            out.push_str(">\n");
        }
    }
}
