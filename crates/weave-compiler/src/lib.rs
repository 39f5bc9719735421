//! Template compiler for weave.
//!
//! Compiles a template plus a data context into a data-bound node tree:
//!
//! ```
//! use weave_compiler::compile;
//! use serde_json::json;
//!
//! let compiled = compile(
//!     r#"<li :each="items">{{ item }}</li>"#,
//!     json!({ "items": ["a", "b"] }),
//! )
//! .unwrap();
//! assert_eq!(compiled.view.to_html(), "<li>a</li><li>b</li>");
//! ```
//!
//! Directives are attributes carrying the bind marker (`:` by default):
//! `:show`, `:text`, `:each` and `:forin`. Text and attribute values may
//! interpolate expressions with `{{ }}`.

pub mod compiler;
pub mod directive;
pub mod error;
pub mod options;

pub use compiler::{Compiler, PriorityMatch};
pub use directive::{
    Directive, DirectiveBehavior, DirectiveDescriptor, DirectiveKind, RepeatAliases,
};
pub use error::{CompileError, CompileResult};
pub use options::CompilerOptions;

use weave_dom::{parse_markup, Node};
use weave_expr::Data;

/// A template: markup to parse, or an already built node.
#[derive(Debug, Clone, PartialEq)]
pub enum Template {
    Markup(String),
    Node(Node),
}

impl From<&str> for Template {
    fn from(markup: &str) -> Self {
        Template::Markup(markup.to_string())
    }
}

impl From<String> for Template {
    fn from(markup: String) -> Self {
        Template::Markup(markup)
    }
}

impl From<Node> for Template {
    fn from(node: Node) -> Self {
        Template::Node(node)
    }
}

/// The result of a compile.
#[derive(Debug, Clone, PartialEq)]
pub struct Compiled {
    /// The compiled tree. Markup templates produce a fragment root.
    pub view: Node,
}

impl Compiled {
    pub fn to_html(&self) -> String {
        self.view.to_html()
    }
}

/// Compile a template against data with the default options.
pub fn compile(template: impl Into<Template>, data: impl Into<Data>) -> CompileResult<Compiled> {
    compile_with_options(template, data, &CompilerOptions::default())
}

/// Compile a template against data.
///
/// The template is never shared with the result: markup is parsed fresh and
/// a node template is moved in, so every compile owns its own tree.
pub fn compile_with_options(
    template: impl Into<Template>,
    data: impl Into<Data>,
    options: &CompilerOptions,
) -> CompileResult<Compiled> {
    let compiler = Compiler::new(data.into(), options);

    let root = match template.into() {
        Template::Markup(markup) => parse_markup(&markup),
        Template::Node(node) => node,
    };

    let view = match root {
        Node::Fragment(children) => Node::Fragment(compiler.compile_nodes(children)?),
        root => {
            let expands = root
                .as_element()
                .and_then(|el| compiler.find_priority(el))
                .and_then(|priority| DirectiveKind::from_name(&priority.name))
                .is_some_and(|kind| kind.is_repeating());
            let mut nodes = compiler.compile_nodes(vec![root])?;
            match nodes.pop() {
                Some(node) if !expands && nodes.is_empty() => node,
                last => {
                    nodes.extend(last);
                    Node::Fragment(nodes)
                }
            }
        }
    };

    Ok(Compiled { view })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use weave_dom::Element;

    #[test]
    fn test_compile_markup() {
        let compiled = compile("<h1>Hey, {{ content }}</h1>", json!({ "content": "Template" })).unwrap();
        assert_eq!(compiled.to_html(), "<h1>Hey, Template</h1>");
    }

    #[test]
    fn test_compile_node_keeps_root() {
        let node = Node::Element(
            Element::new("p")
                .with_attr(":show", "visible")
                .with_child(Node::text("{{ n }}")),
        );
        let compiled = compile(node, json!({ "visible": false, "n": 3 })).unwrap();
        assert_eq!(compiled.view.to_html(), r#"<p style="display: none;">3</p>"#);
    }

    #[test]
    fn test_compile_node_with_priority_root_becomes_fragment() {
        let node = Node::Element(Element::new("li").with_attr(":each", "items"));
        let compiled = compile(node, json!({ "items": [1] })).unwrap();
        match compiled.view {
            Node::Fragment(children) => assert_eq!(children, vec![Node::element("li")]),
            other => panic!("Expected fragment, got {:?}", other),
        }
    }

    #[test]
    fn test_non_repeating_priority_root_stays_single_node() {
        let options = CompilerOptions::new().with_priority(["show"]);
        let node = Node::Element(Element::new("p").with_attr(":show", "on"));
        let compiled = compile_with_options(node, json!({ "on": false }), &options).unwrap();
        assert_eq!(
            compiled.view,
            Node::Element(Element::new("p").with_attr("style", "display: none;"))
        );
    }

    #[test]
    fn test_template_from() {
        assert_eq!(Template::from("<p></p>"), Template::Markup("<p></p>".into()));
        assert!(matches!(Template::from(Node::text("x")), Template::Node(_)));
    }
}
