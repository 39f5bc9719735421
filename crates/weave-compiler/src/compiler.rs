//! The tree compiler.
//!
//! The walk is depth-first and pre-order over child lists rather than single
//! nodes, so a directive can swap its node for a placeholder or splice any
//! number of generated nodes into the parent.

use crate::directive::{Directive, DirectiveDescriptor, DirectiveKind};
use crate::error::CompileResult;
use crate::options::CompilerOptions;
use smol_str::SmolStr;
use weave_dom::{ChildSlot, Element, Node, NodeKind};
use weave_expr::{has_interpolation, parse_text, Data};

/// What the walk does after an element has been compiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// Compile the element's children next.
    Descend,
    /// Skip this many nodes at the element's position without descending.
    Skip(usize),
}

/// What binding a marker directive left in the element's place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bound {
    /// The element stays; `descend` is false once its children were replaced.
    InPlace { descend: bool },
    /// The element was replaced by this many nodes.
    Replaced(usize),
}

/// A priority directive found on an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityMatch {
    pub name: SmolStr,
    pub attribute: String,
    pub expression: String,
}

/// Compiles node trees against one data context.
#[derive(Debug, Clone)]
pub struct Compiler<'a> {
    data: Data,
    options: &'a CompilerOptions,
}

impl<'a> Compiler<'a> {
    pub fn new(data: Data, options: &'a CompilerOptions) -> Self {
        Self { data, options }
    }

    pub fn data(&self) -> &Data {
        &self.data
    }

    pub fn options(&self) -> &'a CompilerOptions {
        self.options
    }

    /// A compiler for a generated copy: fresh data, same options.
    pub fn nested(&self, data: Data) -> Compiler<'a> {
        Compiler::new(data, self.options)
    }

    /// Compile a list of sibling nodes, returning what now stands in their
    /// place.
    pub fn compile_nodes(&self, mut nodes: Vec<Node>) -> CompileResult<Vec<Node>> {
        self.walk_children(&mut nodes)?;
        Ok(nodes)
    }

    /// The priority directive an element carries, if any.
    ///
    /// An empty attribute value is treated as absent and the next priority
    /// name is tried; a blank value means the element has no priority
    /// directive at all.
    pub fn find_priority(&self, el: &Element) -> Option<PriorityMatch> {
        for name in &self.options.priority {
            let attribute = self.options.directive_attribute(name);
            match el.get_attribute(&attribute) {
                Some(value) if !value.is_empty() => {
                    let expression = value.trim();
                    if expression.is_empty() {
                        return None;
                    }
                    return Some(PriorityMatch {
                        name: name.clone(),
                        expression: expression.to_string(),
                        attribute,
                    });
                }
                _ => continue,
            }
        }
        None
    }

    fn walk_children(&self, children: &mut Vec<Node>) -> CompileResult<()> {
        let mut index = 0;
        while index < children.len() {
            index += self.walk_at(children, index)?;
        }
        Ok(())
    }

    /// Compile `siblings[index]` and its subtree. Returns how many nodes now
    /// occupy that position.
    fn walk_at(&self, siblings: &mut Vec<Node>, index: usize) -> CompileResult<usize> {
        match siblings[index].kind() {
            NodeKind::Element => {
                let step = self.compile_element(&mut ChildSlot::new(siblings, index))?;
                match step {
                    Step::Skip(occupied) => Ok(occupied),
                    Step::Descend => {
                        if let Some(children) = siblings[index].children_mut() {
                            self.walk_children(children)?;
                        }
                        Ok(1)
                    }
                }
            }
            NodeKind::Text => {
                self.compile_text(&mut ChildSlot::new(siblings, index))?;
                Ok(1)
            }
            NodeKind::Fragment => {
                if let Some(children) = siblings[index].children_mut() {
                    self.walk_children(children)?;
                }
                Ok(1)
            }
            NodeKind::Comment => Ok(1),
        }
    }

    fn compile_element(&self, slot: &mut ChildSlot<'_>) -> CompileResult<Step> {
        let Some(el) = slot.node().as_element() else {
            return Ok(Step::Descend);
        };

        let mut step = Step::Descend;

        if el.has_attributes() {
            if let Some(priority) = self.find_priority(el) {
                strip_attribute(slot, &priority.attribute);
                match self.bind_marked(&priority.name, &priority.expression, slot)? {
                    Bound::Replaced(occupied) => return Ok(Step::Skip(occupied)),
                    Bound::InPlace { descend: false } => step = Step::Skip(1),
                    Bound::InPlace { descend: true } => {}
                }
            }
        }

        let Some(el) = slot.node().as_element() else {
            return Ok(step);
        };
        let attrs = el.attrs.clone();

        for attr in attrs {
            let value = attr.value.trim();

            if let Some(name) = self.options.directive_name(&attr.name) {
                // Before binding: a repeating directive clones this element.
                strip_attribute(slot, &attr.name);
                if value.is_empty() {
                    continue;
                }
                match self.bind_marked(name, value, slot)? {
                    Bound::Replaced(occupied) => return Ok(Step::Skip(occupied)),
                    Bound::InPlace { descend: false } => step = Step::Skip(1),
                    Bound::InPlace { descend: true } => {}
                }
            } else if !value.is_empty() && has_interpolation(&attr.value) {
                let descriptor = DirectiveDescriptor::new(
                    DirectiveKind::Attribute.name(),
                    parse_text(&attr.value),
                )
                .with_attr_name(attr.name.clone());
                self.bind(descriptor, slot)?;
            }
        }

        Ok(step)
    }

    /// Bind a directive named by a marker attribute.
    fn bind_marked(
        &self,
        name: &str,
        expression: &str,
        slot: &mut ChildSlot<'_>,
    ) -> CompileResult<Bound> {
        let kind = DirectiveKind::from_name(name);
        let occupied = self.bind(DirectiveDescriptor::new(name, expression), slot)?;
        Ok(match kind {
            Some(kind) if kind.is_repeating() => Bound::Replaced(occupied),
            Some(DirectiveKind::Text) => Bound::InPlace { descend: false },
            _ => Bound::InPlace { descend: true },
        })
    }

    fn compile_text(&self, slot: &mut ChildSlot<'_>) -> CompileResult<()> {
        let Node::Text(text) = slot.node() else {
            return Ok(());
        };
        if text.trim().is_empty() {
            return Ok(());
        }
        let descriptor = DirectiveDescriptor::new(DirectiveKind::Text.name(), parse_text(text));
        self.bind(descriptor, slot)?;
        Ok(())
    }

    /// Bind a directive to the node in `slot` and run it.
    fn bind(&self, descriptor: DirectiveDescriptor, slot: &mut ChildSlot<'_>) -> CompileResult<usize> {
        let Some(kind) = DirectiveKind::from_name(&descriptor.name) else {
            tracing::warn!(
                directive = %descriptor.name,
                expression = %descriptor.expression,
                "unknown directive, ignoring"
            );
            return Ok(1);
        };

        tracing::debug!(
            directive = %descriptor.name,
            expression = %descriptor.expression,
            "binding directive"
        );
        Directive::new(kind, descriptor).run(slot, self)
    }
}

fn strip_attribute(slot: &mut ChildSlot<'_>, name: &str) {
    if let Some(el) = slot.node_mut().as_element_mut() {
        el.remove_attribute(name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weave_dom::parse_markup;
    use weave_expr::Value;

    fn first_element(markup: &str) -> Element {
        match parse_markup(markup).into_nodes().into_iter().next() {
            Some(Node::Element(el)) => el,
            other => panic!("Expected element, got {:?}", other),
        }
    }

    #[test]
    fn test_find_priority_order() {
        let options = CompilerOptions::default();
        let compiler = Compiler::new(Data::new(), &options);
        let el = first_element(r#"<li :each="a" :forin="b in c"></li>"#);
        let priority = compiler.find_priority(&el).unwrap();
        assert_eq!(priority.name, "forin");
        assert_eq!(priority.attribute, ":forin");
        assert_eq!(priority.expression, "b in c");
    }

    #[test]
    fn test_find_priority_empty_and_blank() {
        let options = CompilerOptions::default();
        let compiler = Compiler::new(Data::new(), &options);

        let el = first_element(r#"<li :forin="" :each="items"></li>"#);
        assert_eq!(compiler.find_priority(&el).unwrap().name, "each");

        let el = first_element(r#"<li :forin="  " :each="items"></li>"#);
        assert_eq!(compiler.find_priority(&el), None);
    }

    #[test]
    fn test_compile_nodes_in_place() {
        let options = CompilerOptions::default();
        let compiler = Compiler::new(Data::new().with("name", "Ada"), &options);
        let nodes = compiler
            .compile_nodes(parse_markup("<p>Hi {{ name }}</p>").into_nodes())
            .unwrap();
        assert_eq!(Node::Fragment(nodes).to_html(), "<p>Hi Ada</p>");
    }

    #[test]
    fn test_nested_keeps_options() {
        let options = CompilerOptions::new().with_bind_symbol("w-");
        let compiler = Compiler::new(Data::new(), &options);
        let nested = compiler.nested(Data::new().with("item", Value::from(1)));
        assert_eq!(nested.options().bind_symbol, "w-");
        assert_eq!(nested.data().lookup("item"), Value::from(1));
    }
}
