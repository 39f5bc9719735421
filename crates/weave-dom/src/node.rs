//! Node types for the document tree.
//!
//! The tree is owned: every node owns its children, cloning is always deep,
//! and two trees never share mutable state.

use smol_str::SmolStr;

/// A node in the document tree.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Node {
    /// An element with attributes and children.
    Element(Element),
    /// A text node.
    Text(String),
    /// A comment, also used as a placeholder marker.
    Comment(String),
    /// A detached container whose children are spliced in when inserted.
    Fragment(Vec<Node>),
}

/// The kind of a node, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Element,
    Text,
    Comment,
    Fragment,
}

impl Node {
    /// Create an element node with no attributes or children.
    pub fn element(tag: impl Into<SmolStr>) -> Self {
        Self::Element(Element::new(tag))
    }

    /// Create a text node.
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text(content.into())
    }

    /// Create a comment node.
    pub fn comment(content: impl Into<String>) -> Self {
        Self::Comment(content.into())
    }

    /// Create an empty fragment.
    pub fn fragment() -> Self {
        Self::Fragment(Vec::new())
    }

    /// Get the kind of this node.
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Element(_) => NodeKind::Element,
            Self::Text(_) => NodeKind::Text,
            Self::Comment(_) => NodeKind::Comment,
            Self::Fragment(_) => NodeKind::Fragment,
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Self::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Child nodes. Leaf nodes have none.
    pub fn children(&self) -> &[Node] {
        match self {
            Self::Element(el) => &el.children,
            Self::Fragment(children) => children,
            Self::Text(_) | Self::Comment(_) => &[],
        }
    }

    /// Mutable access to the child list, if this node can have children.
    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Self::Element(el) => Some(&mut el.children),
            Self::Fragment(children) => Some(children),
            Self::Text(_) | Self::Comment(_) => None,
        }
    }

    /// Append a child. Appending a fragment moves its children instead.
    ///
    /// Returns `false` if this node is a leaf and cannot hold children.
    pub fn append_child(&mut self, child: Node) -> bool {
        let Some(children) = self.children_mut() else {
            return false;
        };
        match child {
            Node::Fragment(nodes) => children.extend(nodes),
            other => children.push(other),
        }
        true
    }

    /// Unwrap a fragment into its children; any other node becomes a single-item list.
    pub fn into_nodes(self) -> Vec<Node> {
        match self {
            Self::Fragment(children) => children,
            other => vec![other],
        }
    }

    /// The concatenated text of this node and its descendants.
    ///
    /// Comments contribute only when they are the node itself.
    pub fn text_content(&self) -> String {
        match self {
            Self::Text(text) | Self::Comment(text) => text.clone(),
            Self::Element(_) | Self::Fragment(_) => {
                let mut out = String::new();
                collect_text(self.children(), &mut out);
                out
            }
        }
    }

    /// Replace the text of this node.
    ///
    /// For elements and fragments all children are dropped and replaced by a
    /// single text node (or nothing, when `text` is empty).
    pub fn set_text_content(&mut self, text: impl Into<String>) {
        let text = text.into();
        match self {
            Self::Text(data) | Self::Comment(data) => *data = text,
            Self::Element(Element { children, .. }) | Self::Fragment(children) => {
                children.clear();
                if !text.is_empty() {
                    children.push(Node::Text(text));
                }
            }
        }
    }
}

fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Comment(_) => {}
            Node::Element(el) => collect_text(&el.children, out),
            Node::Fragment(children) => collect_text(children, out),
        }
    }
}

/// An element node.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Element {
    /// Lower-case tag name.
    pub tag: SmolStr,
    /// Attributes in document order.
    pub attrs: Vec<Attribute>,
    /// Child nodes.
    pub children: Vec<Node>,
}

impl Element {
    /// Create an element with no attributes or children.
    pub fn new(tag: impl Into<SmolStr>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attr(mut self, name: impl Into<SmolStr>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Builder-style child append.
    pub fn with_child(mut self, child: Node) -> Self {
        match child {
            Node::Fragment(nodes) => self.children.extend(nodes),
            other => self.children.push(other),
        }
        self
    }

    pub fn has_attributes(&self) -> bool {
        !self.attrs.is_empty()
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attrs
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attrs.iter().any(|a| a.name == name)
    }

    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Set an attribute, keeping its position if it already exists.
    pub fn set_attribute(&mut self, name: impl Into<SmolStr>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|a| a.name == name) {
            Some(attr) => attr.value = value,
            None => self.attrs.push(Attribute { name, value }),
        }
    }

    /// Remove an attribute, returning its previous value.
    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        let pos = self.attrs.iter().position(|a| a.name == name)?;
        Some(self.attrs.remove(pos).value)
    }

    /// Read one property from the inline `style` attribute.
    pub fn style_property(&self, property: &str) -> Option<String> {
        let style = self.get_attribute("style")?;
        parse_declarations(style)
            .into_iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(property))
            .map(|(_, value)| value)
    }

    /// Set one property in the inline `style` attribute, preserving the others.
    pub fn set_style_property(&mut self, property: &str, value: &str) {
        let mut declarations = self
            .get_attribute("style")
            .map(parse_declarations)
            .unwrap_or_default();

        match declarations
            .iter_mut()
            .find(|(name, _)| name.eq_ignore_ascii_case(property))
        {
            Some(decl) => decl.1 = value.to_string(),
            None => declarations.push((property.to_string(), value.to_string())),
        }

        let style = declarations
            .iter()
            .map(|(name, value)| format!("{}: {};", name, value))
            .collect::<Vec<_>>()
            .join(" ");
        self.set_attribute("style", style);
    }

    /// Whether this element never has children or a closing tag.
    pub fn is_void(&self) -> bool {
        is_void_element(&self.tag)
    }
}

/// Split a `style` attribute into `(property, value)` pairs.
fn parse_declarations(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|decl| {
            let (name, value) = decl.split_once(':')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some((name.to_string(), value.trim().to_string()))
        })
        .collect()
}

/// An attribute on an element.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attribute {
    /// Attribute name.
    pub name: SmolStr,
    /// Attribute value (empty for boolean attributes).
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<SmolStr>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A mutable handle on one position in a parent's child list.
///
/// This is the "replace child in parent" capability: the node at the slot can
/// be swapped for a placeholder, and later the placeholder can be replaced by
/// any number of nodes.
pub struct ChildSlot<'a> {
    siblings: &'a mut Vec<Node>,
    index: usize,
}

impl<'a> ChildSlot<'a> {
    /// Create a slot. `index` must be in bounds.
    pub fn new(siblings: &'a mut Vec<Node>, index: usize) -> Self {
        debug_assert!(index < siblings.len());
        Self { siblings, index }
    }

    pub fn node(&self) -> &Node {
        &self.siblings[self.index]
    }

    pub fn node_mut(&mut self) -> &mut Node {
        &mut self.siblings[self.index]
    }

    /// Swap the node in this slot, returning the previous one.
    pub fn replace(&mut self, node: Node) -> Node {
        std::mem::replace(&mut self.siblings[self.index], node)
    }

    /// Replace the node in this slot with `replacement`, flattening fragments.
    ///
    /// Returns how many nodes now occupy the slot's position.
    pub fn splice(&mut self, replacement: Node) -> usize {
        replace_child(self.siblings, self.index, replacement)
    }
}

/// Replace `siblings[index]` with `replacement`. A fragment contributes its
/// children, so the result may occupy zero or more positions.
///
/// Returns the number of nodes inserted.
pub fn replace_child(siblings: &mut Vec<Node>, index: usize, replacement: Node) -> usize {
    let nodes = replacement.into_nodes();
    let count = nodes.len();
    siblings.splice(index..=index, nodes);
    count
}

/// Check if an element is a void element (no closing tag).
pub fn is_void_element(tag: &str) -> bool {
    matches!(
        tag.to_ascii_lowercase().as_str(),
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}
