//! Directives and the directive registry.
//!
//! A directive binds one node to an expression. Every directive runs the
//! same lifecycle: `before_update`, then the expression is evaluated against
//! the compiler's data, then `update` receives the value.

use crate::compiler::Compiler;
use crate::error::{CompileError, CompileResult};
use once_cell::sync::Lazy;
use regex::Regex;
use smol_str::SmolStr;
use weave_dom::{ChildSlot, Node};
use weave_expr::{generate, Data, Value};

/// One directive occurrence found while walking the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveDescriptor {
    /// Directive name without the bind marker.
    pub name: SmolStr,
    /// Expression source.
    pub expression: String,
    /// Attribute written by the `attribute` directive.
    pub attr_name: Option<SmolStr>,
}

impl DirectiveDescriptor {
    pub fn new(name: impl Into<SmolStr>, expression: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            expression: expression.into(),
            attr_name: None,
        }
    }

    pub fn with_attr_name(mut self, attr_name: impl Into<SmolStr>) -> Self {
        self.attr_name = Some(attr_name.into());
        self
    }
}

/// The built-in directives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectiveKind {
    Show,
    Text,
    Attribute,
    Each,
    Forin,
}

impl DirectiveKind {
    /// Every registered directive.
    pub const ALL: [DirectiveKind; 5] = [
        DirectiveKind::Show,
        DirectiveKind::Text,
        DirectiveKind::Attribute,
        DirectiveKind::Each,
        DirectiveKind::Forin,
    ];

    /// Look a directive up by name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Show => "show",
            Self::Text => "text",
            Self::Attribute => "attribute",
            Self::Each => "each",
            Self::Forin => "forin",
        }
    }

    /// Whether this directive replaces its node with generated copies.
    pub fn is_repeating(&self) -> bool {
        matches!(self, Self::Each | Self::Forin)
    }

    /// The behavior registered for this directive.
    pub fn behavior(&self) -> &'static dyn DirectiveBehavior {
        match self {
            Self::Show => &Show,
            Self::Text => &Text,
            Self::Attribute => &SetAttribute,
            Self::Each | Self::Forin => &Repeat,
        }
    }
}

/// The lifecycle hooks of a directive.
///
/// `update` returns how many nodes occupy the directive's position
/// afterwards, so the walk can continue with the next sibling.
pub trait DirectiveBehavior: Sync {
    fn before_update(&self, _directive: &mut Directive, _slot: &mut ChildSlot<'_>) {}

    fn update(
        &self,
        directive: &mut Directive,
        slot: &mut ChildSlot<'_>,
        value: Value,
        compiler: &Compiler<'_>,
    ) -> CompileResult<usize>;
}

/// A bound directive.
#[derive(Debug, Clone)]
pub struct Directive {
    pub kind: DirectiveKind,
    pub name: SmolStr,
    /// The expression evaluated before `update`. Repeating directives
    /// narrow it to the collection part in `before_update`.
    pub expression: String,
    pub attr_name: Option<SmolStr>,
    /// The detached node a repeating directive clones per item.
    pub template: Option<Node>,
    /// Loop variable names of a repeating directive.
    pub aliases: Option<RepeatAliases>,
}

impl Directive {
    pub fn new(kind: DirectiveKind, descriptor: DirectiveDescriptor) -> Self {
        Self {
            kind,
            name: descriptor.name,
            expression: descriptor.expression,
            attr_name: descriptor.attr_name,
            template: None,
            aliases: None,
        }
    }

    /// Run the full lifecycle against the node in `slot`.
    pub fn run(&mut self, slot: &mut ChildSlot<'_>, compiler: &Compiler<'_>) -> CompileResult<usize> {
        let behavior = self.kind.behavior();
        behavior.before_update(self, slot);
        let value = self.evaluate(compiler.data())?;
        behavior.update(self, slot, value, compiler)
    }

    fn evaluate(&self, data: &Data) -> CompileResult<Value> {
        let evaluator = generate(&self.expression).map_err(|source| CompileError::Parse {
            directive: self.name.clone(),
            expression: self.expression.clone(),
            source,
        })?;
        evaluator.call(data).map_err(|source| CompileError::Eval {
            directive: self.name.clone(),
            expression: self.expression.clone(),
            source,
        })
    }
}

/// `show`: toggles `display` on the element.
struct Show;

impl DirectiveBehavior for Show {
    fn update(
        &self,
        _directive: &mut Directive,
        slot: &mut ChildSlot<'_>,
        value: Value,
        _compiler: &Compiler<'_>,
    ) -> CompileResult<usize> {
        if let Some(el) = slot.node_mut().as_element_mut() {
            let display = if value.is_truthy() { "block" } else { "none" };
            el.set_style_property("display", display);
        }
        Ok(1)
    }
}

/// `text`: replaces the node's text content.
struct Text;

impl DirectiveBehavior for Text {
    fn update(
        &self,
        _directive: &mut Directive,
        slot: &mut ChildSlot<'_>,
        value: Value,
        _compiler: &Compiler<'_>,
    ) -> CompileResult<usize> {
        let text = if value.is_nullish() {
            String::new()
        } else {
            value.to_js_string()
        };
        slot.node_mut().set_text_content(text);
        Ok(1)
    }
}

/// `attribute`: writes one attribute.
struct SetAttribute;

impl DirectiveBehavior for SetAttribute {
    fn update(
        &self,
        directive: &mut Directive,
        slot: &mut ChildSlot<'_>,
        value: Value,
        _compiler: &Compiler<'_>,
    ) -> CompileResult<usize> {
        if let (Some(name), Some(el)) = (&directive.attr_name, slot.node_mut().as_element_mut()) {
            el.set_attribute(name.clone(), value.to_js_string());
        }
        Ok(1)
    }
}

/// `each` and `forin`: one compiled copy of the node per array item.
struct Repeat;

impl DirectiveBehavior for Repeat {
    fn before_update(&self, directive: &mut Directive, slot: &mut ChildSlot<'_>) {
        let placeholder = Node::comment(format!(":{}", directive.kind.name()));
        directive.template = Some(slot.replace(placeholder));

        let aliases = match directive.kind {
            DirectiveKind::Forin => RepeatAliases::parse_forin(&directive.expression),
            _ => RepeatAliases::each(&directive.expression),
        };
        directive.expression = aliases.collection.clone();
        directive.aliases = Some(aliases);
    }

    fn update(
        &self,
        directive: &mut Directive,
        slot: &mut ChildSlot<'_>,
        value: Value,
        compiler: &Compiler<'_>,
    ) -> CompileResult<usize> {
        let items = match value {
            Value::Array(items) => items,
            Value::Undefined | Value::Null => Vec::new(),
            other => {
                tracing::debug!(
                    directive = %directive.name,
                    expression = %directive.expression,
                    found = other.type_of(),
                    "collection is not an array, leaving placeholder"
                );
                return Ok(1);
            }
        };

        let (Some(template), Some(aliases)) = (&directive.template, &directive.aliases) else {
            return Ok(1);
        };

        let mut generated = Node::fragment();
        for (index, item) in items.into_iter().enumerate() {
            let mut data = Data::new();
            data.insert(aliases.item.clone(), item);
            data.insert(aliases.index.clone(), index);
            for node in compiler.nested(data).compile_nodes(vec![template.clone()])? {
                generated.append_child(node);
            }
        }

        Ok(slot.splice(generated))
    }
}

/// Loop variable names and the collection expression of a repeating
/// directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepeatAliases {
    pub item: SmolStr,
    pub index: SmolStr,
    pub collection: String,
}

static ALIAS_GROUP: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"\(([\s\S]+?)\)").ok());

impl RepeatAliases {
    /// `each`: the whole expression is the collection.
    pub fn each(expression: &str) -> Self {
        Self {
            item: SmolStr::new_static("item"),
            index: SmolStr::new_static("index"),
            collection: expression.trim().to_string(),
        }
    }

    /// `forin`: `item in list`, `(item) in list` or `(item, index) in list`.
    ///
    /// Without ` in ` the whole expression is the collection. A left side
    /// without a parenthesized group is taken whole as the item name.
    pub fn parse_forin(expression: &str) -> Self {
        let mut aliases = Self::each(expression);
        let mut parts = expression.split(" in ");
        let (Some(left), Some(collection)) = (parts.next(), parts.next()) else {
            return aliases;
        };

        let group = ALIAS_GROUP
            .as_ref()
            .and_then(|re| re.captures(left))
            .and_then(|caps| caps.get(1));

        match group {
            Some(group) => {
                let mut names = group.as_str().split(',');
                if let Some(item) = names.next() {
                    aliases.item = item.trim().into();
                }
                if let Some(index) = names.next().map(str::trim).filter(|i| !i.is_empty()) {
                    aliases.index = index.into();
                }
            }
            None => aliases.item = left.trim().into(),
        }
        aliases.collection = collection.trim().to_string();
        aliases
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forin(expression: &str) -> (String, String, String) {
        let aliases = RepeatAliases::parse_forin(expression);
        (
            aliases.item.to_string(),
            aliases.index.to_string(),
            aliases.collection,
        )
    }

    #[test]
    fn test_registry_lookup() {
        assert_eq!(DirectiveKind::from_name("show"), Some(DirectiveKind::Show));
        assert_eq!(DirectiveKind::from_name("forin"), Some(DirectiveKind::Forin));
        assert_eq!(DirectiveKind::from_name("model"), None);
        assert!(DirectiveKind::Each.is_repeating());
        assert!(!DirectiveKind::Text.is_repeating());
    }

    #[test]
    fn test_forin_pair() {
        assert_eq!(
            forin("(v, k) in items"),
            ("v".into(), "k".into(), "items".into())
        );
    }

    #[test]
    fn test_forin_single_alias() {
        assert_eq!(forin("row in rows"), ("row".into(), "index".into(), "rows".into()));
        assert_eq!(forin("(row) in rows"), ("row".into(), "index".into(), "rows".into()));
    }

    #[test]
    fn test_forin_without_in() {
        assert_eq!(forin(" items "), ("item".into(), "index".into(), "items".into()));
    }

    #[test]
    fn test_forin_multiline_group() {
        assert_eq!(
            forin("(v,\n k) in data.list"),
            ("v".into(), "k".into(), "data.list".into())
        );
    }

    #[test]
    fn test_forin_blank_index_keeps_default() {
        assert_eq!(forin("(v, ) in items"), ("v".into(), "index".into(), "items".into()));
    }

    #[test]
    fn test_forin_malformed_group_falls_back() {
        assert_eq!(forin("(v, k in items"), ("(v, k".into(), "index".into(), "items".into()));
    }

    #[test]
    fn test_each_aliases() {
        let aliases = RepeatAliases::each(" list ");
        assert_eq!(aliases.item, "item");
        assert_eq!(aliases.index, "index");
        assert_eq!(aliases.collection, "list");
    }
}
