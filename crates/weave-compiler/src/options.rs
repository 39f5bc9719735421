//! Compiler options.

use smol_str::SmolStr;

/// Default directive attribute marker.
pub const DEFAULT_BIND_SYMBOL: &str = ":";

/// Default priority directives, highest first.
pub const DEFAULT_PRIORITY: &[&str] = &["forin", "each"];

/// Options controlling how directive attributes are recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct CompilerOptions {
    /// Attribute name prefix that marks a directive, e.g. `:` in `:show`.
    pub bind_symbol: SmolStr,
    /// Directives that take over an element before any other attribute is
    /// looked at. The first one present wins.
    pub priority: Vec<SmolStr>,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            bind_symbol: SmolStr::new_static(DEFAULT_BIND_SYMBOL),
            priority: DEFAULT_PRIORITY.iter().map(|name| SmolStr::new(name)).collect(),
        }
    }
}

impl CompilerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bind_symbol(mut self, symbol: impl Into<SmolStr>) -> Self {
        self.bind_symbol = symbol.into();
        self
    }

    pub fn with_priority<I, S>(mut self, priority: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SmolStr>,
    {
        self.priority = priority.into_iter().map(Into::into).collect();
        self
    }

    /// The attribute name for a directive, e.g. `:each`.
    pub fn directive_attribute(&self, name: &str) -> String {
        format!("{}{}", self.bind_symbol, name)
    }

    /// The directive named by an attribute, if it carries the bind marker.
    pub fn directive_name<'a>(&self, attribute: &'a str) -> Option<&'a str> {
        if self.bind_symbol.is_empty() {
            return None;
        }
        attribute.strip_prefix(self.bind_symbol.as_str())
    }
}
