//! CSS abstract syntax tree consumed by the pruning passes.
//!
//! The tree is deliberately shallow: selectors and at-rule preludes stay as
//! text, only declaration values are tokenized, because the pruning passes
//! only ever inspect at-rule names, media preludes and font-related values.

/// Root of a parsed stylesheet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stylesheet {
    pub children: Vec<Node>,
}

/// Any node that can appear in a stylesheet or a block.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Rule(Rule),
    Atrule(Atrule),
    Declaration(Declaration),
    Comment(String),
    /// Input the reader could not classify, kept verbatim.
    Raw(String),
}

/// A style rule: `selector { declarations }`.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub prelude: String,
    pub block: Block,
}

/// An at-rule: `@name prelude;` or `@name prelude { ... }`.
#[derive(Debug, Clone, PartialEq)]
pub struct Atrule {
    pub name: String,
    pub prelude: Option<String>,
    pub block: Option<Block>,
}

/// Contents between `{` and `}`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Block {
    pub children: Vec<Node>,
}

/// `property: value [!important]`
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub property: String,
    pub value: Value,
    pub important: bool,
}

/// Tokenized declaration value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Value {
    pub children: Vec<ValueNode>,
}

/// Component values of a declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueNode {
    Identifier(String),
    /// Unquoted string contents.
    String(String),
    Number(String),
    Dimension { value: String, unit: String },
    Percentage(String),
    Hash(String),
    /// Unquoted url contents.
    Url(String),
    Function { name: String, children: Vec<ValueNode> },
    Parentheses { children: Vec<ValueNode> },
    /// `,` `/` and similar separators.
    Operator(String),
    WhiteSpace,
    Raw(String),
}

impl Stylesheet {
    pub fn new(children: Vec<Node>) -> Self {
        Self { children }
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }
}

impl Block {
    pub fn new(children: Vec<Node>) -> Self {
        Self { children }
    }
}

impl Atrule {
    /// At-rule name with any vendor prefix removed, lower-cased.
    ///
    /// `@-webkit-keyframes` and `@keyframes` share the basename `keyframes`.
    pub fn basename(&self) -> String {
        let name = self.name.to_ascii_lowercase();
        match name.strip_prefix('-') {
            Some(rest) => match rest.find('-') {
                Some(idx) => rest[idx + 1..].to_string(),
                None => name,
            },
            None => name,
        }
    }

    pub fn is_media(&self) -> bool {
        self.basename() == "media"
    }

    pub fn is_font_face(&self) -> bool {
        self.basename() == "font-face"
    }

    /// Prelude text, or `None` when absent or blank.
    pub fn prelude_text(&self) -> Option<&str> {
        self.prelude
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}

impl Declaration {
    pub fn new(property: impl Into<String>, children: Vec<ValueNode>) -> Self {
        Self {
            property: property.into(),
            value: Value { children },
            important: false,
        }
    }

    /// Property name lower-cased, custom properties left as written.
    pub fn property_name(&self) -> String {
        if self.is_custom_property() {
            self.property.clone()
        } else {
            self.property.to_ascii_lowercase()
        }
    }

    pub fn is_custom_property(&self) -> bool {
        self.property.starts_with("--")
    }
}

impl Value {
    /// Last component that is not whitespace.
    pub fn last_component(&self) -> Option<&ValueNode> {
        self.children
            .iter()
            .rev()
            .find(|node| !matches!(node, ValueNode::WhiteSpace))
    }
}

impl ValueNode {
    pub fn ident(name: impl Into<String>) -> Self {
        Self::Identifier(name.into())
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }

    pub fn comma() -> Self {
        Self::Operator(",".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atrule(name: &str, prelude: Option<&str>) -> Atrule {
        Atrule {
            name: name.to_string(),
            prelude: prelude.map(str::to_string),
            block: None,
        }
    }

    #[test]
    fn test_basename_strips_vendor_prefix() {
        assert_eq!(atrule("-webkit-keyframes", None).basename(), "keyframes");
        assert_eq!(atrule("font-face", None).basename(), "font-face");
        assert_eq!(atrule("-moz-font-face", None).basename(), "font-face");
        assert!(atrule("FONT-FACE", None).is_font_face());
        assert!(atrule("Media", None).is_media());
    }

    #[test]
    fn test_media_check_ignores_vendor_prefix() {
        assert!(atrule("-webkit-media", None).is_media());
        assert!(atrule("-MOZ-Media", None).is_media());
        assert!(!atrule("-media", None).is_media());
        assert!(!atrule("-webkit-supports", None).is_media());
    }

    #[test]
    fn test_prelude_text_blank_is_none() {
        assert_eq!(atrule("media", Some("   ")).prelude_text(), None);
        assert_eq!(atrule("media", None).prelude_text(), None);
        assert_eq!(atrule("media", Some(" print ")).prelude_text(), Some("print"));
    }

    #[test]
    fn test_last_component_skips_whitespace() {
        let value = Value {
            children: vec![
                ValueNode::Dimension { value: "12".into(), unit: "px".into() },
                ValueNode::WhiteSpace,
                ValueNode::ident("serif"),
                ValueNode::WhiteSpace,
            ],
        };
        assert_eq!(value.last_component(), Some(&ValueNode::ident("serif")));
    }

    #[test]
    fn test_custom_property_name_keeps_case() {
        let decl = Declaration::new("--Brand", vec![]);
        assert_eq!(decl.property_name(), "--Brand");
        let decl = Declaration::new("Font-Family", vec![]);
        assert_eq!(decl.property_name(), "font-family");
    }
}
