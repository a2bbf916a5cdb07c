//! Decoding of font-family values into family names.
//!
//! Custom properties are resolved through a [`VariableTable`] owned by a
//! [`FontContext`]. One context belongs to one pruning invocation, so
//! independent stylesheets never see each other's variables.

use std::collections::{HashMap, HashSet};

use tracing::trace;

use crate::ast::{Declaration, ValueNode};
use crate::generate::generate_value_node;
use crate::logging::FONT_FACE_CLEANUP;

/// Lower-cased font-family names.
pub type FontNameSet = HashSet<String>;

/// Custom property name (`--brand-font`) to the family names it may expand
/// to, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableTable {
    entries: HashMap<String, Vec<String>>,
}

impl VariableTable {
    /// Adds `values` to the set recorded for `name`, creating the entry even
    /// when `values` is empty.
    pub fn record<I>(&mut self, name: &str, values: I)
    where
        I: IntoIterator<Item = String>,
    {
        let entry = self.entries.entry(name.to_string()).or_default();
        for value in values {
            if !value.is_empty() && !entry.contains(&value) {
                entry.push(value);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.entries.get(name).map(Vec::as_slice)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Per-invocation state for font resolution.
#[derive(Debug, Clone, Default)]
pub struct FontContext {
    pub variables: VariableTable,
}

/// Removes one pair of matching surrounding quotes.
pub fn strip_quotes(name: &str) -> &str {
    let bytes = name.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if (first == b'"' || first == b'\'') && first == last {
            return &name[1..name.len() - 1];
        }
    }
    name
}

fn is_variable_reference(name: &str) -> bool {
    name.starts_with("--")
}

impl FontContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a `--name: value` declaration.
    ///
    /// Only names observed before a reference resolve; forward references
    /// expand to nothing.
    pub fn record_custom_property(&mut self, decl: &Declaration) {
        let values = self.decode_font_names(&decl.value.children);
        self.variables.record(&decl.property, values);
    }

    /// Decodes a list of value components into family names.
    ///
    /// Adjacent identifiers separated only by whitespace form one unquoted
    /// family name (`Times New Roman`).
    pub fn decode_font_names(&self, nodes: &[ValueNode]) -> Vec<String> {
        let mut names = Vec::new();
        let mut words: Vec<&str> = Vec::new();

        for node in nodes {
            match node {
                ValueNode::Identifier(name) if !is_variable_reference(name) => {
                    words.push(strip_quotes(name));
                }
                ValueNode::WhiteSpace => {}
                other => {
                    flush_words(&mut words, &mut names);
                    names.extend(self.decode_node(other));
                }
            }
        }
        flush_words(&mut words, &mut names);
        names
    }

    /// Decodes a single value component.
    pub fn decode_node(&self, node: &ValueNode) -> Vec<String> {
        match node {
            ValueNode::String(value) => vec![value.clone()],
            ValueNode::Identifier(name) if is_variable_reference(name) => self
                .variables
                .get(name)
                .map(<[String]>::to_vec)
                .unwrap_or_default(),
            ValueNode::Identifier(name) => vec![strip_quotes(name).to_string()],
            ValueNode::Function { children, .. } | ValueNode::Parentheses { children } => {
                self.decode_font_names(children)
            }
            ValueNode::Operator(_) | ValueNode::WhiteSpace => Vec::new(),
            ValueNode::Number(_)
            | ValueNode::Dimension { .. }
            | ValueNode::Percentage(_)
            | ValueNode::Hash(_)
            | ValueNode::Url(_)
            | ValueNode::Raw(_) => {
                trace!(
                    target: FONT_FACE_CLEANUP,
                    node = %generate_value_node(node),
                    "no font name in value node"
                );
                Vec::new()
            }
        }
    }
}

fn flush_words(words: &mut Vec<&str>, names: &mut Vec<String>) {
    if !words.is_empty() {
        names.push(words.join(" "));
        words.clear();
    }
}
