//! Serialization of the AST back to compact CSS text.

use crate::ast::{Atrule, Block, Declaration, Node, Rule, Stylesheet, Value, ValueNode};

/// Generates CSS text for a whole stylesheet.
pub fn generate_stylesheet(sheet: &Stylesheet) -> String {
    let mut out = String::new();
    emit_nodes(&sheet.children, &mut out);
    out
}

/// Generates CSS text for a single node.
pub fn generate_node(node: &Node) -> String {
    let mut out = String::new();
    emit_node(node, &mut out);
    out
}

/// Generates CSS text for a declaration value.
pub fn generate_value(value: &Value) -> String {
    let mut out = String::new();
    emit_value_nodes(&value.children, &mut out);
    out.trim().to_string()
}

/// Canonical text of an at-rule prelude: trimmed, whitespace runs collapsed
/// to a single space.
pub fn generate_prelude(prelude: &str) -> String {
    prelude.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Generates CSS text for a single value component.
pub fn generate_value_node(node: &ValueNode) -> String {
    let mut out = String::new();
    emit_value_node(node, &mut out);
    out
}

fn emit_nodes(nodes: &[Node], out: &mut String) {
    let mut after_declaration = false;
    for node in nodes {
        if after_declaration {
            out.push(';');
        }
        emit_node(node, out);
        after_declaration = matches!(node, Node::Declaration(_));
    }
}

fn emit_node(node: &Node, out: &mut String) {
    match node {
        Node::Rule(rule) => emit_rule(rule, out),
        Node::Atrule(atrule) => emit_atrule(atrule, out),
        Node::Declaration(decl) => emit_declaration(decl, out),
        Node::Comment(text) => {
            out.push_str("/*");
            out.push_str(text);
            out.push_str("*/");
        }
        Node::Raw(text) => out.push_str(text),
    }
}

fn emit_rule(rule: &Rule, out: &mut String) {
    out.push_str(rule.prelude.trim());
    emit_block(&rule.block, out);
}

fn emit_atrule(atrule: &Atrule, out: &mut String) {
    out.push('@');
    out.push_str(&atrule.name);
    if let Some(prelude) = atrule.prelude_text() {
        out.push(' ');
        out.push_str(&generate_prelude(prelude));
    }
    match &atrule.block {
        Some(block) => emit_block(block, out),
        None => out.push(';'),
    }
}

fn emit_block(block: &Block, out: &mut String) {
    out.push('{');
    emit_nodes(&block.children, out);
    out.push('}');
}

fn emit_declaration(decl: &Declaration, out: &mut String) {
    out.push_str(&decl.property);
    out.push(':');
    out.push_str(&generate_value(&decl.value));
    if decl.important {
        out.push_str("!important");
    }
}

fn emit_value_nodes(nodes: &[ValueNode], out: &mut String) {
    for node in nodes {
        emit_value_node(node, out);
    }
}

fn emit_value_node(node: &ValueNode, out: &mut String) {
    match node {
        ValueNode::Identifier(name) => out.push_str(name),
        ValueNode::String(value) => {
            out.push('"');
            for ch in value.chars() {
                if ch == '"' || ch == '\\' {
                    out.push('\\');
                }
                out.push(ch);
            }
            out.push('"');
        }
        ValueNode::Number(n) | ValueNode::Raw(n) => out.push_str(n),
        ValueNode::Dimension { value, unit } => {
            out.push_str(value);
            out.push_str(unit);
        }
        ValueNode::Percentage(n) => {
            out.push_str(n);
            out.push('%');
        }
        ValueNode::Hash(h) => {
            out.push('#');
            out.push_str(h);
        }
        ValueNode::Url(url) => {
            out.push_str("url(");
            out.push_str(url);
            out.push(')');
        }
        ValueNode::Function { name, children } => {
            out.push_str(name);
            out.push('(');
            let mut inner = String::new();
            emit_value_nodes(children, &mut inner);
            out.push_str(inner.trim());
            out.push(')');
        }
        ValueNode::Parentheses { children } => {
            out.push('(');
            let mut inner = String::new();
            emit_value_nodes(children, &mut inner);
            out.push_str(inner.trim());
            out.push(')');
        }
        ValueNode::Operator(op) => out.push_str(op),
        ValueNode::WhiteSpace => {
            if !out.ends_with(' ') {
                out.push(' ');
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_font_face() {
        let sheet = Stylesheet::new(vec![Node::Atrule(Atrule {
            name: "font-face".into(),
            prelude: None,
            block: Some(Block::new(vec![
                Node::Declaration(Declaration::new(
                    "font-family",
                    vec![ValueNode::string("Foo")],
                )),
                Node::Declaration(Declaration::new("src", vec![ValueNode::Url("a.woff".into())])),
            ])),
        })]);
        assert_eq!(
            generate_stylesheet(&sheet),
            "@font-face{font-family:\"Foo\";src:url(a.woff)}"
        );
    }

    #[test]
    fn test_generate_value_with_function_and_operator() {
        let value = Value {
            children: vec![
                ValueNode::Function {
                    name: "var".into(),
                    children: vec![ValueNode::ident("--brand")],
                },
                ValueNode::comma(),
                ValueNode::WhiteSpace,
                ValueNode::ident("sans-serif"),
            ],
        };
        assert_eq!(generate_value(&value), "var(--brand), sans-serif");
    }

    #[test]
    fn test_generate_statement_atrule_and_comment() {
        let sheet = Stylesheet::new(vec![
            Node::Comment(" hi ".into()),
            Node::Atrule(Atrule {
                name: "import".into(),
                prelude: Some("url(x.css)".into()),
                block: None,
            }),
        ]);
        assert_eq!(generate_stylesheet(&sheet), "/* hi */@import url(x.css);");
    }

    #[test]
    fn test_prelude_whitespace_collapsed() {
        assert_eq!(
            generate_prelude("  screen\n  and (min-width:  500px) "),
            "screen and (min-width: 500px)"
        );
    }

    #[test]
    fn test_string_escapes_quotes() {
        assert_eq!(generate_value_node(&ValueNode::string("a\"b")), "\"a\\\"b\"");
    }
}
