//! Tree traversal over the CSS AST.
//!
//! Read-only traversal follows the visitor shape of `syn::visit`: implement
//! [`Visit`], override the hooks you care about, and call the `walk_*`
//! functions to continue into children.
//!
//! Mutation never happens through the visitor. Removal goes through
//! [`retain_atrules`], which filters each child list in place with
//! `Vec::retain_mut`, so deleting the node being visited neither skips nor
//! revisits its siblings.

use crate::ast::{Atrule, Declaration, Node, Rule, Stylesheet};

/// The nearest container a declaration or comment was found in.
///
/// Visitors that need outer context, such as whether any style rule
/// encloses the node, track it in their own `visit_rule`/`visit_atrule`.
#[derive(Debug, Clone, Copy)]
pub enum Parent<'ast> {
    Root,
    Rule(&'ast Rule),
    Atrule(&'ast Atrule),
}

/// Depth-first, document-order visitor.
pub trait Visit<'ast> {
    fn visit_rule(&mut self, rule: &'ast Rule) {
        walk_rule(self, rule);
    }

    fn visit_atrule(&mut self, atrule: &'ast Atrule) {
        walk_atrule(self, atrule);
    }

    fn visit_declaration(&mut self, _decl: &'ast Declaration, _parent: Parent<'ast>) {}

    fn visit_comment(&mut self, _text: &'ast str, _parent: Parent<'ast>) {}
}

pub fn walk_stylesheet<'ast, V>(visitor: &mut V, sheet: &'ast Stylesheet)
where
    V: Visit<'ast> + ?Sized,
{
    walk_nodes(visitor, &sheet.children, Parent::Root);
}

pub fn walk_rule<'ast, V>(visitor: &mut V, rule: &'ast Rule)
where
    V: Visit<'ast> + ?Sized,
{
    walk_nodes(visitor, &rule.block.children, Parent::Rule(rule));
}

pub fn walk_atrule<'ast, V>(visitor: &mut V, atrule: &'ast Atrule)
where
    V: Visit<'ast> + ?Sized,
{
    if let Some(block) = &atrule.block {
        walk_nodes(visitor, &block.children, Parent::Atrule(atrule));
    }
}

fn walk_nodes<'ast, V>(visitor: &mut V, nodes: &'ast [Node], parent: Parent<'ast>)
where
    V: Visit<'ast> + ?Sized,
{
    for node in nodes {
        match node {
            Node::Rule(rule) => visitor.visit_rule(rule),
            Node::Atrule(atrule) => visitor.visit_atrule(atrule),
            Node::Declaration(decl) => visitor.visit_declaration(decl, parent),
            Node::Comment(text) => visitor.visit_comment(text, parent),
            Node::Raw(_) => {}
        }
    }
}

/// Removes every at-rule, at any depth, for which `keep` returns false.
///
/// `keep` sees at-rules in document order, parents before children. The
/// subtree of a removed at-rule is not visited.
pub fn retain_atrules<F>(sheet: &mut Stylesheet, mut keep: F)
where
    F: FnMut(&Atrule) -> bool,
{
    retain_atrules_in(&mut sheet.children, &mut keep);
}

fn retain_atrules_in<F>(nodes: &mut Vec<Node>, keep: &mut F)
where
    F: FnMut(&Atrule) -> bool,
{
    nodes.retain_mut(|node| match node {
        Node::Atrule(atrule) => {
            if !keep(atrule) {
                return false;
            }
            if let Some(block) = &mut atrule.block {
                retain_atrules_in(&mut block.children, &mut *keep);
            }
            true
        }
        Node::Rule(rule) => {
            retain_atrules_in(&mut rule.block.children, &mut *keep);
            true
        }
        Node::Declaration(_) | Node::Comment(_) | Node::Raw(_) => true,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_stylesheet;

    #[derive(Default)]
    struct Collector {
        in_rule: Vec<String>,
        in_atrule: Vec<String>,
        at_root: Vec<String>,
    }

    impl<'ast> Visit<'ast> for Collector {
        fn visit_declaration(&mut self, decl: &'ast Declaration, parent: Parent<'ast>) {
            let target = match parent {
                Parent::Root => &mut self.at_root,
                Parent::Rule(_) => &mut self.in_rule,
                Parent::Atrule(_) => &mut self.in_atrule,
            };
            target.push(decl.property.clone());
        }
    }

    #[test]
    fn test_declarations_report_nearest_container() {
        let sheet = parse_stylesheet(
            "--top: 1; @font-face { font-family: A } @media print { p { color: red } }",
        )
        .unwrap();
        let mut collector = Collector::default();
        walk_stylesheet(&mut collector, &sheet);
        assert_eq!(collector.at_root, vec!["--top"]);
        assert_eq!(collector.in_atrule, vec!["font-family"]);
        assert_eq!(collector.in_rule, vec!["color"]);
    }

    #[test]
    fn test_retain_removes_adjacent_siblings() {
        let mut sheet =
            parse_stylesheet("@media a {} @media b {} @media c {} p {} @media d {}").unwrap();
        let mut seen = Vec::new();
        retain_atrules(&mut sheet, |atrule| {
            let prelude = atrule.prelude_text().unwrap_or_default().to_string();
            seen.push(prelude.clone());
            prelude == "c"
        });
        assert_eq!(seen, vec!["a", "b", "c", "d"]);
        assert_eq!(sheet.len(), 2);
    }

    #[test]
    fn test_retain_skips_removed_subtrees() {
        let mut sheet =
            parse_stylesheet("@supports (display: grid) { @media print { @media screen {} } }")
                .unwrap();
        let mut seen = Vec::new();
        retain_atrules(&mut sheet, |atrule| {
            seen.push(atrule.name.clone());
            atrule.prelude_text() != Some("print")
        });
        assert_eq!(seen, vec!["supports", "media"]);
        let Node::Atrule(supports) = &sheet.children[0] else {
            panic!("Expected at-rule");
        };
        assert!(supports.block.as_ref().unwrap().children.is_empty());
    }
}
