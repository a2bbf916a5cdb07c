//! Font usage resolution: which font families do style rules ask for?
//!
//! Walks declarations in document order:
//! - `--custom: ...` anywhere is recorded in the context's variable table,
//! - `font-family` with a style rule among its ancestors contributes every
//!   decoded family,
//! - `font` under a style rule contributes only its last component.
//!
//! Declarations in at-rule bodies outside any style rule (`@font-face`,
//! `@page`) are not usage. Nested at-rules inside a rule
//! (`a { @media screen { font-family: X } }`) still are.

use tracing::debug;

use crate::ast::{Declaration, Rule, Stylesheet};
use crate::logging::FONT_FACE_CLEANUP;
use crate::walk::{walk_rule, walk_stylesheet, Parent, Visit};

use super::font_decode::{FontContext, FontNameSet};

/// Visitor collecting used font names.
struct FontUsageCollector<'ctx> {
    ctx: &'ctx mut FontContext,
    used: FontNameSet,
    /// Style rules enclosing the current node
    rule_depth: usize,
}

impl<'ctx> FontUsageCollector<'ctx> {
    fn new(ctx: &'ctx mut FontContext) -> Self {
        Self {
            ctx,
            used: FontNameSet::with_capacity(16),
            rule_depth: 0,
        }
    }

    fn record(&mut self, names: Vec<String>) {
        self.used
            .extend(names.into_iter().map(|name| name.to_lowercase()));
    }
}

impl<'ast> Visit<'ast> for FontUsageCollector<'_> {
    fn visit_rule(&mut self, rule: &'ast Rule) {
        self.rule_depth += 1;
        walk_rule(self, rule);
        self.rule_depth -= 1;
    }

    fn visit_declaration(&mut self, decl: &'ast Declaration, _parent: Parent<'ast>) {
        if decl.is_custom_property() {
            self.ctx.record_custom_property(decl);
            return;
        }
        if self.rule_depth == 0 {
            return;
        }

        match decl.property_name().as_str() {
            "font-family" => {
                let names = self.ctx.decode_font_names(&decl.value.children);
                self.record(names);
            }
            "font" => {
                let names = decl
                    .value
                    .last_component()
                    .map(|node| self.ctx.decode_node(node))
                    .unwrap_or_default();
                self.record(names);
            }
            _ => {}
        }
    }
}

/// Collects the lower-cased font families referenced by style rules.
///
/// Custom properties seen along the way are recorded in `ctx`, which the
/// `@font-face` pass then reuses.
pub fn collect_used_fonts(sheet: &Stylesheet, ctx: &mut FontContext) -> FontNameSet {
    debug!(target: FONT_FACE_CLEANUP, "collecting used font names");
    let mut collector = FontUsageCollector::new(ctx);
    walk_stylesheet(&mut collector, sheet);
    debug!(
        target: FONT_FACE_CLEANUP,
        used = collector.used.len(),
        variables = collector.ctx.variables.len(),
        "collected used font names"
    );
    collector.used
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_stylesheet;

    fn used(css: &str) -> FontNameSet {
        let sheet = parse_stylesheet(css).unwrap();
        collect_used_fonts(&sheet, &mut FontContext::new())
    }

    fn set(names: &[&str]) -> FontNameSet {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_font_family_list_lowercased() {
        assert_eq!(
            used("h1 { font-family: \"Foo\", Sans-Serif }"),
            set(&["foo", "sans-serif"])
        );
    }

    #[test]
    fn test_font_shorthand_uses_last_component() {
        assert_eq!(used("p { font: italic bold 12px/30px Georgia, serif }"), set(&["serif"]));
        assert_eq!(used("p { font: 1em \"Acme\" }"), set(&["acme"]));
    }

    #[test]
    fn test_font_face_declarations_are_not_usage() {
        assert!(used("@font-face { font-family: Foo; src: url(a.woff) }").is_empty());
    }

    #[test]
    fn test_rules_inside_media_are_usage() {
        assert_eq!(used("@media screen { p { font-family: Bar } }"), set(&["bar"]));
    }

    #[test]
    fn test_atrule_nested_in_rule_is_usage() {
        assert_eq!(
            used("a { @media screen { font-family: Nested } } @page { font-family: Paged }"),
            set(&["nested"])
        );
    }

    #[test]
    fn test_custom_property_indirection() {
        let css = ":root { --brand-font: \"Acme Sans\"; } h1 { font-family: var(--brand-font), sans-serif }";
        assert_eq!(used(css), set(&["acme sans", "sans-serif"]));
    }

    #[test]
    fn test_top_level_custom_property_is_recorded() {
        let css = "--brand-font: Inter; h1 { font-family: var(--brand-font) }";
        assert_eq!(used(css), set(&["inter"]));
    }

    #[test]
    fn test_forward_reference_is_not_resolved() {
        let css = "h1 { font-family: var(--late), serif } :root { --late: Late }";
        assert_eq!(used(css), set(&["serif"]));
    }

    #[test]
    fn test_context_keeps_variables_for_later_passes() {
        let sheet = parse_stylesheet(":root { --f: Foo }").unwrap();
        let mut ctx = FontContext::new();
        collect_used_fonts(&sheet, &mut ctx);
        assert_eq!(ctx.variables.get("--f"), Some(&["Foo".to_string()][..]));
    }

    #[test]
    fn test_other_properties_ignored() {
        assert!(used("p { content: \"Foo\"; font-weight: bold }").is_empty());
    }
}
