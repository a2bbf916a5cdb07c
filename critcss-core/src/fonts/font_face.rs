//! `@font-face` pruning.
//!
//! An `@font-face` rule is removed when:
//! - the family it declares is never used by a style rule, or
//! - it has no `src` descriptor, so it can never paint text.

use tracing::debug;

use crate::ast::{Atrule, Node, Stylesheet};
use crate::logging::FONT_FACE_CLEANUP;
use crate::walk::retain_atrules;

use super::font_decode::{FontContext, FontNameSet};
use super::font_usage::collect_used_fonts;

/// Why an `@font-face` rule was removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontFaceDropReason {
    /// Declared family not in the used set
    Unused,
    /// No `src` descriptor
    NoSource,
}

/// A removed `@font-face` rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedFontFace {
    /// Lower-cased declared family, if any
    pub family: Option<String>,
    pub reason: FontFaceDropReason,
}

/// Statistics about a font-face pruning pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FontFacePruneStats {
    pub total: usize,
    pub kept: usize,
    pub dropped_unused: usize,
    pub dropped_no_src: usize,
}

/// Result of a font-face pruning pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FontFacePruneResult {
    pub dropped: Vec<DroppedFontFace>,
    pub stats: FontFacePruneStats,
}

/// What the descriptors of one `@font-face` rule say.
struct FontFaceInfo {
    family: Option<String>,
    used: bool,
    has_src: bool,
}

fn inspect_font_face(
    atrule: &Atrule,
    used_fonts: &FontNameSet,
    ctx: &FontContext,
) -> FontFaceInfo {
    let mut info = FontFaceInfo {
        family: None,
        used: true,
        has_src: false,
    };
    let Some(block) = &atrule.block else {
        return info;
    };

    for node in &block.children {
        let Node::Declaration(decl) = node else {
            continue;
        };
        match decl.property_name().as_str() {
            "font-family" => {
                let family = ctx
                    .decode_font_names(&decl.value.children)
                    .into_iter()
                    .next()
                    .map(|name| name.to_lowercase());
                match &family {
                    Some(name) if used_fonts.contains(name) => {}
                    Some(name) => {
                        debug!(target: FONT_FACE_CLEANUP, "drop unused @font-face: {}", name);
                        info.used = false;
                    }
                    None => {
                        debug!(target: FONT_FACE_CLEANUP, "drop @font-face with undecodable family");
                        info.used = false;
                    }
                }
                if info.family.is_none() {
                    info.family = family;
                }
            }
            "src" => info.has_src = true,
            _ => {}
        }
    }
    info
}

/// Removes `@font-face` rules, at any depth, whose family is not in
/// `used_fonts` or that declare no `src`.
///
/// `ctx` resolves custom properties in the `font-family` descriptor; pass
/// the context that [`collect_used_fonts`] filled.
pub fn prune_unused_font_faces(
    sheet: &mut Stylesheet,
    used_fonts: &FontNameSet,
    ctx: &FontContext,
) -> FontFacePruneResult {
    let mut result = FontFacePruneResult::default();

    retain_atrules(sheet, |atrule| {
        if !atrule.is_font_face() {
            return true;
        }
        result.stats.total += 1;

        let info = inspect_font_face(atrule, used_fonts, ctx);
        let reason = if !info.used {
            FontFaceDropReason::Unused
        } else if !info.has_src {
            debug!(target: FONT_FACE_CLEANUP, "drop @font-face with no src descriptor");
            FontFaceDropReason::NoSource
        } else {
            result.stats.kept += 1;
            return true;
        };

        match reason {
            FontFaceDropReason::Unused => result.stats.dropped_unused += 1,
            FontFaceDropReason::NoSource => result.stats.dropped_no_src += 1,
        }
        result.dropped.push(DroppedFontFace {
            family: info.family,
            reason,
        });
        false
    });

    result
}

/// Resolves used fonts from the stylesheet itself, then prunes `@font-face`
/// rules against them.
pub fn remove_unused_font_faces(
    sheet: &mut Stylesheet,
    ctx: &mut FontContext,
) -> (FontNameSet, FontFacePruneResult) {
    let used_fonts = collect_used_fonts(sheet, ctx);
    let result = prune_unused_font_faces(sheet, &used_fonts, ctx);
    (used_fonts, result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::generate_stylesheet;
    use crate::parse::parse_stylesheet;

    fn cleanup(css: &str) -> (String, FontFacePruneResult) {
        let mut sheet = parse_stylesheet(css).unwrap();
        let (_, result) = remove_unused_font_faces(&mut sheet, &mut FontContext::new());
        (generate_stylesheet(&sheet), result)
    }

    const FACE: &str = "@font-face{font-family:\"Foo\";src:url(a.woff)}";

    #[test]
    fn test_unused_font_face_dropped() {
        let (css, result) = cleanup(&format!("{}p{{font-family:Bar}}", FACE));
        assert_eq!(css, "p{font-family:Bar}");
        assert_eq!(
            result.dropped,
            vec![DroppedFontFace {
                family: Some("foo".into()),
                reason: FontFaceDropReason::Unused,
            }]
        );
    }

    #[test]
    fn test_used_font_face_kept_case_insensitive() {
        let (css, result) = cleanup(&format!("{}p{{font-family:FOO}}", FACE));
        assert!(css.starts_with("@font-face"));
        assert_eq!(result.stats.kept, 1);

        let (css, _) = cleanup(&format!("{}p{{font-family:\"foo\", sans-serif}}", FACE));
        assert!(css.starts_with("@font-face"));
    }

    #[test]
    fn test_font_face_without_src_dropped_even_if_used() {
        let (css, result) = cleanup("@font-face{font-family:\"Foo\"}p{font-family:Foo}");
        assert_eq!(css, "p{font-family:Foo}");
        assert_eq!(result.stats.dropped_no_src, 1);
        assert_eq!(result.dropped[0].reason, FontFaceDropReason::NoSource);
    }

    #[test]
    fn test_font_face_without_family_kept_with_src() {
        let (css, _) = cleanup("@font-face{src:url(a.woff)}");
        assert_eq!(css, "@font-face{src:url(a.woff)}");
    }

    #[test]
    fn test_font_face_family_via_variable() {
        let css = ":root{--brand:\"Acme Sans\"}@font-face{font-family:var(--brand);src:url(a.woff)}h1{font-family:var(--brand), sans-serif}";
        let (out, result) = cleanup(css);
        assert_eq!(result.stats.kept, 1);
        assert!(out.contains("@font-face"));
    }

    #[test]
    fn test_nested_font_face_inside_media() {
        let (css, result) =
            cleanup("@media screen{@font-face{font-family:Foo;src:url(a.woff)}}");
        assert_eq!(css, "@media screen{}");
        assert_eq!(result.stats.total, 1);
    }

    #[test]
    fn test_prune_against_explicit_set() {
        let mut sheet = parse_stylesheet(FACE).unwrap();
        let used: FontNameSet = ["foo".to_string()].into_iter().collect();
        let result = prune_unused_font_faces(&mut sheet, &used, &FontContext::new());
        assert_eq!(sheet.len(), 1);
        assert!(result.dropped.is_empty());
    }
}
