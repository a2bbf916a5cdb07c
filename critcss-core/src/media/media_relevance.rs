//! Media query relevance: should an `@media` block survive for a target
//! environment?
//!
//! This is intentionally looser than [`super::media_match`]. It only
//! filters out:
//! - bare `print` (or `not screen`) blocks for screen targets, and the
//!   symmetric cases for print targets,
//! - `min-width`/`min-height` queries larger than the target,
//! - compound queries whose whole `and` chain fails for the target.
//!
//! Everything else, `max-width`-only queries included, is kept. Dropping
//! CSS that was needed breaks rendering; keeping CSS that was not only costs
//! bytes.

use std::borrow::Cow;

use tracing::trace;

use crate::config::MatchConfig;
use crate::logging::PREFORMATTING;

use super::media_match::query_matches;
use super::media_query::{parse_media_query_list, MediaExpression, MediaQuery, Modifier};

/// Viewport size used when larger media queries should be kept.
pub const LARGER_VIEWPORT_PX: f64 = 99999.0;

/// Decides whether `media_query` is relevant for `config`.
///
/// Unparseable queries are not relevant: a query this parser cannot read is
/// assumed to be unreadable by the target browser too.
pub fn is_matching_media_query(media_query: &str, config: &MatchConfig) -> bool {
    let queries = match parse_media_query_list(media_query) {
        Ok(queries) => queries,
        Err(err) => {
            trace!(target: PREFORMATTING, error = %err, "unparseable media query");
            return false;
        }
    };
    queries.iter().any(|query| is_relevant(query, config))
}

/// True if the query matches any of the configs.
pub fn matches_any_config(media_query: &str, configs: &[MatchConfig]) -> bool {
    configs
        .iter()
        .any(|config| is_matching_media_query(media_query, config))
}

/// The configs to test against, with the oversized viewport appended when
/// `keep_larger_media_queries` is set. The caller's slice is never modified.
pub fn effective_configs(
    configs: &[MatchConfig],
    keep_larger_media_queries: bool,
) -> Cow<'_, [MatchConfig]> {
    if !keep_larger_media_queries {
        return Cow::Borrowed(configs);
    }
    let mut extended = configs.to_vec();
    extended.push(MatchConfig::screen(LARGER_VIEWPORT_PX, LARGER_VIEWPORT_PX));
    Cow::Owned(extended)
}

fn is_relevant(query: &MediaQuery, config: &MatchConfig) -> bool {
    // the parser reports `not` as the type for some malformed inputs
    let inverse = query.inverse || query.media_type == "not";

    if query.expressions.is_empty() {
        return bare_type_is_relevant(&query.media_type, inverse, config);
    }

    query.expressions.iter().any(|expression| {
        if expression.modifier == Some(Modifier::Min) {
            let single = MediaQuery::features(vec![expression.clone()]);
            query_matches(&single, config) != inverse
        } else if query.expressions.len() > 1 {
            compound_is_relevant(&query.expressions, inverse, config)
        } else {
            true
        }
    })
}

/// Only `screen` and `print` are judged; unknown and future media types
/// (and `all`) are kept.
fn bare_type_is_relevant(media_type: &str, inverse: bool, config: &MatchConfig) -> bool {
    if !matches!(media_type, "screen" | "print") {
        return true;
    }
    let same_type = media_type == config.media_type.as_str();
    same_type != inverse
}

/// Evaluates the `and` chain, ignoring `*device-pixel-ratio` features, which
/// a match config cannot answer.
///
/// Unlike a lone `max-*` or plain feature, a chain is judged exactly, with
/// `not` inverting the result. `not all and (max-width: 900px) and
/// (orientation: portrait)` is therefore dropped for a 375x667 phone.
fn compound_is_relevant(
    expressions: &[MediaExpression],
    inverse: bool,
    config: &MatchConfig,
) -> bool {
    let considered: Vec<MediaExpression> = expressions
        .iter()
        .filter(|expression| !expression.feature.ends_with("device-pixel-ratio"))
        .cloned()
        .collect();
    if considered.is_empty() {
        return true;
    }
    query_matches(&MediaQuery::features(considered), config) != inverse
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen(width: f64) -> MatchConfig {
        MatchConfig::screen(width, 800.0)
    }

    #[test]
    fn test_bare_types_on_screen() {
        let cfg = screen(1300.0);
        assert!(is_matching_media_query("screen", &cfg));
        assert!(is_matching_media_query("all", &cfg));
        assert!(is_matching_media_query("tv", &cfg));
        assert!(is_matching_media_query("not print", &cfg));
        assert!(!is_matching_media_query("print", &cfg));
        assert!(!is_matching_media_query("not screen", &cfg));
        assert!(is_matching_media_query("print, screen", &cfg));
    }

    #[test]
    fn test_bare_types_on_print() {
        let cfg = MatchConfig::print(800.0, 1100.0);
        assert!(is_matching_media_query("print", &cfg));
        assert!(!is_matching_media_query("screen", &cfg));
        assert!(!is_matching_media_query("not print", &cfg));
        assert!(is_matching_media_query("not screen", &cfg));
    }

    #[test]
    fn test_min_width_threshold() {
        assert!(is_matching_media_query("(min-width: 500px)", &screen(500.0)));
        assert!(is_matching_media_query("(min-width: 500px)", &screen(1024.0)));
        assert!(!is_matching_media_query("(min-width: 500px)", &screen(499.0)));
        assert!(!is_matching_media_query("screen and (min-width: 500px)", &screen(320.0)));
    }

    #[test]
    fn test_inverted_min_width() {
        assert!(!is_matching_media_query("not screen and (min-width: 500px)", &screen(800.0)));
        assert!(is_matching_media_query("not screen and (min-width: 500px)", &screen(320.0)));
    }

    #[test]
    fn test_max_width_only_is_always_kept() {
        assert!(is_matching_media_query("(max-width: 300px)", &screen(1300.0)));
        assert!(is_matching_media_query("screen and (max-width: 10px)", &screen(1300.0)));
        assert!(is_matching_media_query("(orientation: portrait)", &screen(1300.0)));
    }

    #[test]
    fn test_compound_range() {
        let query = "(max-width: 900px) and (orientation: landscape)";
        assert!(is_matching_media_query(query, &MatchConfig::screen(800.0, 600.0)));
        assert!(!is_matching_media_query(query, &MatchConfig::screen(1300.0, 900.0)));
    }

    #[test]
    fn test_inverted_compound_is_evaluated_exactly() {
        let query = "not all and (max-width: 900px) and (orientation: portrait)";
        assert!(!is_matching_media_query(query, &MatchConfig::screen(375.0, 667.0)));
        assert!(is_matching_media_query(query, &MatchConfig::screen(800.0, 600.0)));
        assert!(is_matching_media_query(query, &MatchConfig::screen(1300.0, 900.0)));
        // a lone max-width stays keep-biased even when inverted
        assert!(is_matching_media_query(
            "not all and (max-width: 900px)",
            &MatchConfig::screen(375.0, 667.0)
        ));
    }

    #[test]
    fn test_device_pixel_ratio_ignored_in_compound() {
        let plain = "(min-width: 500px)";
        let compound = "(min-width: 500px) and (min-device-pixel-ratio: 2)";
        for width in [320.0, 499.0, 500.0, 1300.0] {
            assert_eq!(
                is_matching_media_query(plain, &screen(width)),
                is_matching_media_query(compound, &screen(width)),
                "width {}",
                width
            );
        }
        let webkit = "(max-width: 600px) and (-webkit-min-device-pixel-ratio: 2)";
        assert!(is_matching_media_query(webkit, &screen(375.0)));
        assert!(!is_matching_media_query(webkit, &screen(1300.0)));
    }

    #[test]
    fn test_only_device_pixel_ratio_compound_is_kept() {
        let query = "(max-device-pixel-ratio: 2) and (-webkit-max-device-pixel-ratio: 2)";
        assert!(is_matching_media_query(query, &screen(1300.0)));
    }

    #[test]
    fn test_unparseable_is_dropped() {
        let cfg = screen(1300.0);
        assert!(!is_matching_media_query("(width >= 600px)", &cfg));
        assert!(!is_matching_media_query("screen and", &cfg));
        assert!(!is_matching_media_query("screen, )", &cfg));
    }

    #[test]
    fn test_effective_configs_appends_without_mutating() {
        let configs = vec![screen(375.0)];
        let extended = effective_configs(&configs, true);
        assert_eq!(extended.len(), 2);
        assert_eq!(configs.len(), 1);
        assert!(matches!(effective_configs(&configs, false), Cow::Borrowed(_)));
        assert!(matches_any_config("(min-width: 5000px)", &extended));
        assert!(!matches_any_config("(min-width: 5000px)", &configs));
    }
}
