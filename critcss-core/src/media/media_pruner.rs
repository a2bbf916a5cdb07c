//! Removal of `@media` blocks that match none of the target environments.
//!
//! Runs before the stylesheet is handed to the rendering probe, so usage
//! signals are only collected for rules that can apply to the targets.

use tracing::debug;

use crate::ast::Stylesheet;
use crate::config::MatchConfig;
use crate::generate::generate_prelude;
use crate::logging::PREFORMATTING;
use crate::walk::retain_atrules;

use super::media_relevance::{effective_configs, matches_any_config};

/// Statistics about a media query pruning pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaPruneStats {
    /// `@media` at-rules evaluated
    pub evaluated: usize,
    /// `@media` at-rules without a prelude, kept unevaluated
    pub skipped_empty: usize,
    pub kept: usize,
    pub dropped: usize,
}

/// Result of a media query pruning pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaPruneResult {
    /// Preludes of the removed `@media` blocks, in document order
    pub dropped_queries: Vec<String>,
    pub stats: MediaPruneStats,
}

/// Removes every `@media` at-rule, at any depth, whose prelude matches none
/// of `match_configs`.
///
/// Other at-rules and `@media` rules without a prelude are left untouched.
/// The stylesheet is mutated in place.
pub fn prune_non_matching_media_queries(
    sheet: &mut Stylesheet,
    match_configs: &[MatchConfig],
    keep_larger_media_queries: bool,
) -> MediaPruneResult {
    let configs = effective_configs(match_configs, keep_larger_media_queries);
    debug!(
        target: PREFORMATTING,
        match_configs = ?configs,
        keep_larger_media_queries,
        "BEFORE"
    );

    let mut result = MediaPruneResult::default();
    retain_atrules(sheet, |atrule| {
        if !atrule.is_media() {
            return true;
        }
        let Some(prelude) = atrule.prelude_text() else {
            result.stats.skipped_empty += 1;
            return true;
        };

        let media_query = generate_prelude(prelude);
        result.stats.evaluated += 1;
        if matches_any_config(&media_query, &configs) {
            debug!(target: PREFORMATTING, "KEEP: ({})", media_query);
            result.stats.kept += 1;
            true
        } else {
            debug!(target: PREFORMATTING, "DROP: ({})", media_query);
            result.stats.dropped += 1;
            result.dropped_queries.push(media_query);
            false
        }
    });

    result
}
