//! Builder API for the critical CSS pruning pipeline.
//!
//! Provides a fluent interface for configuring and running both stages:
//!
//! ```rust,ignore
//! use critcss_core::prelude::*;
//!
//! let output = CriticalCss::new([MatchConfig::screen(1300.0, 900.0)])
//!     .keep_larger_media_queries(true)
//!     .process_with_probe(css, &runtime)?;
//!
//! println!("{}", output.css);
//! ```

use crate::ast::Stylesheet;
use crate::comments::strip_top_level_comments;
use crate::config::{MatchConfig, PruneConfig};
use crate::error::CriticalResult;
use crate::fonts::{
    collect_used_fonts, prune_unused_font_faces, FontContext, FontFacePruneResult, FontNameSet,
};
use crate::generate::generate_stylesheet;
use crate::logging::{log_error, log_event, log_info, log_warn, Stage};
use crate::media::{prune_non_matching_media_queries, MediaPruneResult};
use crate::parse::parse_stylesheet;
use crate::probe::{run_used_fonts_probe, ProbeRuntime, UsedFontSignals};

/// Builder for configuring critical CSS pruning.
///
/// Holds no per-run state, so one value can serve many stylesheets.
///
/// # Example
///
/// ```rust,ignore
/// let pipeline = CriticalCss::new([MatchConfig::screen(375.0, 667.0)])
///     .strip_comments(false);
/// let media = pipeline.preformat(&mut sheet);
/// let report = pipeline.postformat(&mut sheet, Some(&signals));
/// ```
#[derive(Debug, Clone)]
pub struct CriticalCss {
    /// Target environments for `@media` evaluation
    match_configs: Vec<MatchConfig>,

    /// Keep queries aimed at viewports larger than every target
    keep_larger_media_queries: bool,

    /// Intersect used fonts with what the probe saw rendered
    require_rendered_fonts: bool,

    /// Remove top-level comments during postformatting
    strip_comments: bool,
}

impl CriticalCss {
    /// Create a pipeline for the given target environments.
    pub fn new(match_configs: impl IntoIterator<Item = MatchConfig>) -> Self {
        Self {
            match_configs: match_configs.into_iter().collect(),
            keep_larger_media_queries: false,
            require_rendered_fonts: false,
            strip_comments: true,
        }
    }

    /// Create a pipeline from loaded configuration.
    pub fn from_config(config: &PruneConfig) -> Self {
        Self::new(config.match_configs.iter().copied())
            .keep_larger_media_queries(config.keep_larger_media_queries)
            .require_rendered_fonts(config.require_rendered_fonts)
            .strip_comments(config.strip_comments)
    }

    /// Also keep `min-width`/`min-height` queries for larger viewports.
    pub fn keep_larger_media_queries(mut self, enabled: bool) -> Self {
        self.keep_larger_media_queries = enabled;
        self
    }

    /// Only keep `@font-face` rules for families the probe saw rendered.
    ///
    /// Without usage signals every `@font-face` is then dropped.
    pub fn require_rendered_fonts(mut self, enabled: bool) -> Self {
        self.require_rendered_fonts = enabled;
        self
    }

    /// Enable or disable top-level comment removal.
    pub fn strip_comments(mut self, enabled: bool) -> Self {
        self.strip_comments = enabled;
        self
    }

    pub fn match_configs(&self) -> &[MatchConfig] {
        &self.match_configs
    }

    /// Stage one: drop `@media` blocks that match no target.
    pub fn preformat(&self, sheet: &mut Stylesheet) -> MediaPruneResult {
        let result = prune_non_matching_media_queries(
            sheet,
            &self.match_configs,
            self.keep_larger_media_queries,
        );
        log_event(
            Stage::Preformatting,
            "preformat",
            &format!(
                "evaluated {} @media, dropped {}",
                result.stats.evaluated, result.stats.dropped
            ),
        );
        result
    }

    /// Stage two: drop unused `@font-face` rules, then top-level comments.
    pub fn postformat(
        &self,
        sheet: &mut Stylesheet,
        signals: Option<&UsedFontSignals>,
    ) -> PostformatReport {
        let mut ctx = FontContext::new();
        let mut used_fonts = collect_used_fonts(sheet, &mut ctx);

        if self.require_rendered_fonts {
            let rendered = signals.map(UsedFontSignals::font_names).unwrap_or_default();
            if rendered.is_empty() {
                log_warn(
                    Stage::FontFaceCleanup,
                    "no rendered fonts reported, every @font-face counts as unused",
                );
            }
            used_fonts.retain(|name| rendered.contains(name));
        }

        let font_faces = prune_unused_font_faces(sheet, &used_fonts, &ctx);
        let comments_removed = if self.strip_comments {
            strip_top_level_comments(sheet)
        } else {
            0
        };

        log_event(
            Stage::FontFaceCleanup,
            "postformat",
            &format!(
                "kept {} @font-face, dropped {}, removed {} comments",
                font_faces.stats.kept,
                font_faces.dropped.len(),
                comments_removed
            ),
        );

        PostformatReport {
            used_fonts,
            font_faces,
            comments_removed,
        }
    }

    /// Parse, prune both stages without probe signals, and serialize.
    pub fn process(&self, css: &str) -> CriticalResult<CriticalOutput> {
        let mut sheet = parse_stylesheet(css)?;
        let media = self.preformat(&mut sheet);
        let postformat = self.postformat(&mut sheet, None);
        Ok(CriticalOutput::new(&sheet, media, postformat))
    }

    /// Parse and preformat, hand the result to the probe, then postformat
    /// with the reported signals and serialize.
    pub fn process_with_probe(
        &self,
        css: &str,
        runtime: &dyn ProbeRuntime,
    ) -> CriticalResult<CriticalOutput> {
        let mut sheet = parse_stylesheet(css)?;
        let media = self.preformat(&mut sheet);

        let signals = runtime
            .apply_stylesheet(&generate_stylesheet(&sheet))
            .and_then(|()| run_used_fonts_probe(runtime))
            .map_err(|err| {
                log_error(Stage::Probe, &format!("rendering step failed: {}", err));
                err
            })?;
        log_info(
            Stage::Probe,
            &format!("{} above-fold elements reported", signals.families().len()),
        );

        let postformat = self.postformat(&mut sheet, Some(&signals));
        Ok(CriticalOutput::new(&sheet, media, postformat))
    }
}

/// What the postformatting stage removed.
#[derive(Debug, Clone, Default)]
pub struct PostformatReport {
    /// Fonts considered used after any probe intersection
    pub used_fonts: FontNameSet,
    pub font_faces: FontFacePruneResult,
    pub comments_removed: usize,
}

/// Result of a full pipeline run.
#[derive(Debug, Clone)]
pub struct CriticalOutput {
    /// Serialized critical stylesheet
    pub css: String,
    pub media: MediaPruneResult,
    pub postformat: PostformatReport,
}

impl CriticalOutput {
    fn new(sheet: &Stylesheet, media: MediaPruneResult, postformat: PostformatReport) -> Self {
        Self {
            css: generate_stylesheet(sheet),
            media,
            postformat,
        }
    }

    /// Total number of nodes removed across both stages.
    pub fn removed_count(&self) -> usize {
        self.media.stats.dropped
            + self.postformat.font_faces.dropped.len()
            + self.postformat.comments_removed
    }
}
