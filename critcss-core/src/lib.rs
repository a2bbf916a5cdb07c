//! critcss-core: critical-path CSS pruning library
//!
//! Computes the part of a stylesheet needed to paint what is visible without
//! scrolling. A parsed stylesheet goes through two stages:
//!
//! - **Preformatting**: `@media` blocks matching none of the target
//!   environments are removed before the stylesheet reaches the rendering
//!   probe.
//! - **Postformatting**: `@font-face` rules for families no style rule uses
//!   (or that declare no `src`) are removed, then top-level comments.
//!
//! # Quick Start
//!
//! Use the [`prelude`] module for convenient imports:
//!
//! ```rust,ignore
//! use critcss_core::prelude::*;
//!
//! let output = CriticalCss::new([MatchConfig::screen(1300.0, 900.0)])
//!     .keep_larger_media_queries(true)
//!     .process(css)?;
//!
//! println!("{}", output.css);
//! ```
//!
//! # Module Organization
//!
//! - [`ast`]: Stylesheet node model
//! - [`parse`] / [`generate`]: CSS text to AST and back
//! - [`walk`]: Read-only visitor and removal-safe at-rule filtering
//! - [`media`]: Media query parsing, matching and `@media` pruning
//! - [`fonts`]: Font usage resolution and `@font-face` pruning
//! - [`comments`]: Top-level comment stripping
//! - [`probe`]: Above-the-fold rendering probe contract
//! - [`pipeline`]: Fluent builder running both stages
//! - [`config`]: Target environments and pipeline options
//! - [`error`]: Typed error handling
//! - [`logging`]: Per-stage tracing targets and JSON subscriber setup

pub mod ast;
pub mod comments;
pub mod config;
pub mod error;
pub mod fonts;
pub mod generate;
pub mod logging;
pub mod media;
pub mod parse;
pub mod pipeline;
pub mod prelude;
pub mod probe;
pub mod walk;


// ============================================================================
// Explicit Re-exports (avoiding glob imports for clear API surface)
// ============================================================================

// Error types
pub use error::{CriticalError, CriticalResult};

// AST
pub use ast::{Atrule, Block, Declaration, Node, Rule, Stylesheet, Value, ValueNode};

// Reading and writing CSS
pub use generate::{generate_node, generate_prelude, generate_stylesheet, generate_value};
pub use parse::{parse_stylesheet, parse_value};

// Traversal
pub use walk::{retain_atrules, walk_stylesheet, Parent, Visit};

// Configuration
pub use config::{Length, MatchConfig, MediaType, PruneConfig};

// Logging
pub use logging::{init_structured_logging, log_error, log_event, log_info, log_warn, Stage};

// Media queries
pub use media::{
    effective_configs, is_matching_media_query, match_media_query, matches_any_config,
    parse_media_query_list, prune_non_matching_media_queries, MediaExpression, MediaPruneResult,
    MediaPruneStats, MediaQuery, MediaQueryError, Modifier,
};

// Fonts
pub use fonts::{
    collect_used_fonts, prune_unused_font_faces, remove_unused_font_faces, DroppedFontFace,
    FontContext, FontFaceDropReason, FontFacePruneResult, FontFacePruneStats, FontNameSet,
    VariableTable,
};

// Comments
pub use comments::strip_top_level_comments;

// Probe contract
pub use probe::{
    collect_above_fold_fonts, run_used_fonts_probe, ProbeDocument, ProbeElement, ProbeRuntime,
    UsedFontSignals, GET_USED_FONTS_SCRIPT,
};

// Builder API
pub use pipeline::{CriticalCss, CriticalOutput, PostformatReport};
