//! Media query analysis for `@media` pruning.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────┐     ┌─────────────────────┐
//! │   media_query.rs    │────▶│   media_match.rs    │
//! │  ─────────────────  │     │  ─────────────────  │
//! │  Parse query lists  │     │  Evaluate features  │
//! │  into expressions   │     │  against a config   │
//! └─────────────────────┘     └──────────┬──────────┘
//!                                        ▼
//!                             ┌─────────────────────┐
//!                             │ media_relevance.rs  │
//!                             │  ─────────────────  │
//!                             │  Keep-biased policy │
//!                             └──────────┬──────────┘
//!                                        ▼
//!                             ┌─────────────────────┐
//!                             │  media_pruner.rs    │
//!                             │  ─────────────────  │
//!                             │  Drop @media blocks │
//!                             └─────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use critcss_core::media::prune_non_matching_media_queries;
//!
//! let configs = vec![MatchConfig::screen(375.0, 667.0), MatchConfig::screen(1300.0, 900.0)];
//! let result = prune_non_matching_media_queries(&mut sheet, &configs, false);
//!
//! for query in &result.dropped_queries {
//!     println!("Dropped @media {}", query);
//! }
//! ```

pub mod media_match;
pub mod media_pruner;
pub mod media_query;
pub mod media_relevance;

// Re-exports for convenience
pub use media_match::{length_to_px, match_media_query};
pub use media_pruner::{prune_non_matching_media_queries, MediaPruneResult, MediaPruneStats};
pub use media_query::{
    parse_media_query_list, MediaExpression, MediaQuery, MediaQueryError, Modifier,
};
pub use media_relevance::{
    effective_configs, is_matching_media_query, matches_any_config, LARGER_VIEWPORT_PX,
};
