//! Prelude module for convenient imports.
//!
//! Import commonly used types with a single line:
//!
//! ```rust,ignore
//! use critcss_core::prelude::*;
//! ```

// Errors
pub use crate::error::{CriticalError, CriticalResult};

// AST and text conversion
pub use crate::ast::{Atrule, Declaration, Node, Rule, Stylesheet, Value, ValueNode};
pub use crate::generate::generate_stylesheet;
pub use crate::parse::parse_stylesheet;

// Configuration
pub use crate::config::{Length, MatchConfig, MediaType, PruneConfig};

// Pruning passes
pub use crate::comments::strip_top_level_comments;
pub use crate::fonts::{remove_unused_font_faces, FontContext, FontNameSet};
pub use crate::media::{is_matching_media_query, prune_non_matching_media_queries};

// Probe contract
pub use crate::probe::{run_used_fonts_probe, ProbeRuntime, UsedFontSignals};

// Builder API
pub use crate::pipeline::{CriticalCss, CriticalOutput, PostformatReport};

// Logging
pub use crate::logging::{init_structured_logging, Stage};
