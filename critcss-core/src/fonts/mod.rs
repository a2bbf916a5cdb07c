//! Font usage analysis for `@font-face` pruning.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────┐     ┌─────────────────────┐
//! │   font_decode.rs    │     │   font_usage.rs     │
//! │  ─────────────────  │────▶│  ─────────────────  │
//! │  Values → names,    │     │  Names used by      │
//! │  variable table     │     │  style rules        │
//! └──────────┬──────────┘     └──────────┬──────────┘
//!            │                           │
//!            └───────────┬───────────────┘
//!                        ▼
//!            ┌─────────────────────┐
//!            │    font_face.rs     │
//!            │  ─────────────────  │
//!            │  Drop unused or     │
//!            │  source-less faces  │
//!            └─────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use critcss_core::fonts::{remove_unused_font_faces, FontContext};
//!
//! let mut ctx = FontContext::new();
//! let (used, result) = remove_unused_font_faces(&mut sheet, &mut ctx);
//!
//! for dead in &result.dropped {
//!     println!("Dropped @font-face {:?} ({:?})", dead.family, dead.reason);
//! }
//! ```

pub mod font_decode;
pub mod font_face;
pub mod font_usage;

// Re-exports for convenience
pub use font_decode::{strip_quotes, FontContext, FontNameSet, VariableTable};
pub use font_face::{
    prune_unused_font_faces, remove_unused_font_faces, DroppedFontFace, FontFaceDropReason,
    FontFacePruneResult, FontFacePruneStats,
};
pub use font_usage::collect_used_fonts;
