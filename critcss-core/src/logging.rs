//! Structured logging using **tracing**.
//!
//! Each pruning stage logs on its own target so the stages can be filtered
//! independently, e.g. `RUST_LOG=critcss::preformatting=debug`. Logging is
//! purely observational and never influences what survives a pass.

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Target for the media query pass that runs before the rendering probe.
pub const PREFORMATTING: &str = "critcss::preformatting";

/// Target for the `@font-face` cleanup pass.
pub const FONT_FACE_CLEANUP: &str = "critcss::font_face_cleanup";

/// Target for the rendering probe seam.
pub const PROBE: &str = "critcss::probe";

/// Pipeline stage an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Preformatting,
    FontFaceCleanup,
    Probe,
}

impl Stage {
    pub fn target(self) -> &'static str {
        match self {
            Stage::Preformatting => PREFORMATTING,
            Stage::FontFaceCleanup => FONT_FACE_CLEANUP,
            Stage::Probe => PROBE,
        }
    }
}

// tracing targets must be constants, so each stage gets its own call site.
macro_rules! stage_event {
    ($level:ident, $stage:expr, $($fields:tt)+) => {
        match $stage {
            Stage::Preformatting => $level!(target: PREFORMATTING, $($fields)+),
            Stage::FontFaceCleanup => $level!(target: FONT_FACE_CLEANUP, $($fields)+),
            Stage::Probe => $level!(target: PROBE, $($fields)+),
        }
    };
}

/// Installs a JSON subscriber writing to stderr.
///
/// `RUST_LOG` takes precedence over `default_directive`
/// (e.g. `"critcss=info"`). Returns `false` when a global subscriber was
/// already installed, in which case nothing changes.
pub fn init_structured_logging(default_directive: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .json()
        .with_level(true)
        .with_target(true)
        .with_current_span(true)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}

pub fn log_info(stage: Stage, message: &str) {
    stage_event!(info, stage, detail = %message);
}

pub fn log_warn(stage: Stage, message: &str) {
    stage_event!(warn, stage, detail = %message);
}

pub fn log_error(stage: Stage, message: &str) {
    stage_event!(error, stage, detail = %message);
}

/// Logs a named stage milestone, e.g. `("preformat", "dropped 2 @media")`.
pub fn log_event(stage: Stage, event: &str, detail: &str) {
    stage_event!(info, stage, event = %event, detail = %detail);
}
