//! Above-the-fold rendering probe contract.
//!
//! The probe runs inside an isolated browser context that has no access to
//! anything on this side. It is shipped as self-contained script text over a
//! [`ProbeRuntime`] and replies with a JSON array of computed `font-family`
//! strings, one per element whose top edge is above the fold.
//!
//! [`collect_above_fold_fonts`] evaluates the same algorithm on the host
//! over any [`ProbeDocument`], for embedders that lay pages out themselves.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CriticalError, CriticalResult};
use crate::fonts::font_decode::{FontContext, FontNameSet};
use crate::logging::{log_warn, Stage, PROBE};
use crate::parse::parse_value;

/// Script evaluated in the page. Takes no arguments and captures nothing.
pub const GET_USED_FONTS_SCRIPT: &str = r#"(function getUsedFonts () {
  var h = window.innerHeight

  function isElementAboveFold (element) {
    var isElementStyleDefined = typeof element.style !== 'undefined'
    if (isElementStyleDefined) {
      var originalClearStyle = element.style.clear || ''
      element.style.clear = 'none'
    }

    var aboveFold = element.getBoundingClientRect().top < h

    if (isElementStyleDefined) {
      element.style.clear = originalClearStyle
    }

    return aboveFold
  }

  return Array.from(document.getElementsByTagName('*'))
    .filter(isElementAboveFold)
    .map(function (element) { return window.getComputedStyle(element) })
    .map(function (style) { return style.fontFamily })
})()"#;

/// Message-passing seam to an isolated execution environment.
pub trait ProbeRuntime {
    /// Loads the stylesheet the probe should observe. Runtimes that style the
    /// page some other way can keep the default no-op.
    fn apply_stylesheet(&self, _css: &str) -> CriticalResult<()> {
        Ok(())
    }

    /// Evaluates `script` in the page and returns its JSON result.
    fn evaluate(&self, script: &str) -> CriticalResult<serde_json::Value>;
}

/// Computed `font-family` strings reported by the probe, in document order,
/// duplicates included.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UsedFontSignals {
    families: Vec<String>,
}

impl UsedFontSignals {
    pub fn new(families: Vec<String>) -> Self {
        Self { families }
    }

    /// Decodes a probe reply. Anything but an array of strings is an error.
    pub fn from_reply(reply: serde_json::Value) -> CriticalResult<Self> {
        serde_json::from_value(reply).map_err(CriticalError::probe_reply)
    }

    pub fn families(&self) -> &[String] {
        &self.families
    }

    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }

    /// Every family named in the computed values, lower-cased and
    /// deduplicated: `"\"Open Sans\", Arial"` yields `open sans` and `arial`.
    ///
    /// Values are tokenized and decoded exactly like stylesheet
    /// `font-family` declarations. A value that fails to tokenize is
    /// skipped with a warning.
    pub fn font_names(&self) -> FontNameSet {
        let ctx = FontContext::new();
        let mut names = FontNameSet::new();
        for value in &self.families {
            match parse_value(value) {
                Ok(parsed) => names.extend(
                    ctx.decode_font_names(&parsed.children)
                        .into_iter()
                        .map(|name| name.trim().to_lowercase())
                        .filter(|name| !name.is_empty()),
                ),
                Err(err) => log_warn(
                    Stage::Probe,
                    &format!("skipping computed font-family {:?}: {}", value, err),
                ),
            }
        }
        names
    }
}

/// Runs the used-fonts probe through `runtime`.
pub fn run_used_fonts_probe(runtime: &dyn ProbeRuntime) -> CriticalResult<UsedFontSignals> {
    debug!(target: PROBE, "getUsedFonts init");
    let reply = runtime.evaluate(GET_USED_FONTS_SCRIPT)?;
    match UsedFontSignals::from_reply(reply) {
        Ok(signals) => {
            debug!(target: PROBE, families = signals.families.len(), "probe replied");
            Ok(signals)
        }
        Err(err) => {
            log_warn(Stage::Probe, &format!("reply rejected: {}", err));
            Err(err)
        }
    }
}

/// An element as seen by the host-side probe.
pub trait ProbeElement {
    /// Whether the element carries an inline style object.
    fn has_style(&self) -> bool;
    fn style_clear(&self) -> String;
    fn set_style_clear(&mut self, value: &str);
    /// Top edge of the bounding box relative to the viewport, in CSS pixels.
    fn bounding_top(&self) -> f64;
    fn computed_font_family(&self) -> String;
}

/// A laid-out document as seen by the host-side probe.
pub trait ProbeDocument {
    /// Visible viewport height, the fold.
    fn viewport_height(&self) -> f64;
    /// Every element in document order.
    fn elements(&mut self) -> Vec<&mut dyn ProbeElement>;
}

/// Host-side evaluation of [`GET_USED_FONTS_SCRIPT`].
///
/// `clear` is forced to `none` while measuring, so elements that clear
/// earlier content still count as above the fold, and restored afterwards.
pub fn collect_above_fold_fonts(document: &mut dyn ProbeDocument) -> UsedFontSignals {
    let fold = document.viewport_height();
    let mut families = Vec::new();

    for element in document.elements() {
        let original_clear = element.has_style().then(|| element.style_clear());
        if original_clear.is_some() {
            element.set_style_clear("none");
        }

        let above_fold = element.bounding_top() < fold;

        if let Some(clear) = &original_clear {
            element.set_style_clear(clear);
        }
        if above_fold {
            families.push(element.computed_font_family());
        }
    }

    UsedFontSignals { families }
}
