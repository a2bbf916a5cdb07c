//! Top-level comment removal.
//!
//! Only direct children of the stylesheet are removed. Comments inside rule
//! bodies never affect what paints and are left to the minifier.

use crate::ast::{Node, Stylesheet};

/// Removes comment nodes that are direct children of the stylesheet root.
///
/// Returns the number of comments removed.
pub fn strip_top_level_comments(sheet: &mut Stylesheet) -> usize {
    let before = sheet.children.len();
    sheet
        .children
        .retain(|node| !matches!(node, Node::Comment(_)));
    before - sheet.children.len()
}
