//! AsciiDoc cross-reference anchors and table-of-contents entries.

use regex::Regex;
use std::sync::LazyLock;

/// Prefix shared by every section anchor in the exported fields document.
pub const ANCHOR_PREFIX: &str = "exported-fields";

// AsciiDoc block ids: a letter, `_` or `:` first, then word chars, `-`, `.`
static RE_ANCHOR_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_:][\w:.\-]*$").unwrap());

/// Full anchor id for a section anchor, e.g. `exported-fields-apache`.
pub fn anchor_id(anchor: &str) -> String {
    format!("{}-{}", ANCHOR_PREFIX, anchor)
}

/// Block anchor line placed before a section heading.
pub fn render_anchor(anchor: &str) -> String {
    format!("[[{}]]", anchor_id(anchor))
}

/// Generate a TOC list item linking to a section anchor.
pub fn render_toc_item(anchor: &str) -> String {
    format!("* <<{}>>", anchor_id(anchor))
}

/// Whether the anchor resolves to an id AsciiDoc will accept.
pub fn is_valid_anchor(anchor: &str) -> bool {
    RE_ANCHOR_ID.is_match(&anchor_id(anchor))
}
