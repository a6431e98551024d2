//! Document rendering — walks merged sections into AsciiDoc text blocks.

pub mod asciidoc;

use regex::Regex;
use std::sync::LazyLock;

pub use asciidoc::AsciidocRenderer;

/// Product whose documentation carries ECS badges by default.
pub const ECS_BADGE_PRODUCT: &str = "Apm-Server";

static RE_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\p{Alphabetic}+").unwrap());

/// Settings threaded through every recursive render call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderContext {
    /// Product name substituted into the preamble, already title-cased.
    pub beat_title: String,
    /// Whether leaf blocks get an ECS membership badge.
    pub ecs_badges: bool,
}

impl RenderContext {
    /// Build the context for a product title as given on the command line.
    /// Badges are enabled for [`ECS_BADGE_PRODUCT`] or when forced.
    pub fn new(raw_title: &str, force_badges: bool) -> Self {
        let beat_title = title_case(raw_title);
        let ecs_badges = force_badges || beat_title == ECS_BADGE_PRODUCT;
        Self {
            beat_title,
            ecs_badges,
        }
    }
}

/// Rendered output, kept in the order it must be written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub preamble: String,
    pub toc: String,
    /// One entry per documented section, sorted by key.
    pub bodies: Vec<String>,
}

impl Document {
    /// Parts in output order.
    pub fn parts(&self) -> impl Iterator<Item = &str> {
        [self.preamble.as_str(), self.toc.as_str()]
            .into_iter()
            .chain(self.bodies.iter().map(String::as_str))
    }
}

/// Upper-case the first letter of every alphabetic run and lower-case the rest:
/// `apm-server` → `Apm-Server`.
pub fn title_case(text: &str) -> String {
    RE_WORD
        .replace_all(text, |caps: &regex::Captures| {
            let mut chars = caps[0].chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .into_owned()
}
