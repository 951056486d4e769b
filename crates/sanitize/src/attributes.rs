//! Table-driven attribute rewriting.
//!
//! Each tag sanitizer declares a table of `(attribute, rule)` pairs. Attributes
//! missing from the table are copied verbatim, so a table lists only the keys
//! that need rewriting.

use dom::Attributes;

use crate::dimension::{Axis, DimensionNormalizer};
use crate::url_guard::{ResourceGuard, UrlSite};
use crate::SanitizerArgs;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttributeRule {
    /// Run through the resource guard; dropped when rejected.
    ResourceUrl,
    /// Run through the dimension normalizer; dropped when uninterpretable.
    Dimension(Axis),
    /// Boolean attribute: `"false"` removes it, any other value becomes present (`""`).
    Boolean,
    /// Same value under a new name.
    Rename(&'static str),
    PassThrough,
}

pub type AttributeTable = &'static [(&'static str, AttributeRule)];

pub const AUDIO_ATTRIBUTES: AttributeTable = &[
    ("src", AttributeRule::ResourceUrl),
    ("width", AttributeRule::Dimension(Axis::Width)),
    ("height", AttributeRule::Dimension(Axis::Height)),
    ("class", AttributeRule::PassThrough),
    ("loop", AttributeRule::Boolean),
    ("muted", AttributeRule::Boolean),
    ("autoplay", AttributeRule::Boolean),
    ("data-amp-layout", AttributeRule::Rename("layout")),
    ("data-amp-noloading", AttributeRule::Rename("noloading")),
];

pub fn rule_for(table: AttributeTable, name: &str) -> AttributeRule {
    table
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map_or(AttributeRule::PassThrough, |(_, rule)| *rule)
}

#[derive(Clone, Copy, Debug)]
pub struct AttributeFilter {
    table: AttributeTable,
    guard: ResourceGuard,
    dimensions: DimensionNormalizer,
}

impl AttributeFilter {
    pub fn new(table: AttributeTable, args: &SanitizerArgs) -> Self {
        Self {
            table,
            guard: ResourceGuard::new(args),
            dimensions: DimensionNormalizer::new(args),
        }
    }

    /// Build a fresh attribute set from `input`. The input is never modified.
    pub fn filter(&self, input: &Attributes) -> Attributes {
        let mut out = Attributes::new();
        for (name, value) in input.iter() {
            match rule_for(self.table, name) {
                AttributeRule::ResourceUrl => {
                    if let Ok(url) = self.guard.validate(value, UrlSite::Attribute) {
                        out.set(name, url);
                    }
                }
                AttributeRule::Dimension(axis) => {
                    if let Some(size) = self.dimensions.normalize(value, axis) {
                        out.set(name, size);
                    }
                }
                AttributeRule::Boolean => {
                    if value != "false" {
                        out.set(name, "");
                    }
                }
                AttributeRule::Rename(target) => out.set(target, value),
                AttributeRule::PassThrough => out.set(name, value),
            }
        }
        out
    }
}
