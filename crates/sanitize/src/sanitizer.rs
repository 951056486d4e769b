use std::collections::{BTreeMap, BTreeSet};

use dom::{Document, NodeId};

use crate::url_guard::UrlRejection;

/// Source tag → dialect tags it may be converted into.
pub type SelectorConversionMap = BTreeMap<String, BTreeSet<String>>;

/// A pipeline stage that rewrites one source tag into its dialect equivalent.
///
/// Implementations must not assume any other sanitizer has or has not run, and
/// must leave elements inside a fallback island alone.
pub trait TagSanitizer {
    fn name(&self) -> &'static str;

    /// Source tag names this sanitizer converts.
    fn watched_tags(&self) -> &'static [&'static str];

    fn conversion_map(&self) -> SelectorConversionMap;

    /// Convert every watched element in `doc`. Never fails: elements that
    /// cannot be made conformant are removed or left untouched.
    fn sanitize(&self, doc: &mut Document) -> SanitizeReport;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RemovalReason {
    /// No usable resource URL remained, so the element was removed.
    NoValidSource,
    /// One alternate `<source>` child was dropped.
    InsecureSource { src: String, rejection: UrlRejection },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConversionOutcome {
    Replaced { replacement: NodeId },
    Removed(RemovalReason),
    Skipped,
}

impl ConversionOutcome {
    pub fn modified(&self) -> bool {
        !matches!(self, ConversionOutcome::Skipped)
    }
}

/// Something the sanitizer had to drop, reported so the host can surface it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationIssue {
    pub tag: String,
    pub reason: RemovalReason,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SanitizeReport {
    pub sanitizer: &'static str,
    /// One entry per visited element, in visiting (reverse document) order.
    pub outcomes: Vec<(NodeId, ConversionOutcome)>,
    pub issues: Vec<ValidationIssue>,
}

impl SanitizeReport {
    pub fn new(sanitizer: &'static str) -> Self {
        Self {
            sanitizer,
            ..Self::default()
        }
    }

    pub fn modified(&self) -> bool {
        self.outcomes.iter().any(|(_, outcome)| outcome.modified())
    }

    pub fn count(&self, predicate: impl Fn(&ConversionOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|(_, o)| predicate(o)).count()
    }
}
