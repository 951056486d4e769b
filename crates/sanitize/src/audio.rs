//! `<audio>` → `<amp-audio>` conversion.
//!
//! For every `<audio>` outside a fallback island:
//!
//! ```text
//! <audio src=… loop=false>           <amp-audio src=… width="auto">
//!   <source src=…>           ==>       <source src=…>
//!   <a href=…>download</a>             <a href=… fallback>download</a>
//! </audio>                             <noscript><audio src=…>…clones…</audio></noscript>
//!                                    </amp-audio>
//! ```
//!
//! An element left without a single HTTPS resource is removed outright.

use dom::{Attributes, Document, DomError, NodeId, elements_by_tag_name};

use crate::attributes::{AUDIO_ATTRIBUTES, AttributeFilter};
use crate::sanitizer::{
    ConversionOutcome, RemovalReason, SanitizeReport, SelectorConversionMap, TagSanitizer,
    ValidationIssue,
};
use crate::surgery::{detach_children, is_in_fallback_island, remove_element, wrap_with_fallback};
use crate::url_guard::{ResourceGuard, UrlSite};
use crate::SanitizerArgs;

const TAG: &str = "audio";
const REPLACEMENT_TAG: &str = "amp-audio";
const SOURCE_TAG: &str = "source";
const TRACK_TAG: &str = "track";
const FALLBACK_ATTRIBUTE: &str = "fallback";

/// Media references copied back onto the fallback so it shows the validated URLs.
const MIRRORED_ATTRIBUTES: &[&str] = &["src", "poster", "artwork"];

#[derive(Clone, Copy, Debug)]
pub struct AudioSanitizer {
    filter: AttributeFilter,
    guard: ResourceGuard,
}

impl AudioSanitizer {
    pub fn new(args: &SanitizerArgs) -> Self {
        Self {
            filter: AttributeFilter::new(AUDIO_ATTRIBUTES, args),
            guard: ResourceGuard::new(args),
        }
    }

    fn convert(
        &self,
        doc: &mut Document,
        node: NodeId,
        issues: &mut Vec<ValidationIssue>,
    ) -> Result<ConversionOutcome, DomError> {
        if !doc.is_connected(node) || is_in_fallback_island(doc, node) {
            return Ok(ConversionOutcome::Skipped);
        }

        let old_attributes = doc.attributes(node).cloned().unwrap_or_default();
        let new_attributes = self.filter.filter(&old_attributes);
        let fallback_markup = doc.clone_node(node, false)?;
        let children = detach_children(doc, node)?;

        let result = self.rebuild(doc, node, new_attributes, fallback_markup, &children, issues);
        if result.is_err() {
            restore_children(doc, node, &children);
        }
        result
    }

    fn rebuild(
        &self,
        doc: &mut Document,
        node: NodeId,
        mut new_attributes: Attributes,
        fallback_markup: NodeId,
        children: &[NodeId],
        issues: &mut Vec<ValidationIssue>,
    ) -> Result<ConversionOutcome, DomError> {
        let mut sources = usize::from(new_attributes.contains("src"));
        let mut fallback_content: Option<NodeId> = None;
        let mut kept = Vec::new();

        for &child in children {
            if let Some(src) = alternate_source_src(doc, child) {
                match self.guard.validate(&src, UrlSite::AlternateSource) {
                    Ok(url) => {
                        sources += 1;
                        doc.set_attribute(child, "src", url)?;
                        // TODO: re-filtering per accepted source looks redundant; drop it once
                        // nothing relies on layout being recomputed here.
                        new_attributes = self.filter.filter(&new_attributes);
                    }
                    Err(rejection) => {
                        log::trace!(target: "sanitize.audio", "dropping <source src={src:?}>: {rejection}");
                        issues.push(ValidationIssue {
                            tag: SOURCE_TAG.to_string(),
                            reason: RemovalReason::InsecureSource { src, rejection },
                        });
                        remove_element(doc, child)?;
                        continue;
                    }
                }
            }

            if fallback_content.is_none() && is_fallback_candidate(doc, child) {
                doc.set_attribute(child, FALLBACK_ATTRIBUTE, "")?;
                fallback_content = Some(child);
            }
            kept.push(child);
        }

        // Audio is laid out full-width in the source page; let the browser size it.
        new_attributes.set("width", "auto");

        if sources == 0 {
            for child in kept {
                remove_element(doc, child)?;
            }
            remove_element(doc, fallback_markup)?;
            remove_element(doc, node)?;
            return Ok(ConversionOutcome::Removed(RemovalReason::NoValidSource));
        }

        let replacement = doc.create_element_with(REPLACEMENT_TAG, new_attributes);
        for child in kept {
            let copy = doc.clone_node(child, true)?;
            doc.append_child(fallback_markup, copy)?;
            doc.append_child(replacement, child)?;
        }

        // The fallback carries exactly the replacement's media references: rejected
        // ones are dropped from both.
        for &name in MIRRORED_ATTRIBUTES {
            match doc.get_attribute(replacement, name).map(str::to_string) {
                Some(value) => doc.set_attribute(fallback_markup, name, value)?,
                None => {
                    doc.remove_attribute(fallback_markup, name)?;
                }
            }
        }

        wrap_with_fallback(doc, node, replacement, fallback_markup)?;
        remove_element(doc, node)?;
        Ok(ConversionOutcome::Replaced { replacement })
    }
}

/// Put still-detached children back under `node` after a failed conversion.
/// Children already discarded or moved elsewhere are left where they are.
fn restore_children(doc: &mut Document, node: NodeId, children: &[NodeId]) {
    if !doc.contains(node) {
        return;
    }
    for &child in children {
        if doc.contains(child) && doc.parent(child).is_none() {
            let _ = doc.append_child(node, child);
        }
    }
}

/// `src` of a `<source>` child, if it has one.
fn alternate_source_src(doc: &Document, child: NodeId) -> Option<String> {
    if !doc.is_element_named(child, SOURCE_TAG) {
        return None;
    }
    doc.get_attribute(child, "src").map(str::to_string)
}

fn is_fallback_candidate(doc: &Document, child: NodeId) -> bool {
    doc.element(child)
        .is_some_and(|el| !el.is_named(SOURCE_TAG) && !el.is_named(TRACK_TAG))
}

impl TagSanitizer for AudioSanitizer {
    fn name(&self) -> &'static str {
        "audio"
    }

    fn watched_tags(&self) -> &'static [&'static str] {
        &[TAG]
    }

    fn conversion_map(&self) -> SelectorConversionMap {
        SelectorConversionMap::from([(
            TAG.to_string(),
            [REPLACEMENT_TAG.to_string()].into_iter().collect(),
        )])
    }

    fn sanitize(&self, doc: &mut Document) -> SanitizeReport {
        let mut report = SanitizeReport::new(self.name());
        let mut nodes = Vec::new();
        for tag in self.watched_tags() {
            nodes.extend(elements_by_tag_name(doc, tag));
        }
        if nodes.is_empty() {
            return report;
        }

        // Last to first: edits to later elements never disturb earlier handles.
        for &node in nodes.iter().rev() {
            let outcome = match self.convert(doc, node, &mut report.issues) {
                Ok(outcome) => outcome,
                Err(err) => {
                    log::warn!(target: "sanitize.audio", "leaving {node:?} untouched: {err}");
                    ConversionOutcome::Skipped
                }
            };
            log::debug!(target: "sanitize.audio", "{node:?}: {outcome:?}");
            if let ConversionOutcome::Removed(reason) = &outcome {
                report.issues.push(ValidationIssue {
                    tag: TAG.to_string(),
                    reason: reason.clone(),
                });
            }
            report.outcomes.push((node, outcome));
        }
        report
    }
}
