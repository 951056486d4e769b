//! Sanitizer registry and driver.
//!
//! Invariants:
//! - Sanitizers run exactly once per pass, in registration order.
//! - All sanitizers see the same mutable document.
//! - A pass never fails because of document content; the only error is an
//!   empty registry.

use dom::Document;

use crate::audio::AudioSanitizer;
use crate::sanitizer::{SanitizeReport, SelectorConversionMap, TagSanitizer};
use crate::{PipelineError, SanitizerArgs};

#[derive(Debug, Default)]
pub struct PipelineOutput {
    /// True when any sanitizer replaced or removed an element.
    pub modified: bool,
    pub reports: Vec<SanitizeReport>,
    pub selector_conversion_map: SelectorConversionMap,
}

#[derive(Default)]
pub struct SanitizerPipeline {
    sanitizers: Vec<Box<dyn TagSanitizer>>,
}

impl SanitizerPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pipeline with every built-in sanitizer registered.
    pub fn with_default_sanitizers(args: &SanitizerArgs) -> Self {
        let mut pipeline = Self::new();
        pipeline.register(AudioSanitizer::new(args));
        pipeline
    }

    /// Like [`Self::with_default_sanitizers`], reading the arguments from TOML.
    pub fn from_toml_config(source: &str) -> Result<Self, PipelineError> {
        let args = SanitizerArgs::from_toml_str(source)?;
        Ok(Self::with_default_sanitizers(&args))
    }

    pub fn register(&mut self, sanitizer: impl TagSanitizer + 'static) -> &mut Self {
        self.sanitizers.push(Box::new(sanitizer));
        self
    }

    pub fn len(&self) -> usize {
        self.sanitizers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sanitizers.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.sanitizers.iter().map(|s| s.name())
    }

    /// Merged source-tag → dialect-tags map of every registered sanitizer.
    pub fn selector_conversion_map(&self) -> SelectorConversionMap {
        let mut merged = SelectorConversionMap::new();
        for sanitizer in &self.sanitizers {
            for (selector, targets) in sanitizer.conversion_map() {
                merged.entry(selector).or_default().extend(targets);
            }
        }
        merged
    }

    pub fn run(&self, doc: &mut Document) -> Result<PipelineOutput, PipelineError> {
        if self.sanitizers.is_empty() {
            return Err(PipelineError::NoSanitizers);
        }

        let mut output = PipelineOutput {
            selector_conversion_map: self.selector_conversion_map(),
            ..PipelineOutput::default()
        };
        for sanitizer in &self.sanitizers {
            let report = sanitizer.sanitize(doc);
            log::debug!(
                target: "sanitize.pipeline",
                "{}: {} element(s) visited, modified={}",
                report.sanitizer,
                report.outcomes.len(),
                report.modified()
            );
            output.modified |= report.modified();
            output.reports.push(report);
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sanitizer::ConversionOutcome;
    use dom::{NodeId, elements_by_tag_name, to_html};
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Renames `<b>` to `<strong>` and records when it ran.
    struct RenameBold {
        log: Rc<RefCell<Vec<&'static str>>>,
        label: &'static str,
    }

    impl TagSanitizer for RenameBold {
        fn name(&self) -> &'static str {
            self.label
        }

        fn watched_tags(&self) -> &'static [&'static str] {
            &["b"]
        }

        fn conversion_map(&self) -> SelectorConversionMap {
            SelectorConversionMap::from([(
                "b".to_string(),
                ["strong".to_string(), "span".to_string()].into_iter().collect(),
            )])
        }

        fn sanitize(&self, doc: &mut Document) -> SanitizeReport {
            self.log.borrow_mut().push(self.label);
            let mut report = SanitizeReport::new(self.label);
            for node in elements_by_tag_name(doc, "b").into_iter().rev() {
                let parent = doc.parent(node).unwrap();
                let strong = doc.create_element("strong");
                let children: Vec<NodeId> = doc.children(node).to_vec();
                for child in children {
                    doc.remove_child(node, child).unwrap();
                    doc.append_child(strong, child).unwrap();
                }
                doc.replace_child(parent, strong, node).unwrap();
                report
                    .outcomes
                    .push((node, ConversionOutcome::Replaced { replacement: strong }));
            }
            report
        }
    }

    fn doc_with(tags: &[&str]) -> Document {
        let mut doc = Document::new();
        for tag in tags {
            let el = doc.create_element(tag);
            if *tag == "audio" {
                doc.set_attribute(el, "src", "https://x.com/a.mp3").unwrap();
            }
            doc.append_child(doc.root(), el).unwrap();
        }
        doc
    }

    #[test]
    fn empty_registry_is_an_error() {
        let mut doc = doc_with(&["audio"]);
        let err = SanitizerPipeline::new().run(&mut doc).unwrap_err();
        assert!(matches!(err, PipelineError::NoSanitizers));
    }

    #[test]
    fn runs_in_registration_order_once_each() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut pipeline = SanitizerPipeline::with_default_sanitizers(&SanitizerArgs::default());
        pipeline
            .register(RenameBold {
                log: Rc::clone(&log),
                label: "first",
            })
            .register(RenameBold {
                log: Rc::clone(&log),
                label: "second",
            });
        assert_eq!(pipeline.names().collect::<Vec<_>>(), vec!["audio", "first", "second"]);

        let mut doc = doc_with(&["b", "audio"]);
        let output = pipeline.run(&mut doc).unwrap();
        assert_eq!(*log.borrow(), vec!["first", "second"]);
        assert!(output.modified);
        assert_eq!(output.reports.len(), 3);
        assert!(output.reports[1].modified());
        assert!(!output.reports[2].modified());
        assert!(to_html(&doc, doc.root()).starts_with("<strong></strong><amp-audio"));
    }

    #[test]
    fn conversion_maps_are_merged() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut pipeline = SanitizerPipeline::with_default_sanitizers(&SanitizerArgs::default());
        pipeline.register(RenameBold {
            log,
            label: "bold",
        });
        let map = pipeline.selector_conversion_map();
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["audio", "b"]);
        assert_eq!(map["b"].len(), 2);
    }

    #[test]
    fn unmodified_document_reports_false() {
        let pipeline = SanitizerPipeline::with_default_sanitizers(&SanitizerArgs::default());
        let mut doc = doc_with(&["p"]);
        let output = pipeline.run(&mut doc).unwrap();
        assert!(!output.modified);
        assert_eq!(output.selector_conversion_map.len(), 1);
    }

    #[test]
    fn config_errors_surface_from_toml() {
        let err = SanitizerPipeline::from_toml_config("require_https_src = \"yes\"")
            .err()
            .unwrap();
        assert!(matches!(err, PipelineError::Config(_)));
        let pipeline = SanitizerPipeline::from_toml_config("content_max_width = 640").unwrap();
        assert_eq!(pipeline.len(), 1);
    }
}
