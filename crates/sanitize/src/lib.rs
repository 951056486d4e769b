//! Converts elements that are invalid in a restrictive HTML dialect into
//! conformant replacements, keeping the original markup in a `<noscript>`
//! fallback island.
//!
//! The pipeline borrows a [`dom::Document`], runs every registered
//! [`TagSanitizer`] over it in registration order, and reports whether the
//! document changed. Content problems never abort a pass: an element that
//! cannot be converted is removed or left as it was.
//!
//! ```ignore
//! let pipeline = SanitizerPipeline::with_default_sanitizers(&SanitizerArgs::default());
//! let output = pipeline.run(&mut doc)?;
//! if output.modified { /* re-serialize */ }
//! ```

pub mod attributes;
pub mod audio;
mod config;
pub mod dimension;
mod error;
pub mod pipeline;
pub mod sanitizer;
pub mod surgery;
pub mod url_guard;

pub use crate::audio::AudioSanitizer;
pub use crate::config::SanitizerArgs;
pub use crate::error::{ConfigError, PipelineError};
pub use crate::pipeline::{PipelineOutput, SanitizerPipeline};
pub use crate::sanitizer::{
    ConversionOutcome, RemovalReason, SanitizeReport, SelectorConversionMap, TagSanitizer,
    ValidationIssue,
};
pub use crate::url_guard::{ResourceGuard, UrlRejection, UrlSite};
