//! Mutable HTML document tree.
//!
//! The tree is an arena: every node lives in one [`Document`] and is addressed
//! by a copyable [`NodeId`]. This crate does not parse markup; callers build the
//! tree through the node primitives (or a parser of their choosing) and hand it
//! to transformation passes that mutate it in place.

mod document;
mod error;
mod serialize;
mod snapshot;
pub mod traverse;
mod types;

pub use crate::document::Document;
pub use crate::error::DomError;
pub use crate::serialize::{inner_html, to_html};
pub use crate::snapshot::DomSnapshot;
pub use crate::traverse::{descendants, elements_by_tag_name};
pub use crate::types::{Attributes, ElementData, NodeId, NodeKind};
