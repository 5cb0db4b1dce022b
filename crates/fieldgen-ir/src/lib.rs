//! Structural models of struct declarations, built from `syn`-parsed source.
//!
//! The model is the input of every fieldgen synthesizer: an ordered field
//! list with per-field type descriptors (wrapping layers, base type, nested
//! model) and tag maps.

pub mod build;
pub mod error;
pub mod flatten;
pub mod model;
pub mod names;
pub mod tag;

pub mod prelude {
    pub use crate::build::ModelBuilder;
    pub use crate::error::{ModelError, TagError};
    pub use crate::flatten::flatten;
    pub use crate::model::{FieldInfo, FieldType, Model, ModelArena, ModelId, Wrap, field_path};
    pub use crate::names::*;
    pub use crate::tag::{ParsedTags, TagMap, parse_field_tags};
}
