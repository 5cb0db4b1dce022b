//! The structural model of one struct type and the arena that owns it.
//!
//! Models form a graph: a field whose base type is itself a struct points at
//! the nested model. Recursive types make that graph cyclic, so models live
//! in an arena and reference each other through [`ModelId`]. A back-edge
//! resolves to the id of the model already under construction, the same
//! instance rather than a duplicate.

use indexmap::IndexMap;
use std::collections::HashMap;

use crate::tag::TagMap;

/// Index of a [`Model`] inside its [`ModelArena`].
///
/// Ids are only created by [`ModelArena::reserve`] and are meaningless
/// outside the arena that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModelId(pub(crate) usize);

impl ModelId {
    pub fn raw(self) -> usize {
        self.0
    }
}

/// One layer of wrapping between a field's declared type and its base type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wrap {
    /// An `Option<..>` layer; costs a guard on read and a
    /// materialization on write.
    Opt,
    /// A `Box<..>` layer; transparent to access (auto-deref).
    Boxed,
}

/// Type descriptor of a single field.
#[derive(Debug, Clone)]
pub struct FieldType {
    /// True for fields carrying the `embed` flag tag.
    pub embedded: bool,
    /// Wrapping layers from outermost to innermost.
    pub layers: Vec<Wrap>,
    /// Base (innermost) type name, used for identifier synthesis.
    pub name: String,
    /// Rendered declared type expression.
    pub full_name: String,
    /// Declared type as written on the field.
    pub ty: syn::Type,
    /// Innermost type with all layers stripped.
    pub base_ty: syn::Type,
    /// Nested model when the base type is a struct in the sources.
    pub model: Option<ModelId>,
}

impl FieldType {
    /// Number of `Option` layers between the declared and the base type.
    pub fn ref_deep(&self) -> usize {
        self.layers.iter().filter(|w| matches!(w, Wrap::Opt)).count()
    }
}

/// A single hop in a field-access path.
#[derive(Debug, Clone)]
pub struct FieldInfo {
    pub name: String,
    pub ty: FieldType,
}

/// Structural description of one struct type. Immutable after build.
#[derive(Debug, Clone)]
pub struct Model {
    pub type_name: String,
    /// Module nesting the declaration was found under, if any.
    pub module_path: Option<String>,
    pub generics: syn::Generics,
    /// Field identifiers in declaration order. Order is semantically
    /// significant: it fixes output ordering in every derived artifact.
    pub field_names: Vec<String>,
    pub fields_type: HashMap<String, FieldType>,
    pub fields_tag_value: HashMap<String, TagMap>,
}

impl Model {
    pub(crate) fn placeholder(type_name: &str, generics: syn::Generics) -> Self {
        Self {
            type_name: type_name.to_string(),
            module_path: None,
            generics,
            field_names: Vec::new(),
            fields_type: HashMap::new(),
            fields_tag_value: HashMap::new(),
        }
    }

    pub fn field_type(&self, name: &str) -> Option<&FieldType> {
        self.fields_type.get(name)
    }

    pub fn tag_value(&self, field: &str, tag: &str) -> Option<&str> {
        self.fields_tag_value
            .get(field)?
            .get(tag)
            .map(String::as_str)
    }

    /// Fields carrying the given tag, in field order.
    pub fn fields_with_tag(&self, tag: &str) -> Vec<&str> {
        self.field_names
            .iter()
            .filter(|f| self.tag_value(f, tag).is_some())
            .map(String::as_str)
            .collect()
    }

    /// The transposed tag index: tag name → (field name → tag value).
    ///
    /// Computed from `fields_tag_value` on demand so the two views cannot
    /// drift apart.
    pub fn tags_field_value(&self) -> IndexMap<String, IndexMap<String, String>> {
        let mut out: IndexMap<String, IndexMap<String, String>> = IndexMap::new();
        for field in &self.field_names {
            let Some(tags) = self.fields_tag_value.get(field) else {
                continue;
            };
            for (tag, value) in tags {
                out.entry(tag.clone())
                    .or_default()
                    .insert(field.clone(), value.clone());
            }
        }
        out
    }
}

/// Owns every model built during one generation request.
#[derive(Debug, Default)]
pub struct ModelArena {
    models: Vec<Model>,
}

impl ModelArena {
    /// Reserves a slot for a model under construction and returns its id.
    /// The slot is filled by the builder once the fields are known; a cyclic
    /// field reaching back here sees the reserved id in the meantime.
    pub(crate) fn reserve(&mut self, type_name: &str, generics: syn::Generics) -> ModelId {
        let id = ModelId(self.models.len());
        self.models.push(Model::placeholder(type_name, generics));
        id
    }

    pub(crate) fn fill(&mut self, id: ModelId, model: Model) {
        self.models[id.0] = model;
    }

    pub fn get(&self, id: ModelId) -> Option<&Model> {
        self.models.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl std::ops::Index<ModelId> for ModelArena {
    type Output = Model;

    fn index(&self, id: ModelId) -> &Model {
        &self.models[id.0]
    }
}

/// Resolves a (possibly composite `parent.child`) field name into the hop
/// sequence reaching it from the root model.
pub fn field_path(arena: &ModelArena, root: ModelId, name: &str) -> Option<Vec<FieldInfo>> {
    let mut hops = Vec::new();
    let mut current = root;
    let mut segments = name.split('.').peekable();
    while let Some(segment) = segments.next() {
        let model = &arena[current];
        let ty = model.fields_type.get(segment)?.clone();
        let nested = ty.model;
        hops.push(FieldInfo {
            name: segment.to_string(),
            ty,
        });
        if segments.peek().is_some() {
            current = nested?;
        }
    }
    if hops.is_empty() { None } else { Some(hops) }
}
