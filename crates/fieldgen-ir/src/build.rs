//! Recursive construction of [`Model`]s from parsed source files.

use quote::ToTokens;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::error::ModelError;
use crate::model::{FieldType, Model, ModelArena, ModelId, Wrap};
use crate::tag::parse_field_tags;

/// Builds structural models by walking struct declarations in a set of
/// parsed source files.
///
/// One `build` call owns its own arena and in-flight guard map; nothing is
/// cached across calls.
pub struct ModelBuilder<'src> {
    files: &'src [syn::File],
}

impl<'src> ModelBuilder<'src> {
    pub fn new(files: &'src [syn::File]) -> Self {
        Self { files }
    }

    /// Builds the model of `type_name`, recursing into struct-typed fields.
    pub fn build(&self, type_name: &str) -> Result<(ModelArena, ModelId), ModelError> {
        let mut arena = ModelArena::default();
        let mut in_flight = HashMap::new();
        let id = self.build_into(&mut arena, &mut in_flight, type_name)?;
        Ok((arena, id))
    }

    fn build_into(
        &self,
        arena: &mut ModelArena,
        in_flight: &mut HashMap<String, ModelId>,
        type_name: &str,
    ) -> Result<ModelId, ModelError> {
        if let Some(&id) = in_flight.get(type_name) {
            return Ok(id);
        }

        let (item, module_path) = self
            .find_struct(type_name)
            .ok_or_else(|| ModelError::TypeNotFound(type_name.to_string()))?;
        let syn::Fields::Named(fields) = &item.fields else {
            return Err(ModelError::NotAStruct(type_name.to_string()));
        };

        // Reserve before descending so a cyclic field resolves to this id.
        let id = arena.reserve(type_name, item.generics.clone());
        in_flight.insert(type_name.to_string(), id);
        debug!(type_name, id = id.raw(), "building model");

        let mut model = Model::placeholder(type_name, item.generics.clone());
        model.module_path = module_path;

        for field in &fields.named {
            let Some(ident) = &field.ident else { continue };
            let name = ident.to_string();
            if model.fields_type.contains_key(&name) {
                warn!(type_name, field = %name, "duplicate field, keeping the first");
                continue;
            }

            let parsed = parse_field_tags(&field.attrs).map_err(|source| ModelError::Tag {
                type_name: type_name.to_string(),
                field: name.clone(),
                source,
            })?;

            let (layers, base_ty) = strip_layers(&field.ty);
            let base_name = base_type_name(&base_ty);
            let nested = if self.find_struct(&base_name).is_some() {
                Some(self.build_into(arena, in_flight, &base_name)?)
            } else {
                None
            };

            model.field_names.push(name.clone());
            if !parsed.tags.is_empty() {
                model.fields_tag_value.insert(name.clone(), parsed.tags);
            }
            model.fields_type.insert(
                name,
                FieldType {
                    embedded: parsed.embedded,
                    layers,
                    name: base_name,
                    full_name: render_type(&field.ty),
                    ty: field.ty.clone(),
                    base_ty,
                    model: nested,
                },
            );
        }

        arena.fill(id, model);
        Ok(id)
    }

    fn find_struct(&self, type_name: &str) -> Option<(&'src syn::ItemStruct, Option<String>)> {
        for file in self.files {
            if let Some(found) = find_in_items(&file.items, type_name, &[]) {
                return Some(found);
            }
        }
        None
    }
}

fn find_in_items<'a>(
    items: &'a [syn::Item],
    type_name: &str,
    modules: &[String],
) -> Option<(&'a syn::ItemStruct, Option<String>)> {
    for item in items {
        match item {
            syn::Item::Struct(s) if s.ident == type_name => {
                let path = (!modules.is_empty()).then(|| modules.join("::"));
                return Some((s, path));
            }
            syn::Item::Mod(m) => {
                if let Some((_, nested)) = &m.content {
                    let mut inner = modules.to_vec();
                    inner.push(m.ident.to_string());
                    if let Some(found) = find_in_items(nested, type_name, &inner) {
                        return Some(found);
                    }
                }
            }
            _ => {}
        }
    }
    None
}

/// Peels `Option`/`Box` wrapping off a declared type, outermost first.
pub fn strip_layers(ty: &syn::Type) -> (Vec<Wrap>, syn::Type) {
    let mut layers = Vec::new();
    let mut current = ty;
    loop {
        match wrap_of(current) {
            Some((wrap, inner)) => {
                layers.push(wrap);
                current = inner;
            }
            None => return (layers, current.clone()),
        }
    }
}

fn wrap_of(ty: &syn::Type) -> Option<(Wrap, &syn::Type)> {
    let syn::Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    let wrap = match segment.ident.to_string().as_str() {
        "Option" => Wrap::Opt,
        "Box" => Wrap::Boxed,
        _ => return None,
    };
    let syn::PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    if args.args.len() != 1 {
        return None;
    }
    match args.args.first()? {
        syn::GenericArgument::Type(inner) => Some((wrap, inner)),
        _ => None,
    }
}

/// Base type name used for identifier synthesis: the last path segment for
/// path types, the tidied rendering otherwise.
pub fn base_type_name(ty: &syn::Type) -> String {
    if let syn::Type::Path(type_path) = ty
        && let Some(segment) = type_path.path.segments.last()
    {
        return segment.ident.to_string();
    }
    render_type(ty)
}

/// Renders a type expression without token-stream spacing artifacts.
pub fn render_type(ty: &syn::Type) -> String {
    tidy_type_string(&ty.to_token_stream().to_string())
}

fn tidy_type_string(s: &str) -> String {
    s.replace(" :: ", "::")
        .replace("< ", "<")
        .replace(" <", "<")
        .replace(" >", ">")
        .replace(" ,", ",")
        .replace("& ", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> Vec<syn::File> {
        vec![syn::parse_str(src).unwrap()]
    }

    #[test]
    fn builds_flat_struct_in_declaration_order() {
        let files = parse(
            r#"
            struct User {
                #[tags(json = "id")]
                id: i64,
                #[tags(json = "name,omitempty")]
                name: String,
                age: u32,
            }
            "#,
        );
        let (arena, id) = ModelBuilder::new(&files).build("User").unwrap();
        let model = &arena[id];
        assert_eq!(model.field_names, ["id", "name", "age"]);
        assert_eq!(model.tag_value("id", "json"), Some("id"));
        assert_eq!(model.tag_value("name", "json"), Some("name,omitempty"));
        assert_eq!(model.tag_value("age", "json"), None);
        let ty = model.field_type("id").unwrap();
        assert_eq!(ty.name, "i64");
        assert_eq!(ty.ref_deep(), 0);
    }

    #[test]
    fn resolves_option_and_box_layers() {
        let files = parse(
            r#"
            struct Holder {
                a: Option<Box<Inner>>,
                b: Option<Option<i64>>,
                c: Box<Inner>,
            }
            struct Inner { x: i64 }
            "#,
        );
        let (arena, id) = ModelBuilder::new(&files).build("Holder").unwrap();
        let model = &arena[id];

        let a = model.field_type("a").unwrap();
        assert_eq!(a.layers, [Wrap::Opt, Wrap::Boxed]);
        assert_eq!(a.ref_deep(), 1);
        assert_eq!(a.name, "Inner");
        assert_eq!(a.full_name, "Option<Box<Inner>>");
        assert!(a.model.is_some());

        let b = model.field_type("b").unwrap();
        assert_eq!(b.ref_deep(), 2);
        assert_eq!(b.name, "i64");
        assert!(b.model.is_none());

        let c = model.field_type("c").unwrap();
        assert_eq!(c.layers, [Wrap::Boxed]);
        assert_eq!(c.ref_deep(), 0);
    }

    #[test]
    fn self_cycle_reuses_the_in_flight_model() {
        let files = parse("struct Node { value: i64, next: Option<Box<Node>> }");
        let (arena, id) = ModelBuilder::new(&files).build("Node").unwrap();
        let next = arena[id].field_type("next").unwrap();
        assert_eq!(next.model, Some(id));
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn two_step_cycle_terminates() {
        let files = parse(
            r#"
            struct A { b: Option<Box<B>> }
            struct B { a: Option<Box<A>> }
            "#,
        );
        let (arena, id) = ModelBuilder::new(&files).build("A").unwrap();
        let b_id = arena[id].field_type("b").unwrap().model.unwrap();
        let back = arena[b_id].field_type("a").unwrap().model;
        assert_eq!(back, Some(id));
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn duplicate_field_keeps_the_first() {
        // syn accepts the duplicate; the builder recovers by shadowing.
        let files = parse("struct S { x: i64, x: String }");
        let (arena, id) = ModelBuilder::new(&files).build("S").unwrap();
        let model = &arena[id];
        assert_eq!(model.field_names, ["x"]);
        assert_eq!(model.field_type("x").unwrap().name, "i64");
    }

    #[test]
    fn embedded_field_gets_a_nested_model() {
        let files = parse(
            r#"
            struct Entry {
                #[tags(embed)]
                base: Option<Base>,
                name: String,
            }
            struct Base { id: i64 }
            "#,
        );
        let (arena, id) = ModelBuilder::new(&files).build("Entry").unwrap();
        let base = arena[id].field_type("base").unwrap();
        assert!(base.embedded);
        let nested = base.model.unwrap();
        assert_eq!(arena[nested].field_names, ["id"]);
    }

    #[test]
    fn missing_type_and_non_struct_are_input_errors() {
        let files = parse("enum E { A }");
        let builder = ModelBuilder::new(&files);
        assert!(matches!(
            builder.build("Nope"),
            Err(crate::error::ModelError::TypeNotFound(_))
        ));
        // tuple structs are rejected the same way
        let files = parse("struct P(i64);");
        assert!(matches!(
            ModelBuilder::new(&files).build("P"),
            Err(crate::error::ModelError::NotAStruct(_))
        ));
    }

    #[test]
    fn finds_structs_inside_modules() {
        let files = parse("mod outer { pub mod inner { pub struct S { pub x: i64 } } }");
        let (arena, id) = ModelBuilder::new(&files).build("S").unwrap();
        assert_eq!(arena[id].module_path.as_deref(), Some("outer::inner"));
    }

    #[test]
    fn generic_parameters_are_kept() {
        let files = parse("struct Wrapper<T> { value: Option<T> }");
        let (arena, id) = ModelBuilder::new(&files).build("Wrapper").unwrap();
        let model = &arena[id];
        assert_eq!(model.generics.params.len(), 1);
        let value = model.field_type("value").unwrap();
        assert_eq!(value.name, "T");
        assert!(value.model.is_none());
    }
}
