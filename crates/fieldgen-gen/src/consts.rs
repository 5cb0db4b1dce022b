//! Constant synthesis: evaluating name/value templates per field and
//! emitting the resulting constant block.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use std::collections::{BTreeSet, HashMap};
use tracing::info;

use fieldgen_expr::{Env, Template};
use fieldgen_ir::prelude::{FieldInfo, Model, ModelArena, ModelId, field_path, flatten, sanitize_ident};

use crate::config::{ConstCasing, Visibility};
use crate::error::GenError;

/// Configuration of one constant-synthesis batch.
pub struct ConstSpec {
    /// Template for the constant name; when absent the name is derived from
    /// the struct name, the tags the value template references, and the
    /// field path.
    pub name_template: Option<Template>,
    pub value_template: Template,
    /// A falsy (empty) result skips the field entirely.
    pub include_template: Option<Template>,
    pub casing: ConstCasing,
    pub flatten: BTreeSet<String>,
    pub exclude: BTreeSet<String>,
    /// Also reject the batch when two constants share a value.
    pub unique_values: bool,
}

/// One synthesized constant and the field path it denotes.
#[derive(Debug, Clone)]
pub struct FieldConst {
    pub name: String,
    pub value: String,
    pub field_path: Vec<FieldInfo>,
}

/// Evaluates the templates over every eligible field of the model.
///
/// Duplicate detection is a whole-batch post-pass: all fields are processed
/// first, then the first offending pair is reported.
pub fn synthesize(
    arena: &ModelArena,
    root: ModelId,
    spec: &ConstSpec,
) -> Result<Vec<FieldConst>, GenError> {
    let model = view(arena, root, &spec.flatten);
    let mut consts = Vec::new();

    for field in &model.field_names {
        if spec.exclude.contains(field) {
            continue;
        }
        let Some(ty) = model.fields_type.get(field) else {
            continue;
        };
        let env = Env {
            field_name: field,
            type_name: &ty.name,
            struct_name: &model.type_name,
            tags: model.fields_tag_value.get(field),
        };

        if let Some(include) = &spec.include_template
            && include
                .eval(&env)
                .map_err(|e| GenError::template(field, e))?
                .is_empty()
        {
            continue;
        }

        let value = spec
            .value_template
            .eval(&env)
            .map_err(|e| GenError::template(field, e))?;
        if value.is_empty() {
            info!(field = %field, template = %spec.value_template.src(), "empty value, no constant");
            continue;
        }

        let name = match &spec.name_template {
            Some(template) => {
                sanitize_ident(template.eval(&env).map_err(|e| GenError::template(field, e))?)
            }
            None => default_name(&model, field, &spec.value_template, spec.casing),
        };

        let path =
            field_path(arena, root, field).ok_or_else(|| GenError::UnknownField(field.clone()))?;
        consts.push(FieldConst {
            name,
            value,
            field_path: path,
        });
    }

    check_duplicates(&consts, spec.unique_values)?;
    Ok(consts)
}

pub(crate) fn view(arena: &ModelArena, root: ModelId, flat: &BTreeSet<String>) -> Model {
    if flat.is_empty() {
        arena[root].clone()
    } else {
        flatten(arena, root, flat)
    }
}

/// Default constant name: struct, then the value template's referenced tags
/// that the field actually carries, then the field path.
fn default_name(model: &Model, field: &str, value_template: &Template, casing: ConstCasing) -> String {
    let mut parts = vec![model.type_name.clone()];
    parts.extend(
        value_template
            .referenced_tags()
            .into_iter()
            .filter(|tag| model.tag_value(field, tag).is_some()),
    );
    parts.push(field.to_string());
    casing.apply(&parts)
}

pub(crate) fn check_duplicates(consts: &[FieldConst], unique_values: bool) -> Result<(), GenError> {
    let mut names: HashMap<&str, &FieldConst> = HashMap::new();
    for c in consts {
        if let Some(first) = names.insert(&c.name, c) {
            return Err(GenError::DuplicateConstName {
                name: c.name.clone(),
                first: path_name(first),
                second: path_name(c),
            });
        }
    }
    if unique_values {
        let mut values: HashMap<&str, &FieldConst> = HashMap::new();
        for c in consts {
            if let Some(first) = values.insert(&c.value, c) {
                return Err(GenError::DuplicateConstValue {
                    value: c.value.clone(),
                    first: first.name.clone(),
                    second: c.name.clone(),
                });
            }
        }
    }
    Ok(())
}

fn path_name(c: &FieldConst) -> String {
    c.field_path
        .iter()
        .map(|hop| hop.name.as_str())
        .collect::<Vec<_>>()
        .join(".")
}

/// Emits the constant block. With `const_ty` the constants are newtype
/// values of that type, otherwise plain `&str`.
pub fn emit_const_block(
    consts: &[FieldConst],
    visibility: Visibility,
    const_ty: Option<&syn::Ident>,
) -> TokenStream {
    let vis = visibility.tokens();
    let items = consts.iter().map(|c| {
        let name = format_ident!("{}", c.name);
        let value = &c.value;
        match const_ty {
            Some(ty) => quote! { #vis const #name: #ty = #ty(#value); },
            None => quote! { #vis const #name: &str = #value; },
        }
    });
    quote! { #(#items)* }
}
