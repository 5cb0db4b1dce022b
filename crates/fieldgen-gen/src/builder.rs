//! Builder-type generation: a companion struct holding one (optionally
//! flattened) field per model field, chainable setter methods, and a
//! `build` assembling the target value through materializing paths.

use quote::{format_ident, quote};
use std::collections::BTreeSet;

use fieldgen_ir::prelude::{ModelArena, ModelId, field_path, sanitize_ident};

use crate::access::{wrap_value, write_target};
use crate::config::Visibility;
use crate::consts::view;
use crate::error::GenError;
use crate::output::{ImplTarget, OutputBuilder};

pub struct BuilderSpec {
    pub visibility: Visibility,
    pub flatten: BTreeSet<String>,
    pub exclude: BTreeSet<String>,
}

pub fn generate(
    arena: &ModelArena,
    root: ModelId,
    spec: &BuilderSpec,
    out: &mut OutputBuilder,
) -> Result<(), GenError> {
    let model = view(arena, root, &spec.flatten);
    let struct_ident = format_ident!("{}", model.type_name);
    let builder_name = format!("{}Builder", model.type_name);
    let builder_ident = format_ident!("{}", builder_name);
    let vis = spec.visibility.tokens();

    let generics = &arena[root].generics;
    let (_, ty_generics, where_clause) = generics.split_for_impl();

    let mut decls = Vec::new();
    let mut assigns = Vec::new();
    let mut methods = Vec::new();
    for field in &model.field_names {
        if spec.exclude.contains(field) {
            continue;
        }
        let path =
            field_path(arena, root, field).ok_or_else(|| GenError::UnknownField(field.clone()))?;
        let Some(leaf) = path.last() else { continue };
        let base_ty = leaf.ty.base_ty.clone();
        let layers = leaf.ty.layers.clone();
        let name = sanitize_ident(field);
        let ident = format_ident!("{}", name);

        decls.push(quote! { #ident: #base_ty, });
        let place = write_target(&quote!(value), &path);
        let wrapped = wrap_value(&layers, quote!(self.#ident));
        assigns.push(quote! { #place = #wrapped; });
        methods.push((
            name,
            quote! {
                #vis fn #ident(mut self, value: #base_ty) -> Self {
                    self.#ident = value;
                    self
                }
            },
        ));
    }

    out.add_type(
        &builder_name,
        quote! {
            #[derive(Debug, Default)]
            #vis struct #builder_ident #generics #where_clause {
                #(#decls)*
            }
        },
    )?;

    let target = ImplTarget::new(builder_ident, generics.clone());
    out.add_method(
        &target,
        "new",
        quote! {
            #vis fn new() -> Self {
                Self::default()
            }
        },
    )?;
    for (name, tokens) in methods {
        out.add_method(&target, &name, tokens)?;
    }
    out.add_method(
        &target,
        "build",
        quote! {
            #vis fn build(self) -> #struct_ident #ty_generics {
                let mut value: #struct_ident #ty_generics = Default::default();
                #(#assigns)*
                value
            }
        },
    )?;
    Ok(())
}
