//! Constructor generation with unary option functions.
//!
//! Required fields become positional arguments; every other field gets a
//! `with_*` function producing a boxed closure over the receiver. Options
//! apply in iteration order and the last write to a field wins (plain
//! closure semantics, no conflict detection).

use quote::{format_ident, quote};
use std::collections::BTreeSet;

use fieldgen_ir::prelude::{ModelArena, ModelId, ShortVarPool, field_path, sanitize_ident, to_snake_case};

use crate::access::{wrap_value, write_target};
use crate::config::Visibility;
use crate::consts::view;
use crate::error::GenError;
use crate::output::OutputBuilder;

pub struct CtorSpec {
    pub visibility: Visibility,
    /// Fields passed positionally to the constructor; everything else is an
    /// option function.
    pub required: BTreeSet<String>,
    pub flatten: BTreeSet<String>,
    pub exclude: BTreeSet<String>,
}

pub fn generate(
    arena: &ModelArena,
    root: ModelId,
    spec: &CtorSpec,
    out: &mut OutputBuilder,
) -> Result<(), GenError> {
    let model = view(arena, root, &spec.flatten);
    let struct_ident = format_ident!("{}", model.type_name);
    let snake = to_snake_case(&model.type_name);
    let vis = spec.visibility.tokens();

    let generics = &arena[root].generics;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let option_name = format!("{}Option", model.type_name);
    let option_ident = format_ident!("{}", option_name);
    out.add_type(
        &option_name,
        quote! {
            #vis type #option_ident #generics =
                Box<dyn FnOnce(&mut #struct_ident #ty_generics)>;
        },
    )?;

    // collision-safe receiver name for the constructor body
    let mut pool = ShortVarPool::new();
    pool.reserve("options");
    for field in &model.field_names {
        pool.reserve(sanitize_ident(field));
    }
    let receiver = format_ident!("{}", pool.short_name(&snake));

    let mut args = Vec::new();
    let mut required_assigns = Vec::new();
    let mut with_fns = Vec::new();
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

        if spec.required.contains(field) {
            let place = write_target(&quote!(#receiver), &path);
            let wrapped = wrap_value(&layers, quote!(#ident));
            args.push(quote! { #ident: #base_ty, });
            required_assigns.push(quote! { #place = #wrapped; });
        } else {
            let with_name = format!("with_{name}");
            let with_ident = format_ident!("{}", with_name);
            let mut with_pool = ShortVarPool::new();
            with_pool.reserve("value");
            let target = format_ident!("{}", with_pool.short_name(&snake));
            let place = write_target(&quote!(#target), &path);
            let wrapped = wrap_value(&layers, quote!(value));
            with_fns.push((
                with_name,
                quote! {
                    #vis fn #with_ident #impl_generics (value: #base_ty)
                        -> #option_ident #ty_generics #where_clause
                    {
                        Box::new(move |#target: &mut #struct_ident #ty_generics| {
                            #place = #wrapped;
                        })
                    }
                },
            ));
        }
    }

    let new_name = format!("new_{snake}");
    let new_ident = format_ident!("{}", new_name);
    out.add_function(
        &new_name,
        quote! {
            #vis fn #new_ident #impl_generics (
                #(#args)*
                options: impl IntoIterator<Item = #option_ident #ty_generics>,
            ) -> #struct_ident #ty_generics #where_clause {
                let mut #receiver: #struct_ident #ty_generics = Default::default();
                #(#required_assigns)*
                for option in options {
                    option(&mut #receiver);
                }
                #receiver
            }
        },
    )?;
    for (name, tokens) in with_fns {
        out.add_function(&name, tokens)?;
    }
    Ok(())
}
