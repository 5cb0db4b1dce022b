//! Map-conversion generation: a key newtype, one key constant per field,
//! and a function producing a `HashMap` of boxed field values.

use proc_macro2::TokenStream;
use quote::{ToTokens, format_ident, quote};
use std::collections::BTreeSet;

use fieldgen_ir::prelude::{ModelArena, ModelId, field_path, sanitize_ident, to_camel_case,
    to_screaming_snake_case, to_snake_case};

use crate::access::{GuardMode, read_value};
use crate::config::{KeyPolicy, Visibility};
use crate::consts::{FieldConst, check_duplicates, emit_const_block, view};
use crate::error::GenError;
use crate::output::OutputBuilder;
use crate::rewrite::CodeRewriter;

pub struct AsMapSpec {
    pub visibility: Visibility,
    pub guard_mode: GuardMode,
    pub key_policy: KeyPolicy,
    /// When set, only fields carrying this tag participate and the tag
    /// value (after `key_policy`) is the map key.
    pub tag: Option<String>,
    pub flatten: BTreeSet<String>,
    pub exclude: BTreeSet<String>,
    pub rewriter: CodeRewriter,
}

pub fn generate(
    arena: &ModelArena,
    root: ModelId,
    spec: &AsMapSpec,
    out: &mut OutputBuilder,
) -> Result<(), GenError> {
    let model = view(arena, root, &spec.flatten);
    let struct_ident = format_ident!("{}", model.type_name);
    let snake = to_snake_case(&model.type_name);
    let vis = spec.visibility.tokens();

    let generics = &arena[root].generics;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let key_ty_name = format!("{}Field", model.type_name);
    let key_ty = format_ident!("{}", key_ty_name);
    out.add_type(
        &key_ty_name,
        quote! {
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
            #vis struct #key_ty(pub &'static str);
        },
    )?;

    let mut keys = Vec::new();
    let mut inserts = Vec::new();
    for field in &model.field_names {
        if spec.exclude.contains(field) {
            continue;
        }
        let Some(ty) = model.fields_type.get(field) else {
            continue;
        };
        let key = match &spec.tag {
            Some(tag) => match model.tag_value(field, tag) {
                Some(value) => spec.key_policy.apply(value).to_string(),
                None => continue,
            },
            None => field.clone(),
        };
        let path =
            field_path(arena, root, field).ok_or_else(|| GenError::UnknownField(field.clone()))?;

        let const_name = to_screaming_snake_case(format!(
            "{}Field{}",
            model.type_name,
            to_camel_case(sanitize_ident(field))
        ));
        let const_ident = format_ident!("{}", const_name);
        keys.push(FieldConst {
            name: const_name,
            value: key,
            field_path: path.clone(),
        });

        let read = read_value(&quote!(value), &path, spec.guard_mode);
        let expr = rewritten(&spec.rewriter, field, &ty.name, read.expr)?;
        inserts.push(quote! {
            map.insert(#const_ident, Box::new(#expr) as Box<dyn std::any::Any>);
        });
    }

    check_duplicates(&keys, false)?;
    out.add_const_block(emit_const_block(&keys, spec.visibility, Some(&key_ty)));

    let fn_name = match &spec.tag {
        Some(tag) => format!("{snake}_as_{}_map", sanitize_ident(tag)),
        None => format!("{snake}_as_map"),
    };
    let fn_ident = format_ident!("{}", fn_name);
    out.add_function(
        &fn_name,
        quote! {
            #vis fn #fn_ident #impl_generics (value: &#struct_ident #ty_generics)
                -> std::collections::HashMap<#key_ty, Box<dyn std::any::Any>> #where_clause
            {
                let mut map = std::collections::HashMap::new();
                #(#inserts)*
                map
            }
        },
    )?;
    Ok(())
}

/// Runs the rewriter over a value expression, reparsing the result so a
/// broken rewrite template fails generation instead of emitting garbage.
fn rewritten(
    rewriter: &CodeRewriter,
    field: &str,
    type_name: &str,
    expr: TokenStream,
) -> Result<TokenStream, GenError> {
    if rewriter.is_empty() {
        return Ok(expr);
    }
    let (text, changed) = rewriter.transform(field, type_name, &expr.to_string());
    if !changed {
        return Ok(expr);
    }
    let parsed: syn::Expr = syn::parse_str(&text).map_err(|source| GenError::BadRewriteOutput {
        expr: text.clone(),
        source,
    })?;
    Ok(parsed.to_token_stream())
}
