//! Helper generation over a set of declared constants of one type:
//! stringification, reverse lookup by name, and an all-values accessor.
//!
//! Constants sharing one underlying value form an alias group. A constant
//! whose value expression is a path to an earlier constant joins that
//! constant's group; otherwise grouping is by value token text. Groups keep
//! declaration order and each group's first-declared name is canonical.

use proc_macro2::Literal;
use quote::{ToTokens, format_ident, quote};

use fieldgen_ir::prelude::to_snake_case;

use crate::config::Visibility;
use crate::error::GenError;
use crate::output::OutputBuilder;

pub struct EnumHelperSpec {
    pub visibility: Visibility,
    /// The constants' declared type name.
    pub type_name: String,
}

struct AliasGroup {
    names: Vec<syn::Ident>,
    /// The first-declared constant's value expression.
    value: syn::Expr,
}

pub fn generate(
    files: &[syn::File],
    spec: &EnumHelperSpec,
    out: &mut OutputBuilder,
) -> Result<(), GenError> {
    let consts = collect_consts(files, &spec.type_name);
    if consts.is_empty() {
        return Err(GenError::NoConstants(spec.type_name.clone()));
    }
    let ty = consts[0].1.clone();
    let groups = group_aliases(&consts);

    let vis = spec.visibility.tokens();
    let snake = to_snake_case(&spec.type_name);
    let multi = groups.iter().any(|g| g.names.len() > 1);

    let firsts: Vec<&syn::Ident> = groups.iter().map(|g| &g.names[0]).collect();

    // name(): first alias, or every alias when any group has more than one
    let name_fn = format!("{snake}_name");
    let name_ident = format_ident!("{}", name_fn);
    let name_tokens = if multi {
        let arms = groups.iter().map(|g| {
            let first = &g.names[0];
            let names = g.names.iter().map(|n| n.to_string());
            quote! { #first => vec![#(#names),*], }
        });
        quote! {
            #vis fn #name_ident(value: #ty) -> Vec<&'static str> {
                match value {
                    #(#arms)*
                    _ => Vec::new(),
                }
            }
        }
    } else {
        let arms = groups.iter().map(|g| {
            let first = &g.names[0];
            let name = first.to_string();
            quote! { #first => #name, }
        });
        quote! {
            #vis fn #name_ident(value: #ty) -> &'static str {
                match value {
                    #(#arms)*
                    _ => "",
                }
            }
        }
    };
    out.add_function(&name_fn, name_tokens)?;

    // lookup by name, accepting any alias
    let from_fn = format!("{snake}_from_name");
    let from_ident = format_ident!("{}", from_fn);
    let from_arms = groups.iter().map(|g| {
        let first = &g.names[0];
        let names = g.names.iter().map(|n| n.to_string());
        quote! { #(#names)|* => Some(#first), }
    });
    out.add_function(
        &from_fn,
        quote! {
            #vis fn #from_ident(name: &str) -> Option<#ty> {
                match name {
                    #(#from_arms)*
                    _ => None,
                }
            }
        },
    )?;

    // all values, one entry per alias group
    let values_fn = format!("{snake}_values");
    let values_ident = format_ident!("{}", values_fn);
    let len = Literal::usize_unsuffixed(groups.len());
    out.add_function(
        &values_fn,
        quote! {
            #vis fn #values_ident() -> [#ty; #len] {
                [#(#firsts),*]
            }
        },
    )?;
    Ok(())
}

fn collect_consts(files: &[syn::File], type_name: &str) -> Vec<(syn::Ident, syn::Type, syn::Expr)> {
    let mut out = Vec::new();
    for file in files {
        collect_in_items(&file.items, type_name, &mut out);
    }
    out
}

fn collect_in_items(
    items: &[syn::Item],
    type_name: &str,
    out: &mut Vec<(syn::Ident, syn::Type, syn::Expr)>,
) {
    for item in items {
        match item {
            syn::Item::Const(c) => {
                if let syn::Type::Path(path) = c.ty.as_ref()
                    && let Some(segment) = path.path.segments.last()
                    && segment.ident == type_name
                {
                    out.push((c.ident.clone(), (*c.ty).clone(), (*c.expr).clone()));
                }
            }
            syn::Item::Mod(m) => {
                if let Some((_, nested)) = &m.content {
                    collect_in_items(nested, type_name, out);
                }
            }
            _ => {}
        }
    }
}

fn group_aliases(consts: &[(syn::Ident, syn::Type, syn::Expr)]) -> Vec<AliasGroup> {
    let mut groups: Vec<AliasGroup> = Vec::new();
    for (ident, _, expr) in consts {
        // a reference to an earlier constant joins its group
        let by_name = const_reference(expr).and_then(|referenced| {
            groups
                .iter()
                .position(|g| g.names.iter().any(|n| *n == referenced))
        });
        let index = by_name.or_else(|| {
            let key = expr.to_token_stream().to_string();
            groups
                .iter()
                .position(|g| g.value.to_token_stream().to_string() == key)
        });
        match index {
            Some(i) => groups[i].names.push(ident.clone()),
            None => groups.push(AliasGroup {
                names: vec![ident.clone()],
                value: expr.clone(),
            }),
        }
    }
    groups
}

fn const_reference(expr: &syn::Expr) -> Option<String> {
    if let syn::Expr::Path(path) = expr
        && path.qself.is_none()
        && path.path.segments.len() == 1
    {
        return path.path.get_ident().map(|i| i.to_string());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use proc_macro2::TokenStream;

    fn generate_for(src: &str, type_name: &str) -> Result<String, GenError> {
        let files = vec![syn::parse_str(src).unwrap()];
        let mut out = OutputBuilder::new();
        generate(
            &files,
            &EnumHelperSpec {
                visibility: Visibility::Export,
                type_name: type_name.to_string(),
            },
            &mut out,
        )?;
        Ok(out.finish().to_string())
    }

    fn canon(s: &str) -> String {
        s.parse::<TokenStream>().unwrap().to_string()
    }

    #[test]
    fn simple_constants() {
        let src = r#"
            type Level = u8;
            const LOW: Level = 1;
            const HIGH: Level = 2;
        "#;
        let text = generate_for(src, "Level").unwrap();
        assert_eq!(
            text,
            canon(
                r#"
                pub fn level_name(value: Level) -> &'static str {
                    match value {
                        LOW => "LOW",
                        HIGH => "HIGH",
                        _ => "",
                    }
                }
                pub fn level_from_name(name: &str) -> Option<Level> {
                    match name {
                        "LOW" => Some(LOW),
                        "HIGH" => Some(HIGH),
                        _ => None,
                    }
                }
                pub fn level_values() -> [Level; 2] {
                    [LOW, HIGH]
                }
                "#
            )
        );
    }

    #[test]
    fn alias_by_const_reference() {
        let src = r#"
            type Level = u8;
            const B: Level = 1;
            const F: Level = B;
            const H: Level = 2;
        "#;
        let text = generate_for(src, "Level").unwrap();
        // any group with >1 alias switches the whole type to Vec returns
        assert!(text.contains(&canon(r#"B => vec!["B", "F"],"#)));
        assert!(text.contains(&canon("-> Vec<&'static str>")));
        assert!(text.contains(&canon(r#""B" | "F" => Some(B),"#)));
        assert!(text.contains(&canon("[Level; 2]")));
        assert!(text.contains(&canon("[B, H]")));
    }

    #[test]
    fn alias_by_identical_value() {
        let src = r#"
            type Level = u8;
            const B: Level = 1;
            const F: Level = 1;
        "#;
        let text = generate_for(src, "Level").unwrap();
        assert!(text.contains(&canon(r#"B => vec!["B", "F"],"#)));
    }

    #[test]
    fn no_constants_is_an_input_error() {
        assert!(matches!(
            generate_for("type Level = u8;", "Level"),
            Err(GenError::NoConstants(_))
        ));
    }

    #[test]
    fn other_types_are_ignored() {
        let src = r#"
            type Level = u8;
            const LOW: Level = 1;
            const OTHER: u8 = 9;
        "#;
        let text = generate_for(src, "Level").unwrap();
        assert!(!text.contains("OTHER"));
    }
}
