//! Guarded access-expression rendering over a field path.
//!
//! A path is a sequence of hops ([`FieldInfo`]); every `Option` layer on a
//! hop costs one guard on read and one materialization on write. Rendering
//! is a pure function of the path, with no generator-specific string pasting.
//!
//! The traversal keeps the accumulated expression a *place* of the fully
//! unwrapped type at every step: `Option` layers are unwrapped explicitly
//! (`as_ref().unwrap()` under a guard, or an alias binding) and `Box` layers
//! are dereferenced explicitly. That keeps method resolution on the next
//! step unambiguous and makes the final `.clone()` yield the base type.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use fieldgen_ir::prelude::{FieldInfo, ShortVarPool, Wrap};

/// How guard chains are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GuardMode {
    /// One combined boolean condition; the body re-evaluates the full path.
    #[default]
    Flat,
    /// An `if let` chain introducing a short alias per unwrapped hop.
    Alias,
}

/// A rendered read of a field value.
pub struct ReadValue {
    /// Expression yielding the base value, or its default when any guard
    /// fails.
    pub expr: TokenStream,
    /// Number of guards in the chain.
    pub guards: usize,
}

/// Renders the guarded read of the field at the end of `path`, starting
/// from `receiver`. An empty path reads the receiver itself.
pub fn read_value(receiver: &TokenStream, path: &[FieldInfo], mode: GuardMode) -> ReadValue {
    match mode {
        GuardMode::Flat => read_flat(receiver, path),
        GuardMode::Alias => read_alias(receiver, path),
    }
}

fn read_flat(receiver: &TokenStream, path: &[FieldInfo]) -> ReadValue {
    let mut place = receiver.clone();
    let mut conds: Vec<TokenStream> = Vec::new();

    for hop in path {
        let field = format_ident!("{}", hop.name);
        place = quote!(#place.#field);
        for layer in &hop.ty.layers {
            match layer {
                Wrap::Opt => {
                    conds.push(quote!(#place.is_some()));
                    place = quote!((*#place.as_ref().unwrap()));
                }
                Wrap::Boxed => place = quote!((*#place)),
            }
        }
    }

    finish_read(conds, place)
}

fn read_alias(receiver: &TokenStream, path: &[FieldInfo]) -> ReadValue {
    let mut pool = ShortVarPool::new();
    pool.reserve(receiver.to_string());

    let mut place = receiver.clone();
    let mut bindings: Vec<TokenStream> = Vec::new();

    for hop in path {
        let field = format_ident!("{}", hop.name);
        place = quote!(#place.#field);
        for layer in &hop.ty.layers {
            match layer {
                Wrap::Opt => {
                    let alias = format_ident!("{}", pool.short_name(&hop.name));
                    bindings.push(quote!(let Some(#alias) = #place.as_ref()));
                    place = quote!((*#alias));
                }
                Wrap::Boxed => place = quote!((*#place)),
            }
        }
    }

    finish_read(bindings, place)
}

fn finish_read(guards: Vec<TokenStream>, place: TokenStream) -> ReadValue {
    let count = guards.len();
    let expr = match join_and(guards) {
        None => quote!(#place.clone()),
        Some(cond) => quote! {
            if #cond { #place.clone() } else { Default::default() }
        },
    };
    ReadValue {
        expr,
        guards: count,
    }
}

fn join_and(parts: Vec<TokenStream>) -> Option<TokenStream> {
    parts.into_iter().reduce(|a, b| quote!(#a && #b))
}

/// Renders the assignment target for the field at the end of `path`,
/// materializing every missing intermediate `Option` hop with
/// `get_or_insert_with(Default::default)`. The final hop's own wrapping is
/// not traversed; the assigned value is wrapped instead, see
/// [`wrap_value`].
pub fn write_target(receiver: &TokenStream, path: &[FieldInfo]) -> TokenStream {
    let mut place = receiver.clone();
    for (i, hop) in path.iter().enumerate() {
        let field = format_ident!("{}", hop.name);
        place = quote!(#place.#field);
        if i + 1 == path.len() {
            break;
        }
        for layer in &hop.ty.layers {
            match layer {
                Wrap::Opt => {
                    place = quote!((*#place.get_or_insert_with(Default::default)));
                }
                Wrap::Boxed => place = quote!((*#place)),
            }
        }
    }
    place
}

/// Wraps a value expression back into a field's declared layers,
/// innermost first: layers `[Opt, Boxed]` turn `v` into
/// `Some(Box::new(v))`.
pub fn wrap_value(layers: &[Wrap], value: TokenStream) -> TokenStream {
    let mut out = value;
    for layer in layers.iter().rev() {
        out = match layer {
            Wrap::Opt => quote!(Some(#out)),
            Wrap::Boxed => quote!(Box::new(#out)),
        };
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldgen_ir::prelude::{ModelBuilder, field_path};

    fn path_of(src: &str, root: &str, name: &str) -> Vec<FieldInfo> {
        let files = vec![syn::parse_str(src).unwrap()];
        let (arena, id) = ModelBuilder::new(&files).build(root).unwrap();
        field_path(&arena, id, name).unwrap()
    }

    fn canon(s: &str) -> String {
        s.parse::<TokenStream>().unwrap().to_string()
    }

    const EMBEDDED: &str = r#"
        struct Entry { base: Option<Base>, name: String }
        struct Base { id: i64 }
    "#;

    #[test]
    fn alias_mode_single_guard() {
        let path = path_of(EMBEDDED, "Entry", "base.id");
        let read = read_value(&quote!(self), &path, GuardMode::Alias);
        assert_eq!(read.guards, 1);
        assert_eq!(
            read.expr.to_string(),
            canon(
                "if let Some(b) = self.base.as_ref() { (*b).id.clone() } \
                 else { Default::default() }"
            )
        );
    }

    #[test]
    fn flat_mode_single_guard() {
        let path = path_of(EMBEDDED, "Entry", "base.id");
        let read = read_value(&quote!(self), &path, GuardMode::Flat);
        assert_eq!(read.guards, 1);
        assert_eq!(
            read.expr.to_string(),
            canon(
                "if self.base.is_some() \
                 { (*self.base.as_ref().unwrap()).id.clone() } \
                 else { Default::default() }"
            )
        );
    }

    #[test]
    fn unguarded_path_is_a_plain_clone() {
        let path = path_of(EMBEDDED, "Entry", "name");
        let read = read_value(&quote!(self), &path, GuardMode::Flat);
        assert_eq!(read.guards, 0);
        assert_eq!(read.expr.to_string(), canon("self.name.clone()"));
    }

    #[test]
    fn boxed_layers_deref_without_guards() {
        let path = path_of(
            "struct S { inner: Box<Inner> } struct Inner { x: i64 }",
            "S",
            "inner.x",
        );
        let read = read_value(&quote!(self), &path, GuardMode::Flat);
        assert_eq!(read.guards, 0);
        assert_eq!(read.expr.to_string(), canon("(*self.inner).x.clone()"));
    }

    #[test]
    fn option_box_combines_guard_and_deref() {
        let path = path_of(
            "struct Node { value: i64, next: Option<Box<Node>> }",
            "Node",
            "next.value",
        );
        let read = read_value(&quote!(self), &path, GuardMode::Alias);
        assert_eq!(read.guards, 1);
        assert_eq!(
            read.expr.to_string(),
            canon(
                "if let Some(n) = self.next.as_ref() { (*(*n)).value.clone() } \
                 else { Default::default() }"
            )
        );
    }

    #[test]
    fn guard_count_matches_option_depth() {
        for (ty, depth) in [
            ("i64", 0),
            ("Option<i64>", 1),
            ("Option<Option<i64>>", 2),
            ("Option<Option<Option<i64>>>", 3),
            ("Option<Option<Option<Option<i64>>>>", 4),
        ] {
            let src = format!("struct S {{ v: {ty} }}");
            let path = path_of(&src, "S", "v");
            for mode in [GuardMode::Flat, GuardMode::Alias] {
                assert_eq!(read_value(&quote!(self), &path, mode).guards, depth);
            }
        }
    }

    #[test]
    fn alias_names_do_not_collide() {
        let path = path_of("struct S { b: Option<Option<i64>> }", "S", "b");
        let read = read_value(&quote!(self), &path, GuardMode::Alias);
        assert_eq!(
            read.expr.to_string(),
            canon(
                "if let Some(b) = self.b.as_ref() && let Some(b2) = (*b).as_ref() \
                 { (*b2).clone() } else { Default::default() }"
            )
        );
    }

    #[test]
    fn empty_path_reads_the_receiver() {
        let read = read_value(&quote!(self), &[], GuardMode::Alias);
        assert_eq!(read.guards, 0);
        assert_eq!(read.expr.to_string(), canon("self.clone()"));
    }

    #[test]
    fn write_target_materializes_intermediates() {
        let path = path_of(EMBEDDED, "Entry", "base.id");
        let target = write_target(&quote!(self), &path);
        assert_eq!(
            target.to_string(),
            canon("(*self.base.get_or_insert_with(Default::default)).id")
        );
    }

    #[test]
    fn write_target_derefs_boxes() {
        let path = path_of(
            "struct Node { value: i64, next: Option<Box<Node>> }",
            "Node",
            "next.value",
        );
        let target = write_target(&quote!(self), &path);
        assert_eq!(
            target.to_string(),
            canon("(*(*self.next.get_or_insert_with(Default::default))).value")
        );
    }

    #[test]
    fn wrap_value_rebuilds_declared_layers() {
        let wrapped = wrap_value(&[Wrap::Opt, Wrap::Boxed], quote!(value));
        assert_eq!(wrapped.to_string(), canon("Some(Box::new(value))"));
        let plain = wrap_value(&[], quote!(value));
        assert_eq!(plain.to_string(), canon("value"));
    }
}
