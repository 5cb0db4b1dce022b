//! Getter/setter generation.
//!
//! Getters substitute the base type's default when any guard on the access
//! path fails; setters materialize every missing `Option` hop so assignment
//! never fails.

use quote::{format_ident, quote};
use std::collections::BTreeSet;
use tracing::debug;

use fieldgen_ir::prelude::{ModelArena, ModelId, field_path, sanitize_ident};

use crate::access::{GuardMode, read_value, wrap_value, write_target};
use crate::config::Visibility;
use crate::consts::view;
use crate::error::GenError;
use crate::output::{ImplTarget, OutputBuilder};

pub struct AccessorSpec {
    pub visibility: Visibility,
    pub guard_mode: GuardMode,
    pub getters: bool,
    pub setters: bool,
    pub flatten: BTreeSet<String>,
    pub exclude: BTreeSet<String>,
}

pub fn generate(
    arena: &ModelArena,
    root: ModelId,
    spec: &AccessorSpec,
    out: &mut OutputBuilder,
) -> Result<(), GenError> {
    let model = view(arena, root, &spec.flatten);
    let target = ImplTarget::from_model(&arena[root]);
    let vis = spec.visibility.tokens();

    for field in &model.field_names {
        if spec.exclude.contains(field) {
            continue;
        }
        let path =
            field_path(arena, root, field).ok_or_else(|| GenError::UnknownField(field.clone()))?;
        let Some(leaf) = path.last() else { continue };
        let base_ty = &leaf.ty.base_ty;
        let method = sanitize_ident(field);
        debug!(field = %field, method = %method, "accessors");

        if spec.getters {
            let ident = format_ident!("{}", method);
            let read = read_value(&quote!(self), &path, spec.guard_mode);
            let body = &read.expr;
            out.add_method(
                &target,
                &method,
                quote! {
                    #vis fn #ident(&self) -> #base_ty {
                        #body
                    }
                },
            )?;
        }

        if spec.setters {
            let setter = format!("set_{method}");
            let ident = format_ident!("{}", setter);
            let place = write_target(&quote!(self), &path);
            let wrapped = wrap_value(&leaf.ty.layers, quote!(value));
            out.add_method(
                &target,
                &setter,
                quote! {
                    #vis fn #ident(&mut self, value: #base_ty) {
                        #place = #wrapped;
                    }
                },
            )?;
        }
    }
    Ok(())
}
