//! Accumulation of generated fragments into one output unit.
//!
//! Fragments land in two sections: the head (type declarations, then
//! constant blocks) and the body (impl blocks, then free functions).
//! Adding a type, function or method under an already-taken name is an
//! error: the generated source would not compile. Constant blocks are
//! additive; their uniqueness is the constant synthesizer's job.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use std::collections::HashSet;

use fieldgen_ir::prelude::Model;

use crate::error::GenError;

/// The type an impl-block method is generated on.
#[derive(Debug, Clone)]
pub struct ImplTarget {
    pub ident: syn::Ident,
    pub generics: syn::Generics,
}

impl ImplTarget {
    pub fn from_model(model: &Model) -> Self {
        Self {
            ident: format_ident!("{}", model.type_name),
            generics: model.generics.clone(),
        }
    }

    pub fn new(ident: syn::Ident, generics: syn::Generics) -> Self {
        Self { ident, generics }
    }
}

struct ImplBlock {
    target: ImplTarget,
    methods: Vec<TokenStream>,
}

/// Explicit, threaded output state, one per generation request.
#[derive(Default)]
pub struct OutputBuilder {
    types: Vec<TokenStream>,
    type_names: HashSet<String>,
    const_blocks: Vec<TokenStream>,
    impls: Vec<ImplBlock>,
    method_names: HashSet<(String, String)>,
    functions: Vec<TokenStream>,
    function_names: HashSet<String>,
}

impl OutputBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_type(&mut self, name: &str, tokens: TokenStream) -> Result<(), GenError> {
        if !self.type_names.insert(name.to_string()) {
            return Err(GenError::DuplicateSymbol(name.to_string()));
        }
        self.types.push(tokens);
        Ok(())
    }

    pub fn add_const_block(&mut self, tokens: TokenStream) {
        self.const_blocks.push(tokens);
    }

    pub fn add_function(&mut self, name: &str, tokens: TokenStream) -> Result<(), GenError> {
        if !self.function_names.insert(name.to_string()) {
            return Err(GenError::DuplicateSymbol(name.to_string()));
        }
        self.functions.push(tokens);
        Ok(())
    }

    pub fn add_method(
        &mut self,
        target: &ImplTarget,
        name: &str,
        tokens: TokenStream,
    ) -> Result<(), GenError> {
        let key = (target.ident.to_string(), name.to_string());
        if !self.method_names.insert(key) {
            return Err(GenError::DuplicateSymbol(format!(
                "{}::{name}",
                target.ident
            )));
        }
        match self
            .impls
            .iter_mut()
            .find(|block| block.target.ident == target.ident)
        {
            Some(block) => block.methods.push(tokens),
            None => self.impls.push(ImplBlock {
                target: target.clone(),
                methods: vec![tokens],
            }),
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
            && self.const_blocks.is_empty()
            && self.impls.is_empty()
            && self.functions.is_empty()
    }

    /// Serializes head then body, in insertion order within each section.
    pub fn finish(self) -> TokenStream {
        let types = &self.types;
        let const_blocks = &self.const_blocks;
        let impls = self.impls.iter().map(|block| {
            let ident = &block.target.ident;
            let (impl_generics, ty_generics, where_clause) =
                block.target.generics.split_for_impl();
            let methods = &block.methods;
            quote! {
                impl #impl_generics #ident #ty_generics #where_clause {
                    #(#methods)*
                }
            }
        });
        let functions = &self.functions;
        quote! {
            #(#types)*
            #(#const_blocks)*
            #(#impls)*
            #(#functions)*
        }
    }
}
