//! Output serialization and formatting.
//!
//! The raw token text is written before formatting is attempted, so a
//! formatting failure leaves a debuggable file behind instead of nothing.

use proc_macro2::TokenStream;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const HEADER: &str = "// Code generated by fieldgen. DO NOT EDIT.";

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("writing `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("generated source failed to format (raw output kept): {source}")]
    Format {
        #[source]
        source: syn::Error,
    },
}

/// Writes the generated output to `out` (stdout when `None`).
///
/// For files: raw write first, formatted rewrite second. A formatting error
/// is surfaced after the raw write and never discards the file.
pub fn write_output(
    out: Option<&Path>,
    module_path: Option<&str>,
    tokens: &TokenStream,
) -> Result<(), OutputError> {
    let header = header_for(module_path);
    let raw = format!("{header}\n{tokens}\n");
    match out {
        Some(path) => {
            write_file(path, &raw)?;
            let formatted =
                format_tokens(tokens).map_err(|source| OutputError::Format { source })?;
            write_file(path, &format!("{header}\n{formatted}"))
        }
        None => match format_tokens(tokens) {
            Ok(formatted) => {
                print!("{header}\n{formatted}");
                Ok(())
            }
            Err(source) => {
                print!("{raw}");
                Err(OutputError::Format { source })
            }
        },
    }
}

fn header_for(module_path: Option<&str>) -> String {
    match module_path {
        Some(path) => format!("{HEADER}\n\nuse crate::{path}::*;\n"),
        None => HEADER.to_string(),
    }
}

fn format_tokens(tokens: &TokenStream) -> Result<String, syn::Error> {
    let file: syn::File = syn::parse2(tokens.clone())?;
    Ok(prettyplease::unparse(&file))
}

fn write_file(path: &Path, contents: &str) -> Result<(), OutputError> {
    std::fs::write(path, contents).map_err(|source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    })
}
