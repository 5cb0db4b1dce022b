//! Evaluation of a parsed expression against one field's environment.

use indexmap::IndexMap;
use regex::Regex;

use crate::ast::{Expr, Func, Var};
use crate::error::ExprError;

/// The value environment a template is evaluated against: one field of one
/// struct plus that field's tag map.
#[derive(Debug, Clone, Copy)]
pub struct Env<'a> {
    pub field_name: &'a str,
    pub type_name: &'a str,
    pub struct_name: &'a str,
    pub tags: Option<&'a IndexMap<String, String>>,
}

impl Env<'_> {
    /// Tag value, empty string when the field does not carry the tag.
    pub fn tag(&self, name: &str) -> &str {
        self.tags
            .and_then(|tags| tags.get(name))
            .map(String::as_str)
            .unwrap_or("")
    }
}

pub(crate) fn eval(expr: &Expr, env: &Env<'_>) -> Result<String, ExprError> {
    match expr {
        Expr::Str(value) => Ok(value.clone()),
        Expr::Var(Var::Name) => Ok(env.field_name.to_string()),
        Expr::Var(Var::Type) => Ok(env.type_name.to_string()),
        Expr::Var(Var::Struct) => Ok(env.struct_name.to_string()),
        Expr::Tag(name) => Ok(env.tag(name).to_string()),
        Expr::Call(func, args) => call(*func, args, env),
    }
}

fn call(func: Func, args: &[Expr], env: &Env<'_>) -> Result<String, ExprError> {
    match func {
        Func::Join => {
            let mut out = String::new();
            for arg in args {
                out.push_str(&eval(arg, env)?);
            }
            Ok(out)
        }
        Func::Or => {
            for arg in args {
                let value = eval(arg, env)?;
                if !value.is_empty() {
                    return Ok(value);
                }
            }
            Ok(String::new())
        }
        Func::Rex => {
            let input = eval(&args[0], env)?;
            let pattern = eval(&args[1], env)?;
            extract(&input, &pattern)
        }
        Func::Up => Ok(eval(&args[0], env)?.to_ascii_uppercase()),
        Func::Low => Ok(eval(&args[0], env)?.to_ascii_lowercase()),
        Func::Snake => Ok(to_snake_case(&eval(&args[0], env)?)),
    }
}

/// Single-group regular-expression extraction: the named group `v` when the
/// pattern declares one, otherwise the last participating capture group;
/// empty string when nothing matches.
fn extract(input: &str, pattern: &str) -> Result<String, ExprError> {
    let regex = Regex::new(pattern).map_err(|source| ExprError::Regex {
        pattern: pattern.to_string(),
        source,
    })?;
    let Some(captures) = regex.captures(input) else {
        return Ok(String::new());
    };
    if let Some(named) = captures.name("v") {
        return Ok(named.as_str().to_string());
    }
    for i in (1..captures.len()).rev() {
        if let Some(group) = captures.get(i) {
            return Ok(group.as_str().to_string());
        }
    }
    Ok(String::new())
}

fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    for (i, c) in s.chars().enumerate() {
        if c.is_uppercase() {
            if i != 0 {
                result.push('_');
            }
            for lower_c in c.to_lowercase() {
                result.push(lower_c);
            }
        } else {
            result.push(c);
        }
    }
    result
}
