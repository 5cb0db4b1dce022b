//! The template expression micro-language used to compute generated
//! constant names and values from field metadata.
//!
//! A template is parsed once and evaluated per field:
//!
//! ```
//! use fieldgen_expr::{Env, Template};
//! use indexmap::IndexMap;
//!
//! let template = Template::parse("join(struct, '_', or(tag.db, name))").unwrap();
//! let tags: IndexMap<String, String> = [("db".to_string(), "user_id".to_string())].into();
//! let env = Env {
//!     field_name: "id",
//!     type_name: "i64",
//!     struct_name: "User",
//!     tags: Some(&tags),
//! };
//! assert_eq!(template.eval(&env).unwrap(), "User_user_id");
//! assert_eq!(template.referenced_tags(), ["db"]);
//! ```

pub mod ast;
pub mod error;
pub mod eval;
pub mod lex;
pub mod parse;

pub use error::ExprError;
pub use eval::Env;

use ast::Expr;

/// A parsed template, ready for repeated evaluation.
#[derive(Debug, Clone)]
pub struct Template {
    src: String,
    root: Expr,
}

impl Template {
    pub fn parse(src: &str) -> Result<Self, ExprError> {
        let root = parse::parse(src)?;
        Ok(Self {
            src: src.to_string(),
            root,
        })
    }

    /// The original template text, for diagnostics.
    pub fn src(&self) -> &str {
        &self.src
    }

    pub fn eval(&self, env: &Env<'_>) -> Result<String, ExprError> {
        eval::eval(&self.root, env)
    }

    /// Tags the template can consume, in order of appearance. Static: does
    /// not depend on any evaluation.
    pub fn referenced_tags(&self) -> Vec<String> {
        self.root.referenced_tags()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn env_with(tags: &IndexMap<String, String>) -> Env<'_> {
        Env {
            field_name: "user_name",
            type_name: "String",
            struct_name: "Account",
            tags: Some(tags),
        }
    }

    fn tags(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn variables_and_literals() {
        let t = tags(&[]);
        let env = env_with(&t);
        assert_eq!(Template::parse("name").unwrap().eval(&env).unwrap(), "user_name");
        assert_eq!(Template::parse("type").unwrap().eval(&env).unwrap(), "String");
        assert_eq!(Template::parse("struct").unwrap().eval(&env).unwrap(), "Account");
        assert_eq!(Template::parse("'x'").unwrap().eval(&env).unwrap(), "x");
    }

    #[test]
    fn missing_tag_is_empty() {
        let t = tags(&[]);
        let env = env_with(&t);
        assert_eq!(Template::parse("tag.json").unwrap().eval(&env).unwrap(), "");
    }

    #[test]
    fn or_takes_first_non_empty() {
        let t = tags(&[("db", "users.name")]);
        let env = env_with(&t);
        let template = Template::parse("or(tag.json, tag.db, name)").unwrap();
        assert_eq!(template.eval(&env).unwrap(), "users.name");
    }

    #[test]
    fn rex_named_group() {
        let t = tags(&[("json", "name,omitempty")]);
        let env = env_with(&t);
        let template = Template::parse(r"rex(tag.json, '^(?P<v>[^,]+)')").unwrap();
        assert_eq!(template.eval(&env).unwrap(), "name");
    }

    #[test]
    fn rex_last_group_and_no_match() {
        let t = tags(&[]);
        let env = env_with(&t);
        let template = Template::parse(r"rex('a-b', '(\w)-(\w)')").unwrap();
        assert_eq!(template.eval(&env).unwrap(), "b");
        let template = Template::parse(r"rex('xyz', '(\d+)')").unwrap();
        assert_eq!(template.eval(&env).unwrap(), "");
    }

    #[test]
    fn rex_bad_pattern_is_an_error() {
        let t = tags(&[]);
        let env = env_with(&t);
        let template = Template::parse("rex(name, '(')").unwrap();
        assert!(matches!(template.eval(&env), Err(ExprError::Regex { .. })));
    }

    #[test]
    fn case_functions() {
        let t = tags(&[]);
        let env = env_with(&t);
        assert_eq!(Template::parse("up(name)").unwrap().eval(&env).unwrap(), "USER_NAME");
        assert_eq!(Template::parse("low('AB')").unwrap().eval(&env).unwrap(), "ab");
        assert_eq!(
            Template::parse("snake(type)").unwrap().eval(&env).unwrap(),
            "string"
        );
        assert_eq!(
            Template::parse("snake('MyType')").unwrap().eval(&env).unwrap(),
            "my_type"
        );
    }

    #[test]
    fn evaluation_is_deterministic() {
        let t = tags(&[("json", "id")]);
        let env = env_with(&t);
        let template = Template::parse("join(struct, '_', tag.json)").unwrap();
        assert_eq!(template.eval(&env).unwrap(), template.eval(&env).unwrap());
    }
}
