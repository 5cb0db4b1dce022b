//! Identifier casing and collision-safe short names for generated code.

use std::collections::HashSet;

pub fn to_camel_case(s: impl AsRef<str>) -> String {
    let s = s.as_ref();
    let mut result = String::new();
    let mut capitalize_next = true;
    for c in s.chars() {
        if c == '_' {
            capitalize_next = true;
        } else if capitalize_next {
            result.push(c.to_ascii_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }
    result
}

pub fn to_snake_case(s: impl AsRef<str>) -> String {
    let s = s.as_ref();
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

pub fn to_screaming_snake_case(s: impl AsRef<str>) -> String {
    to_snake_case(s).to_ascii_uppercase()
}

pub fn upper_first(s: impl AsRef<str>) -> String {
    let s = s.as_ref();
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

pub fn lower_first(s: impl AsRef<str>) -> String {
    let s = s.as_ref();
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_ascii_lowercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// Reduces an arbitrary name (possibly a composite `parent.child` path or a
/// rendered type expression) to a legal Rust identifier.
pub fn sanitize_ident(s: impl AsRef<str>) -> String {
    let mut result = String::new();
    for c in s.as_ref().chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            result.push(c);
        } else if c == '.' || c == ':' {
            // path separators keep a word boundary
            if !result.ends_with('_') {
                result.push('_');
            }
        }
        // everything else (generics punctuation, spaces) is dropped
    }
    if result.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        result.insert(0, '_');
    }
    result
}

pub fn is_rust_keyword(s: &str) -> bool {
    matches!(
        s,
        "as" | "async"
            | "await"
            | "break"
            | "const"
            | "continue"
            | "crate"
            | "dyn"
            | "else"
            | "enum"
            | "extern"
            | "false"
            | "fn"
            | "for"
            | "if"
            | "impl"
            | "in"
            | "let"
            | "loop"
            | "match"
            | "mod"
            | "move"
            | "mut"
            | "pub"
            | "ref"
            | "return"
            | "self"
            | "static"
            | "struct"
            | "super"
            | "trait"
            | "true"
            | "type"
            | "unsafe"
            | "use"
            | "where"
            | "while"
    )
}

/// Hands out short local-variable names for alias-mode guard chains.
///
/// The first request for `base_config` yields `b`, the next name starting
/// with `b` yields `ba` and so on; exhausted prefixes fall back to a numeric
/// suffix. Keywords and already-issued names are never returned twice.
#[derive(Debug, Default)]
pub struct ShortVarPool {
    used: HashSet<String>,
}

impl ShortVarPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves a name that may not be issued by [`Self::short_name`].
    pub fn reserve(&mut self, name: impl Into<String>) {
        self.used.insert(name.into());
    }

    pub fn short_name(&mut self, base: &str) -> String {
        let base = sanitize_ident(to_snake_case(base));
        let base = if base.is_empty() { "v".to_string() } else { base };

        for len in 1..=base.len() {
            let candidate: String = base.chars().take(len).collect();
            if !is_rust_keyword(&candidate) && !self.used.contains(&candidate) {
                self.used.insert(candidate.clone());
                return candidate;
            }
        }
        let mut n = 2usize;
        loop {
            let candidate = format!("{base}{n}");
            if !self.used.contains(&candidate) {
                self.used.insert(candidate.clone());
                return candidate;
            }
            n += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_camel_case() {
        assert_eq!(to_camel_case("my_struct_name"), "MyStructName");
        assert_eq!(to_camel_case("another_example"), "AnotherExample");
        assert_eq!(to_camel_case("simple"), "Simple");
    }

    #[test]
    fn test_to_snake_case() {
        assert_eq!(to_snake_case("MyStructName"), "my_struct_name");
        assert_eq!(to_snake_case("Simple"), "simple");
        assert_eq!(to_snake_case("already_snake"), "already_snake");
    }

    #[test]
    fn test_to_screaming_snake_case() {
        assert_eq!(to_screaming_snake_case("MyStructName"), "MY_STRUCT_NAME");
        assert_eq!(to_screaming_snake_case("id"), "ID");
    }

    #[test]
    fn test_first_letter_casing() {
        assert_eq!(upper_first("name"), "Name");
        assert_eq!(lower_first("Name"), "name");
        assert_eq!(upper_first(""), "");
    }

    #[test]
    fn test_sanitize_ident() {
        assert_eq!(sanitize_ident("base.id"), "base_id");
        assert_eq!(sanitize_ident("Vec<String>"), "VecString");
        assert_eq!(sanitize_ident("3d_point"), "_3d_point");
        assert_eq!(sanitize_ident("a::b"), "a_b");
    }

    #[test]
    fn test_short_names_collide() {
        let mut pool = ShortVarPool::new();
        assert_eq!(pool.short_name("base"), "b");
        assert_eq!(pool.short_name("buffer"), "bu");
        assert_eq!(pool.short_name("b"), "b2");
    }

    #[test]
    fn test_short_names_skip_keywords() {
        let mut pool = ShortVarPool::new();
        // every prefix of "ifx" up to "if" is either taken or a keyword
        assert_eq!(pool.short_name("i"), "i");
        assert_eq!(pool.short_name("ifx"), "ifx");
    }

    #[test]
    fn test_reserved_names_are_skipped() {
        let mut pool = ShortVarPool::new();
        pool.reserve("v");
        assert_eq!(pool.short_name("value"), "va");
    }
}
