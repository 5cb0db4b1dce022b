/// A parsed template expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Str(String),
    Var(Var),
    /// `tag.<name>`: the value of a tag on the current field.
    Tag(String),
    Call(Func, Vec<Expr>),
}

/// Built-in variables of the field environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Var {
    /// Current field name (composite for flattened fields).
    Name,
    /// Base type name of the current field.
    Type,
    /// Name of the struct being generated for.
    Struct,
}

impl Var {
    pub fn resolve(name: &str) -> Option<Self> {
        match name {
            "name" => Some(Var::Name),
            "type" => Some(Var::Type),
            "struct" => Some(Var::Struct),
            _ => None,
        }
    }
}

/// Built-in functions. All are pure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Func {
    /// Concatenation of all arguments.
    Join,
    /// First non-empty argument.
    Or,
    /// Regular-expression extraction: `rex(input, pattern)`.
    Rex,
    /// ASCII upper-casing.
    Up,
    /// ASCII lower-casing.
    Low,
    /// CamelCase → snake_case conversion.
    Snake,
}

impl Func {
    pub fn resolve(name: &str) -> Option<Self> {
        match name {
            "join" => Some(Func::Join),
            "or" => Some(Func::Or),
            "rex" => Some(Func::Rex),
            "up" => Some(Func::Up),
            "low" => Some(Func::Low),
            "snake" => Some(Func::Snake),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Func::Join => "join",
            Func::Or => "or",
            Func::Rex => "rex",
            Func::Up => "up",
            Func::Low => "low",
            Func::Snake => "snake",
        }
    }

    /// Checks the argument count; returns the expectation on mismatch.
    pub fn check_arity(self, got: usize) -> Result<(), &'static str> {
        let ok = match self {
            Func::Join | Func::Or => got >= 1,
            Func::Rex => got == 2,
            Func::Up | Func::Low | Func::Snake => got == 1,
        };
        if ok {
            Ok(())
        } else {
            Err(match self {
                Func::Join | Func::Or => "at least 1",
                Func::Rex => "exactly 2",
                Func::Up | Func::Low | Func::Snake => "exactly 1",
            })
        }
    }
}

impl Expr {
    /// Collects every `tag.X` reference, in order of appearance, deduped.
    ///
    /// This is the static replacement for marking tags used-on-read during
    /// evaluation: which tags a template can consume is a property of its
    /// text, not of any particular evaluation.
    pub fn referenced_tags(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_tags(&mut out);
        out
    }

    fn collect_tags(&self, out: &mut Vec<String>) {
        match self {
            Expr::Tag(name) => {
                if !out.iter().any(|t| t == name) {
                    out.push(name.clone());
                }
            }
            Expr::Call(_, args) => {
                for arg in args {
                    arg.collect_tags(out);
                }
            }
            Expr::Str(_) | Expr::Var(_) => {}
        }
    }
}
