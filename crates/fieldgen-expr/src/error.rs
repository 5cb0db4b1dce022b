use thiserror::Error;

/// Failure while parsing or evaluating a template expression.
///
/// Every variant carries the offending template text: templates arrive from
/// the command line and the error is the only place the user sees them back.
#[derive(Debug, Error)]
pub enum ExprError {
    #[error("template `{template}`: unrecognized input at offset {offset}")]
    Lex { template: String, offset: usize },

    #[error("template `{template}`: {message}")]
    Parse { template: String, message: String },

    #[error("template `{template}`: unknown identifier `{name}`")]
    UnknownIdent { template: String, name: String },

    #[error("template `{template}`: unknown function `{name}`")]
    UnknownFunction { template: String, name: String },

    #[error("template `{template}`: `{function}` expects {expected}, got {got} argument(s)")]
    WrongArity {
        template: String,
        function: &'static str,
        expected: &'static str,
        got: usize,
    },

    #[error("invalid regular expression `{pattern}`: {source}")]
    Regex {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
