//! Command-line surface. Thin: every subcommand maps onto one synthesizer
//! configuration in [`crate::run`].

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "fieldgen", version, about = "Generate companion source for struct types")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate field constants from name/value templates.
    Constants(ConstantsArgs),
    /// Generate getter/setter methods.
    Accessors(AccessorsArgs),
    /// Generate a builder type with chainable methods.
    Builder(BuilderArgs),
    /// Generate a constructor with unary option functions.
    New(NewArgs),
    /// Generate a field-keyed map conversion.
    AsMap(AsMapArgs),
    /// Generate name/value helpers over declared constants of a type.
    EnumHelpers(EnumHelpersArgs),
}

#[derive(Debug, Args)]
pub struct CommonArgs {
    /// Source file to read declarations from (repeatable).
    #[arg(long = "src", value_name = "FILE", required = true)]
    pub src: Vec<PathBuf>,

    /// Name of the type to generate for.
    #[arg(long = "type", value_name = "NAME")]
    pub type_name: String,

    /// Output file; stdout when omitted.
    #[arg(long, value_name = "FILE")]
    pub out: Option<PathBuf>,

    /// Generate private items instead of `pub`.
    #[arg(long)]
    pub private: bool,
}

#[derive(Debug, Args)]
pub struct FieldSelectArgs {
    /// Embedded field to flatten (repeatable; composite `a.b` descends).
    #[arg(long = "flat", value_name = "FIELD")]
    pub flat: Vec<String>,

    /// Field to exclude (repeatable).
    #[arg(long = "exclude", value_name = "FIELD")]
    pub exclude: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum GuardModeArg {
    /// One combined condition, path re-evaluated in the body.
    #[default]
    Flat,
    /// `if let` chains with short local aliases.
    Alias,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum KeyPolicyArg {
    /// Strip the `,option` list from tag values used as keys.
    #[default]
    StripOptions,
    /// Use tag values verbatim.
    Raw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum CasingArg {
    /// SCREAMING_SNAKE_CASE constant names.
    #[default]
    Screaming,
    /// UpperCamelCase constant names.
    Camel,
}

#[derive(Debug, Args)]
pub struct ConstantsArgs {
    #[command(flatten)]
    pub common: CommonArgs,
    #[command(flatten)]
    pub select: FieldSelectArgs,

    /// Template for constant names; derived from referenced tags when
    /// omitted.
    #[arg(long = "name-template", value_name = "TEMPLATE")]
    pub name_template: Option<String>,

    /// Template for constant values.
    #[arg(long = "value-template", value_name = "TEMPLATE")]
    pub value_template: Option<String>,

    /// Template gating which fields participate; falsy skips the field.
    #[arg(long = "include-template", value_name = "TEMPLATE")]
    pub include_template: Option<String>,

    /// Shorthand for `--value-template tag.<NAME>`.
    #[arg(long, value_name = "NAME")]
    pub tag: Option<String>,

    /// Also reject the batch when two constants share a value.
    #[arg(long)]
    pub unique_values: bool,

    /// Casing of derived constant names.
    #[arg(long, value_enum, default_value = "screaming")]
    pub casing: CasingArg,
}

#[derive(Debug, Args)]
pub struct AccessorsArgs {
    #[command(flatten)]
    pub common: CommonArgs,
    #[command(flatten)]
    pub select: FieldSelectArgs,

    /// Guard-chain rendering mode.
    #[arg(long, value_enum, default_value = "flat")]
    pub guard_mode: GuardModeArg,

    /// Generate getters only.
    #[arg(long, conflicts_with = "setters_only")]
    pub getters_only: bool,

    /// Generate setters only.
    #[arg(long)]
    pub setters_only: bool,
}

#[derive(Debug, Args)]
pub struct BuilderArgs {
    #[command(flatten)]
    pub common: CommonArgs,
    #[command(flatten)]
    pub select: FieldSelectArgs,
}

#[derive(Debug, Args)]
pub struct NewArgs {
    #[command(flatten)]
    pub common: CommonArgs,
    #[command(flatten)]
    pub select: FieldSelectArgs,

    /// Field passed positionally to the constructor (repeatable).
    #[arg(long = "required", value_name = "FIELD")]
    pub required: Vec<String>,
}

#[derive(Debug, Args)]
pub struct AsMapArgs {
    #[command(flatten)]
    pub common: CommonArgs,
    #[command(flatten)]
    pub select: FieldSelectArgs,

    /// Guard-chain rendering mode.
    #[arg(long, value_enum, default_value = "flat")]
    pub guard_mode: GuardModeArg,

    /// Scope keys to this tag's values instead of field names.
    #[arg(long, value_name = "NAME")]
    pub tag: Option<String>,

    /// How map keys derive from tag values.
    #[arg(long, value_enum, default_value = "strip-options")]
    pub key_policy: KeyPolicyArg,

    /// Rewrite rule `trigger:trigger_value:engine=template` (repeatable).
    #[arg(long = "rewrite", value_name = "RULE")]
    pub rewrite: Vec<String>,
}

#[derive(Debug, Args)]
pub struct EnumHelpersArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_a_constants_invocation() {
        let cli = Cli::try_parse_from([
            "fieldgen",
            "constants",
            "--src",
            "model.rs",
            "--type",
            "User",
            "--tag",
            "json",
            "--unique-values",
        ])
        .unwrap();
        let Command::Constants(args) = cli.command else {
            panic!("expected constants");
        };
        assert_eq!(args.common.type_name, "User");
        assert_eq!(args.tag.as_deref(), Some("json"));
        assert!(args.unique_values);
    }

    #[test]
    fn accessor_modes_conflict() {
        assert!(
            Cli::try_parse_from([
                "fieldgen",
                "accessors",
                "--src",
                "m.rs",
                "--type",
                "U",
                "--getters-only",
                "--setters-only",
            ])
            .is_err()
        );
    }
}
