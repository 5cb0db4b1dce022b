//! Orchestration: one function per subcommand wiring sources → model →
//! synthesizers → output.

use anyhow::{Context, bail};
use std::collections::BTreeSet;
use std::path::PathBuf;
use tracing::debug;

use fieldgen_expr::Template;
use fieldgen_gen::prelude::*;
use fieldgen_ir::prelude::*;

use crate::cli::{
    AccessorsArgs, AsMapArgs, BuilderArgs, CasingArg, Cli, Command, CommonArgs, ConstantsArgs,
    EnumHelpersArgs, GuardModeArg, KeyPolicyArg, NewArgs,
};
use crate::output::write_output;

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Constants(args) => constants(args),
        Command::Accessors(args) => accessors(args),
        Command::Builder(args) => builder(args),
        Command::New(args) => new(args),
        Command::AsMap(args) => as_map(args),
        Command::EnumHelpers(args) => enum_helpers(args),
    }
}

fn constants(args: ConstantsArgs) -> anyhow::Result<()> {
    let files = load_files(&args.common.src)?;
    let (arena, id) = ModelBuilder::new(&files).build(&args.common.type_name)?;

    let value_template = match (&args.value_template, &args.tag) {
        (Some(template), _) => Template::parse(template)?,
        (None, Some(tag)) => Template::parse(&format!("tag.{tag}"))?,
        (None, None) => bail!("either --value-template or --tag is required"),
    };
    let spec = ConstSpec {
        name_template: parse_optional(&args.name_template)?,
        value_template,
        include_template: parse_optional(&args.include_template)?,
        casing: match args.casing {
            CasingArg::Screaming => ConstCasing::Screaming,
            CasingArg::Camel => ConstCasing::Camel,
        },
        flatten: to_set(args.select.flat),
        exclude: to_set(args.select.exclude),
        unique_values: args.unique_values,
    };

    let consts = synthesize(&arena, id, &spec)?;
    debug!(count = consts.len(), "constants synthesized");
    let mut out = OutputBuilder::new();
    out.add_const_block(emit_const_block(
        &consts,
        visibility(args.common.private),
        None,
    ));
    finish(&args.common, arena[id].module_path.as_deref(), out)
}

fn accessors(args: AccessorsArgs) -> anyhow::Result<()> {
    let files = load_files(&args.common.src)?;
    let (arena, id) = ModelBuilder::new(&files).build(&args.common.type_name)?;
    let spec = AccessorSpec {
        visibility: visibility(args.common.private),
        guard_mode: guard_mode(args.guard_mode),
        getters: !args.setters_only,
        setters: !args.getters_only,
        flatten: to_set(args.select.flat),
        exclude: to_set(args.select.exclude),
    };
    let mut out = OutputBuilder::new();
    fieldgen_gen::accessors::generate(&arena, id, &spec, &mut out)?;
    finish(&args.common, arena[id].module_path.as_deref(), out)
}

fn builder(args: BuilderArgs) -> anyhow::Result<()> {
    let files = load_files(&args.common.src)?;
    let (arena, id) = ModelBuilder::new(&files).build(&args.common.type_name)?;
    let spec = BuilderSpec {
        visibility: visibility(args.common.private),
        flatten: to_set(args.select.flat),
        exclude: to_set(args.select.exclude),
    };
    let mut out = OutputBuilder::new();
    fieldgen_gen::builder::generate(&arena, id, &spec, &mut out)?;
    finish(&args.common, arena[id].module_path.as_deref(), out)
}

fn new(args: NewArgs) -> anyhow::Result<()> {
    let files = load_files(&args.common.src)?;
    let (arena, id) = ModelBuilder::new(&files).build(&args.common.type_name)?;
    let spec = CtorSpec {
        visibility: visibility(args.common.private),
        required: to_set(args.required),
        flatten: to_set(args.select.flat),
        exclude: to_set(args.select.exclude),
    };
    let mut out = OutputBuilder::new();
    fieldgen_gen::ctor::generate(&arena, id, &spec, &mut out)?;
    finish(&args.common, arena[id].module_path.as_deref(), out)
}

fn as_map(args: AsMapArgs) -> anyhow::Result<()> {
    let files = load_files(&args.common.src)?;
    let (arena, id) = ModelBuilder::new(&files).build(&args.common.type_name)?;
    let spec = AsMapSpec {
        visibility: visibility(args.common.private),
        guard_mode: guard_mode(args.guard_mode),
        key_policy: match args.key_policy {
            KeyPolicyArg::StripOptions => KeyPolicy::StripOptions,
            KeyPolicyArg::Raw => KeyPolicy::Raw,
        },
        tag: args.tag,
        flatten: to_set(args.select.flat),
        exclude: to_set(args.select.exclude),
        rewriter: CodeRewriter::parse(&args.rewrite)?,
    };
    let mut out = OutputBuilder::new();
    fieldgen_gen::asmap::generate(&arena, id, &spec, &mut out)?;
    finish(&args.common, arena[id].module_path.as_deref(), out)
}

fn enum_helpers(args: EnumHelpersArgs) -> anyhow::Result<()> {
    let files = load_files(&args.common.src)?;
    let spec = EnumHelperSpec {
        visibility: visibility(args.common.private),
        type_name: args.common.type_name.clone(),
    };
    let mut out = OutputBuilder::new();
    fieldgen_gen::enums::generate(&files, &spec, &mut out)?;
    finish(&args.common, None, out)
}

fn finish(
    common: &CommonArgs,
    module_path: Option<&str>,
    out: OutputBuilder,
) -> anyhow::Result<()> {
    let tokens = out.finish();
    write_output(common.out.as_deref(), module_path, &tokens)?;
    Ok(())
}

fn load_files(paths: &[PathBuf]) -> anyhow::Result<Vec<syn::File>> {
    paths
        .iter()
        .map(|path| {
            let source = std::fs::read_to_string(path)
                .with_context(|| format!("reading `{}`", path.display()))?;
            syn::parse_file(&source).with_context(|| format!("parsing `{}`", path.display()))
        })
        .collect()
}

fn parse_optional(template: &Option<String>) -> anyhow::Result<Option<Template>> {
    Ok(match template {
        Some(src) => Some(Template::parse(src)?),
        None => None,
    })
}

fn to_set(values: Vec<String>) -> BTreeSet<String> {
    values.into_iter().collect()
}

fn visibility(private: bool) -> Visibility {
    if private {
        Visibility::Private
    } else {
        Visibility::Export
    }
}

fn guard_mode(mode: GuardModeArg) -> GuardMode {
    match mode {
        GuardModeArg::Flat => GuardMode::Flat,
        GuardModeArg::Alias => GuardMode::Alias,
    }
}
