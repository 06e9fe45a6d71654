use std::fs;
use std::io::{self, IsTerminal};
use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::Table;
use tracing::info;

use campinfo_cli::pipeline::{ConvertRequest, ConvertResult, run_conversion};
use campinfo_model::{ConverterOptions, ImagesRoot, RatingCodeRule, RuleSet, Strictness};

use crate::cli::{ConvertArgs, RulesArgs};
use crate::progress::TracingObserver;
use crate::summary::apply_table_style;

pub fn run_convert(args: &ConvertArgs, show_progress: bool) -> Result<ConvertResult> {
    let images_root: ImagesRoot = args
        .images_root
        .parse()
        .with_context(|| format!("invalid images root '{}'", args.images_root))?;
    let mut rules = load_rules(args.rules.as_deref())?;
    if args.strict {
        rules = rules.with_strictness(Strictness::Error);
    }

    let options = ConverterOptions::new(&args.template, &args.data, images_root)
        .with_folder_column(&args.folder_column);
    info!(
        template = %options.template_file.display(),
        data = %options.data_file.display(),
        images_root = %options.images_root,
        folder_column = %options.folder_column,
        "starting conversion"
    );

    let request = ConvertRequest {
        options,
        rules,
        output_root: args.output_root.clone(),
        dry_run: args.dry_run,
        fix_bom: !args.no_bom_fix,
    };
    let observer = TracingObserver::new(show_progress && io::stderr().is_terminal());
    run_conversion(&request, &observer).with_context(|| {
        format!(
            "convert {} with {}",
            request.options.data_file.display(),
            request.options.template_file.display()
        )
    })
}

pub fn run_rules(args: &RulesArgs) -> Result<()> {
    let rules = load_rules(args.rules.as_deref())?;
    let mut table = Table::new();
    table.set_header(vec!["Rule", "Value"]);
    apply_table_style(&mut table);
    let rating_code = match rules.rating_code {
        RatingCodeRule::LastUnderscore => "two digits after last '_'".to_string(),
        RatingCodeRule::Offset { offset } => format!("two digits at offset {offset}"),
    };
    let strictness = match rules.strictness {
        Strictness::Warn => "warn and skip",
        Strictness::Error => "error",
    };
    let rows = [
        ("Rating prefix", rules.rating_prefix.clone()),
        ("Overall rating column", rules.overall_rating_column.clone()),
        ("Rating code", rating_code),
        ("Tab before rating", rules.rating_tab_prefix.to_string()),
        ("Multi-choice columns", rules.multi_choice_columns.join(", ")),
        ("Image extensions", rules.image_extensions.join(" ")),
        ("Sentinel images", rules.sentinel_images.join(", ")),
        ("Ignored columns", rules.ignored_columns.join(", ")),
        ("Label column", rules.label_column.clone()),
        ("Unrecognized columns", strictness.to_string()),
    ];
    for (name, value) in rows {
        table.add_row(vec![name.to_string(), value]);
    }
    println!("{table}");
    Ok(())
}

fn load_rules(path: Option<&Path>) -> Result<RuleSet> {
    let Some(path) = path else {
        return Ok(RuleSet::default());
    };
    let source =
        fs::read_to_string(path).with_context(|| format!("read rules {}", path.display()))?;
    RuleSet::from_toml_str(&source).with_context(|| format!("parse rules {}", path.display()))
}
