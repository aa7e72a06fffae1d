use std::time::Instant;

use anyhow::{Context, Result, anyhow};
use comfy_table::Table;
use tracing::{info, info_span};

use pricelist_core::{BatchCommitter, ImportJob, PipelineError};
use pricelist_ingest::read_grid_from_path;
use pricelist_map::{JsonTemplateStore, MappingEngine, TemplateError, TemplateStore};
use pricelist_cli::JsonCatalog;
use pricelist_cli::settings::{load_options, read_options};

use crate::cli::{ImportArgs, SourceArgs};
use crate::summary::print_suggestions;
use crate::types::ImportReport;

pub fn run_import(
    args: &ImportArgs,
    templates: &mut JsonTemplateStore,
    log_data: bool,
) -> Result<ImportReport> {
    let source = &args.source;
    let start = Instant::now();
    let options = load_options(source.config.as_deref(), source.threshold)?;
    let mut job = ImportJob::new(options)
        .with_read_options(read_options(source.delimiter, source.encoding.as_deref()))
        .with_overrides(args.map.iter().cloned())
        .with_row_logging(log_data);
    if let Some(name) = &args.template {
        let template = templates.load(name).map_err(template_error)?;
        job = job.with_template(template);
    }
    if let Some(column) = &args.price_column {
        job = job.with_price_column(column.clone());
    }
    for (field, value) in &args.defaults {
        job = job.with_default(*field, value.clone());
    }

    let mut catalog = JsonCatalog::open(&args.catalog)
        .with_context(|| format!("open catalog {}", args.catalog.display()))?;
    let preview = job
        .preview_path(&source.file, &catalog)
        .map_err(pipeline_error)?;

    let saved_template = match &args.save_template {
        Some(name) => {
            templates
                .save(&preview.to_template(name.as_str()))
                .map_err(template_error)?;
            Some(name.clone())
        }
        None => None,
    };

    let result = if args.dry_run {
        None
    } else {
        let committer = BatchCommitter::new(args.strategy);
        let result = job
            .commit(&preview, &mut catalog, &committer)
            .map_err(pipeline_error)?;
        if catalog.is_dirty() {
            catalog
                .save()
                .with_context(|| format!("save catalog {}", args.catalog.display()))?;
        }
        Some(result)
    };

    info!(
        file = %source.file.display(),
        dry_run = args.dry_run,
        duration_ms = start.elapsed().as_millis(),
        "import complete"
    );
    Ok(ImportReport {
        file: source.file.clone(),
        catalog: args.catalog.clone(),
        preview,
        result,
        saved_template,
        all_rows: args.all_rows,
    })
}

pub fn run_suggest(args: &SourceArgs) -> Result<()> {
    let options = load_options(args.config.as_deref(), args.threshold)?;
    let job = ImportJob::new(options);
    let read = read_options(args.delimiter, args.encoding.as_deref());
    let span = info_span!("suggest", path = %args.file.display());
    let _guard = span.enter();
    let grid = read_grid_from_path(&args.file, &read)
        .with_context(|| format!("read {}", args.file.display()))?;
    let layout = job.layout(&grid);
    let schema = &job.options().schema;
    let result = MappingEngine::new(schema.clone(), job.options().threshold).suggest(&layout.headers);
    print_suggestions(layout.format, &layout.headers, schema, &result);
    Ok(())
}

pub fn run_templates_list(templates: &JsonTemplateStore) -> Result<()> {
    let names = templates.list().map_err(template_error)?;
    if names.is_empty() {
        println!("No templates in {}", templates.path().display());
        return Ok(());
    }
    let mut table = Table::new();
    table.set_header(vec!["Template", "Format", "Fields", "Saved"]);
    for name in names {
        let template = templates.load(&name).map_err(template_error)?;
        table.add_row(vec![
            name,
            template.source_format.to_string(),
            template.column_mapping.len().to_string(),
            template.saved_at.unwrap_or_else(|| "-".to_string()),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_templates_show(templates: &JsonTemplateStore, name: &str) -> Result<()> {
    let template = templates.load(name).map_err(template_error)?;
    let json = serde_json::to_string_pretty(&template).context("serialize template")?;
    println!("{json}");
    Ok(())
}

fn template_error(error: TemplateError) -> anyhow::Error {
    match error.suggestion() {
        Some(hint) => anyhow!("{}\nhint: {hint}", error.user_message()),
        None => anyhow::Error::new(error),
    }
}

fn pipeline_error(error: PipelineError) -> anyhow::Error {
    match error {
        PipelineError::MappingIncomplete(incomplete) => {
            let hint = incomplete.suggestion();
            anyhow!("{incomplete}\nhint: {hint}")
        }
        other => anyhow::Error::new(other),
    }
}
