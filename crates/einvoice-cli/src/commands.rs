use std::path::Path;

use anyhow::{Context, Result, bail};
use einvoice_engine::{DisplayLine, Engine, EngineConfig, ValidationPresenter};
use einvoice_schema::{FsSchemaLoader, load_schema_file};
use tracing::{info, info_span, trace};

use crate::cli::{CountriesArgs, ErrorsArgs, FormArgs, OutputFormatArg};
use crate::logging::redact_value;
use crate::render::{errors_table, fields_table, removed_table, session_json, summary_table};

/// Engine configuration from the config file plus command-line overrides.
pub fn engine_config(args: &FormArgs) -> Result<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::from_json_file(path)
            .with_context(|| format!("read engine config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(policy) = args.numeric_policy {
        config = config.with_numeric_policy(policy.into());
    }
    if let Some(dir) = &args.schema_dir {
        config = config.with_schema_dir(Some(dir.clone()));
    }
    Ok(config)
}

/// Load the requested schema and apply `--remove` and `--set` in order.
pub fn build_engine(args: &FormArgs) -> Result<Engine> {
    let config = engine_config(args)?;
    let mut engine = Engine::new(config);

    match (&args.schema, &args.country) {
        (Some(path), _) => {
            let schema = load_schema_file(path)
                .with_context(|| format!("load schema {}", path.display()))?;
            engine.load_document(schema);
        }
        (None, Some(country)) => {
            let loader = engine.config().schema_loader();
            engine
                .load(&loader, country.clone())
                .with_context(|| format!("load schema for {country}"))?;
        }
        (None, None) => bail!("either --schema or --country is required"),
    }

    for key in &args.remove {
        engine
            .remove_optional_field(key)
            .with_context(|| format!("remove field {key}"))?;
    }
    for (key, raw) in &args.set {
        engine
            .set_input(key, raw)
            .with_context(|| format!("set field {key}"))?;
        trace!(key = %key, value = redact_value(raw), "Applied input");
    }
    Ok(engine)
}

pub fn run_fields(args: &FormArgs) -> Result<()> {
    let span = info_span!("fields");
    let _guard = span.enter();
    let engine = build_engine(args)?;
    match args.format {
        OutputFormatArg::Json => {
            let json = serde_json::to_string_pretty(&session_json(&engine))
                .context("serialize fields")?;
            println!("{json}");
        }
        OutputFormatArg::Table => {
            if let Some(country) = engine.country() {
                println!("Country: {country}");
            }
            println!("{}", fields_table(&engine.field_views()));
            let removed = engine.removed_fields();
            if !removed.is_empty() {
                println!();
                println!("{}", removed_table(&removed));
            }
            println!();
            println!("{}", summary_table(&engine.summary()));
        }
    }
    Ok(())
}

pub fn run_payload(args: &FormArgs) -> Result<()> {
    let span = info_span!("payload");
    let _guard = span.enter();
    let engine = build_engine(args)?;
    let json = serde_json::to_string_pretty(engine.payload()).context("serialize payload")?;
    println!("{json}");
    info!(keys = engine.payload().len(), "Payload built");
    Ok(())
}

/// Print presented errors. Returns the number of lines shown.
pub fn run_errors(args: &ErrorsArgs) -> Result<usize> {
    let lines = present_file(&args.file)?;
    match args.format {
        OutputFormatArg::Json => {
            let json = serde_json::to_string_pretty(&lines).context("serialize errors")?;
            println!("{json}");
        }
        OutputFormatArg::Table if lines.is_empty() => println!("No validation errors."),
        OutputFormatArg::Table => println!("{}", errors_table(&lines)),
    }
    Ok(lines.len())
}

pub fn present_file(path: &Path) -> Result<Vec<DisplayLine>> {
    let body = std::fs::read_to_string(path)
        .with_context(|| format!("read error file {}", path.display()))?;
    ValidationPresenter::present_json(&body)
        .with_context(|| format!("parse error file {}", path.display()))
}

pub fn run_countries(args: &CountriesArgs) -> Result<()> {
    let loader = match &args.schema_dir {
        Some(dir) => FsSchemaLoader::new(dir),
        None => FsSchemaLoader::from_env(),
    };
    let countries = loader
        .available_countries()
        .with_context(|| format!("list schemas in {}", loader.root().display()))?;
    if countries.is_empty() {
        println!("No schemas found in {}", loader.root().display());
    }
    for country in countries {
        println!("{country}\t{}", loader.path_for(&country).display());
    }
    Ok(())
}
