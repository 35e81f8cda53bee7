//! Argument parsing, engine setup and rendering for the `einvoice` binary.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use einvoice_cli::cli::{Cli, Command, FormArgs, OutputFormatArg, parse_assignment};
use einvoice_cli::commands::{build_engine, engine_config, present_file};
use einvoice_cli::render::{errors_table, fields_table, session_json, summary_table};
use einvoice_engine::NumericPolicy;
use einvoice_model::FieldValue;

fn schema_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../schemas")
}

fn form_args(extra: &[&str]) -> FormArgs {
    let dir = schema_dir();
    let mut argv = vec![
        "einvoice",
        "fields",
        "--country",
        "my",
        "--schema-dir",
        dir.to_str().unwrap(),
    ];
    argv.extend_from_slice(extra);
    match Cli::try_parse_from(argv).unwrap().command {
        Command::Fields(args) => args,
        _ => panic!("expected fields command"),
    }
}

#[test]
fn parse_assignment_splits_on_first_equals() {
    assert_eq!(
        parse_assignment("Note=a=b").unwrap(),
        ("Note".to_string(), "a=b".to_string())
    );
    assert_eq!(
        parse_assignment("Note=").unwrap(),
        ("Note".to_string(), String::new())
    );
    assert!(parse_assignment("Note").is_err());
    assert!(parse_assignment("=x").is_err());
}

#[test]
fn form_requires_a_schema_source() {
    assert!(Cli::try_parse_from(["einvoice", "fields"]).is_err());
    assert!(Cli::try_parse_from(["einvoice", "fields", "--country", "M1"]).is_err());
    assert!(Cli::try_parse_from(["einvoice", "payload", "--schema", "MY.json"]).is_ok());
}

#[test]
fn flags_override_config() {
    let temp = tempfile::tempdir().unwrap();
    let config_path = temp.path().join("engine.json");
    fs::write(&config_path, r#"{"numeric-policy": "zero"}"#).unwrap();

    let args = form_args(&["--config", config_path.to_str().unwrap()]);
    assert_eq!(engine_config(&args).unwrap().numeric_policy, NumericPolicy::Zero);

    let args = form_args(&[
        "--config",
        config_path.to_str().unwrap(),
        "--numeric-policy",
        "keep-raw",
        "--format",
        "json",
    ]);
    let config = engine_config(&args).unwrap();
    assert_eq!(config.numeric_policy, NumericPolicy::KeepRaw);
    assert_eq!(config.schema_dir, Some(schema_dir()));
    assert_eq!(args.format, OutputFormatArg::Json);
}

#[test]
fn build_engine_applies_removals_then_inputs() {
    let args = form_args(&[
        "--remove",
        "Note",
        "--remove",
        "PostalZone",
        "--set",
        "ID=INV-0001",
        "--set",
        "PayableAmount=1060.00",
    ]);
    let engine = build_engine(&args).unwrap();

    assert_eq!(engine.country().map(ToString::to_string).as_deref(), Some("MY"));
    assert!(!engine.payload().contains_key("Note"));
    assert!(!engine.payload().contains_key("PostalZone"));
    assert_eq!(engine.payload().get("ID"), Some(&FieldValue::from("INV-0001")));
    assert_eq!(
        engine.payload().get("PayableAmount"),
        Some(&FieldValue::Number(1060.0))
    );
    assert_eq!(engine.summary().removed, 2);
}

#[test]
fn build_engine_reports_bad_input() {
    let err = build_engine(&form_args(&["--remove", "ID"])).unwrap_err();
    assert!(format!("{err:#}").contains("remove field ID"));

    let err = build_engine(&form_args(&["--set", "TaxAmount=ten"])).unwrap_err();
    assert!(format!("{err:#}").contains("Invalid number for TaxAmount"));

    let temp = tempfile::tempdir().unwrap();
    let args = match Cli::try_parse_from([
        "einvoice",
        "fields",
        "--country",
        "SG",
        "--schema-dir",
        temp.path().to_str().unwrap(),
    ])
    .unwrap()
    .command
    {
        Command::Fields(args) => args,
        _ => panic!("expected fields command"),
    };
    let err = build_engine(&args).unwrap_err();
    assert!(format!("{err:#}").contains("load schema for SG"));
}

#[test]
fn schema_file_source_skips_country_lookup() {
    let path = schema_dir().join("MY.json");
    let cli = Cli::try_parse_from(["einvoice", "payload", "--schema", path.to_str().unwrap()])
        .unwrap();
    let Command::Payload(args) = cli.command else {
        panic!("expected payload command");
    };
    let engine = build_engine(&args).unwrap();
    assert!(engine.country().is_none());
    assert_eq!(engine.payload().len(), 17);
}

#[test]
fn tables_render_engine_state() {
    let engine = build_engine(&form_args(&["--remove", "Note"])).unwrap();

    let fields = fields_table(&engine.field_views()).to_string();
    assert!(fields.contains("DocumentCurrencyCode"));
    assert!(fields.contains("select (2)"));
    assert!(fields.contains("MYR"));
    assert!(!fields.contains("SignatureMethod"));

    let summary = summary_table(&engine.summary()).to_string();
    assert!(summary.contains("Excluded types"));

    let json = session_json(&engine);
    assert_eq!(json["country"], "MY");
    assert_eq!(json["summary"]["fields"], 16);
    assert_eq!(json["removed"][0]["field_key"], "Note");
    assert_eq!(json["fields"][0]["kind"], "text");
    assert_eq!(json["fields"][3]["kind"], "select");
    assert_eq!(json["fields"][3]["options"][0]["code"], "MYR");
}

#[test]
fn error_file_is_presented() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("errors.json");
    fs::write(
        &path,
        r#"{"Invoice|LineItem|TaxType|TaxNameType": ["is required"], "Invoice|ID": ["is blank"]}"#,
    )
    .unwrap();

    let lines = present_file(&path).unwrap();
    let rendered: Vec<String> = lines.iter().map(ToString::to_string).collect();
    insta::assert_json_snapshot!(rendered, @r#"
    [
      "is required (Invoice, LineItem)",
      "is blank"
    ]
    "#);
    assert!(errors_table(&lines).to_string().contains("Invoice|ID"));

    fs::write(&path, "not json").unwrap();
    assert!(present_file(&path).is_err());
}
