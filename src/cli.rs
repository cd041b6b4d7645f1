//! Minimal CLI: validate documents against a schema, or print a schema in
//! canonical form.
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use json_contract::{Schema, ValidationConfig, ValidationResult, apply_strict_mode};
use rayon::prelude::*;
use serde_json::Value;
use tracing::{debug, info};

use crate::logging::{LogFormat, LogLevel};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// validate JSON/NDJSON documents against a JSON Schema, or normalize a schema
#[derive(Parser, Debug)]
#[command(name = "json-contract", version)]
pub struct CommandLineInterface {
    /// log output format (stderr)
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// minimum log level (stderr)
    #[arg(long, value_name = "LEVEL", default_value = "warn", global = true)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// validate every input document and report errors per document
    Validate(ValidateCmd),
    /// print the canonical JSON Schema document for a schema file
    Schema(SchemaCmd),
}

#[derive(Args, Debug, Clone)]
struct SchemaSettings {
    /// JSON Schema file
    #[arg(long, short)]
    schema: PathBuf,

    /// close every object that declares properties (`additionalProperties: false`)
    #[arg(long, default_value_t = false)]
    strict: bool,
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// treat input as newline-delimited JSON (NDJSON)
    #[arg(long, default_value_t = false)]
    ndjson: bool,

    /// JSON Pointer to select a subnode in each document (e.g. /data/items/0/payload)
    #[arg(long)]
    json_pointer: Option<String>,

    /// JQ pre-process filter for each document; every output is validated
    #[arg(long)]
    jq_expr: Option<String>,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct ValidateCmd {
    #[command(flatten)]
    schema_settings: SchemaSettings,

    #[command(flatten)]
    input_settings: InputSettings,

    /// treat `format` as an annotation only
    #[arg(long, default_value_t = false)]
    no_formats: bool,
}

#[derive(clap::Parser, Debug)]
struct SchemaCmd {
    #[command(flatten)]
    schema_settings: SchemaSettings,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

/// One document to validate, labelled for the report.
#[derive(Debug)]
struct Document {
    label: String,
    value: Value,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl SchemaSettings {
    fn load(&self) -> Result<Schema> {
        let path = &self.schema;
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read schema file {}", path.display()))?;
        let doc = serde_json::from_str::<Value>(&source)
            .with_context(|| format!("failed to parse schema file {}", path.display()))?;
        let mut schema = Schema::from_json_schema(&doc)
            .with_context(|| format!("unsupported schema in {}", path.display()))?;
        if self.strict {
            apply_strict_mode(&mut schema);
        }
        debug!(path = %path.display(), kind = schema.kind_name(), strict = self.strict, "schema loaded");
        Ok(schema)
    }
}

impl InputSettings {
    fn load_documents(&self) -> Result<Vec<Document>> {
        let source_paths = resolve_file_path_patterns(&self.input)?;
        let mut out = Vec::new();
        for source_path in source_paths {
            let source = std::fs::read_to_string(&source_path)
                .with_context(|| format!("failed to read input file {}", source_path.display()))?;
            let label = source_path.display().to_string();
            if self.ndjson {
                for (i, line) in source.lines().enumerate() {
                    if line.trim().is_empty() {
                        continue;
                    }
                    let value = serde_json::from_str::<Value>(line)
                        .with_context(|| format!("failed to parse {label} line {}", i + 1))?;
                    self.push_selected(&mut out, format!("{label}:{}", i + 1), value)?;
                }
            } else {
                let value = serde_json::from_str::<Value>(&source)
                    .with_context(|| format!("failed to parse JSON source file ({label})"))?;
                self.push_selected(&mut out, label, value)?;
            }
        }
        info!(documents = out.len(), "inputs loaded");
        Ok(out)
    }

    /// Applies `--json-pointer` then `--jq-expr`.
    fn push_selected(&self, out: &mut Vec<Document>, label: String, value: Value) -> Result<()> {
        let value = match self.json_pointer.as_deref() {
            None => value,
            Some(pointer) => match value.pointer(pointer) {
                Some(node) => node.clone(),
                None => bail!("{label}: JSON pointer {pointer} matches nothing"),
            },
        };
        match self.jq_expr.as_deref() {
            None => out.push(Document { label, value }),
            Some(jq_expr) => {
                let results = crate::jq_exec::run_jaq(jq_expr, &value)
                    .with_context(|| format!("failed to apply jq expression to {label}"))?;
                for (k, value) in results.into_iter().enumerate() {
                    out.push(Document { label: format!("{label}[{k}]"), value });
                }
            }
        }
        Ok(())
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> Result<ExitCode> {
        match &self.cmd {
            Command::Validate(target) => target.run(),
            Command::Schema(target) => target.run(),
        }
    }
}

impl ValidateCmd {
    fn run(&self) -> Result<ExitCode> {
        let schema = self.schema_settings.load()?;
        let documents = self.input_settings.load_documents()?;
        let config = ValidationConfig { assert_formats: !self.no_formats };

        // order-preserving: reports come out in input order
        let results: Vec<ValidationResult> =
            documents.par_iter().map(|doc| schema.validate_with(&doc.value, config)).collect();

        let mut invalid = 0usize;
        for (doc, result) in documents.iter().zip(&results) {
            if result.is_valid() {
                println!("{} {}", "✓".green().bold(), doc.label);
            } else {
                invalid += 1;
                println!("{} {}", "✗".red().bold(), doc.label);
                for error in result.errors() {
                    println!("    {error}");
                }
            }
        }
        let valid = documents.len() - invalid;
        let summary = format!("{valid} valid, {invalid} invalid");
        if invalid == 0 {
            eprintln!("{}", summary.green());
            Ok(ExitCode::SUCCESS)
        } else {
            eprintln!("{}", summary.red());
            Ok(ExitCode::from(1))
        }
    }
}

impl SchemaCmd {
    fn run(&self) -> Result<ExitCode> {
        let schema = self.schema_settings.load()?;
        let schema_src = serde_json::to_string_pretty(&schema.to_json_schema_document())?;
        match self.out.as_ref() {
            Some(out) => write_output(out, &schema_src)?,
            None => println!("{schema_src}"),
        }
        Ok(ExitCode::SUCCESS)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn write_output(out: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(out, contents).with_context(|| format!("failed to write {}", out.display()))
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'['))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern).with_context(|| format!("invalid glob pattern: {pattern}"))? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}
