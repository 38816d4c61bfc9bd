//! Command-line driver: validate JSON read from stdin against a set of
//! schema files.

use clap::{Parser, ValueEnum};
use failure::Error;
use json_validate::{Registry, SerdeSchema, Validator};
use serde::Serialize;
use serde_json::Value;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process::ExitCode;
use url::Url;

/// Validate JSON data against a JSON Validate schema.
///
/// Builds a registry from the given schema files, reads instances from
/// standard input as a stream of JSON values, and prints one record per
/// validation error. The exit status is nonzero if any instance failed
/// validation, or if setup failed.
#[derive(Parser, Debug)]
#[command(name = "validate-json", version)]
struct Cli {
    /// Suppress error output; the exit status still reports failures.
    #[arg(short, long)]
    quiet: bool,

    /// URI of the schema to validate against. Defaults to the schema that
    /// does not declare an "id".
    #[arg(short = 'u', long = "schema-uri")]
    schema_uri: Option<String>,

    /// How to format validation errors.
    #[arg(short, long, value_enum, default_value_t = Format::String)]
    format: Format,

    /// Paths of the schema files making up the registry. Order does not
    /// matter.
    #[arg(required = true)]
    schemas: Vec<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
enum Format {
    /// One human-oriented line per error.
    String,
    /// One JSON object per error, one per line.
    Json,
}

#[derive(Serialize)]
struct ErrorRecord<'a> {
    instance: usize,

    #[serde(rename = "instancePath")]
    instance_path: String,

    #[serde(rename = "schemaPath")]
    schema_path: String,

    #[serde(rename = "schemaURI")]
    schema_uri: &'a str,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<bool, Error> {
    let mut serde_schemas = Vec::with_capacity(cli.schemas.len());
    for path in &cli.schemas {
        let file = File::open(path)?;
        let serde_schema: SerdeSchema = serde_json::from_reader(BufReader::new(file))?;
        serde_schemas.push(serde_schema);
    }

    let registry = Registry::build(serde_schemas)?;
    let validator = Validator::new(&registry);

    let schema_uri = match cli.schema_uri.as_deref() {
        Some("") | None => None,
        Some(uri) => Some(Url::parse(uri)?),
    };

    let stdin = io::stdin();
    let stream = serde_json::Deserializer::from_reader(stdin.lock()).into_iter::<Value>();

    let mut all_valid = true;
    for (index, instance) in stream.enumerate() {
        let instance = instance?;
        let errors = validator.validate_by_uri(&schema_uri, &instance)?;

        if !errors.is_empty() {
            all_valid = false;
        }

        if cli.quiet {
            continue;
        }

        for error in &errors {
            let uri = error.schema_uri().as_ref().map(Url::as_str).unwrap_or("");

            match cli.format {
                Format::String => println!(
                    "{}: error at: {:?} (due to {:?}) (schema id: {:?})",
                    index,
                    error.instance_path().to_string(),
                    error.schema_path().to_string(),
                    uri,
                ),
                Format::Json => {
                    let record = ErrorRecord {
                        instance: index,
                        instance_path: error.instance_path().to_string(),
                        schema_path: error.schema_path().to_string(),
                        schema_uri: uri,
                    };

                    println!("{}", serde_json::to_string(&record)?);
                }
            }
        }
    }

    Ok(all_valid)
}
