//! dto-openapi CLI
//!
//! Command-line interface for generating OpenAPI request schemas from
//! normalized DTO type metadata.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use dto_openapi::{
    generate, load_metadata, GenerationReport, GeneratorConfig, NamingStrategy,
};

#[derive(Parser)]
#[command(name = "dto-openapi")]
#[command(about = "Generate OpenAPI request schemas from DTO type metadata")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the document fragment for a metadata file
    Generate {
        /// Metadata file (classes + endpoints) to generate from
        metadata: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,

        /// Class identity of the file-upload marker type
        #[arg(long)]
        upload_class: Option<String>,

        /// Use fully qualified reference names instead of short names
        #[arg(long)]
        qualified_names: bool,

        /// JSON file with error-response templates keyed by status code
        #[arg(long)]
        error_responses: Option<PathBuf>,
    },

    /// Check a metadata file: report per-endpoint generation status
    Check {
        /// Metadata file to check
        metadata: PathBuf,

        /// Output format: text (default) or json
        #[arg(long, default_value = "text")]
        format: String,

        /// Class identity of the file-upload marker type
        #[arg(long)]
        upload_class: Option<String>,

        /// Use fully qualified reference names instead of short names
        #[arg(long)]
        qualified_names: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate {
            metadata,
            output,
            pretty,
            upload_class,
            qualified_names,
            error_responses,
        } => run_generate(GenerateArgs {
            metadata,
            output,
            pretty,
            upload_class,
            qualified_names,
            error_responses,
        }),

        Commands::Check {
            metadata,
            format,
            upload_class,
            qualified_names,
        } => run_check(&metadata, &format, upload_class, qualified_names),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

struct GenerateArgs {
    metadata: PathBuf,
    output: Option<PathBuf>,
    pretty: bool,
    upload_class: Option<String>,
    qualified_names: bool,
    error_responses: Option<PathBuf>,
}

fn build_config(
    upload_class: Option<String>,
    qualified_names: bool,
    error_responses: Option<&Path>,
) -> Result<GeneratorConfig, u8> {
    let mut config = GeneratorConfig {
        file_upload_class: upload_class,
        ..GeneratorConfig::default()
    };
    if qualified_names {
        config.naming = NamingStrategy::FullyQualified;
    }

    if let Some(path) = error_responses {
        let content = std::fs::read_to_string(path).map_err(|e| {
            eprintln!("Error reading {}: {}", path.display(), e);
            3u8
        })?;
        let value: serde_json::Value = serde_json::from_str(&content).map_err(|e| {
            eprintln!("Error parsing {}: {}", path.display(), e);
            2u8
        })?;
        match value {
            serde_json::Value::Object(map) => config.error_responses = map,
            _ => {
                eprintln!(
                    "Error: {} must contain a JSON object keyed by status code",
                    path.display()
                );
                return Err(2);
            }
        }
    }

    Ok(config)
}

fn run_generate(args: GenerateArgs) -> Result<(), u8> {
    let metadata = load_metadata(&args.metadata).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    let config = build_config(
        args.upload_class,
        args.qualified_names,
        args.error_responses.as_deref(),
    )?;

    let report = generate(&metadata, config);

    for failure in &report.failures {
        eprintln!("Error in {}: {}", failure.endpoint, failure.message);
    }

    let json_output = if args.pretty {
        serde_json::to_string_pretty(&report.document)
    } else {
        serde_json::to_string(&report.document)
    }
    .map_err(|e| {
        eprintln!("Error serializing output: {}", e);
        2u8
    })?;

    match args.output {
        Some(path) => {
            std::fs::write(&path, &json_output).map_err(|e| {
                eprintln!("Error writing to {}: {}", path.display(), e);
                3u8
            })?;
        }
        None => {
            println!("{}", json_output);
        }
    }

    if report.is_ok() {
        Ok(())
    } else {
        Err(1)
    }
}

fn run_check(
    metadata_path: &Path,
    format: &str,
    upload_class: Option<String>,
    qualified_names: bool,
) -> Result<(), u8> {
    let metadata = load_metadata(metadata_path).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    let config = build_config(upload_class, qualified_names, None)?;
    let endpoint_count = metadata.endpoints.len();
    let report = generate(&metadata, config);

    if format == "json" {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).unwrap_or_else(|_| String::from("{}"))
        );
    } else {
        print_check_report(metadata_path, endpoint_count, &report);
    }

    if report.is_ok() {
        Ok(())
    } else {
        Err(1)
    }
}

fn print_check_report(path: &Path, endpoint_count: usize, report: &GenerationReport) {
    println!("Checking {} ...\n", path.display());

    for failure in &report.failures {
        println!(
            "  \x1b[31m✗\x1b[0m {}: {}",
            failure.endpoint, failure.message
        );
    }

    let failed = report.failures.len();
    let passed = endpoint_count - failed;
    println!();
    if report.is_ok() {
        println!(
            "\x1b[32m✓ {} endpoints checked, all passed\x1b[0m",
            endpoint_count
        );
    } else {
        println!(
            "\x1b[31m✗ {} endpoints checked: {} passed, {} failed\x1b[0m",
            endpoint_count, passed, failed
        );
    }
}
