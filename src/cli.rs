use crate::document::{DocumentBuilder, SwaggerDocument};
use crate::extractor::extract_declarations;
use crate::model::{ModelBuilder, ModelRegistry};
use crate::operation::build_operation;
use crate::serializer::{serialize_json, serialize_yaml, write_to_file};
use crate::settings::Settings;
use crate::source::SourceScanner;
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{debug, info, warn};
use std::fs;
use std::path::PathBuf;

/// Generate Swagger documentation from epytext markup in Rust doc comments
#[derive(Parser, Debug)]
#[command(name = "docstring-swagger")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to the Rust project directory
    #[arg(value_name = "PROJECT_PATH")]
    pub project_path: PathBuf,

    /// Output format (json or yaml)
    #[arg(short = 'f', long = "format", value_enum, default_value = "json")]
    pub output_format: OutputFormat,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// JSON file with document settings
    #[arg(long = "settings", value_name = "FILE")]
    pub settings_path: Option<PathBuf>,

    /// Override a single setting, e.g. --set title="Widget API"
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub overrides: Vec<String>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if !args.project_path.is_dir() {
        anyhow::bail!(
            "Project path is not a directory: {}",
            args.project_path.display()
        );
    }

    info!("Project path: {}", args.project_path.display());
    info!("Output format: {:?}", args.output_format);
    match &args.output_path {
        Some(output) => info!("Output file: {}", output.display()),
        None => info!("Output: stdout"),
    }

    Ok(args)
}

/// Layers defaults, the settings file and `--set` overrides.
pub fn load_settings(args: &CliArgs) -> Result<Settings> {
    let mut settings = Settings::new();

    if let Some(path) = &args.settings_path {
        info!("Loading settings from {}", path.display());
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
        let value: serde_json::Value = serde_json::from_str(&content)
            .with_context(|| format!("Invalid JSON in settings file: {}", path.display()))?;
        settings.merge_json(value)?;
    }

    for assignment in &args.overrides {
        settings.merge_assignment(assignment)?;
    }

    Ok(settings)
}

/// Scans a project and assembles its document.
pub fn generate(args: &CliArgs, settings: &Settings) -> Result<SwaggerDocument> {
    info!("Scanning project directory...");
    let scan = SourceScanner::new(args.project_path.clone()).scan()?;
    info!("Parsed {} Rust files", scan.files.len());

    if scan.files.is_empty() {
        anyhow::bail!("No Rust files could be parsed in the project directory");
    }

    let extraction = extract_declarations(&scan.files);

    let mut registry = ModelRegistry::new();
    for model in extraction.models {
        match model {
            Ok(decl) => {
                ModelBuilder::new().decorate((), &decl.declaration, &mut registry);
            }
            Err(e) => warn!("Skipping model: {}", e),
        }
    }
    info!("Registered {} models", registry.len());

    let mut builder = DocumentBuilder::new(settings);
    let mut added = 0;
    for operation in extraction.operations {
        let decl = match operation {
            Ok(decl) => decl,
            Err(e) => {
                warn!("Skipping operation: {}", e);
                continue;
            }
        };
        let Some(path) = decl.path.as_deref() else {
            warn!(
                "Operation {} in {} has no path, leaving it out",
                decl.declaration.name,
                decl.file.display()
            );
            continue;
        };

        let descriptor = build_operation(&decl.declaration, decl.nickname.clone());
        if builder.add_operation(path, decl.method, &descriptor) {
            added += 1;
        }
    }
    info!("Documented {} operations", added);

    if added == 0 {
        warn!("No operations found in the project");
    }

    Ok(builder.build(&registry))
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    info!("Starting document generation...");

    let settings = load_settings(&args)?;
    let document = generate(&args, &settings)?;

    info!("Serializing to {:?} format...", args.output_format);
    let content = match args.output_format {
        OutputFormat::Json => serialize_json(&document)?,
        OutputFormat::Yaml => serialize_yaml(&document)?,
    };

    if let Some(output_path) = &args.output_path {
        info!("Writing output to: {}", output_path.display());
        write_to_file(&content, output_path)?;
    } else {
        println!("{}", content);
    }

    info!("Summary:");
    info!("  - Paths: {}", document.apis.len());
    info!("  - Models: {}", document.models.len());

    Ok(())
}
