//! docstring-swagger - Command-line tool for generating Swagger documentation.
//!
//! Scans a Rust project for functions marked `#[operation(...)]` and structs
//! marked `#[model]`, reads the epytext-style markup in their doc comments and
//! writes the assembled document as JSON or YAML.
//!
//! # Usage
//!
//! ```bash
//! docstring-swagger [OPTIONS] <PROJECT_PATH>
//! ```
//!
//! # Examples
//!
//! Write JSON to a file:
//! ```bash
//! docstring-swagger ./my-api -o swagger.json
//! ```
//!
//! YAML with overridden settings:
//! ```bash
//! docstring-swagger ./my-api -f yaml --set title="Widget API" --set base_url=/v1
//! ```

use anyhow::Result;
use clap::Parser;
use docstring_swagger::cli;
use log::info;

fn main() -> Result<()> {
    let args = cli::CliArgs::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("docstring-swagger starting...");

    let args = cli::parse_args_from_parsed(args)?;
    cli::run(args)?;

    info!("Document generation completed successfully");

    Ok(())
}
