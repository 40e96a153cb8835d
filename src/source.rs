//! Discovery and parsing of Rust source files.
//!
//! [`SourceScanner`] walks a project directory, skipping `target` and hidden
//! directories, and parses every `.rs` file it finds with `syn`. Files that
//! cannot be read or parsed are reported as warnings and skipped, so one broken
//! file does not stop documentation of the rest.

use anyhow::{Context, Result};
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A parsed Rust source file
#[derive(Debug)]
pub struct SourceFile {
    pub path: PathBuf,
    pub syntax_tree: syn::File,
}

impl SourceFile {
    /// Reads and parses a single file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid Rust.
    pub fn load(path: &Path) -> Result<SourceFile> {
        debug!("Parsing file: {}", path.display());
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;
        Self::parse(path, &content)
    }

    /// Parses in-memory source text attributed to `path`.
    pub fn parse(path: &Path, content: &str) -> Result<SourceFile> {
        let syntax_tree = syn::parse_file(content)
            .with_context(|| format!("Failed to parse Rust syntax in file: {}", path.display()))?;
        Ok(SourceFile {
            path: path.to_path_buf(),
            syntax_tree,
        })
    }
}

/// Outcome of scanning a project directory
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Successfully parsed files, in walk order
    pub files: Vec<SourceFile>,
    /// Problems encountered along the way
    pub warnings: Vec<String>,
}

/// Walks a project directory collecting parsed Rust files
pub struct SourceScanner {
    root_path: PathBuf,
}

impl SourceScanner {
    pub fn new(root_path: PathBuf) -> Self {
        Self { root_path }
    }

    /// Scans the directory tree and parses each `.rs` file.
    ///
    /// # Errors
    ///
    /// Returns an error if the root path does not exist.
    pub fn scan(&self) -> Result<ScanResult> {
        if !self.root_path.exists() {
            anyhow::bail!("Project path does not exist: {}", self.root_path.display());
        }

        let mut result = ScanResult::default();
        let walker = WalkDir::new(&self.root_path)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.path() == self.root_path || !is_ignored(e.file_name()));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let warning = format!("Failed to access path: {}", e);
                    warn!("{}", warning);
                    result.warnings.push(warning);
                    continue;
                }
            };

            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("rs") {
                continue;
            }

            match SourceFile::load(path) {
                Ok(file) => result.files.push(file),
                Err(e) => {
                    let warning = format!("Skipping {}: {:#}", path.display(), e);
                    warn!("{}", warning);
                    result.warnings.push(warning);
                }
            }
        }

        debug!(
            "Scanned {}: {} parsed, {} warnings",
            self.root_path.display(),
            result.files.len(),
            result.warnings.len()
        );
        Ok(result)
    }
}

fn is_ignored(name: &std::ffi::OsStr) -> bool {
    let name = name.to_string_lossy();
    name.starts_with('.') || name == "target"
}
