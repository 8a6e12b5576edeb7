// src/cli/mod.rs
// Headless commands: fetch a template, export a filled template, resolve a field.

pub mod export;
pub mod fetch;
pub mod resolve;

use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::settings::api_key::{load_api_key, API_KEY_ENV_VAR};
use crate::templates::error::TemplateError;

#[derive(Parser)]
#[command(name = "sow_builder")]
#[command(about = "SOW Builder - statement of work editor with spreadsheet template export", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch a Google Sheets template and print its grid
    Fetch {
        /// Sheet URL or bare spreadsheet id
        sheet: String,
    },

    /// Fill a template from a saved form and mapping, write an .xlsx file
    Export {
        /// Form state JSON
        #[arg(long)]
        form: PathBuf,
        /// Template mapping state JSON
        #[arg(long)]
        state: PathBuf,
        /// Sheet URL or bare spreadsheet id
        #[arg(long)]
        template: String,
        /// Output directory
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },

    /// Print the value a field resolves to for a saved form
    Resolve {
        /// Form state JSON
        #[arg(long)]
        form: PathBuf,
        /// Field id, e.g. `process` or `roleHours.sa`
        field: String,
    },
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{path}: invalid JSON: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Google Sheets API key not set (set {0} or store one from the Settings view)")]
    MissingApiKey(&'static str),
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn require_api_key() -> Result<String, CliError> {
    load_api_key().ok_or(CliError::MissingApiKey(API_KEY_ENV_VAR))
}

/// Runs a subcommand to completion. Network commands get their own runtime.
pub fn run(command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Resolve { form, field } => resolve::run(&form, &field),
        Commands::Fetch { sheet } => {
            let api_key = require_api_key()?;
            block_on(fetch::run(api_key, &sheet))
        }
        Commands::Export { form, state, template, out } => {
            let api_key = require_api_key()?;
            block_on(export::run(api_key, &form, &state, &template, &out))
        }
    }
}

fn block_on<F: std::future::Future<Output = Result<(), CliError>>>(future: F) -> Result<(), CliError> {
    let runtime = tokio::runtime::Runtime::new().map_err(|source| CliError::Io {
        path: PathBuf::from("<tokio runtime>"),
        source,
    })?;
    runtime.block_on(future)
}
