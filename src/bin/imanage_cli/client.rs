#![deny(clippy::all, clippy::pedantic)]

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use imanage::api::{ApiClient, ApiError, Session};
use imanage::application::Console;
use imanage::config::{self, LoadError, Settings};
use imanage::domain::error::DomainError;
use imanage::infra::error::InfraError;
use thiserror::Error;

use crate::args::Cli;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] LoadError),
    #[error("failed to initialize logging: {0}")]
    Telemetry(#[from] InfraError),
    #[error("failed to read token file: {0}")]
    TokenFile(std::io::Error),
    #[error("failed to write token file {path}: {source}")]
    TokenWrite {
        path: String,
        source: std::io::Error,
    },
    #[error("token file is required to store a session (use --token-file or IMANAGE_TOKEN_FILE)")]
    MissingTokenFile,
    #[error("failed to read input file {path}: {source}")]
    InputFile {
        path: String,
        source: std::io::Error,
    },
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("{0}")]
    Domain(#[from] DomainError),
    #[error("{0} not found")]
    NotFound(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("failed to render output: {0}")]
    Output(String),
    #[error("failed to write {path}: {source}")]
    OutputFile {
        path: String,
        source: std::io::Error,
    },
}

#[derive(Clone, Debug)]
pub struct Ctx {
    pub settings: Settings,
    pub console: Console,
    pub token_file: Option<PathBuf>,
}

impl Ctx {
    pub fn new(settings: Settings, token: Option<String>, token_file: Option<PathBuf>) -> Result<Self, CliError> {
        let session = token.map_or_else(Session::new, Session::with_token);
        let api = ApiClient::from_settings(&settings.api)
            .session(Arc::new(session))
            .build()?;
        let console = Console::with_client(&settings, api);
        Ok(Self {
            settings,
            console,
            token_file,
        })
    }

    /// Persist the current session token, or remove the file when logged out.
    pub fn save_token(&self) -> Result<(), CliError> {
        let path = self.token_file.as_ref().ok_or(CliError::MissingTokenFile)?;
        let write_error = |source| CliError::TokenWrite {
            path: path.display().to_string(),
            source,
        };

        match self.console.api().session().token() {
            Some(token) => fs::write(path, format!("{token}\n")).map_err(write_error),
            None => match fs::remove_file(path) {
                Err(err) if err.kind() != ErrorKind::NotFound => Err(write_error(err)),
                _ => Ok(()),
            },
        }
    }
}

/// Token from the token file when it exists, else from the environment.
fn resolve_token(file: Option<&Path>, env: Option<&str>) -> Result<Option<String>, CliError> {
    if let Some(path) = file {
        match fs::read_to_string(path) {
            Ok(contents) => {
                let token = contents.trim();
                if !token.is_empty() {
                    return Ok(Some(token.to_string()));
                }
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => return Err(CliError::TokenFile(err)),
        }
    }
    Ok(env
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string))
}

pub fn build_ctx_from_cli(cli: &Cli) -> Result<Ctx, CliError> {
    let settings = config::load(&cli.overrides)?;
    let token = resolve_token(cli.token_file.as_deref(), cli.token_env.as_deref())?;
    Ctx::new(settings, token, cli.token_file.clone())
}
