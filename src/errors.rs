use miette::Diagnostic;
use thiserror::Error;

use crate::access::AccessError;

#[derive(Debug, Error, Diagnostic)]
pub enum WardenError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Access(#[from] AccessError),

    #[error("Configuration error: {0}")]
    #[diagnostic(
        code(warden::config),
        help("Check config.toml and any WARDEN__* environment variables")
    )]
    Config(#[from] config::ConfigError),

    #[error("I/O error: {0}")]
    #[diagnostic(code(warden::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(warden::serde))]
    Serde(#[from] serde_json::Error),
}
