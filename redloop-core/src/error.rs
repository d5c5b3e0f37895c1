//! Error types for redloop-core

use miette::Diagnostic;
use thiserror::Error;

/// Result type alias using redloop Error
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for redloop
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Configuration error: {0}")]
    #[diagnostic(code(redloop::config))]
    Config(String),

    #[error("Database error: {0}")]
    #[diagnostic(code(redloop::database))]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    #[diagnostic(code(redloop::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(redloop::serde))]
    Serde(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    #[diagnostic(code(redloop::toml))]
    Toml(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    #[diagnostic(code(redloop::http))]
    Http(#[from] reqwest::Error),

    #[error("Provider error: {0}")]
    #[diagnostic(code(redloop::provider))]
    Provider(String),

    #[error("Agent error: {0}")]
    #[diagnostic(code(redloop::agent))]
    Agent(String),

    #[error("Tool execution error: {0}")]
    #[diagnostic(code(redloop::tool))]
    Tool(String),
}
