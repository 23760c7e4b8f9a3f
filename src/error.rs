// src/error.rs
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
    #[error("Invalid input: {0}")]
    Form(#[from] FormError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("CLI error: {0}")]
    Cli(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read from storage backend: {0}")]
    StorageRead(#[source] std::io::Error),
    #[error("Failed to write to storage backend: {0}")]
    StorageWrite(#[source] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Deserialization error: {0}")]
    Deserialization(String),
    #[error("Field '{field}' must not be empty")]
    Validation { field: &'static str },
    #[error("A record with id '{0}' already exists")]
    DuplicateId(String),
}

/// Rejections produced while validating the "new login" form.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("Service name is required!")]
    ServiceNameRequired,
    #[error("Email is required!")]
    EmailRequired,
    #[error("Not a valid email")]
    InvalidEmail,
    #[error("Password is required!")]
    PasswordRequired,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not determine a platform directory for {0}")]
    NoProjectDirs(&'static str),
    #[error("Config I/O error on {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

pub type AppResult<T> = Result<T, AppError>;
pub type StoreResult<T> = Result<T, StoreError>;
pub type FormResult<T> = Result<T, FormError>;
pub type ConfigResult<T> = Result<T, ConfigError>;
