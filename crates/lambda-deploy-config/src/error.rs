use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "Configuration file not found. Looked in:\n\
        - LAMBDA_DEPLOY_CONFIG environment variable\n\
        - current directory: lambda.json, lambda.yaml, lambda.yml\n\
        - ./.lambda-deploy/ directory"
    )]
    ConfigFileNotFound,

    #[error("Configuration file does not exist: {0}")]
    PathNotFound(PathBuf),

    #[error("Invalid configuration in {path}: {message}")]
    Invalid { path: PathBuf, message: String },

    #[error("JSON parse error in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("YAML parse error in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
