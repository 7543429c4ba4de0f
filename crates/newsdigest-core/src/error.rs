use thiserror::Error;

/// Startup configuration failures. Fatal before any pipeline run begins.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read companies file {path}: {source}")]
    CompaniesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse companies file: {0}")]
    CompaniesFileParse(#[from] serde_yaml::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}
