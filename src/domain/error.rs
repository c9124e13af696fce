use thiserror::Error;

/// Miniterm unified error type
#[derive(Error, Debug)]
pub enum MinitermError {
    #[error("Permission denied opening {path}: {source}")]
    PermissionDenied {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Unexpected error: {message}")]
    Unexpected { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

pub type MinitermResult<T> = Result<T, MinitermError>;
