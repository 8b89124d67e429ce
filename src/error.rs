use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::io;
use thiserror::Error;
use tracing::{error, warn};

/// Errors produced by the request-serving core.
#[derive(Debug, Error)]
pub enum AppError {
    /// The resolved path does not exist on disk.
    #[error("path \"{path}\" not found")]
    NotFound { path: String },

    /// The request path would resolve outside the served root.
    #[error("path \"{path}\" escapes the served root")]
    PathEscape { path: String },

    /// A directory could not be enumerated.
    #[error("failed to read directory \"{path}\"")]
    Enumeration {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Any other I/O failure while resolving or streaming an entry.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// A response could not be assembled.
    #[error(transparent)]
    Http(#[from] axum::http::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            // An escaping path is reported exactly like a missing one, so the
            // response never reveals where the served root ends.
            AppError::NotFound { ref path } | AppError::PathEscape { ref path } => {
                warn!("{self}");
                (
                    StatusCode::NOT_FOUND,
                    format!("path: \"{path}\" not found!"),
                )
                    .into_response()
            }
            AppError::Enumeration { .. } | AppError::Io(_) | AppError::Http(_) => {
                error!("{self}");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
            }
        }
    }
}
