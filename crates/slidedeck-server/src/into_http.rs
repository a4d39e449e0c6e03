use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use color_eyre::Report;
use serde_json::json;
use slidedeck_store::{SlideIdError, StoreError};
use std::fmt;
use tracing::error;

pub const SLIDE_NOT_FOUND: &str = "Slide not found";

#[derive(Debug)]
pub enum HttpError {
    SlideNotFound,
    Internal { err: String },
}

impl HttpError {
    pub fn from_report(err: Report) -> Self {
        error!("HTTP handler error: {}", err.root_cause());

        HttpError::Internal {
            err: err.to_string(),
        }
    }
}

// Malformed ids share the 500 path with store failures.
macro_rules! impl_from {
    ($from:ty) => {
        impl From<$from> for HttpError {
            fn from(err: $from) -> Self {
                let report = color_eyre::Report::from(err);
                Self::from_report(report)
            }
        }
    };
}

impl_from!(StoreError);
impl_from!(SlideIdError);

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        match self {
            HttpError::SlideNotFound => (
                StatusCode::NOT_FOUND,
                Json(json!({ "message": SLIDE_NOT_FOUND })),
            )
                .into_response(),
            HttpError::Internal { err } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": err })),
            )
                .into_response(),
        }
    }
}

impl std::error::Error for HttpError {}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            HttpError::SlideNotFound => SLIDE_NOT_FOUND,
            HttpError::Internal { err } => err.as_str(),
        };
        write!(f, "HttpError: {msg}")
    }
}
