//! HTTP handlers for the server.

pub mod cells;
pub mod export;
pub mod sheet;
pub mod sizes;

use axum::http::StatusCode;

use crate::error::PrintardError;

/// Map a library error onto a response.
///
/// Caller mistakes are 400s; anything the server could not produce is a 500.
pub(crate) fn reject(err: PrintardError) -> (StatusCode, String) {
    let status = match err {
        PrintardError::InvalidDimension(_)
        | PrintardError::DegenerateAspect(_)
        | PrintardError::ImageDecode(_)
        | PrintardError::UnknownSize(_)
        | PrintardError::Job(_) => StatusCode::BAD_REQUEST,
        PrintardError::Serialization(_) | PrintardError::Server(_) | PrintardError::Io(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, err.to_string())
}
