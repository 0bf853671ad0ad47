//! Common utilities for file upload handlers

use axum::extract::multipart::{Field, MultipartError};
use futures::TryStreamExt;
use reelvault_core::AppError;
use std::io;
use tokio::io::AsyncRead;
use tokio_util::io::StreamReader;

/// Stream a multipart field as an `AsyncRead` without buffering it in memory.
pub fn field_reader(field: Field<'_>) -> impl AsyncRead + Unpin + Send + '_ {
    Box::pin(StreamReader::new(
        field.map_err(|e| io::Error::other(e.to_string())),
    ))
}

pub fn multipart_error(err: MultipartError) -> AppError {
    AppError::InvalidInput(format!("Failed to read multipart: {}", err.body_text()))
}

pub fn missing_field(name: &str) -> AppError {
    AppError::InvalidInput(format!(
        "Missing form field '{}'; send exactly one file field named '{}'",
        name, name
    ))
}

/// Log-safe form of an asset reference. Inline references embed the whole payload.
pub fn loggable_reference(reference: &str) -> String {
    match reference.split_once(',') {
        Some((header, data)) if reference.starts_with("data:") => {
            format!("{},<{} base64 chars>", header, data.len())
        }
        _ => reference.to_string(),
    }
}
