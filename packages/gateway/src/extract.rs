//! Request body extraction.
//!
//! [`Payload`] replaces `axum::Json` for inbound bodies so that every parse
//! failure is a 400 with a plain-text reason, whatever the `Content-Type`.

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::AppError;

/// A JSON object body deserialised into `T`.
///
/// - Unparseable JSON, or JSON that is not an object: `Invalid JSON: ...`
/// - A missing or wrongly typed field: `Invalid payload: ...`
#[derive(Debug)]
pub struct Payload<T>(pub T);

impl<S, T> FromRequest<S> for Payload<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(format!("Invalid JSON: {}", e.body_text())))?;
        parse_object(&bytes).map(Payload)
    }
}

fn parse_object<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, AppError> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|e| AppError::BadRequest(format!("Invalid JSON: {e}")))?;
    if !value.is_object() {
        return Err(AppError::BadRequest(
            "Invalid JSON: expected an object".into(),
        ));
    }
    serde_json::from_value(value).map_err(|e| AppError::BadRequest(format!("Invalid payload: {e}")))
}
