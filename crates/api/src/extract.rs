//! JSON body extractor that reports bad field values as field errors.
//!
//! `axum::Json` rejects a body whose fields fail to deserialize with a
//! plain-text 422. [`JsonPayload`] instead tracks the failing path and returns
//! the same validation body the rule sets produce.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;
use todo_core::validation::ValidationErrors;

use crate::error::AppError;

/// Field name used when the failure is not tied to a field (syntax errors,
/// wrong top-level type).
pub const BODY_FIELD: &str = "$";

/// A JSON request body deserialized into `T`.
#[derive(Debug, Clone)]
pub struct JsonPayload<T>(pub T);

impl<T, S> FromRequest<S> for JsonPayload<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<serde_json::Value>::from_request(req, state)
            .await
            .map_err(reject_body)?;

        serde_path_to_error::deserialize(value)
            .map(JsonPayload)
            .map_err(|err| {
                let field = match err.path().to_string() {
                    path if path == "." => BODY_FIELD.to_string(),
                    path => path,
                };
                ValidationErrors::single(field, err.inner().to_string()).into()
            })
    }
}

fn reject_body(rejection: JsonRejection) -> AppError {
    let message = rejection.body_text();
    match rejection {
        JsonRejection::JsonSyntaxError(_) | JsonRejection::JsonDataError(_) => {
            ValidationErrors::single(BODY_FIELD, message).into()
        }
        _ => AppError::BadRequest(message),
    }
}
