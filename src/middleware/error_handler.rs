// Extractor error handlers.
//
// Malformed JSON bodies and query strings are reported with the same
// `{ "error": { "message", "code" } }` body as `AppError`.

use actix_web::{
    error::{InternalError, JsonPayloadError, QueryPayloadError},
    HttpRequest, ResponseError,
};

use crate::core::AppError;

/// Use with `web::JsonConfig::error_handler`
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    reject(err.to_string(), req)
}

/// Use with `web::QueryConfig::error_handler`
pub fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    reject(err.to_string(), req)
}

fn reject(message: String, req: &HttpRequest) -> actix_web::Error {
    tracing::warn!(path = %req.path(), error = %message, "Rejected request payload");

    let app_error = AppError::validation(message.clone());
    let response = app_error.error_response();
    InternalError::from_response(message, response).into()
}
