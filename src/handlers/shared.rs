use actix_web::{
    Error as ActixError, HttpRequest, HttpResponse,
    error::{JsonPayloadError, PathError, QueryPayloadError},
    http::header,
};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Failure envelope returned for every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Success envelope for operations that return no resource.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub fn ok<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Ok().json(data)
}

pub fn created<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Created().json(data)
}

pub fn message(text: &str) -> HttpResponse {
    HttpResponse::Ok().json(MessageBody::new(text))
}

/// Binary download with an attachment filename.
pub fn attachment(content_type: &str, filename: &str, bytes: Vec<u8>) -> HttpResponse {
    HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, content_type))
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename={}", filename),
        ))
        .body(bytes)
}

pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> ActixError {
    AppError::bad_request(format!("Invalid request body: {}", err)).into()
}

pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> ActixError {
    AppError::bad_request(format!("Invalid query parameters: {}", err)).into()
}

pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> ActixError {
    AppError::bad_request(format!("Invalid path parameter: {}", err)).into()
}
