use actix_web::{HttpResponse, http::StatusCode};
use serde::Serialize;

/// Envelope shared by every JSON response: `{success, data?, message?, error?}`.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub fn ok<T: Serialize>(data: T) -> HttpResponse {
    respond(StatusCode::OK, Some(data), None)
}

pub fn ok_with_message<T: Serialize>(data: T, message: &str) -> HttpResponse {
    respond(StatusCode::OK, Some(data), Some(message))
}

pub fn created<T: Serialize>(data: T, message: &str) -> HttpResponse {
    respond(StatusCode::CREATED, Some(data), Some(message))
}

pub fn message(message: &str) -> HttpResponse {
    respond::<()>(StatusCode::OK, None, Some(message))
}

pub fn failure(status: StatusCode, message: &str, code: &str) -> HttpResponse {
    HttpResponse::build(status).json(Envelope::<()> {
        success: false,
        data: None,
        message: Some(message.to_string()),
        error: Some(code.to_string()),
    })
}

fn respond<T: Serialize>(status: StatusCode, data: Option<T>, message: Option<&str>) -> HttpResponse {
    HttpResponse::build(status).json(Envelope {
        success: true,
        data,
        message: message.map(str::to_string),
        error: None,
    })
}
