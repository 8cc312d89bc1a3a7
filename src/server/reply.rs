//! Mapping of store results and errors onto HTTP responses

use crate::error::DocumentError;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;
use std::convert::Infallible;
use tracing::{error, warn};
use warp::http::header::{HeaderValue, CONTENT_DISPOSITION, CONTENT_TYPE};
use warp::http::StatusCode;
use warp::reply::Response;
use warp::{Rejection, Reply};

/// How a fetched document is presented to the browser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Inline,
    Attachment,
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

pub fn json<T: Serialize>(value: &T) -> Response {
    warp::reply::json(value).into_response()
}

fn error_reply(status: StatusCode, kind: &str, message: String) -> Response {
    let body = ErrorBody {
        error: kind,
        message,
    };
    warp::reply::with_status(warp::reply::json(&body), status).into_response()
}

/// Map a store error onto a response
///
/// A vanished document is an expected race and answers `200 false`.
pub fn from_error(err: DocumentError) -> Response {
    match err {
        DocumentError::NotFound(_) => json(&false),
        DocumentError::Conflict(_) => {
            warn!(error = %err, "Request conflicts with an existing document");
            error_reply(StatusCode::CONFLICT, "conflict", err.to_string())
        }
        DocumentError::InvalidRequest(_) => {
            error_reply(StatusCode::BAD_REQUEST, "invalid_request", err.to_string())
        }
        DocumentError::StorageError(_) | DocumentError::MergeError(_) => {
            error!(error = %err, "Document operation failed");
            error_reply(StatusCode::INTERNAL_SERVER_ERROR, "io", err.to_string())
        }
    }
}

/// `true` on success, the mapped error otherwise
pub fn done<T>(result: Result<T, DocumentError>) -> Response {
    match result {
        Ok(_) => json(&true),
        Err(err) => from_error(err),
    }
}

/// Raw document bytes with content type and disposition headers
pub fn document(name: &str, bytes: Vec<u8>, disposition: Disposition) -> Response {
    let mut response = Response::new(bytes.into());
    let headers = response.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type(name)));

    let kind = match disposition {
        Disposition::Inline => "inline",
        Disposition::Attachment => "attachment",
    };
    let value = HeaderValue::from_str(&disposition_value(kind, name))
        .unwrap_or_else(|_| HeaderValue::from_static(kind));
    headers.insert(CONTENT_DISPOSITION, value);

    response
}

/// `filename*` attribute characters left unencoded (RFC 5987 `attr-char`)
const ATTR_CHAR: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'!')
    .remove(b'#')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b'-')
    .remove(b'.')
    .remove(b'^')
    .remove(b'_')
    .remove(b'`')
    .remove(b'|')
    .remove(b'~');

/// Disposition header value naming `name`
///
/// Names that fit a quoted string go into `filename` as they are. Others get
/// an ASCII stand-in there plus the exact name, percent-encoded, in `filename*`.
fn disposition_value(kind: &str, name: &str) -> String {
    let fallback: String = name
        .chars()
        .map(|c| if c == ' ' || c.is_ascii_graphic() { c } else { '_' })
        .collect();
    let quoted = fallback.replace('\\', "\\\\").replace('"', "\\\"");

    if fallback == name {
        format!("{}; filename=\"{}\"", kind, quoted)
    } else {
        format!(
            "{}; filename=\"{}\"; filename*=UTF-8''{}",
            kind,
            quoted,
            utf8_percent_encode(name, ATTR_CHAR)
        )
    }
}

fn content_type(name: &str) -> &'static str {
    let extension = name.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase());
    match extension.as_deref() {
        Some("pdf") => "application/pdf",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("tif") | Some("tiff") => "image/tiff",
        _ => "application/octet-stream",
    }
}

/// Turn warp rejections (unknown route, wrong method, oversized body) into JSON errors
pub async fn rejection(err: Rejection) -> Result<Response, Infallible> {
    let reply = if err.is_not_found() {
        error_reply(StatusCode::NOT_FOUND, "not_found", "No such route".to_string())
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        error_reply(
            StatusCode::PAYLOAD_TOO_LARGE,
            "invalid_request",
            "Request body too large".to_string(),
        )
    } else if err.find::<warp::reject::LengthRequired>().is_some() {
        error_reply(
            StatusCode::LENGTH_REQUIRED,
            "invalid_request",
            "Request body needs a content length".to_string(),
        )
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        error_reply(
            StatusCode::METHOD_NOT_ALLOWED,
            "method_not_allowed",
            "Method not allowed".to_string(),
        )
    } else {
        error!(rejection = ?err, "Unhandled rejection");
        error_reply(
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal",
            "Unhandled request".to_string(),
        )
    };
    Ok(reply)
}
