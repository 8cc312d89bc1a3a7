//! Request handlers
//!
//! Store operations touch the filesystem synchronously, so each runs on the
//! blocking pool. Path identifiers that are not well-formed cannot name any
//! document and are answered like unresolved ones.

use crate::error::DocumentError;
use crate::server::reply::{self, Disposition};
use crate::store::{DocumentStore, MergeOutcome, MergeRequest, RenameRequest};
use crate::types::{DocumentId, Location};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::debug;
use warp::hyper::body::Bytes;
use warp::reply::Response;

async fn blocking<T, F>(store: Arc<DocumentStore>, op: F) -> Result<T, DocumentError>
where
    F: FnOnce(&DocumentStore) -> Result<T, DocumentError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || op(&store))
        .await
        .map_err(|e| {
            DocumentError::from(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("Blocking task failed: {}", e),
            ))
        })?
}

fn parse_id(raw: &str) -> Option<DocumentId> {
    match raw.parse() {
        Ok(id) => Some(id),
        Err(e) => {
            debug!(error = %e, "Unparsable document id in path");
            None
        }
    }
}

fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, DocumentError> {
    serde_json::from_slice(body).map_err(|e| DocumentError::InvalidRequest(e.to_string()))
}

pub async fn list(store: Arc<DocumentStore>, location: Location) -> Response {
    match blocking(store, move |s| s.list(location)).await {
        Ok(entries) => reply::json(&entries),
        Err(err) => reply::from_error(err),
    }
}

pub async fn fetch(id: String, store: Arc<DocumentStore>, disposition: Disposition) -> Response {
    let Some(id) = parse_id(&id) else {
        return reply::json(&false);
    };
    match blocking(store, move |s| s.fetch(&id)).await {
        Ok(content) => reply::document(&content.name, content.bytes, disposition),
        Err(err) => reply::from_error(err),
    }
}

pub async fn rename(id: String, body: Bytes, store: Arc<DocumentStore>) -> Response {
    let request: RenameRequest = match parse_body(&body) {
        Ok(request) => request,
        Err(err) => return reply::from_error(err),
    };
    let Some(id) = parse_id(&id) else {
        return reply::json(&false);
    };
    reply::done(blocking(store, move |s| s.rename(&id, &request.name)).await)
}

pub async fn delete(id: String, store: Arc<DocumentStore>) -> Response {
    let Some(id) = parse_id(&id) else {
        return reply::json(&false);
    };
    reply::done(blocking(store, move |s| s.delete(&id)).await)
}

pub async fn move_to_output(id: String, store: Arc<DocumentStore>) -> Response {
    let Some(id) = parse_id(&id) else {
        return reply::json(&false);
    };
    reply::done(blocking(store, move |s| s.move_to_output(&id)).await)
}

/// `true` when a document was created, `false` when every id was skipped
pub async fn merge(body: Bytes, store: Arc<DocumentStore>) -> Response {
    let request: MergeRequest = match parse_body(&body) {
        Ok(request) => request,
        Err(err) => return reply::from_error(err),
    };
    match blocking(store, move |s| s.merge(&request)).await {
        Ok(MergeOutcome::Merged { .. }) => reply::json(&true),
        Ok(MergeOutcome::Skipped) => reply::json(&false),
        Err(err) => reply::from_error(err),
    }
}
