//! HTTP server
//!
//! REST surface over the document store, mounted under `/api/documents`,
//! plus optional static serving of a frontend bundle at `/`.

pub mod handlers;
pub mod reply;

use crate::error::ApiError;
use crate::store::DocumentStore;
use crate::types::Location;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use warp::filters::BoxedFilter;
use warp::reply::Response;
use warp::{Filter, Reply};

/// Largest accepted request body (rename and merge payloads are small JSON)
const MAX_BODY_BYTES: u64 = 64 * 1024;

fn with_store(
    store: Arc<DocumentStore>,
) -> impl Filter<Extract = (Arc<DocumentStore>,), Error = Infallible> + Clone {
    warp::any().map(move || store.clone())
}

fn json_body() -> impl Filter<Extract = (warp::hyper::body::Bytes,), Error = warp::Rejection> + Clone {
    warp::body::content_length_limit(MAX_BODY_BYTES).and(warp::body::bytes())
}

/// The `/api/documents` routes
pub fn api(store: Arc<DocumentStore>) -> BoxedFilter<(Response,)> {
    let list = warp::path!("api" / "documents" / "list")
        .and(warp::get())
        .and(with_store(store.clone()))
        .then(|store: Arc<DocumentStore>| handlers::list(store, Location::Inbox));

    let list_outdir = warp::path!("api" / "documents" / "list_outdir")
        .and(warp::get())
        .and(with_store(store.clone()))
        .then(|store: Arc<DocumentStore>| handlers::list(store, Location::Output));

    let merge = warp::path!("api" / "documents" / "merge")
        .and(warp::post())
        .and(json_body())
        .and(with_store(store.clone()))
        .then(handlers::merge);

    let fetch = warp::path!("api" / "documents" / String)
        .and(warp::get())
        .and(with_store(store.clone()))
        .then(|id: String, store: Arc<DocumentStore>| {
            handlers::fetch(id, store, reply::Disposition::Inline)
        });

    let download = warp::path!("api" / "documents" / String / "download")
        .and(warp::get())
        .and(with_store(store.clone()))
        .then(|id: String, store: Arc<DocumentStore>| {
            handlers::fetch(id, store, reply::Disposition::Attachment)
        });

    let move_to_outdir = warp::path!("api" / "documents" / String / "move_to_outdir")
        .and(warp::post())
        .and(with_store(store.clone()))
        .then(handlers::move_to_output);

    let rename = warp::path!("api" / "documents" / String)
        .and(warp::post())
        .and(json_body())
        .and(with_store(store.clone()))
        .then(handlers::rename);

    let delete = warp::path!("api" / "documents" / String)
        .and(warp::delete())
        .and(with_store(store))
        .then(handlers::delete);

    // Fixed segments before the `:id` catch-alls.
    list.or(list_outdir)
        .unify()
        .or(merge)
        .unify()
        .or(fetch)
        .unify()
        .or(download)
        .unify()
        .or(move_to_outdir)
        .unify()
        .or(rename)
        .unify()
        .or(delete)
        .unify()
        .boxed()
}

/// API routes, optional static files, request logging and rejection mapping
pub fn routes(store: Arc<DocumentStore>, static_dir: Option<PathBuf>) -> BoxedFilter<(Response,)> {
    let api = api(store);

    let app = match static_dir {
        Some(dir) => api
            .or(warp::fs::dir(dir).map(|file: warp::fs::File| file.into_response()))
            .unify()
            .boxed(),
        None => api,
    };

    let log = warp::log::custom(|info: warp::log::Info<'_>| {
        info!(
            method = %info.method(),
            path = info.path(),
            status = info.status().as_u16(),
            elapsed_ms = info.elapsed().as_millis() as u64,
            "HTTP request"
        );
    });

    app.recover(reply::rejection)
        .unify()
        .with(log)
        .map(Reply::into_response)
        .boxed()
}

/// Bind `addr` and serve until Ctrl-C
pub async fn serve(
    store: Arc<DocumentStore>,
    addr: SocketAddr,
    static_dir: Option<PathBuf>,
) -> Result<(), ApiError> {
    let inbox = store.dir(Location::Inbox).to_path_buf();
    let output = store.dir(Location::Output).to_path_buf();
    let format = store.engine().format_name();

    let (bound, server) = warp::serve(routes(store, static_dir))
        .try_bind_with_graceful_shutdown(addr, async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .map_err(|e| ApiError::ServerError(format!("Failed to bind {}: {}", addr, e)))?;

    info!(addr = %bound, inbox = ?inbox, output = ?output, merge_format = format, "Server listening");
    server.await;
    info!("Server stopped");
    Ok(())
}
