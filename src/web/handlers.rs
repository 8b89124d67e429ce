use crate::{
    error::AppError,
    listing, net,
    resolve::{self, EntryKind},
    state::AppState,
    subtitles,
    web::pages::{self, MediaDescriptor},
};
use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use tokio_util::io::ReaderStream;
use tracing::{debug, info};

/// Query hints accepted by the browse endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct BrowseQuery {
    viewer: Option<String>,
    ext: Option<String>,
}

impl BrowseQuery {
    /// The player view is requested with `viewer=yes`; anything else streams
    /// the file directly.
    fn wants_viewer(&self) -> bool {
        self.viewer.as_deref() == Some("yes")
    }
}

pub async fn browse_root(
    State(state): State<AppState>,
    Query(query): Query<BrowseQuery>,
) -> Result<Response, AppError> {
    serve_path(&state, "", &query).await
}

pub async fn browse(
    State(state): State<AppState>,
    Path(path): Path<String>,
    Query(query): Query<BrowseQuery>,
) -> Result<Response, AppError> {
    serve_path(&state, &path, &query).await
}

async fn serve_path(
    state: &AppState,
    path: &str,
    query: &BrowseQuery,
) -> Result<Response, AppError> {
    let entry = resolve::resolve(&state.config.media.root, path).await?;

    match entry.kind {
        EntryKind::Directory => {
            let children = listing::list_directory(&entry).await?;
            Ok(Html(pages::listing_page(&entry.url_path, &children)).into_response())
        }
        EntryKind::File if query.wants_viewer() => {
            let tracks = subtitles::find_subtitles(&entry.fs_path).await?;
            // The `ext` hint wins over the real suffix, as the listing links
            // always carry it; direct viewer URLs may leave it off.
            let extension = query
                .ext
                .as_deref()
                .map(|ext| ext.trim_start_matches('.').to_string())
                .or_else(|| entry.extension.clone())
                .unwrap_or_default();
            let media = MediaDescriptor {
                url_path: entry.url_path.clone(),
                extension,
            };
            Ok(Html(pages::viewer_page(&media, &tracks)).into_response())
        }
        EntryKind::File => stream_file(&entry).await,
    }
}

/// Stream a file body with its content type from the fixed extension table;
/// unknown extensions go out as a generic byte stream.
async fn stream_file(entry: &resolve::ResolvedEntry) -> Result<Response, AppError> {
    let file = tokio::fs::File::open(&entry.fs_path).await?;
    let size = file.metadata().await?.len();
    let content_type = entry
        .extension
        .as_deref()
        .and_then(resolve::content_type)
        .unwrap_or("application/octet-stream");

    debug!("streaming {} as {content_type}", entry.fs_path.display());

    let stream = ReaderStream::with_capacity(file, 64 * 1024);
    Ok(Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, size)
        .body(Body::from_stream(stream))?)
}

/// Live snapshot of the reachable interface addresses.
pub async fn networks(State(state): State<AppState>) -> Html<String> {
    let interfaces = net::interface_addresses();
    Html(pages::networks_page(
        "http",
        &state.config.server.name,
        state.port,
        &interfaces,
    ))
}

/// Ask the server to terminate gracefully.
pub async fn shutdown(State(state): State<AppState>) -> &'static str {
    info!("shutdown requested over HTTP");
    state.shutdown.notify_one();
    "shutting down"
}
