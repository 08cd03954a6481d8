use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, Uri, header},
    response::{Html, IntoResponse},
    routing::get,
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::clients::CatalogClient;
use crate::player::KnownHost;

/// HTML page rendering
pub mod page;
/// Display records derived from catalog songs
pub mod view;

use view::{SongView, song_views};

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogClient>,
    pub preview_port: u16,
}

impl AppState {
    pub fn new(catalog: CatalogClient, preview_port: u16) -> Self {
        AppState {
            catalog: Arc::new(catalog),
            preview_port,
        }
    }

    // HTTP/2 requests carry the host in `:authority`, which ends up in the URI
    fn known_host(&self, headers: &HeaderMap, uri: &Uri) -> KnownHost {
        let host = headers
            .get(header::HOST)
            .and_then(|h| h.to_str().ok())
            .or_else(|| uri.authority().map(|a| a.host()))
            .unwrap_or("localhost");
        let proto = headers
            .get("x-forwarded-proto")
            .and_then(|h| h.to_str().ok());
        KnownHost::from_request(host, proto, self.preview_port)
    }

    async fn load_views(&self, headers: &HeaderMap, uri: &Uri) -> Vec<SongView> {
        let songs = self.catalog.fetch_songs_or_empty().await;
        song_views(&songs, &self.known_host(headers, uri))
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/songs", get(list_songs))
        .route("/health", get(health))
        .route("/static/placeholder-album.svg", get(placeholder))
        .with_state(state)
}

// GET / - song list page
async fn index(State(state): State<AppState>, headers: HeaderMap, uri: Uri) -> Html<String> {
    let songs = state.load_views(&headers, &uri).await;
    Html(page::render_page(&songs))
}

#[derive(Serialize)]
struct SongsBody {
    songs: Vec<SongView>,
}

// GET /api/songs - same data as the page, as JSON
async fn list_songs(
    State(state): State<AppState>,
    headers: HeaderMap,
    uri: Uri,
) -> Json<SongsBody> {
    Json(SongsBody {
        songs: state.load_views(&headers, &uri).await,
    })
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn placeholder() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "image/svg+xml")],
        page::PLACEHOLDER_SVG,
    )
}
