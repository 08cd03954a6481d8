use std::time::Duration;

use log::{debug, warn};
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::clients::{
    entities::Song,
    errors::{Error, Result},
};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Deserialize, Debug)]
struct SongsResponse {
    songs: Vec<Song>,
}

pub struct CatalogClient {
    http: Client,
    songs_url: Url,
}

impl CatalogClient {
    pub fn new(base_url: &Url, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(format!("songdeck/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::ConfigurationError(e.to_string()))?;

        // Url::join drops the last path segment unless the base ends with a slash
        let mut base = base_url.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let songs_url = base.join("songs/")?;

        Ok(CatalogClient { http, songs_url })
    }

    pub fn songs_url(&self) -> &Url {
        &self.songs_url
    }

    // Fetch the full song list. Nothing is cached, every call hits the catalog.
    pub async fn fetch_songs(&self) -> Result<Vec<Song>> {
        debug!("Fetching songs from {}", self.songs_url);
        let response = self.http.get(self.songs_url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::UpstreamStatus(status.as_u16()));
        }

        let parsed: SongsResponse = response.json().await?;
        debug!("Fetched {} songs from catalog", parsed.songs.len());
        Ok(parsed.songs)
    }

    // The page must always render, so failures collapse to an empty list here
    pub async fn fetch_songs_or_empty(&self) -> Vec<Song> {
        match self.fetch_songs().await {
            Ok(songs) => songs,
            Err(e) => {
                warn!("Failed to fetch songs from catalog: {e}");
                Vec::new()
            }
        }
    }
}
