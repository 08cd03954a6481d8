use serde::{Deserialize, Serialize};

pub const UNTITLED: &str = "Untitled";
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";
pub const PLACEHOLDER_IMAGE: &str = "/static/placeholder-album.svg";

// Catalog payloads are consumed as-is. Every field may be missing or null.

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct Artist {
    pub name: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct Album {
    pub title: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct SpotifyData {
    pub external_url: Option<String>,
    pub preview_url: Option<String>,
    pub album_image: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct Song {
    pub title: Option<String>,
    pub artist: Option<Artist>,
    pub album: Option<Album>,
    pub duration_formatted: Option<String>,
    pub spotify_data: Option<SpotifyData>,
}

// Empty strings count as absent, the catalog emits both.
fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.trim().is_empty())
}

impl Song {
    pub fn display_title(&self) -> &str {
        non_empty(self.title.as_ref()).unwrap_or(UNTITLED)
    }

    pub fn artist_name(&self) -> &str {
        non_empty(self.artist.as_ref().and_then(|a| a.name.as_ref())).unwrap_or(UNKNOWN_ARTIST)
    }

    pub fn external_url(&self) -> &str {
        non_empty(self.spotify_data.as_ref().and_then(|s| s.external_url.as_ref())).unwrap_or("")
    }

    pub fn preview_url(&self) -> &str {
        non_empty(self.spotify_data.as_ref().and_then(|s| s.preview_url.as_ref())).unwrap_or("")
    }

    pub fn album_image(&self) -> &str {
        non_empty(self.spotify_data.as_ref().and_then(|s| s.album_image.as_ref()))
            .unwrap_or(PLACEHOLDER_IMAGE)
    }

    pub fn album_title(&self) -> Option<&str> {
        non_empty(self.album.as_ref().and_then(|a| a.title.as_ref()))
    }

    pub fn duration(&self) -> Option<&str> {
        non_empty(self.duration_formatted.as_ref())
    }
}
