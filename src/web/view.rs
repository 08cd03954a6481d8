use serde::Serialize;

use crate::clients::Song;
use crate::player::{
    Action, KnownHost, card_action, play_control_action, resolve_preview_url, web_link,
};

/// Display fields derived from one catalog song, with every fallback applied.
#[derive(Debug, Clone, Serialize)]
pub struct SongView {
    pub title: String,
    pub artist: String,
    pub external_url: String,
    pub preview_url: String,
    pub resolved_preview_url: String,
    pub album_image: String,
    pub album_title: Option<String>,
    pub duration: Option<String>,
    pub card_action: Action,
    pub play_action: Action,
}

impl SongView {
    pub fn from_song(song: &Song, known_host: &KnownHost) -> Self {
        let external_url = web_link(song.external_url()).unwrap_or("");
        let preview_url = song.preview_url();
        let resolved_preview_url = if preview_url.is_empty() {
            String::new()
        } else {
            resolve_preview_url(preview_url, known_host.as_str())
        };

        // Actions carry resolved sources so the page never resolves anything itself
        let resolve = |action: Action| match action {
            Action::PlayPreview(_) => Action::PlayPreview(resolved_preview_url.clone()),
            other => other,
        };

        SongView {
            title: song.display_title().to_string(),
            artist: song.artist_name().to_string(),
            external_url: external_url.to_string(),
            preview_url: preview_url.to_string(),
            card_action: resolve(card_action(external_url, preview_url)),
            play_action: resolve(play_control_action(external_url, preview_url)),
            resolved_preview_url: resolved_preview_url.clone(),
            album_image: song.album_image().to_string(),
            album_title: song.album_title().map(str::to_string),
            duration: song.duration().map(str::to_string),
        }
    }

    pub fn has_preview(&self) -> bool {
        !self.preview_url.is_empty()
    }
}

pub fn song_views(songs: &[Song], known_host: &KnownHost) -> Vec<SongView> {
    songs
        .iter()
        .map(|s| SongView::from_song(s, known_host))
        .collect()
}
