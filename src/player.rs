use log::{debug, warn};
use serde::Serialize;
use thiserror::Error;
use url::Url;

pub const STATUS_PLAYING: &str = "Playing preview";
pub const STATUS_UNAVAILABLE: &str = "Preview unavailable (will open Spotify)";
pub const NOTICE_NO_LINK: &str = "No link or preview available for this song";

#[derive(Error, Debug)]
pub enum PlaybackError {
    #[error("Playback rejected: {0}")]
    Rejected(String),
}

/// Audio sink the controller hands resolved preview sources to.
///
/// Starting a new source replaces the current one; implementations are not
/// asked to stop anything first.
pub trait AudioOutput {
    fn play(&mut self, source: &str) -> Result<(), PlaybackError>;
}

/// Origin of the catalog service as seen from the page: the page's scheme and
/// hostname combined with the catalog's fixed port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnownHost(String);

impl KnownHost {
    pub fn new(scheme: &str, hostname: &str, port: u16) -> Self {
        KnownHost(format!("{scheme}://{hostname}:{port}"))
    }

    // Builds the origin from a `Host` header value such as `example.com:3000`
    // or `[::1]:3000`. Any port in the header belongs to this server and is dropped.
    pub fn from_request(host_header: &str, forwarded_proto: Option<&str>, port: u16) -> Self {
        let scheme = match forwarded_proto.map(str::trim) {
            Some(proto) if proto.eq_ignore_ascii_case("https") => "https",
            _ => "http",
        };
        KnownHost::new(scheme, strip_port(host_header.trim()), port)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn strip_port(host: &str) -> &str {
    if host.starts_with('[') {
        return match host.find(']') {
            Some(end) => &host[..=end],
            None => host,
        };
    }
    match host.rsplit_once(':') {
        Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => name,
        _ => host,
    }
}

/// Resolve a possibly relative preview URL against the catalog origin.
///
/// Absolute URLs (scheme and host) are returned unchanged. Anything else is
/// treated as a path on `known_host`. An empty `raw` yields `known_host + "/"`,
/// callers are expected to check for a preview before playing one.
pub fn resolve_preview_url(raw: &str, known_host: &str) -> String {
    if let Ok(url) = Url::parse(raw)
        && url.has_host()
    {
        return raw.to_string();
    }
    if raw.starts_with('/') {
        format!("{known_host}{raw}")
    } else {
        format!("{known_host}/{raw}")
    }
}

/// Returns the link when it is an `http`/`https` URL with a host. Anything
/// else (`javascript:`, `data:`, relative paths) counts as no link.
pub fn web_link(url: &str) -> Option<&str> {
    match Url::parse(url.trim()) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") && parsed.has_host() => {
            Some(url)
        }
        _ => None,
    }
}

/// What a click on a song should do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Action {
    PlayPreview(String),
    OpenExternal(String),
    Notice(String),
}

impl Action {
    pub fn kind(&self) -> &'static str {
        match self {
            Action::PlayPreview(_) => "play",
            Action::OpenExternal(_) => "open",
            Action::Notice(_) => "notice",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Action::PlayPreview(v) | Action::OpenExternal(v) | Action::Notice(v) => v,
        }
    }
}

// Clicking the card prefers the external link over the preview
pub fn card_action(external_url: &str, preview_url: &str) -> Action {
    if let Some(link) = web_link(external_url) {
        Action::OpenExternal(link.to_string())
    } else if !preview_url.is_empty() {
        Action::PlayPreview(preview_url.to_string())
    } else {
        Action::Notice(NOTICE_NO_LINK.to_string())
    }
}

// The play control prefers the preview over the external link
pub fn play_control_action(external_url: &str, preview_url: &str) -> Action {
    if !preview_url.is_empty() {
        Action::PlayPreview(preview_url.to_string())
    } else if let Some(link) = web_link(external_url) {
        Action::OpenExternal(link.to_string())
    } else {
        Action::Notice(NOTICE_NO_LINK.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackPhase {
    #[default]
    Idle,
    Playing,
    Failed,
}

impl PlaybackPhase {
    pub fn status_label(self) -> &'static str {
        match self {
            PlaybackPhase::Idle => "",
            PlaybackPhase::Playing => STATUS_PLAYING,
            PlaybackPhase::Failed => STATUS_UNAVAILABLE,
        }
    }
}

/// "Now playing" panel contents.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct PlayerState {
    pub title: String,
    pub artist: String,
    pub art_url: String,
    pub source: String,
    pub status: String,
    pub phase: PlaybackPhase,
}

impl PlayerState {
    pub fn is_playing(&self) -> bool {
        self.phase == PlaybackPhase::Playing
    }
}

/// Drives one play action: Idle, then Resolving, then Playing or Failed.
///
/// This is the reference model for the script on the rendered page. The page
/// takes its status labels and phase names from `PlaybackPhase`, so both sides
/// report the same states.
pub struct PlaybackController<A: AudioOutput> {
    audio: A,
    known_host: KnownHost,
}

impl<A: AudioOutput> PlaybackController<A> {
    pub fn new(audio: A, known_host: KnownHost) -> Self {
        PlaybackController { audio, known_host }
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    // Metadata is shown before playback is confirmed. A rejection only changes
    // the status label, nothing is opened in its place.
    pub fn play_preview(
        &mut self,
        state: PlayerState,
        preview_url: &str,
        title: &str,
        artist: &str,
        image_url: &str,
    ) -> PlayerState {
        let source = resolve_preview_url(preview_url, self.known_host.as_str());
        debug!("Playing preview {source}");

        let mut next = PlayerState {
            title: title.to_string(),
            artist: artist.to_string(),
            art_url: image_url.to_string(),
            source,
            ..state
        };

        match self.audio.play(&next.source) {
            Ok(()) => next.phase = PlaybackPhase::Playing,
            Err(e) => {
                warn!("Preview playback failed for {}: {e}", next.source);
                next.phase = PlaybackPhase::Failed;
            }
        }
        next.status = next.phase.status_label().to_string();
        next
    }

    pub fn open_external_link(&self, url: &str) -> Action {
        match web_link(url) {
            Some(link) => Action::OpenExternal(link.to_string()),
            None => Action::Notice(NOTICE_NO_LINK.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingAudio {
        played: Vec<String>,
        reject: bool,
    }

    impl AudioOutput for RecordingAudio {
        fn play(&mut self, source: &str) -> Result<(), PlaybackError> {
            self.played.push(source.to_string());
            if self.reject {
                Err(PlaybackError::Rejected("autoplay blocked".into()))
            } else {
                Ok(())
            }
        }
    }

    const HOST: &str = "http://example.com:8001";

    #[test]
    fn absolute_urls_are_unchanged() {
        for raw in [
            "https://p.scdn.co/mp3-preview/abc?cid=1",
            "http://localhost:9000/a.mp3",
            "https://[::1]:8443/x",
        ] {
            assert_eq!(resolve_preview_url(raw, HOST), raw);
        }
    }

    #[test]
    fn rooted_paths_are_appended() {
        assert_eq!(
            resolve_preview_url("/p/1.mp3", HOST),
            "http://example.com:8001/p/1.mp3"
        );
        assert_eq!(resolve_preview_url("//", HOST), format!("{HOST}//"));
    }

    #[test]
    fn bare_paths_get_a_separator() {
        assert_eq!(
            resolve_preview_url("media/songs/1.mp3", HOST),
            "http://example.com:8001/media/songs/1.mp3"
        );
        // no host, so not absolute
        assert_eq!(
            resolve_preview_url("mailto:someone", HOST),
            format!("{HOST}/mailto:someone")
        );
    }

    #[test]
    fn known_host_from_request() {
        let host = KnownHost::from_request("example.com:3000", None, 8001);
        assert_eq!(host.as_str(), "http://example.com:8001");

        let host = KnownHost::from_request("example.com", Some("https"), 8001);
        assert_eq!(host.as_str(), "https://example.com:8001");

        let host = KnownHost::from_request("[::1]:3000", Some("http"), 8001);
        assert_eq!(host.as_str(), "http://[::1]:8001");
    }

    #[test]
    fn card_prefers_external_link() {
        assert_eq!(
            card_action("https://open.spotify.com/track/1", "/p/1.mp3"),
            Action::OpenExternal("https://open.spotify.com/track/1".into())
        );
        assert_eq!(
            card_action("", "/p/1.mp3"),
            Action::PlayPreview("/p/1.mp3".into())
        );
        assert_eq!(card_action("", ""), Action::Notice(NOTICE_NO_LINK.into()));
    }

    #[test]
    fn play_control_prefers_preview() {
        assert_eq!(
            play_control_action("https://open.spotify.com/track/1", "/p/1.mp3"),
            Action::PlayPreview("/p/1.mp3".into())
        );
        assert_eq!(
            play_control_action("https://open.spotify.com/track/1", ""),
            Action::OpenExternal("https://open.spotify.com/track/1".into())
        );
        assert_eq!(
            play_control_action("", ""),
            Action::Notice(NOTICE_NO_LINK.into())
        );
    }

    #[test]
    fn script_links_are_not_opened() {
        for bad in ["javascript:alert(1)", "data:text/html,<b>x</b>", "/track/1", "ftp://host/x"] {
            assert_eq!(web_link(bad), None, "{bad}");
            assert_eq!(card_action(bad, ""), Action::Notice(NOTICE_NO_LINK.into()));
            assert_eq!(
                card_action(bad, "/p/1.mp3"),
                Action::PlayPreview("/p/1.mp3".into())
            );
            assert_eq!(
                play_control_action(bad, ""),
                Action::Notice(NOTICE_NO_LINK.into())
            );
        }
        assert_eq!(
            web_link("https://open.spotify.com/track/1"),
            Some("https://open.spotify.com/track/1")
        );
    }

    #[test]
    fn phase_labels() {
        assert_eq!(PlaybackPhase::Idle.status_label(), "");
        assert_eq!(PlaybackPhase::Playing.status_label(), STATUS_PLAYING);
        assert_eq!(PlaybackPhase::Failed.status_label(), STATUS_UNAVAILABLE);
    }

    #[test]
    fn successful_play_updates_state() {
        let mut controller = PlaybackController::new(
            RecordingAudio::default(),
            KnownHost::new("http", "example.com", 8001),
        );
        let state = controller.play_preview(PlayerState::default(), "/p/1.mp3", "A", "B", "");

        assert_eq!(state.title, "A");
        assert_eq!(state.artist, "B");
        assert_eq!(state.source, "http://example.com:8001/p/1.mp3");
        assert_eq!(state.status, STATUS_PLAYING);
        assert!(state.is_playing());
        assert_eq!(controller.audio().played, vec!["http://example.com:8001/p/1.mp3"]);
    }

    #[test]
    fn rejected_play_keeps_metadata_and_only_changes_label() {
        let mut controller = PlaybackController::new(
            RecordingAudio {
                reject: true,
                ..Default::default()
            },
            KnownHost::new("http", "example.com", 8001),
        );
        let state = controller.play_preview(
            PlayerState::default(),
            "p/2.mp3",
            "Song",
            "Artist",
            "https://img/1.jpg",
        );

        assert_eq!(state.title, "Song");
        assert_eq!(state.art_url, "https://img/1.jpg");
        assert_eq!(state.status, STATUS_UNAVAILABLE);
        assert_eq!(state.phase, PlaybackPhase::Failed);
        assert!(!state.is_playing());
    }

    #[test]
    fn new_play_replaces_current_source() {
        let mut controller = PlaybackController::new(
            RecordingAudio::default(),
            KnownHost::new("http", "example.com", 8001),
        );
        let first = controller.play_preview(PlayerState::default(), "/a.mp3", "A", "X", "");
        let second = controller.play_preview(first, "/b.mp3", "B", "Y", "");

        assert_eq!(second.title, "B");
        assert_eq!(second.source, "http://example.com:8001/b.mp3");
        assert_eq!(controller.audio().played.len(), 2);
    }

    #[test]
    fn open_external_link_without_url_is_a_notice() {
        let controller = PlaybackController::new(
            RecordingAudio::default(),
            KnownHost::new("http", "example.com", 8001),
        );
        assert_eq!(
            controller.open_external_link("https://open.spotify.com/track/1"),
            Action::OpenExternal("https://open.spotify.com/track/1".into())
        );
        assert_eq!(
            controller.open_external_link(""),
            Action::Notice(NOTICE_NO_LINK.into())
        );
        assert_eq!(
            controller.open_external_link("javascript:alert(1)"),
            Action::Notice(NOTICE_NO_LINK.into())
        );
    }
}
