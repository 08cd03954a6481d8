use crate::clients::entities::PLACEHOLDER_IMAGE;
use crate::player::PlaybackPhase;
use crate::web::view::SongView;

pub const EMPTY_MESSAGE: &str = "No songs available";

pub const PLACEHOLDER_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="300" height="300" viewBox="0 0 300 300"><rect width="300" height="300" fill="#282828"/><circle cx="150" cy="150" r="90" fill="#3e3e3e"/><circle cx="150" cy="150" r="18" fill="#282828"/></svg>"##;

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn render_card(out: &mut String, song: &SongView) {
    let title = escape(&song.title);
    let artist = escape(&song.artist);

    out.push_str(&format!(
        r#"<li class="song-card" data-action="{card_kind}" data-target="{card_value}" data-title="{title}" data-artist="{artist}" data-image="{image}">
  <img class="album-art" src="{image}" alt="{title}">
  <div class="song-meta">
    <h3 class="song-title">{title}</h3>
    <p class="song-artist">{artist}</p>
"#,
        card_kind = song.card_action.kind(),
        card_value = escape(song.card_action.value()),
        image = escape(&song.album_image),
    ));

    if let Some(album) = &song.album_title {
        out.push_str(&format!(
            "    <p class=\"song-album\">{}</p>\n",
            escape(album)
        ));
    }
    if let Some(duration) = &song.duration {
        out.push_str(&format!(
            "    <span class=\"song-duration\">{}</span>\n",
            escape(duration)
        ));
    }

    let label = if song.has_preview() {
        "Play preview"
    } else {
        "Open"
    };
    out.push_str(&format!(
        r#"  </div>
  <button class="play-control" type="button" data-action="{kind}" data-target="{value}">{label}</button>
</li>
"#,
        kind = song.play_action.kind(),
        value = escape(song.play_action.value()),
    ));
}

const SCRIPT: &str = r#"(function () {
  var audio = document.getElementById('preview-audio');
  var source = document.getElementById('preview-source');
  var status = document.getElementById('now-playing-status');

  function playPreview(url, card) {
    document.getElementById('now-playing-title').textContent = card.dataset.title;
    document.getElementById('now-playing-artist').textContent = card.dataset.artist;
    document.getElementById('now-playing-art').src = card.dataset.image;
    source.src = url;
    audio.load();
    audio.play().then(function () {
      status.dataset.phase = PHASE_PLAYING;
      status.textContent = STATUS_PLAYING;
    }).catch(function (err) {
      console.warn('preview playback failed', err);
      status.dataset.phase = PHASE_FAILED;
      status.textContent = STATUS_UNAVAILABLE;
    });
  }

  function dispatch(el, card) {
    var target = el.dataset.target;
    if (el.dataset.action === 'play') {
      playPreview(target, card);
    } else if (el.dataset.action === 'open') {
      document.getElementById('now-playing-link').href = target;
      window.open(target, '_blank', 'noopener');
    } else {
      alert(target);
    }
  }

  document.querySelectorAll('.song-card').forEach(function (card) {
    card.addEventListener('click', function () { dispatch(card, card); });
    card.querySelector('.play-control').addEventListener('click', function (ev) {
      ev.stopPropagation();
      dispatch(ev.currentTarget, card);
    });
  });
})();"#;

// JSON string literals are valid JavaScript string literals
fn js_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

fn phase_name(phase: PlaybackPhase) -> String {
    serde_json::to_value(phase)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

// Phase names and labels come from `PlaybackPhase` so the script reports the
// same states as `PlaybackController`.
fn player_constants() -> String {
    format!(
        "var PHASE_IDLE = {};\nvar PHASE_PLAYING = {};\nvar PHASE_FAILED = {};\nvar STATUS_PLAYING = {};\nvar STATUS_UNAVAILABLE = {};\n",
        js_string(&phase_name(PlaybackPhase::Idle)),
        js_string(&phase_name(PlaybackPhase::Playing)),
        js_string(&phase_name(PlaybackPhase::Failed)),
        js_string(PlaybackPhase::Playing.status_label()),
        js_string(PlaybackPhase::Failed.status_label()),
    )
}

/// Render the song list page. An empty list renders the empty-catalog message.
pub fn render_page(songs: &[SongView]) -> String {
    let mut out = String::with_capacity(4096 + songs.len() * 768);
    out.push_str(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Songs</title>
</head>
<body>
<main>
<h1>Songs</h1>
"#,
    );

    if songs.is_empty() {
        out.push_str(&format!("<p class=\"empty\">{EMPTY_MESSAGE}</p>\n"));
    } else {
        out.push_str("<ul class=\"song-list\">\n");
        for song in songs {
            render_card(&mut out, song);
        }
        out.push_str("</ul>\n");
    }

    out.push_str(&format!(
        r#"</main>
<aside class="now-playing">
  <img id="now-playing-art" src="{PLACEHOLDER_IMAGE}" alt="">
  <h2 id="now-playing-title"></h2>
  <p id="now-playing-artist"></p>
  <p id="now-playing-status" data-phase="{idle}"></p>
  <a id="now-playing-link" href="" target="_blank" rel="noopener">Open in Spotify</a>
  <audio id="preview-audio" controls><source id="preview-source" src="" type="audio/mpeg"></audio>
</aside>
<script>
{constants}{SCRIPT}
</script>
</body>
</html>
"#,
        idle = escape(&phase_name(PlaybackPhase::Idle)),
        constants = player_constants(),
    ));
    out
}
