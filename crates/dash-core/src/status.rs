//! Wire schema for the appliance's playback status.
//!
//! The same JSON shape arrives over the status socket and from the poll
//! endpoint. Nullable fields are `Option`s; unknown fields are ignored.
use crate::error::StatusError;
use serde::Deserialize;

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Status {
    pub success: bool,
    pub message: String,
    #[serde(default)]
    pub recorded_at: Option<String>,
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub rms: Option<f64>,
    #[serde(default)]
    pub track: Option<Track>,
    #[serde(default)]
    pub last_fm_track: Option<LastFmTrack>,
    #[serde(default)]
    pub last_fm_artist: Option<LastFmArtist>,
    #[serde(default)]
    pub last_fm_album: Option<LastFmAlbum>,
    #[serde(default)]
    pub duration_seconds: Option<f64>,
    #[serde(default)]
    pub next_scan: Option<String>,
    #[serde(default)]
    pub scan_ends: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Track {
    pub track_name: String,
    #[serde(default)]
    pub track_id: Option<String>,
    #[serde(default)]
    pub track_guid: Option<String>,
    #[serde(default)]
    pub duration_seconds: Option<f64>,
    #[serde(default)]
    pub artist_name: Option<String>,
    #[serde(default)]
    pub album_name: Option<String>,
    #[serde(default)]
    pub track_image: Option<String>,
    #[serde(default)]
    pub artist_image: Option<String>,
    #[serde(default)]
    pub last_fm: Option<LastFmTrack>,
    #[serde(default)]
    pub released: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct LastFmTrack {
    pub name: String,
    pub url: String,
    pub duration: f64,
    pub duration_seconds: f64,
    #[serde(default)]
    pub wiki: Option<LastFmWiki>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct LastFmWiki {
    pub summary: String,
    pub content: String,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct LastFmImage {
    #[serde(rename = "#text")]
    pub url: String,
    pub size: String,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct LastFmBio {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct LastFmArtist {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub image: Vec<LastFmImage>,
    #[serde(default)]
    pub bio: Option<LastFmBio>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct LastFmAlbum {
    pub name: String,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub image: Vec<LastFmImage>,
}

impl Status {
    /// Parse and validate one status document.
    pub fn from_json(text: &str) -> Result<Status, StatusError> {
        if text.trim().is_empty() {
            return Err(StatusError::Empty);
        }
        Ok(serde_json::from_str(text)?)
    }

    /// `"Track - Artist"`, or the status message when nothing is playing.
    pub fn headline(&self) -> String {
        match &self.track {
            Some(t) => match t.artist_name.as_deref() {
                Some(artist) if !artist.is_empty() => format!("{} - {}", t.track_name, artist),
                _ => t.track_name.clone(),
            },
            None => self.message.clone(),
        }
    }

    /// Stable identity of the playing track, if any.
    pub fn track_key(&self) -> Option<&str> {
        let t = self.track.as_ref()?;
        t.track_guid
            .as_deref()
            .or(t.track_id.as_deref())
            .or(Some(t.track_name.as_str()))
    }
}
