use anyhow::{Context, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::Deserialize;

use super::dates::parse_release_date;
use crate::config::require_var;
use crate::http::{build_client, form_body, read_json};
use crate::models::{Artist, Track, TrackArtist};

const TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const API_BASE_URL: &str = "https://api.spotify.com/v1";
const USER_AGENT: &str = "fomo/0.1";

/// Page size and upper bound for the followed-artists listing.
pub const ARTISTS_PAGE_SIZE: usize = 50;
pub const MAX_FOLLOWED_ARTISTS: usize = 500;

const CREDENTIALS_HELP: &str = "Create an app at https://developer.spotify.com/dashboard and \
    authorize it with the user-follow-read scope to obtain a refresh token.";

#[derive(Debug, Clone)]
pub struct SpotifyCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

impl SpotifyCredentials {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            client_id: require_var("SPOTIFY_CLIENT_ID", CREDENTIALS_HELP)?,
            client_secret: require_var("SPOTIFY_CLIENT_SECRET", CREDENTIALS_HELP)?,
            refresh_token: require_var("SPOTIFY_REFRESH_TOKEN", CREDENTIALS_HELP)?,
        })
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct FollowingResponse {
    artists: ArtistPage,
}

#[derive(Debug, Deserialize)]
struct ArtistPage {
    items: Vec<ArtistObject>,
    cursors: Option<Cursors>,
}

#[derive(Debug, Deserialize)]
struct Cursors {
    after: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ArtistObject {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    tracks: TrackPage,
}

#[derive(Debug, Deserialize)]
struct TrackPage {
    items: Vec<TrackObject>,
}

#[derive(Debug, Deserialize)]
struct ExternalUrls {
    #[serde(default)]
    spotify: String,
}

#[derive(Debug, Deserialize)]
struct SimpleArtist {
    name: String,
    external_urls: ExternalUrls,
}

#[derive(Debug, Deserialize)]
struct Album {
    release_date: String,
    release_date_precision: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TrackObject {
    name: String,
    external_urls: ExternalUrls,
    artists: Vec<SimpleArtist>,
    album: Album,
    #[serde(default)]
    duration_ms: u64,
}

impl TrackObject {
    /// `None` when the release date does not match its stated precision.
    pub(crate) fn into_track(self) -> Option<Track> {
        let Some(release_date) =
            parse_release_date(&self.album.release_date, &self.album.release_date_precision)
        else {
            tracing::warn!(
                track = %self.name,
                release_date = %self.album.release_date,
                precision = %self.album.release_date_precision,
                "skipping track with unparseable release date"
            );
            return None;
        };

        Some(Track {
            name: self.name,
            url: self.external_urls.spotify,
            artists: self
                .artists
                .into_iter()
                .map(|a| TrackArtist {
                    name: a.name,
                    url: a.external_urls.spotify,
                })
                .collect(),
            release_date,
            release_date_precision: self.album.release_date_precision,
            duration_ms: self.duration_ms,
        })
    }
}

pub struct SpotifyClient {
    client: Client,
    access_token: String,
}

impl SpotifyClient {
    /// Exchanges the stored refresh token for an access token.
    pub async fn connect(credentials: &SpotifyCredentials) -> Result<Self> {
        let client = build_client(USER_AGENT)?;

        let body = form_body(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", &credentials.refresh_token),
        ]);

        let response = client
            .post(TOKEN_URL)
            .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await
            .context("Failed to request Spotify access token")?;

        let token: TokenResponse = read_json(response, "Spotify").await?;
        tracing::debug!("authenticated with Spotify");

        Ok(Self {
            client,
            access_token: token.access_token,
        })
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", url))?;

        read_json(response, "Spotify").await
    }

    pub async fn followed_artists(&self) -> Result<Vec<Artist>> {
        let mut artists = Vec::new();
        let mut after: Option<String> = None;

        while artists.len() < MAX_FOLLOWED_ARTISTS {
            let mut url = format!(
                "{}/me/following?type=artist&limit={}",
                API_BASE_URL, ARTISTS_PAGE_SIZE
            );
            if let Some(after) = &after {
                url.push_str(&format!("&after={}", urlencoding::encode(after)));
            }

            let page: FollowingResponse = self.get(&url).await?;
            let count = page.artists.items.len();
            artists.extend(page.artists.items.into_iter().map(|a| Artist {
                id: a.id,
                name: a.name,
            }));

            match page.artists.cursors.and_then(|c| c.after) {
                Some(next) if count > 0 => after = Some(next),
                _ => break,
            }
        }

        artists.truncate(MAX_FOLLOWED_ARTISTS);
        tracing::debug!(count = artists.len(), "fetched followed artists");
        Ok(artists)
    }

    /// Search results for `artist:<name>`, with unparseable tracks dropped.
    pub async fn artist_tracks(&self, artist: &Artist) -> Result<Vec<Track>> {
        let query = format!("artist:{}", artist.name);
        let url = format!(
            "{}/search?type=track&q={}",
            API_BASE_URL,
            urlencoding::encode(&query)
        );

        let response: SearchResponse = self.get(&url).await?;
        Ok(response
            .tracks
            .items
            .into_iter()
            .filter_map(TrackObject::into_track)
            .collect())
    }
}
