//! Spotify: recent releases from followed artists.
mod client;
mod dates;

pub use client::{SpotifyClient, SpotifyCredentials};
pub use dates::{date_tokens, display_release_date, parse_release_date, DateTokens};

use anyhow::{Context, Result};
use crossterm::style::Stylize;

use crate::console::{link, progress};
use crate::filters::{dedupe_tracks, sort_newest_first, EntityFilter, TimeWindow};
use crate::models::{Track, TrackArtist};

#[derive(Debug, Clone)]
pub struct SpotifyOptions {
    pub days_ago: i64,
    pub artists: EntityFilter,
}

/// One artist's search results reduced to unique tracks released inside the window.
///
/// Duplicates are only detected within this batch; the same track found under another
/// followed artist is kept.
pub fn artist_batch(tracks: Vec<Track>, window: &TimeWindow) -> Vec<Track> {
    dedupe_tracks(window.filter(tracks))
}

/// Concatenates per-artist batches and orders them by release date, newest first.
pub fn aggregate(batches: Vec<Vec<Track>>) -> Vec<Track> {
    let mut all: Vec<Track> = batches.into_iter().flatten().collect();
    sort_newest_first(&mut all);
    all
}

fn format_duration(duration_ms: u64) -> String {
    let seconds = duration_ms / 1000;
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

pub fn format_artists(artists: &[TrackArtist], delimiter: &str) -> String {
    artists
        .iter()
        .map(|a| link(&a.url, &a.name.as_str().green().to_string()))
        .collect::<Vec<_>>()
        .join(delimiter)
}

pub fn format_track(position: usize, track: &Track) -> String {
    let title = link(&track.url, &track.name.as_str().red().bold().to_string());
    let release_date = display_release_date(track.release_date, &track.release_date_precision);

    format!(
        "{}. {} {} by {} on {}",
        position,
        title,
        format_duration(track.duration_ms),
        format_artists(&track.artists, ", "),
        release_date.white().bold()
    )
}

pub async fn run(options: &SpotifyOptions) -> Result<()> {
    let credentials = SpotifyCredentials::from_env()?;
    let client = SpotifyClient::connect(&credentials)
        .await
        .context("Failed to authenticate with Spotify")?;

    let artists = options.artists.apply(client.followed_artists().await?);
    let window = TimeWindow::days_ago(options.days_ago)?;

    tracing::info!(
        artists = artists.len(),
        cutoff = %window.cutoff,
        "searching spotify releases"
    );

    let bar = progress(
        artists.len(),
        format!("Spotify: finding songs released since {}d ago", options.days_ago),
    );
    let mut batches = Vec::with_capacity(artists.len());
    for artist in &artists {
        let tracks = client
            .artist_tracks(artist)
            .await
            .with_context(|| format!("Failed to search tracks by {}", artist.name))?;
        batches.push(artist_batch(tracks, &window));
        bar.inc(1);
    }
    bar.finish_and_clear();

    let tracks = aggregate(batches);
    if tracks.is_empty() {
        println!(
            "{} No songs released in the past {} days.",
            "Spotify".bold().green(),
            options.days_ago
        );
        return Ok(());
    }

    for (index, track) in tracks.iter().enumerate() {
        println!("{}", format_track(index + 1, track));
    }

    Ok(())
}
