use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashSet;

use crate::models::{Followed, Timestamped, Track};

/// Include/exclude selection of followed entities by lower-cased handle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EntityFilter {
    Include(Vec<String>),
    Exclude(Vec<String>),
    #[default]
    All,
}

impl EntityFilter {
    /// Builds a filter from CLI lists. The include list wins if both are set.
    pub fn new(include: Option<Vec<String>>, exclude: Option<Vec<String>>) -> Self {
        let lower = |names: Vec<String>| -> Vec<String> {
            names.into_iter().map(|n| n.to_lowercase()).collect()
        };

        match (include, exclude) {
            (Some(include), _) if !include.is_empty() => EntityFilter::Include(lower(include)),
            (_, Some(exclude)) if !exclude.is_empty() => EntityFilter::Exclude(lower(exclude)),
            _ => EntityFilter::All,
        }
    }

    pub fn apply<T, I>(&self, entities: I) -> Vec<T>
    where
        T: Followed,
        I: IntoIterator<Item = T>,
    {
        match self {
            EntityFilter::Include(names) => entities
                .into_iter()
                .filter(|e| names.contains(&e.handle().to_lowercase()))
                .collect(),
            EntityFilter::Exclude(names) => entities
                .into_iter()
                .filter(|e| !names.contains(&e.handle().to_lowercase()))
                .collect(),
            EntityFilter::All => entities.into_iter().collect(),
        }
    }
}

/// The recency window of a run: everything after `cutoff`, up to `now`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub now: DateTime<Utc>,
    pub cutoff: DateTime<Utc>,
}

impl TimeWindow {
    /// Fails for a negative lookback or one reaching past the representable date range.
    pub fn new(now: DateTime<Utc>, lookback: Duration) -> Result<Self> {
        if lookback < Duration::zero() {
            anyhow::bail!("Lookback must not be negative, got {}", lookback);
        }

        let cutoff = now
            .checked_sub_signed(lookback)
            .with_context(|| format!("Lookback of {} reaches past the earliest supported date", lookback))?;

        Ok(Self { now, cutoff })
    }

    pub fn hours_before(now: DateTime<Utc>, hours: i64) -> Result<Self> {
        let lookback = Duration::try_hours(hours)
            .with_context(|| format!("{} hours is out of range", hours))?;
        Self::new(now, lookback)
    }

    pub fn days_before(now: DateTime<Utc>, days: i64) -> Result<Self> {
        let lookback =
            Duration::try_days(days).with_context(|| format!("{} days is out of range", days))?;
        Self::new(now, lookback)
    }

    pub fn hours_ago(hours: i64) -> Result<Self> {
        Self::hours_before(Utc::now(), hours)
    }

    pub fn days_ago(days: i64) -> Result<Self> {
        Self::days_before(Utc::now(), days)
    }

    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        timestamp > self.cutoff && timestamp <= self.now
    }

    pub fn filter<T: Timestamped>(&self, items: Vec<T>) -> Vec<T> {
        items
            .into_iter()
            .filter(|item| self.contains(item.timestamp()))
            .collect()
    }
}

/// Most recent first. Items sharing a timestamp keep their relative order.
pub fn sort_newest_first<T: Timestamped>(items: &mut [T]) {
    items.sort_by_key(|item| std::cmp::Reverse(item.timestamp()));
}

/// Drops tracks whose URL already appeared earlier in the same batch.
pub fn dedupe_tracks(batch: Vec<Track>) -> Vec<Track> {
    let mut seen = HashSet::new();
    batch
        .into_iter()
        .filter(|track| seen.insert(track.url.clone()))
        .collect()
}
