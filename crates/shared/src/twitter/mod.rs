//! Twitter: recent tweets from followed users.
mod client;

pub use client::{TwitterClient, TwitterCredentials};

use anyhow::{Context, Result};
use chrono_tz::Tz;
use crossterm::style::{Color, Stylize};

use crate::console::{link, pad, progress, rule, terminal_width};
use crate::filters::{sort_newest_first, EntityFilter, TimeWindow};
use crate::models::{Tweet, TweetBatch, TweetKind, TwitterUser};

#[derive(Debug, Clone)]
pub struct TwitterOptions {
    pub hours_ago: i64,
    pub users: EntityFilter,
    pub include_retweets: bool,
    pub include_replies: bool,
    pub timezone: Tz,
}

/// Tweet types to leave out of the timeline request; `None` when nothing is excluded.
pub fn excluded_tweet_types(include_retweets: bool, include_replies: bool) -> Option<Vec<&'static str>> {
    let mut excluded = vec!["replies", "retweets"];
    if include_replies {
        excluded.retain(|t| *t != "replies");
    }
    if include_retweets {
        excluded.retain(|t| *t != "retweets");
    }

    (!excluded.is_empty()).then_some(excluded)
}

/// Keeps a batch's tweets inside the window, newest first.
///
/// Returns `None` when nothing is left; `result_count` is updated to the tweets kept.
pub fn prepare_batch(mut batch: TweetBatch, window: &TimeWindow) -> Option<TweetBatch> {
    batch.tweets = window.filter(batch.tweets);
    if batch.tweets.is_empty() {
        return None;
    }

    sort_newest_first(&mut batch.tweets);
    batch.result_count = batch.tweets.len();
    Some(batch)
}

pub fn format_tweet_count(batches: &[TweetBatch]) -> String {
    if batches.is_empty() {
        return "No tweets found.".red().bold().to_string();
    }

    let count: usize = batches.iter().map(|b| b.result_count).sum();
    let noun = if count == 1 { "tweet" } else { "tweets" };
    format!("{} new {}", count, noun).green().to_string()
}

fn kind_color(kind: TweetKind) -> Color {
    match kind {
        TweetKind::Reply => Color::Blue,
        TweetKind::Retweet => Color::Green,
        TweetKind::Tweet => Color::Red,
    }
}

pub fn format_tweet(tweet: &Tweet, user: Option<&TwitterUser>, timezone: Tz) -> String {
    let (name, handle) = match user {
        Some(user) => (
            user.name.as_str(),
            link(
                &format!("https://twitter.com/{}", user.username),
                &format!("@{}", user.username),
            ),
        ),
        None => (
            "unknown",
            link(
                &format!("https://twitter.com/i/user/{}", tweet.author_id),
                &format!("user {}", tweet.author_id),
            ),
        ),
    };
    let created = tweet
        .created
        .with_timezone(&timezone)
        .format("%b %-d %H:%M");

    let kind = TweetKind::classify(&tweet.text);
    let go_to = link(
        &format!("https://twitter.com/twitter/status/{}", tweet.id),
        &format!("Go to {} →", kind.label())
            .with(kind_color(kind))
            .bold()
            .to_string(),
    );

    let metrics = &tweet.metrics;
    format!(
        "{} {} · {} ({})\n\n{}\n\n💬 {}  🔃 {}  ♥️  {}  {}",
        name.bold(),
        handle,
        created,
        timezone.name(),
        tweet.text,
        metrics.reply_count,
        metrics.retweet_count,
        metrics.like_count,
        go_to
    )
}

pub async fn run(options: &TwitterOptions) -> Result<()> {
    let credentials = TwitterCredentials::from_env()?;
    let client = TwitterClient::new(&credentials)?;

    let me = client.me().await.context("Failed to look up the authenticated Twitter user")?;
    let following = options.users.apply(client.following(&me.id).await?);
    let window = TimeWindow::hours_ago(options.hours_ago)?;
    let exclude = excluded_tweet_types(options.include_retweets, options.include_replies);

    tracing::info!(
        users = following.len(),
        cutoff = %window.cutoff,
        exclude = ?exclude,
        "fetching tweets"
    );

    let bar = progress(
        following.len(),
        format!("Twitter: finding tweets since {}h ago", options.hours_ago),
    );
    let mut batches = Vec::new();
    for user in &following {
        let batch = client
            .tweets_since(&user.id, window.cutoff, exclude.as_deref())
            .await
            .with_context(|| format!("Failed to fetch tweets from @{}", user.username))?;
        bar.inc(1);

        if let Some(batch) = prepare_batch(batch, &window) {
            batches.push(batch);
        }
    }
    bar.finish_and_clear();

    println!("{}", format_tweet_count(&batches));

    let width = terminal_width();
    for batch in &batches {
        for tweet in &batch.tweets {
            let user = batch.users.get(&tweet.author_id);
            println!("{}", rule(None, width));
            println!("{}", pad(&format_tweet(tweet, user, options.timezone)));
        }
    }
    if !batches.is_empty() {
        println!("{}", rule(None, width));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TweetMetrics;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn tweet(id: &str, text: &str, created: DateTime<Utc>) -> Tweet {
        Tweet {
            id: id.to_string(),
            text: text.to_string(),
            created,
            author_id: "42".to_string(),
            metrics: TweetMetrics {
                reply_count: 4,
                retweet_count: 5,
                like_count: 6,
                quote_count: 0,
            },
        }
    }

    fn ferris() -> TwitterUser {
        TwitterUser {
            id: "42".to_string(),
            name: "Ferris".to_string(),
            username: "ferris".to_string(),
        }
    }

    #[test]
    fn test_excluded_types_default() {
        assert_eq!(excluded_tweet_types(false, false), Some(vec!["replies", "retweets"]));
    }

    #[test]
    fn test_excluded_types_with_flags() {
        assert_eq!(excluded_tweet_types(true, false), Some(vec!["replies"]));
        assert_eq!(excluded_tweet_types(false, true), Some(vec!["retweets"]));
        assert_eq!(excluded_tweet_types(true, true), None);
    }

    #[test]
    fn test_prepare_batch_sorts_within_window() {
        let now = Utc.with_ymd_and_hms(2026, 2, 1, 12, 0, 0).unwrap();
        let window = TimeWindow::new(now, Duration::hours(24)).unwrap();
        let batch = TweetBatch {
            tweets: vec![
                tweet("1", "a", now - Duration::hours(5)),
                tweet("2", "b", now - Duration::hours(1)),
                tweet("3", "c", now - Duration::hours(30)),
            ],
            result_count: 3,
            ..Default::default()
        };

        let batch = prepare_batch(batch, &window).unwrap();
        assert_eq!(batch.result_count, 2);

        let ids: Vec<String> = batch
            .tweets
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec!["2", "1"]);
    }

    #[test]
    fn test_batch_emptied_by_window_is_dropped() {
        let now = Utc.with_ymd_and_hms(2026, 2, 1, 12, 0, 0).unwrap();
        let window = TimeWindow::new(now, Duration::hours(2)).unwrap();
        let batch = TweetBatch {
            tweets: vec![tweet("1", "a", now - Duration::hours(3))],
            result_count: 1,
            ..Default::default()
        };

        let kept: Vec<TweetBatch> = prepare_batch(batch, &window).into_iter().collect();
        assert!(kept.is_empty());
        assert!(format_tweet_count(&kept).contains("No tweets found."));
    }

    #[test]
    fn test_tweet_count_sums_batches() {
        let batches = vec![
            TweetBatch {
                result_count: 2,
                ..Default::default()
            },
            TweetBatch {
                result_count: 3,
                ..Default::default()
            },
        ];
        assert!(format_tweet_count(&batches).contains("5 new tweets"));
        assert!(format_tweet_count(&batches[..0]).contains("No tweets found."));
        assert!(format_tweet_count(&[TweetBatch {
            result_count: 1,
            ..Default::default()
        }])
        .contains("1 new tweet"));
    }

    #[test]
    fn test_format_tweet() {
        let created = Utc.with_ymd_and_hms(2026, 2, 1, 12, 0, 0).unwrap();
        let out = format_tweet(
            &tweet("1890", "RT something", created),
            Some(&ferris()),
            Tz::America__New_York,
        );

        assert!(out.contains("Ferris"));
        assert!(out.contains("@ferris"));
        assert!(out.contains("Feb 1 07:00 (America/New_York)"));
        assert!(out.contains("💬 4  🔃 5  ♥️  6"));
        assert!(out.contains("Go to retweet →"));
        assert!(out.contains("https://twitter.com/twitter/status/1890"));
    }

    #[test]
    fn test_format_tweet_without_author() {
        let created = Utc.with_ymd_and_hms(2026, 2, 1, 12, 0, 0).unwrap();
        let out = format_tweet(&tweet("1", "@alice hi", created), None, Tz::UTC);
        assert!(!out.contains("@42"));
        assert!(!out.contains("https://twitter.com/42"));
        assert!(out.contains("https://twitter.com/i/user/42"));
        assert!(out.contains("user 42"));
        assert!(out.contains("Go to reply →"));
    }
}
