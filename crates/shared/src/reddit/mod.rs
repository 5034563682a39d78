//! Reddit: new posts from the user's subscribed subreddits.
mod client;
mod format;

pub use client::{RedditClient, RedditCredentials};
pub use format::{format_post, format_post_count, format_ratio};

use anyhow::{Context, Result};
use chrono_tz::Tz;

use crate::console::terminal_width;
use crate::filters::{sort_newest_first, EntityFilter, TimeWindow};
use crate::models::Post;

#[derive(Debug, Clone)]
pub struct RedditOptions {
    pub hours_ago: i64,
    pub subreddits: EntityFilter,
    pub timezone: Tz,
}

/// Posts inside the window, newest first.
pub fn recent_posts(posts: Vec<Post>, window: &TimeWindow) -> Vec<Post> {
    let mut posts = window.filter(posts);
    sort_newest_first(&mut posts);
    posts
}

pub async fn run(options: &RedditOptions) -> Result<()> {
    let credentials = RedditCredentials::from_env()?;
    let client = RedditClient::connect(&credentials)
        .await
        .context("Failed to authenticate with Reddit")?;

    let subreddits = options
        .subreddits
        .apply(client.subscribed_subreddits().await?);
    let window = TimeWindow::hours_ago(options.hours_ago)?;
    let width = terminal_width();

    tracing::info!(
        subreddits = subreddits.len(),
        cutoff = %window.cutoff,
        "rendering reddit posts"
    );

    println!("{}", format::format_header(options.hours_ago));

    for subreddit in &subreddits {
        let posts = client
            .new_posts(subreddit)
            .await
            .with_context(|| format!("Failed to fetch posts from r/{}", subreddit.display_name))?;
        let posts = recent_posts(posts, &window);

        println!(
            "\n{}",
            format::format_subreddit_banner(&subreddit.display_name, posts.len())
        );

        for post in &posts {
            println!("{}", format_post(post, options.timezone, width));
        }
    }

    Ok(())
}
