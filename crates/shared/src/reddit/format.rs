use chrono_tz::Tz;
use crossterm::style::Stylize;

use crate::console::{link, pad, rule};
use crate::models::{Post, PostKind};

pub const BASE_URL: &str = "https://www.reddit.com";

/// Thumbnail values Reddit uses to mark content that should be flagged.
const FLAGGED_THUMBNAILS: [&str; 2] = ["nsfw", "spoiler"];

pub fn format_header(hours_ago: i64) -> String {
    format!(
        "{} Showing posts since {} ago 👇",
        "Reddit".bold().red(),
        format!("{}h", hours_ago).bold()
    )
}

pub fn format_post_count(count: usize) -> String {
    match count {
        0 => "No posts".to_string(),
        1 => "1 new post".to_string(),
        n => format!("{} new posts", n),
    }
}

pub fn format_subreddit_banner(display_name: &str, count: usize) -> String {
    format!(
        "{} {}",
        format!(" r/{} ", display_name).black().on_white(),
        format_post_count(count).green()
    )
}

pub fn format_ratio(ratio: f64) -> String {
    let emoji = if ratio >= 0.75 {
        "😊"
    } else if ratio >= 0.5 {
        "😐"
    } else if ratio >= 0.25 {
        "🙁"
    } else {
        "😡"
    };

    format!("{} {}%", emoji, (ratio * 100.0).round() as i64)
}

fn format_info_line(post: &Post, timezone: Tz) -> String {
    let ups = format!("↑{}", post.ups).red();
    let comments = format!("💬 {}", post.num_comments);
    let flair = post
        .flair
        .as_deref()
        .map(|f| format!(" | {}", f.bold().white()))
        .unwrap_or_default();
    let subreddit_link = link(
        &format!("{}/{}", BASE_URL, post.subreddit),
        &post.subreddit.as_str().green().to_string(),
    );
    let author_link = link(
        &format!("{}/user/{}", BASE_URL, post.author),
        &format!("u/{}", post.author).green().to_string(),
    );
    let created = post
        .created
        .with_timezone(&timezone)
        .format("%b %-d %H:%M")
        .to_string();

    format!(
        "{}  {}  {}{} | {} in {} | {} ({})",
        ups,
        format_ratio(post.upvote_ratio),
        comments,
        flair,
        author_link,
        subreddit_link,
        created.bold(),
        timezone.name()
    )
}

/// Full rendering of one post, framed by rules `width` columns wide.
pub fn format_post(post: &Post, timezone: Tz, width: usize) -> String {
    let kind = PostKind::classify(post);
    let mut lines = Vec::new();

    let header = format!("{} {}", kind.emoji(), kind.label());
    lines.push(rule(Some(&header), width));

    let title = link(
        &format!("{}{}", BASE_URL, post.permalink),
        &post.title.as_str().green().to_string(),
    );
    lines.push(pad(&title));

    if !post.selftext.trim().is_empty() {
        lines.push(String::new());
        lines.push(pad(post.selftext.trim()));
        lines.push(String::new());
    }

    if let Some(source_url) = &post.source_url {
        let tag = if FLAGGED_THUMBNAILS.contains(&post.thumbnail.as_str()) {
            format!(" {}", format!(" {} ", post.thumbnail).white().on_red())
        } else {
            String::new()
        };
        let label = format!("{}{}", "View source".bold().blue(), tag);
        lines.push(pad(&link(source_url, &label)));
        lines.push(String::new());
    }

    lines.push(pad(&format_info_line(post, timezone)));
    lines.push(rule(None, width));

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample_post() -> Post {
        Post {
            id: "1abcd".to_string(),
            title: "Rust 2.0 announced".to_string(),
            permalink: "/r/rust/comments/1abcd/rust_20_announced/".to_string(),
            author: "ferris".to_string(),
            subreddit: "r/rust".to_string(),
            ups: 420,
            upvote_ratio: 0.97,
            num_comments: 69,
            flair: Some("News".to_string()),
            created: Utc.with_ymd_and_hms(2026, 2, 1, 12, 0, 0).unwrap(),
            selftext: "Body text".to_string(),
            post_hint: Some("image".to_string()),
            is_gallery: None,
            source_url: Some("https://i.redd.it/x.png".to_string()),
            thumbnail: "spoiler".to_string(),
        }
    }

    #[test]
    fn test_post_count() {
        assert_eq!(format_post_count(0), "No posts");
        assert_eq!(format_post_count(1), "1 new post");
        assert_eq!(format_post_count(7), "7 new posts");
    }

    #[test]
    fn test_ratio_buckets() {
        assert_eq!(format_ratio(0.97), "😊 97%");
        assert_eq!(format_ratio(0.5), "😐 50%");
        assert_eq!(format_ratio(0.3), "🙁 30%");
        assert_eq!(format_ratio(0.1), "😡 10%");
    }

    #[test]
    fn test_post_renders_in_display_timezone() {
        let out = format_post(&sample_post(), Tz::Europe__Prague, 40);
        assert!(out.contains("Feb 1 13:00"));
        assert!(out.contains("(Europe/Prague)"));
    }

    #[test]
    fn test_post_includes_kind_body_and_source() {
        let out = format_post(&sample_post(), Tz::UTC, 40);
        assert!(out.contains("Image"));
        assert!(out.contains("Body text"));
        assert!(out.contains("View source"));
        assert!(out.contains("spoiler"));
        assert!(out.contains("https://www.reddit.com/r/rust/comments/1abcd/rust_20_announced/"));
    }

    #[test]
    fn test_post_without_source_or_body() {
        let mut post = sample_post();
        post.source_url = None;
        post.selftext = "   ".to_string();
        let out = format_post(&post, Tz::UTC, 40);
        assert!(!out.contains("View source"));
        assert!(!out.contains("Body text"));
    }
}
