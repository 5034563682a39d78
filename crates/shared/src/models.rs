use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashMap;

/// Something the user follows, matched against include/exclude lists by its handle.
pub trait Followed {
    fn handle(&self) -> &str;
}

/// A content item that can be filtered and ordered by recency.
pub trait Timestamped {
    fn timestamp(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Subreddit {
    pub display_name: String,
}

impl Followed for Subreddit {
    fn handle(&self) -> &str {
        &self.display_name
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub permalink: String,
    pub author: String,
    pub subreddit: String,
    pub ups: i64,
    pub upvote_ratio: f64,
    pub num_comments: u64,
    pub flair: Option<String>,
    pub created: DateTime<Utc>,
    pub selftext: String,
    pub post_hint: Option<String>,
    pub is_gallery: Option<bool>,
    pub source_url: Option<String>,
    pub thumbnail: String,
}

impl Timestamped for Post {
    fn timestamp(&self) -> DateTime<Utc> {
        self.created
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostKind {
    Image,
    Video,
    Gallery,
    Link,
}

impl PostKind {
    pub fn classify(post: &Post) -> Self {
        match post.post_hint.as_deref() {
            Some("image") => return PostKind::Image,
            Some("hosted:video") | Some("rich:video") => return PostKind::Video,
            _ => {}
        }

        if post.is_gallery.is_some() {
            return PostKind::Gallery;
        }

        PostKind::Link
    }

    pub fn label(&self) -> &'static str {
        match self {
            PostKind::Image => "Image",
            PostKind::Video => "Video",
            PostKind::Gallery => "Gallery",
            PostKind::Link => "Link",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            PostKind::Image => "🖼 ",
            PostKind::Video => "🎥",
            PostKind::Gallery => "🌌",
            PostKind::Link => "🔗",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Artist {
    pub id: String,
    pub name: String,
}

impl Followed for Artist {
    fn handle(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackArtist {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub name: String,
    pub url: String,
    pub artists: Vec<TrackArtist>,
    pub release_date: NaiveDate,
    pub release_date_precision: String,
    pub duration_ms: u64,
}

impl Timestamped for Track {
    fn timestamp(&self) -> DateTime<Utc> {
        self.release_date.and_time(chrono::NaiveTime::MIN).and_utc()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TwitterUser {
    pub id: String,
    pub name: String,
    pub username: String,
}

impl Followed for TwitterUser {
    fn handle(&self) -> &str {
        &self.username
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TweetMetrics {
    pub reply_count: u64,
    pub retweet_count: u64,
    pub like_count: u64,
    pub quote_count: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tweet {
    pub id: String,
    pub text: String,
    pub created: DateTime<Utc>,
    pub author_id: String,
    pub metrics: TweetMetrics,
}

impl Timestamped for Tweet {
    fn timestamp(&self) -> DateTime<Utc> {
        self.created
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TweetKind {
    Reply,
    Retweet,
    Tweet,
}

impl TweetKind {
    pub fn classify(text: &str) -> Self {
        if text.starts_with('@') {
            TweetKind::Reply
        } else if text.starts_with("RT") {
            TweetKind::Retweet
        } else {
            TweetKind::Tweet
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TweetKind::Reply => "reply",
            TweetKind::Retweet => "retweet",
            TweetKind::Tweet => "tweet",
        }
    }
}

/// One followed user's tweets together with the users they reference.
#[derive(Debug, Clone, Default)]
pub struct TweetBatch {
    pub tweets: Vec<Tweet>,
    pub users: HashMap<String, TwitterUser>,
    pub result_count: usize,
}
