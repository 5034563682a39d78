use anyhow::{Context, Result};
use chrono::DateTime;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde::Deserialize;

use crate::config::require_var;
use crate::http::{build_client, form_body, read_json};
use crate::models::{Post, Subreddit};

const TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";
const API_BASE_URL: &str = "https://oauth.reddit.com";
const PAGE_SIZE: u32 = 100;

const CREDENTIALS_HELP: &str =
    "Create a \"script\" app at https://www.reddit.com/prefs/apps to get a client id and secret.";

#[derive(Debug, Clone)]
pub struct RedditCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub username: String,
    pub password: String,
    pub user_agent: String,
}

impl RedditCredentials {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            client_id: require_var("REDDIT_CLIENT_ID", CREDENTIALS_HELP)?,
            client_secret: require_var("REDDIT_CLIENT_SECRET", CREDENTIALS_HELP)?,
            username: require_var("REDDIT_USERNAME", CREDENTIALS_HELP)?,
            password: require_var("REDDIT_PASSWORD", CREDENTIALS_HELP)?,
            user_agent: require_var(
                "REDDIT_USER_AGENT",
                "Reddit asks for a descriptive user agent, e.g. \"fomo/0.1 by u/your_name\".",
            )?,
        })
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct Listing<T> {
    data: ListingData<T>,
}

#[derive(Debug, Deserialize)]
struct ListingData<T> {
    after: Option<String>,
    children: Vec<Thing<T>>,
}

#[derive(Debug, Deserialize)]
struct Thing<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct SubredditData {
    display_name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubmissionData {
    id: String,
    title: String,
    permalink: String,
    #[serde(default)]
    author: String,
    subreddit_name_prefixed: String,
    #[serde(default)]
    ups: i64,
    #[serde(default)]
    upvote_ratio: f64,
    #[serde(default)]
    num_comments: u64,
    link_flair_text: Option<String>,
    created_utc: f64,
    #[serde(default)]
    selftext: String,
    post_hint: Option<String>,
    is_gallery: Option<bool>,
    url_overridden_by_dest: Option<String>,
    #[serde(default)]
    thumbnail: String,
}

impl SubmissionData {
    pub(crate) fn into_post(self) -> Result<Post> {
        let created = DateTime::from_timestamp(self.created_utc as i64, 0)
            .with_context(|| format!("Post {} has an invalid created_utc", self.id))?;

        Ok(Post {
            id: self.id,
            title: self.title,
            permalink: self.permalink,
            author: self.author,
            subreddit: self.subreddit_name_prefixed,
            ups: self.ups,
            upvote_ratio: self.upvote_ratio,
            num_comments: self.num_comments,
            flair: self.link_flair_text.filter(|f| !f.is_empty()),
            created,
            selftext: self.selftext,
            post_hint: self.post_hint,
            is_gallery: self.is_gallery,
            source_url: self.url_overridden_by_dest,
            thumbnail: self.thumbnail,
        })
    }
}

pub struct RedditClient {
    client: Client,
    access_token: String,
}

impl RedditClient {
    /// Authenticates with the password grant of a "script" app.
    pub async fn connect(credentials: &RedditCredentials) -> Result<Self> {
        let client = build_client(&credentials.user_agent)?;

        let body = form_body(&[
            ("grant_type", "password"),
            ("username", &credentials.username),
            ("password", &credentials.password),
        ]);

        let response = client
            .post(TOKEN_URL)
            .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await
            .context("Failed to request Reddit access token")?;

        let token: TokenResponse = read_json(response, "Reddit").await?;
        tracing::debug!("authenticated with Reddit");

        Ok(Self {
            client,
            access_token: token.access_token,
        })
    }

    async fn get_listing<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<ListingData<T>> {
        let response = self
            .client
            .get(url)
            .header(AUTHORIZATION, format!("bearer {}", self.access_token))
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", url))?;

        let listing: Listing<T> = read_json(response, "Reddit").await?;
        Ok(listing.data)
    }

    pub async fn subscribed_subreddits(&self) -> Result<Vec<Subreddit>> {
        let mut subreddits = Vec::new();
        let mut after: Option<String> = None;

        loop {
            let mut url = format!(
                "{}/subreddits/mine/subscriber?limit={}",
                API_BASE_URL, PAGE_SIZE
            );
            if let Some(after) = &after {
                url.push_str(&format!("&after={}", urlencoding::encode(after)));
            }

            let page: ListingData<SubredditData> = self.get_listing(&url).await?;
            subreddits.extend(page.children.into_iter().map(|thing| Subreddit {
                display_name: thing.data.display_name,
            }));

            match page.after {
                Some(next) => after = Some(next),
                None => break,
            }
        }

        tracing::debug!(count = subreddits.len(), "fetched subscribed subreddits");
        Ok(subreddits)
    }

    pub async fn new_posts(&self, subreddit: &Subreddit) -> Result<Vec<Post>> {
        let url = format!(
            "{}/r/{}/new?limit={}",
            API_BASE_URL,
            urlencoding::encode(&subreddit.display_name),
            PAGE_SIZE
        );

        let page: ListingData<SubmissionData> = self.get_listing(&url).await?;
        page.children
            .into_iter()
            .map(|thing| thing.data.into_post())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    #[test]
    fn test_submission_maps_to_post() {
        let raw = json!({
            "id": "1abcd",
            "title": "Rust 2.0 announced",
            "permalink": "/r/rust/comments/1abcd/rust_20_announced/",
            "author": "ferris",
            "subreddit_name_prefixed": "r/rust",
            "ups": 420,
            "upvote_ratio": 0.97,
            "num_comments": 69,
            "link_flair_text": "",
            "created_utc": 1769947200.0,
            "selftext": "",
            "post_hint": "link",
            "url_overridden_by_dest": "https://blog.rust-lang.org",
            "thumbnail": "default"
        });

        let post = serde_json::from_value::<SubmissionData>(raw)
            .unwrap()
            .into_post()
            .unwrap();

        assert_eq!(post.subreddit, "r/rust");
        assert_eq!(post.flair, None);
        assert_eq!(post.is_gallery, None);
        assert_eq!(post.source_url.as_deref(), Some("https://blog.rust-lang.org"));
        assert_eq!(post.created, Utc.with_ymd_and_hms(2026, 2, 1, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_listing_parses_children_and_cursor() {
        let raw = json!({
            "kind": "Listing",
            "data": {
                "after": "t5_2fwo",
                "children": [
                    { "kind": "t5", "data": { "display_name": "rust" } },
                    { "kind": "t5", "data": { "display_name": "AskScience" } }
                ]
            }
        });

        let listing: Listing<SubredditData> = serde_json::from_value(raw).unwrap();
        assert_eq!(listing.data.after.as_deref(), Some("t5_2fwo"));
        assert_eq!(listing.data.children[1].data.display_name, "AskScience");
    }
}
