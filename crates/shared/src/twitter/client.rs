use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;

use crate::config::require_var;
use crate::http::{build_client, read_json};
use crate::models::{Tweet, TweetBatch, TweetMetrics, TwitterUser};

const API_BASE_URL: &str = "https://api.twitter.com/2";
const USER_AGENT: &str = "fomo/0.1";
const FOLLOWING_PAGE_SIZE: u32 = 1000;
const TWEETS_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone)]
pub struct TwitterCredentials {
    pub access_token: String,
}

impl TwitterCredentials {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            access_token: require_var(
                "TWITTER_ACCESS_TOKEN",
                "Use an OAuth 2.0 user access token with the tweet.read, users.read and \
                follows.read scopes from https://developer.twitter.com/en/portal/dashboard",
            )?,
        })
    }
}

#[derive(Debug, Deserialize)]
struct UserObject {
    id: String,
    name: String,
    username: String,
}

impl From<UserObject> for TwitterUser {
    fn from(user: UserObject) -> Self {
        TwitterUser {
            id: user.id,
            name: user.name,
            username: user.username,
        }
    }
}

#[derive(Debug, Deserialize)]
struct MeResponse {
    data: UserObject,
}

#[derive(Debug, Deserialize)]
struct FollowingResponse {
    #[serde(default)]
    data: Vec<UserObject>,
    meta: Option<PageMeta>,
}

#[derive(Debug, Deserialize)]
struct PageMeta {
    #[serde(default)]
    result_count: usize,
    next_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PublicMetrics {
    #[serde(default)]
    reply_count: u64,
    #[serde(default)]
    retweet_count: u64,
    #[serde(default)]
    like_count: u64,
    #[serde(default)]
    quote_count: u64,
}

#[derive(Debug, Deserialize)]
struct TweetObject {
    id: String,
    text: String,
    created_at: String,
    #[serde(default)]
    author_id: String,
    public_metrics: Option<PublicMetrics>,
}

impl TweetObject {
    fn into_tweet(self) -> Result<Tweet> {
        let created = DateTime::parse_from_rfc3339(&self.created_at)
            .with_context(|| format!("Tweet {} has an invalid created_at", self.id))?
            .with_timezone(&Utc);

        let metrics = self
            .public_metrics
            .map(|m| TweetMetrics {
                reply_count: m.reply_count,
                retweet_count: m.retweet_count,
                like_count: m.like_count,
                quote_count: m.quote_count,
            })
            .unwrap_or_default();

        Ok(Tweet {
            id: self.id,
            text: self.text,
            created,
            author_id: self.author_id,
            metrics,
        })
    }
}

#[derive(Debug, Deserialize, Default)]
struct Includes {
    #[serde(default)]
    users: Vec<UserObject>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TimelineResponse {
    #[serde(default)]
    data: Vec<TweetObject>,
    #[serde(default)]
    includes: Includes,
    meta: Option<PageMeta>,
}

impl TimelineResponse {
    pub(crate) fn into_batch(self) -> Result<TweetBatch> {
        let tweets = self
            .data
            .into_iter()
            .map(TweetObject::into_tweet)
            .collect::<Result<Vec<_>>>()?;

        let users: HashMap<String, TwitterUser> = self
            .includes
            .users
            .into_iter()
            .map(|u| (u.id.clone(), TwitterUser::from(u)))
            .collect();

        Ok(TweetBatch {
            tweets,
            users,
            result_count: self.meta.map(|m| m.result_count).unwrap_or(0),
        })
    }
}

pub struct TwitterClient {
    client: Client,
    access_token: String,
}

impl TwitterClient {
    pub fn new(credentials: &TwitterCredentials) -> Result<Self> {
        Ok(Self {
            client: build_client(USER_AGENT)?,
            access_token: credentials.access_token.clone(),
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

        read_json(response, "Twitter").await
    }

    pub async fn me(&self) -> Result<TwitterUser> {
        let response: MeResponse = self.get(&format!("{}/users/me", API_BASE_URL)).await?;
        Ok(response.data.into())
    }

    pub async fn following(&self, user_id: &str) -> Result<Vec<TwitterUser>> {
        let mut users = Vec::new();
        let mut pagination_token: Option<String> = None;

        loop {
            let mut url = format!(
                "{}/users/{}/following?max_results={}&user.fields=name,username",
                API_BASE_URL, user_id, FOLLOWING_PAGE_SIZE
            );
            if let Some(token) = &pagination_token {
                url.push_str(&format!("&pagination_token={}", urlencoding::encode(token)));
            }

            let page: FollowingResponse = self.get(&url).await?;
            users.extend(page.data.into_iter().map(TwitterUser::from));

            match page.meta.and_then(|m| m.next_token) {
                Some(next) => pagination_token = Some(next),
                None => break,
            }
        }

        tracing::debug!(count = users.len(), "fetched followed users");
        Ok(users)
    }

    /// Tweets by `user_id` created after `since`, without the excluded tweet types.
    pub async fn tweets_since(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
        exclude: Option<&[&str]>,
    ) -> Result<TweetBatch> {
        let mut url = format!(
            "{}/users/{}/tweets?max_results={}&start_time={}\
            &tweet.fields=created_at,public_metrics,author_id\
            &expansions=author_id&user.fields=name,username,url",
            API_BASE_URL,
            user_id,
            TWEETS_PAGE_SIZE,
            urlencoding::encode(&since.to_rfc3339_opts(SecondsFormat::Secs, true))
        );
        if let Some(exclude) = exclude {
            url.push_str(&format!("&exclude={}", exclude.join(",")));
        }

        let response: TimelineResponse = self.get(&url).await?;
        response.into_batch()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_timeline_maps_to_batch() {
        let raw = json!({
            "data": [{
                "id": "1890",
                "text": "just a tweet",
                "created_at": "2026-02-01T12:00:00.000Z",
                "author_id": "42",
                "public_metrics": { "reply_count": 1, "retweet_count": 2, "like_count": 3, "quote_count": 0 }
            }],
            "includes": { "users": [{ "id": "42", "name": "Ferris", "username": "ferris" }] },
            "meta": { "result_count": 1, "newest_id": "1890", "oldest_id": "1890" }
        });

        let batch = serde_json::from_value::<TimelineResponse>(raw)
            .unwrap()
            .into_batch()
            .unwrap();

        assert_eq!(batch.result_count, 1);
        assert_eq!(batch.users["42"].username, "ferris");
        assert_eq!(batch.tweets[0].metrics.like_count, 3);
        assert_eq!(
            batch.tweets[0].created,
            Utc.with_ymd_and_hms(2026, 2, 1, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_empty_timeline() {
        let raw = json!({ "meta": { "result_count": 0 } });
        let batch = serde_json::from_value::<TimelineResponse>(raw)
            .unwrap()
            .into_batch()
            .unwrap();
        assert_eq!(batch.result_count, 0);
        assert!(batch.tweets.is_empty());
    }

    #[test]
    fn test_invalid_created_at_is_an_error() {
        let raw = json!({
            "data": [{ "id": "1", "text": "x", "created_at": "yesterday" }],
            "meta": { "result_count": 1 }
        });
        let response = serde_json::from_value::<TimelineResponse>(raw).unwrap();
        assert!(response.into_batch().is_err());
    }
}
