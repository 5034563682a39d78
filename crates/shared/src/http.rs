use anyhow::{Context, Result};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub(crate) fn build_client(user_agent: &str) -> Result<Client> {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(user_agent)
        .build()
        .context("Failed to create HTTP client")
}

/// Decodes a JSON body, turning non-success statuses into errors that carry the body.
pub(crate) async fn read_json<T: DeserializeOwned>(response: Response, service: &str) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| String::from("unknown error"));
        anyhow::bail!("{} API returned error: {} - {}", service, status, error_text);
    }

    response
        .json::<T>()
        .await
        .with_context(|| format!("Failed to parse {} API response", service))
}

/// `application/x-www-form-urlencoded` body from key/value pairs.
pub(crate) fn form_body(pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_body_encodes_values() {
        let body = form_body(&[("grant_type", "password"), ("password", "p@ss word&")]);
        assert_eq!(body, "grant_type=password&password=p%40ss%20word%26");
    }
}
