// src/feed/reddit.rs
//! Reddit "script" app client: password grant, then the subreddit's `new` listing.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{FeedSource, Post};
use crate::config::credentials::RedditCredentials;
use crate::error::PipelineError;

const TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";
const API_BASE: &str = "https://oauth.reddit.com";

pub const DEFAULT_SUBREDDIT: &str = "gundeals";
/// Page maximum of the listing endpoint.
pub const DEFAULT_LIMIT: u32 = 100;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}
#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<Child>,
}
#[derive(Debug, Deserialize)]
struct Child {
    data: ChildData,
}
#[derive(Debug, Deserialize)]
struct ChildData {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
}

/// Parse a listing document into posts, preserving listing order.
pub fn parse_listing(body: &str) -> Result<Vec<Post>> {
    let listing: Listing = serde_json::from_str(body).context("parsing reddit listing json")?;
    Ok(listing
        .data
        .children
        .into_iter()
        .map(|c| Post {
            id: c.data.id,
            title: c.data.title,
            url: c.data.url,
        })
        .collect())
}

pub struct RedditFeed {
    creds: RedditCredentials,
    subreddit: String,
    limit: u32,
    client: Client,
}

impl RedditFeed {
    pub fn new(creds: RedditCredentials) -> Result<Self> {
        let client = Client::builder()
            .user_agent(creds.user_agent.clone())
            .build()
            .context("building reddit http client")?;
        Ok(Self {
            creds,
            subreddit: DEFAULT_SUBREDDIT.to_string(),
            limit: DEFAULT_LIMIT,
            client,
        })
    }

    pub fn with_subreddit(mut self, subreddit: impl Into<String>) -> Self {
        self.subreddit = subreddit.into();
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit.clamp(1, DEFAULT_LIMIT);
        self
    }

    async fn access_token(&self) -> Result<String> {
        let resp = self
            .client
            .post(TOKEN_URL)
            .basic_auth(&self.creds.client_id, Some(&self.creds.client_secret))
            .form(&[
                ("grant_type", "password"),
                ("username", self.creds.username.as_str()),
                ("password", self.creds.password.as_str()),
            ])
            .send()
            .await
            .context("reddit token request")?
            .error_for_status()
            .context("reddit token non-2xx")?;

        let token: TokenResponse = resp.json().await.context("reddit token body")?;
        match token {
            TokenResponse {
                access_token: Some(t),
                ..
            } => Ok(t),
            TokenResponse { error, .. } => Err(PipelineError::Feed(format!(
                "no access token returned ({})",
                error.as_deref().unwrap_or("no error given")
            ))
            .into()),
        }
    }
}

#[async_trait]
impl FeedSource for RedditFeed {
    async fn fetch_new(&self) -> Result<Vec<Post>> {
        let token = self.access_token().await?;
        let url = format!("{API_BASE}/r/{}/new", self.subreddit);
        let body = self
            .client
            .get(&url)
            .bearer_auth(token)
            .query(&[("limit", self.limit.to_string()), ("raw_json", "1".to_string())])
            .send()
            .await
            .with_context(|| format!("GET {url}"))?
            .error_for_status()
            .context("reddit listing non-2xx")?
            .text()
            .await
            .context("reddit listing body")?;

        let posts = parse_listing(&body)?;
        tracing::debug!(subreddit = %self.subreddit, count = posts.len(), "fetched listing");
        Ok(posts)
    }

    fn name(&self) -> &'static str {
        "reddit"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_parses_in_order() {
        let body = r#"{"kind":"Listing","data":{"after":null,"children":[
            {"kind":"t3","data":{"id":"b2","title":"[Ammo] 5.56","url":"https://x.test/b2"}},
            {"kind":"t3","data":{"id":"a1","title":"[Rifle] Upper","url":"https://x.test/a1"}}
        ]}}"#;
        let posts = parse_listing(body).unwrap();
        let ids: Vec<&str> = posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["b2", "a1"]);
        assert_eq!(posts[0].title, "[Ammo] 5.56");
    }

    #[test]
    fn empty_listing_is_ok() {
        let posts = parse_listing(r#"{"kind":"Listing","data":{"children":[]}}"#).unwrap();
        assert!(posts.is_empty());
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(parse_listing("<html>").is_err());
    }
}
