use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::cache::ResponseCache;
use crate::error::GithubApiError;
use crate::token;

#[async_trait]
pub trait GithubClient: Send + Sync {
    async fn get_repo(&self, owner: &str, repo: &str) -> Result<Value>;
    async fn get_user(&self, login: &str) -> Result<Value>;
    async fn list_pulls(&self, owner: &str, repo: &str, page: u32, per_page: u32)
        -> Result<Vec<Value>>;
    async fn list_issues(
        &self,
        owner: &str,
        repo: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Value>>;
    async fn list_reviews(
        &self,
        owner: &str,
        repo: &str,
        pull_number: i64,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Value>>;
    async fn list_org_repos(&self, org: &str, page: u32, per_page: u32) -> Result<Vec<Value>>;
}

pub struct RestGithubClient {
    http: reqwest::Client,
    base: Url,
    token: Option<String>,
    cache: ResponseCache,
}

impl RestGithubClient {
    pub fn new(token: Option<String>, user_agent: &str, cache_ttl: Duration) -> Result<Self> {
        if let Some(token) = token.as_deref() {
            token::validate_token(token);
        }
        let http = reqwest::Client::builder()
            .user_agent(user_agent.to_string())
            .build()?;
        Ok(Self {
            http,
            base: Url::parse("https://api.github.com/").expect("valid base url"),
            token,
            cache: ResponseCache::new(cache_ttl),
        })
    }

    #[cfg(test)]
    pub(crate) fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    async fn get_json(&self, url: Url) -> Result<Value> {
        let key = url.as_str().to_string();
        let endpoint = url.path().trim_start_matches('/').to_string();

        if let Some(body) = self.cache.get(&key).await {
            debug!(url = %key, "serving GitHub response from cache");
            return Ok(serde_json::from_slice(&body)?);
        }

        let mut request = self
            .http
            .get(url)
            .header(http::header::ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            let body = response.bytes().await?.to_vec();
            let value: Value = serde_json::from_slice(&body)?;
            self.cache.put(key, body).await;
            return Ok(value);
        }

        let error = GithubApiError::status(status, endpoint);
        if error.is_rate_limited() {
            warn!(status = %status, endpoint = %error.endpoint(), "GitHub rate limit exhausted");
        } else {
            warn!(status = %status, endpoint = %error.endpoint(), "GitHub returned error response");
        }
        Err(error.into())
    }

    async fn get_json_array(&self, url: Url) -> Result<Vec<Value>> {
        let value = self.get_json(url).await?;
        match value {
            Value::Array(items) => Ok(items),
            Value::Null => Ok(Vec::new()),
            _ => Err(anyhow!("expected array response")),
        }
    }

    fn join(&self, path: &str) -> Result<Url> {
        Ok(self.base.join(path)?)
    }

    fn with_query(url: &mut Url, params: &[(&str, String)]) {
        let mut query_pairs = url.query_pairs_mut();
        for (key, val) in params {
            query_pairs.append_pair(key, val);
        }
    }
}

#[async_trait]
impl GithubClient for RestGithubClient {
    async fn get_repo(&self, owner: &str, repo: &str) -> Result<Value> {
        let url = self.join(&format!("repos/{owner}/{repo}"))?;
        self.get_json(url).await
    }

    async fn get_user(&self, login: &str) -> Result<Value> {
        let url = self.join(&format!("users/{login}"))?;
        self.get_json(url).await
    }

    async fn list_pulls(
        &self,
        owner: &str,
        repo: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Value>> {
        let mut url = self.join(&format!("repos/{owner}/{repo}/pulls"))?;
        Self::with_query(
            &mut url,
            &[
                ("state", "all".to_string()),
                ("sort", "updated".to_string()),
                ("direction", "desc".to_string()),
                ("page", page.to_string()),
                ("per_page", per_page.to_string()),
            ],
        );
        self.get_json_array(url).await
    }

    async fn list_issues(
        &self,
        owner: &str,
        repo: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Value>> {
        let mut url = self.join(&format!("repos/{owner}/{repo}/issues"))?;
        Self::with_query(
            &mut url,
            &[
                ("state", "all".to_string()),
                ("sort", "updated".to_string()),
                ("direction", "desc".to_string()),
                ("page", page.to_string()),
                ("per_page", per_page.to_string()),
            ],
        );
        self.get_json_array(url).await
    }

    async fn list_reviews(
        &self,
        owner: &str,
        repo: &str,
        pull_number: i64,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Value>> {
        let mut url = self.join(&format!("repos/{owner}/{repo}/pulls/{pull_number}/reviews"))?;
        Self::with_query(
            &mut url,
            &[
                ("page", page.to_string()),
                ("per_page", per_page.to_string()),
            ],
        );
        self.get_json_array(url).await
    }

    async fn list_org_repos(&self, org: &str, page: u32, per_page: u32) -> Result<Vec<Value>> {
        let mut url = self.join(&format!("orgs/{org}/repos"))?;
        Self::with_query(
            &mut url,
            &[
                ("type", "public".to_string()),
                ("page", page.to_string()),
                ("per_page", per_page.to_string()),
            ],
        );
        self.get_json_array(url).await
    }
}
