use reqwest::{Client, RequestBuilder};

use crate::errors::{BotError, Result};
use crate::models::github_user::GithubUser;
use crate::models::search_result::SearchResult;
use crate::validators;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
const USER_AGENT: &str = "github-search-bot";


pub struct GitHubUserService {
    pub client: Client,
    pub api_url: String,
    pub token: Option<String>,
}

impl GitHubUserService {
    fn get(&self, url: String) -> RequestBuilder {
        log::info!("Making request to {}...", url);
        let request = self.client.get(url)
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/vnd.github+json");
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send<T: serde::de::DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            log::error!("GitHub responded with {}: {}", status, body);
            return Err(BotError::GitHub { status, body });
        }

        Ok(response.json::<T>().await?)
    }

    pub async fn search(&self, query: &str) -> Result<SearchResult> {
        let url = format!("{}/search/users?q={}", self.api_url.trim_end_matches('/'), urlencoding::encode(query));
        let result: SearchResult = self.send(self.get(url)).await?;
        log::info!("Search for {:?} returned {} users", query, result.total_count);
        Ok(result)
    }

    pub async fn load_profile(&self, login: &str) -> Result<GithubUser> {
        if !validators::is_github_login(login) {
            return Err(BotError::InvalidLogin(login.to_string()));
        }
        let url = format!("{}/users/{}", self.api_url.trim_end_matches('/'), login);
        self.send(self.get(url)).await
    }
}
