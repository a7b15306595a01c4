use serde::Deserialize;

/// Response of `GET /search/users`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResult {
    pub total_count: u64,
    #[serde(default)]
    pub incomplete_results: bool,
    #[serde(default)]
    pub items: Vec<SearchItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchItem {
    pub login: String,
    pub id: u64,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default)]
    pub html_url: String,
}

impl SearchResult {
    pub fn logins(&self) -> Vec<String> {
        self.items.iter().map(|item| item.login.clone()).collect()
    }
}
