use serde::Deserialize;

/// Profile returned by `GET /users/{login}`.
#[derive(Debug, Clone, Deserialize)]
pub struct GithubUser {
    pub id: u64,
    pub login: String,
    pub name: Option<String>,
    pub avatar_url: String,
    pub html_url: String,
    pub company: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
}
