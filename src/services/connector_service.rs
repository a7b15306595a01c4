use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::errors::{BotError, Result};
use crate::models::activity::Activity;

pub const DEFAULT_TOKEN_URL: &str = "https://login.microsoftonline.com/botframework.com/oauth2/v2.0/token";
const TOKEN_SCOPE: &str = "https://api.botframework.com/.default";

pub struct AppCredentials {
    pub app_id: String,
    pub app_password: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

/// Sends reply activities back to the channel that delivered a message.
pub struct ConnectorService {
    pub client: Client,
    pub credentials: Option<AppCredentials>,
    pub token_url: String,
    token: Mutex<Option<CachedToken>>,
}

impl ConnectorService {
    pub fn new(client: Client, credentials: Option<AppCredentials>) -> Self {
        ConnectorService {
            client,
            credentials,
            token_url: DEFAULT_TOKEN_URL.into(),
            token: Mutex::new(None),
        }
    }

    async fn access_token(&self) -> Result<Option<String>> {
        let credentials = match &self.credentials {
            Some(credentials) => credentials,
            None => return Ok(None),
        };

        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if token.expires_at > Utc::now() {
                return Ok(Some(token.access_token.clone()));
            }
        }

        log::info!("Requesting connector token for app {}", credentials.app_id);
        let response = self.client.post(&self.token_url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", credentials.app_id.as_str()),
                ("client_secret", credentials.app_password.as_str()),
                ("scope", TOKEN_SCOPE),
            ])
            .send()
            .await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(BotError::Connector { status, body });
        }
        let token: TokenResponse = response.json().await?;

        // Refresh five minutes early.
        let expires_at = Utc::now() + Duration::seconds(token.expires_in - 300);
        *cached = Some(CachedToken { access_token: token.access_token.clone(), expires_at });
        Ok(Some(token.access_token))
    }

    pub async fn send(&self, activity: &Activity) -> Result<()> {
        let service_url = activity.service_url.as_deref().unwrap_or_default().trim_end_matches('/');
        let conversation_id = activity.conversation_id().unwrap_or_default();
        let mut url = format!("{}/v3/conversations/{}/activities", service_url, urlencoding::encode(conversation_id));
        if let Some(reply_to_id) = &activity.reply_to_id {
            url = format!("{}/{}", url, urlencoding::encode(reply_to_id));
        }

        let mut request = self.client.post(url).json(activity);
        if let Some(token) = self.access_token().await? {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            log::error!("Connector responded with {}: {}", status, body);
            return Err(BotError::Connector { status, body });
        }
        Ok(())
    }

    pub async fn send_all(&self, activities: &[Activity]) -> Result<()> {
        for activity in activities {
            self.send(activity).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::activity::ConversationAccount;
    use crate::test_support;

    fn reply(service_url: &str) -> Activity {
        Activity {
            service_url: Some(service_url.into()),
            conversation: Some(ConversationAccount { id: "conv 1".into(), ..Default::default() }),
            reply_to_id: Some("act-1".into()),
            ..Activity::message("hello")
        }
    }

    #[tokio::test]
    async fn posts_reply_to_conversation_without_auth() {
        let connector = test_support::FakeServer::connector().await;
        let service = ConnectorService::new(Client::new(), None);

        service.send(&reply(&format!("{}/", connector.url))).await.unwrap();

        let seen = connector.requests().await;
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].method, "POST");
        assert_eq!(seen[0].path, "/v3/conversations/conv%201/activities/act-1");
        assert!(seen[0].authorization.is_none());
        let body: serde_json::Value = serde_json::from_str(&seen[0].body).unwrap();
        assert_eq!(body["text"], "hello");
    }

    #[tokio::test]
    async fn fetches_token_once_and_reuses_it() {
        let connector = test_support::FakeServer::connector().await;
        let mut service = ConnectorService::new(
            Client::new(),
            Some(AppCredentials { app_id: "app".into(), app_password: "pw".into() }),
        );
        service.token_url = format!("{}/botframework.com/oauth2/v2.0/token", connector.url);

        service.send_all(&[reply(&connector.url), reply(&connector.url)]).await.unwrap();

        let seen = connector.requests().await;
        let token_requests: Vec<_> = seen.iter().filter(|r| r.path.ends_with("/token")).collect();
        assert_eq!(token_requests.len(), 1);
        assert!(token_requests[0].body.contains("grant_type=client_credentials"));
        assert!(token_requests[0].body.contains("client_id=app"));
        let replies: Vec<_> = seen.iter().filter(|r| r.path.starts_with("/v3/")).collect();
        assert_eq!(replies.len(), 2);
        assert!(replies.iter().all(|r| r.authorization.as_deref() == Some("Bearer connector-token")));
    }
}
