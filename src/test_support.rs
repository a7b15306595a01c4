//! Local stand-ins for GitHub, LUIS and the bot connector, served by axum on
//! an ephemeral port.

use std::net::TcpListener;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::sync::Mutex;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: String,
}

type RequestLog = Arc<Mutex<Vec<RecordedRequest>>>;

struct FakeState {
    log: RequestLog,
    items: Vec<Value>,
    total_count: u64,
    luis: Value,
}

impl FakeState {
    async fn record(&self, method: Method, uri: &Uri, headers: &HeaderMap, body: String) {
        self.log.lock().await.push(RecordedRequest {
            method: method.to_string(),
            path: uri.path().to_string(),
            query: uri.query().map(str::to_string),
            authorization: headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
            body,
        });
    }
}

pub struct FakeServer {
    pub url: String,
    log: RequestLog,
}

impl FakeServer {
    /// GitHub search and profile endpoints. Every item is a known user.
    pub async fn github(items: Vec<Value>) -> Self {
        let total_count = items.len() as u64;
        Self::github_with_total(items, total_count).await
    }

    pub async fn github_with_total(items: Vec<Value>, total_count: u64) -> Self {
        let router = Router::new()
            .route("/search/users", get(search_users))
            .route("/users/:login", get(get_user));
        Self::start(router, items, total_count, Value::Null).await
    }

    pub async fn luis(response: Value) -> Self {
        let router = Router::new().route("/luis", get(recognize));
        Self::start(router, Vec::new(), 0, response).await
    }

    pub async fn connector() -> Self {
        let router = Router::new()
            .route("/v3/conversations/:conversation/activities/:activity", post(reply_to_activity))
            .route("/botframework.com/oauth2/v2.0/token", post(issue_token));
        Self::start(router, Vec::new(), 0, Value::Null).await
    }

    async fn start(router: Router<Arc<FakeState>>, items: Vec<Value>, total_count: u64, luis: Value) -> Self {
        let log: RequestLog = Arc::new(Mutex::new(Vec::new()));
        let state = Arc::new(FakeState { log: log.clone(), items, total_count, luis });
        let app = router.with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::Server::from_tcp(listener)
                .unwrap()
                .serve(app.into_make_service())
                .await
                .unwrap();
        });

        FakeServer { url: format!("http://{}", addr), log }
    }

    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.log.lock().await.clone()
    }
}

pub fn search_item(login: &str) -> Value {
    json!({
        "login": login,
        "id": 1,
        "avatar_url": format!("https://avatars.example.com/{}", login),
        "html_url": format!("https://github.com/{}", login),
    })
}

pub fn profile(login: &str) -> Value {
    json!({
        "id": 1,
        "login": login,
        "name": format!("{} name", login),
        "avatar_url": format!("https://avatars.example.com/{}", login),
        "html_url": format!("https://github.com/{}", login),
        "company": "Acme",
        "email": null,
        "bio": format!("{} bio", login),
    })
}

async fn search_users(State(state): State<Arc<FakeState>>, method: Method, uri: Uri, headers: HeaderMap) -> Json<Value> {
    state.record(method, &uri, &headers, String::new()).await;
    Json(json!({
        "total_count": state.total_count,
        "incomplete_results": false,
        "items": state.items,
    }))
}

async fn get_user(
    State(state): State<Arc<FakeState>>,
    Path(login): Path<String>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    state.record(method, &uri, &headers, String::new()).await;
    let known = state.items.iter().any(|item| item["login"] == login.as_str());
    if known {
        Json(profile(&login)).into_response()
    } else {
        (StatusCode::NOT_FOUND, Json(json!({ "message": "Not Found" }))).into_response()
    }
}

async fn recognize(State(state): State<Arc<FakeState>>, method: Method, uri: Uri, headers: HeaderMap) -> Json<Value> {
    state.record(method, &uri, &headers, String::new()).await;
    Json(state.luis.clone())
}

async fn reply_to_activity(
    State(state): State<Arc<FakeState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Json<Value> {
    state.record(method, &uri, &headers, body).await;
    Json(json!({ "id": "reply" }))
}

async fn issue_token(
    State(state): State<Arc<FakeState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Json<Value> {
    state.record(method, &uri, &headers, body).await;
    Json(json!({
        "token_type": "Bearer",
        "expires_in": 3600,
        "access_token": "connector-token",
    }))
}

/// Application state wired to a fake GitHub, an in-memory database and the
/// regex recognizer.
pub async fn app_state(github_url: &str) -> Arc<crate::AppState> {
    use crate::repositories::conversation_repository::ConversationRepository;
    use crate::services::connector_service::ConnectorService;
    use crate::services::dialog_service::DialogService;
    use crate::services::github_user_service::GitHubUserService;
    use crate::services::recognizer_service::Recognizer;

    let client = reqwest::Client::new();
    let repository = ConversationRepository {
        conn: tokio_rusqlite::Connection::open_in_memory().await.unwrap(),
    };
    repository.create_table().await.unwrap();

    Arc::new(crate::AppState {
        registry: crate::templates::page_registry().unwrap(),
        dialog_service: DialogService {
            github_user_service: GitHubUserService {
                client: client.clone(),
                api_url: github_url.to_string(),
                token: None,
            },
            recognizer: Recognizer::regex(),
            repository,
            replies: crate::templates::reply_registry().unwrap(),
            dialog_timeout: chrono::Duration::minutes(30),
        },
        connector_service: ConnectorService::new(client, None),
    })
}

pub async fn body_string(response: axum::response::Response) -> String {
    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
