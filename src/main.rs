use std::{sync::Arc, net::{SocketAddr, IpAddr, Ipv4Addr}, str::FromStr};
use clap::Parser;
use axum::{routing::{get, post}, Router};
use chrono::{Duration, Utc};
use handlebars::Handlebars;
use tokio_rusqlite::Connection;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use reqwest::Client;

pub mod models;
pub mod controllers;
pub mod entities;
pub mod errors;
pub mod repositories;
pub mod services;
pub mod mappers;
pub mod templates;
pub mod validators;

#[cfg(test)]
mod test_support;

use controllers::{index, messages};
use repositories::conversation_repository::ConversationRepository;
use services::connector_service::{AppCredentials, ConnectorService};
use services::dialog_service::DialogService;
use services::github_user_service::{GitHubUserService, DEFAULT_API_URL};
use services::recognizer_service::Recognizer;

pub const MESSAGES_ENDPOINT: &str = "/api/messages";


// Command line interface
#[derive(Parser, Debug)]
#[clap(name="github-search-bot", about="A chat bot for finding GitHub users!")]
struct Opt {
    #[clap(short = 'l', long = "log", default_value = "info")]
    log_level: String,

    #[clap(short = 'a', long = "addr", env = "ADDR", default_value = "0.0.0.0")]
    addr: String,

    #[clap(short = 'p', long = "port", env = "PORT", default_value = "3978")]
    port: u16,

    /// LUIS endpoint, everything up to the utterance. The regex recognizer is used when unset.
    #[clap(long = "luis-model-url", env = "LUIS_MODEL_URL")]
    luis_model_url: Option<String>,

    #[clap(long = "github-api-url", env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    github_api_url: String,

    #[clap(long = "github-token", env = "GITHUB_TOKEN", hide_env_values = true)]
    github_token: Option<String>,

    #[clap(long = "app-id", env = "MICROSOFT_APP_ID")]
    app_id: Option<String>,

    #[clap(long = "app-password", env = "MICROSOFT_APP_PASSWORD", hide_env_values = true)]
    app_password: Option<String>,

    #[clap(long = "db", env = "DATABASE_PATH", default_value = "db.sqlite")]
    db: String,

    /// Seconds of silence after which an unfinished dialog is dropped.
    #[clap(
        long = "dialog-timeout",
        env = "DIALOG_TIMEOUT_SECS",
        default_value = "1800",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    dialog_timeout: u32,
}

pub struct AppState {
    registry: Handlebars<'static>,
    dialog_service: DialogService,
    connector_service: ConnectorService,
}

pub fn router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index::get_index))
        .route(MESSAGES_ENDPOINT, post(messages::post_messages))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(app_state)
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    // Hosting environments differ on the casing of the port variable.
    if std::env::var("PORT").is_err() {
        if let Ok(port) = std::env::var("port") {
            std::env::set_var("PORT", port);
        }
    }

    // Fetch console arguments
    let opt = Opt::parse();
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", format!("{},hyper=info,mio=info", opt.log_level));
    }
    // Enable console logging
    tracing_subscriber::fmt::init();

    // Create database connection
    let conn = Connection::open(opt.db.clone()).await.unwrap_or_else(|err| {
        panic!("Failed to create a connection to database!\n{:?}", err);
    });
    let repository = ConversationRepository { conn };
    repository.create_table().await.unwrap_or_else(|err| {
        panic!("Failed to create table for Conversation!\n{:?}", err);
    });
    match repository.delete_expired(Utc::now().timestamp()).await {
        Ok(removed) => log::info!("Removed {} expired dialogs", removed),
        Err(err) => log::warn!("Failed to remove expired dialogs: {}", err),
    }

    // Create reqwest client
    let client = Client::new();

    let recognizer = match opt.luis_model_url.as_deref().filter(|url| !url.trim().is_empty()) {
        Some(url) => Recognizer::luis(client.clone(), url),
        None => Recognizer::regex(),
    };
    log::info!("Using the {} recognizer", recognizer.kind());

    // Setup services
    let github_user_service = GitHubUserService {
        client: client.clone(),
        api_url: opt.github_api_url.clone(),
        token: opt.github_token.clone(),
    };
    let dialog_service = DialogService {
        github_user_service,
        recognizer,
        repository,
        replies: templates::reply_registry().unwrap_or_else(|err| {
            panic!("Failed to register reply templates!\n{:?}", err);
        }),
        dialog_timeout: Duration::seconds(i64::from(opt.dialog_timeout)),
    };
    let credentials = match (opt.app_id.clone(), opt.app_password.clone()) {
        (Some(app_id), Some(app_password)) if !app_id.is_empty() => Some(AppCredentials { app_id, app_password }),
        _ => None,
    };
    if credentials.is_none() {
        log::warn!("No Microsoft app credentials, replies are sent unauthenticated");
    }
    let connector_service = ConnectorService::new(client, credentials);

    // Inject app state into controller routes
    let app_state = Arc::new(AppState {
        registry: templates::page_registry().unwrap_or_else(|err| {
            panic!("Failed to register page templates!\n{:?}", err);
        }),
        dialog_service,
        connector_service,
    });
    let app = router(app_state);

    let sock_addr = SocketAddr::from((
        IpAddr::from_str(opt.addr.as_str()).unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED)),
        opt.port
    ));
    log::info!("Now listening on http://{}{}", sock_addr, MESSAGES_ENDPOINT);

    axum::Server::bind(&sock_addr)
        .serve(app.into_make_service())
        .await
        .unwrap();
}
