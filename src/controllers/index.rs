use std::sync::Arc;
use axum::response::Html;
use axum::extract::State;

use crate::{AppState, MESSAGES_ENDPOINT};
use crate::errors::Result;
use crate::models::status::StatusViewModel;


pub async fn get_index(State(state): State<Arc<AppState>>) -> Result<Html<String>> {
    let status = StatusViewModel {
        name: env!("CARGO_PKG_NAME").into(),
        version: env!("CARGO_PKG_VERSION").into(),
        recognizer: state.dialog_service.recognizer.kind().into(),
        endpoint: MESSAGES_ENDPOINT.into(),
    };
    let data = super::TemplateViewModel {
        title: "Home".into(),
        body: state.registry.render("index", &status)?,
    };

    Ok(Html(state.registry.render("template", &data)?))
}
