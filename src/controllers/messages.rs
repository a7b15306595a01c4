use std::sync::Arc;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;

use crate::AppState;
use crate::models::activity::{Activity, ExpectedReplies};


/// Bot messaging endpoint.
///
/// Replies go back inline when the caller asked for them (or gave no
/// `serviceUrl` to post to), otherwise through the connector.
#[axum_macros::debug_handler]
pub async fn post_messages(State(state): State<Arc<AppState>>, Json(activity): Json<Activity>) -> Response {
    log::debug!("Received {} activity {:?}", activity.activity_type, activity.id);

    let now = Utc::now();
    let replies: Vec<Activity> = state.dialog_service
        .respond(&activity)
        .await
        .into_iter()
        .map(|reply| activity.address_reply(reply, now))
        .collect();

    if activity.expects_replies() || activity.service_url.is_none() {
        return Json(ExpectedReplies { activities: replies }).into_response();
    }

    match state.connector_service.send_all(&replies).await {
        Ok(()) => StatusCode::ACCEPTED.into_response(),
        Err(err) => {
            log::error!("Failed to deliver replies: {}", err);
            err.into_response()
        }
    }
}
