use regex::Regex;
use reqwest::Client;

use crate::errors::{BotError, Result};
use crate::models::intent::{
    Entity, LuisResponse, RecognizerResult, ENTITY_QUERY, INTENT_SEARCH_PROFILE,
};

/// Minimum score for an intent to trigger a dialog.
pub const INTENT_THRESHOLD: f64 = 0.1;

const SEARCH_PATTERN: &str = r"(?i)^\s*search(?:\s+(?P<query>.+?))?\s*$";

/// Turns user text into an intent and its entities.
pub enum Recognizer {
    /// Remote LUIS model; the URL is everything up to the utterance.
    Luis { client: Client, model_url: String },
    /// Local `search <name>` matcher.
    Regex(Regex),
}

impl Recognizer {
    pub fn luis(client: Client, model_url: &str) -> Self {
        Recognizer::Luis { client, model_url: model_url.trim().to_string() }
    }

    pub fn regex() -> Self {
        // The pattern is a compile-time constant.
        Recognizer::Regex(Regex::new(SEARCH_PATTERN).unwrap())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Recognizer::Luis { .. } => "LUIS",
            Recognizer::Regex(_) => "regex",
        }
    }

    pub async fn recognize(&self, text: &str) -> Result<RecognizerResult> {
        if text.trim().is_empty() {
            return Ok(RecognizerResult::none());
        }
        match self {
            Recognizer::Luis { client, model_url } => {
                let url = luis_url(model_url, text);
                let response = client.get(url).send().await?;
                if !response.status().is_success() {
                    let status = response.status().as_u16();
                    let body = response.text().await.unwrap_or_default();
                    log::error!("LUIS responded with {}: {}", status, body);
                    return Err(BotError::Recognizer { status, body });
                }
                let body: LuisResponse = response.json().await?;
                Ok(body.into())
            }
            Recognizer::Regex(pattern) => Ok(recognize_search(pattern, text)),
        }
    }
}

fn luis_url(model_url: &str, utterance: &str) -> String {
    let mut url = model_url.to_string();
    if !url.ends_with("&q=") {
        url.push_str(if url.contains('?') { "&q=" } else { "?q=" });
    }
    url.push_str(&urlencoding::encode(utterance));
    url
}

fn recognize_search(pattern: &Regex, text: &str) -> RecognizerResult {
    let captures = match pattern.captures(text) {
        Some(captures) => captures,
        None => return RecognizerResult::none(),
    };
    let entities = captures
        .name("query")
        .map(|query| Entity {
            entity: query.as_str().to_string(),
            entity_type: ENTITY_QUERY.into(),
        })
        .into_iter()
        .collect();

    RecognizerResult {
        intent: INTENT_SEARCH_PROFILE.into(),
        score: 1.0,
        entities,
    }
}
