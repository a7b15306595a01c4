use serde::Deserialize;

pub const INTENT_NONE: &str = "None";
pub const INTENT_SEARCH_PROFILE: &str = "SearchProfile";

pub const ENTITY_QUERY: &str = "query";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Entity {
    pub entity: String,
    #[serde(rename = "type")]
    pub entity_type: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecognizerResult {
    pub intent: String,
    pub score: f64,
    pub entities: Vec<Entity>,
}

impl RecognizerResult {
    pub fn none() -> Self {
        RecognizerResult {
            intent: INTENT_NONE.into(),
            score: 0.0,
            entities: Vec::new(),
        }
    }

    pub fn find_entity(&self, entity_type: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.entity_type == entity_type)
    }

    pub fn matches(&self, intent: &str, threshold: f64) -> bool {
        self.intent == intent && self.score >= threshold
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LuisIntent {
    pub intent: String,
    #[serde(default)]
    pub score: f64,
}

/// Body returned by a LUIS v2 model endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LuisResponse {
    #[serde(default)]
    pub top_scoring_intent: Option<LuisIntent>,
    #[serde(default)]
    pub intents: Vec<LuisIntent>,
    #[serde(default)]
    pub entities: Vec<Entity>,
}

impl From<LuisResponse> for RecognizerResult {
    fn from(response: LuisResponse) -> Self {
        let top = response.top_scoring_intent.or_else(|| {
            response
                .intents
                .into_iter()
                .max_by(|a, b| a.score.total_cmp(&b.score))
        });
        match top {
            Some(intent) => RecognizerResult {
                intent: intent.intent,
                score: intent.score,
                entities: response.entities,
            },
            None => RecognizerResult::none(),
        }
    }
}
