use serde::{Deserialize, Serialize};

pub const ACTION_IM_BACK: &str = "imBack";
pub const ACTION_OPEN_URL: &str = "openUrl";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardImage {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardAction {
    #[serde(rename = "type")]
    pub action_type: String,
    pub title: String,
    pub value: String,
}

impl CardAction {
    pub fn im_back(value: &str) -> Self {
        CardAction {
            action_type: ACTION_IM_BACK.into(),
            title: value.into(),
            value: value.into(),
        }
    }

    pub fn open_url(url: &str) -> Self {
        CardAction {
            action_type: ACTION_OPEN_URL.into(),
            title: url.into(),
            value: url.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeroCard {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<CardImage>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buttons: Vec<CardAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tap: Option<CardAction>,
}
