use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::card::HeroCard;

pub const ACTIVITY_MESSAGE: &str = "message";
pub const ACTIVITY_TYPING: &str = "typing";
pub const ACTIVITY_END_OF_CONVERSATION: &str = "endOfConversation";

pub const DELIVERY_EXPECT_REPLIES: &str = "expectReplies";

pub const CONTENT_TYPE_HERO_CARD: &str = "application/vnd.microsoft.card.hero";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelAccount {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationAccount {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_group: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub content_type: String,
    pub content: serde_json::Value,
}

impl Attachment {
    pub fn hero(card: &HeroCard) -> Result<Self, serde_json::Error> {
        Ok(Attachment {
            content_type: CONTENT_TYPE_HERO_CARD.into(),
            content: serde_json::to_value(card)?,
        })
    }
}

/// A bot connector activity, the envelope for everything sent to or from the bot.
///
/// Only the fields the search dialog reads or writes are modelled; unknown
/// fields from the channel are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    #[serde(rename = "type")]
    pub activity_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<ChannelAccount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<ChannelAccount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation: Option<ConversationAccount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_hint: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment_layout: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl Activity {
    pub fn message(text: impl Into<String>) -> Self {
        Activity {
            activity_type: ACTIVITY_MESSAGE.into(),
            text: Some(text.into()),
            text_format: Some("markdown".into()),
            ..Default::default()
        }
    }

    pub fn typing() -> Self {
        Activity {
            activity_type: ACTIVITY_TYPING.into(),
            ..Default::default()
        }
    }

    pub fn end_of_conversation() -> Self {
        Activity {
            activity_type: ACTIVITY_END_OF_CONVERSATION.into(),
            code: Some("completedSuccessfully".into()),
            ..Default::default()
        }
    }

    pub fn is_message(&self) -> bool {
        self.activity_type == ACTIVITY_MESSAGE
    }

    pub fn expects_replies(&self) -> bool {
        self.delivery_mode.as_deref() == Some(DELIVERY_EXPECT_REPLIES)
    }

    pub fn conversation_id(&self) -> Option<&str> {
        self.conversation.as_ref().map(|c| c.id.as_str())
    }

    pub fn trimmed_text(&self) -> &str {
        self.text.as_deref().unwrap_or_default().trim()
    }

    /// Address `reply` back to whoever sent this activity.
    pub fn address_reply(&self, mut reply: Activity, now: DateTime<Utc>) -> Activity {
        reply.from = self.recipient.clone();
        reply.recipient = self.from.clone();
        reply.conversation = self.conversation.clone();
        reply.channel_id = self.channel_id.clone();
        reply.service_url = self.service_url.clone();
        reply.reply_to_id = self.id.clone();
        reply.timestamp = Some(now);
        reply
    }
}

/// Body returned when replies are delivered inline.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ExpectedReplies {
    pub activities: Vec<Activity>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn deserializes_emulator_message() {
        let json = r#"{
            "type": "message",
            "id": "abc",
            "serviceUrl": "http://localhost:50000",
            "channelId": "emulator",
            "from": { "id": "user1", "name": "User" },
            "recipient": { "id": "bot1" },
            "conversation": { "id": "conv1" },
            "text": "  search octocat ",
            "localTimezone": "Europe/Prague"
        }"#;
        let activity: Activity = serde_json::from_str(json).unwrap();

        assert!(activity.is_message());
        assert_eq!(activity.conversation_id(), Some("conv1"));
        assert_eq!(activity.trimmed_text(), "search octocat");
        assert!(!activity.expects_replies());
    }

    #[test]
    fn reply_is_addressed_back_to_sender() {
        let incoming = Activity {
            activity_type: ACTIVITY_MESSAGE.into(),
            id: Some("in-1".into()),
            from: Some(ChannelAccount { id: "user".into(), name: None }),
            recipient: Some(ChannelAccount { id: "bot".into(), name: None }),
            conversation: Some(ConversationAccount { id: "c".into(), ..Default::default() }),
            channel_id: Some("test".into()),
            ..Default::default()
        };
        let now = Utc.with_ymd_and_hms(2023, 5, 1, 12, 0, 0).unwrap();

        let reply = incoming.address_reply(Activity::message("hi"), now);

        assert_eq!(reply.from.unwrap().id, "bot");
        assert_eq!(reply.recipient.unwrap().id, "user");
        assert_eq!(reply.reply_to_id.as_deref(), Some("in-1"));
        assert_eq!(reply.timestamp, Some(now));
    }

    #[test]
    fn serializes_type_field_in_camel_case() {
        let value = serde_json::to_value(Activity::end_of_conversation()).unwrap();

        assert_eq!(value["type"], "endOfConversation");
        assert_eq!(value["code"], "completedSuccessfully");
        assert!(value.get("attachments").is_none());
    }
}
