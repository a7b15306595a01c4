use crate::entities;
use crate::models::dialog_state::DialogState;

pub fn to_entity(id: &str, state: &DialogState, expiration: i64) -> Result<entities::conversation::Conversation, serde_json::Error> {
    Ok(entities::conversation::Conversation {
        id: id.to_string(),
        state: serde_json::to_string(state)?,
        expiration,
    })
}

pub fn to_model(entity: &entities::conversation::Conversation) -> Result<DialogState, serde_json::Error> {
    serde_json::from_str(&entity.state)
}
