pub mod card_mapper;
pub mod conversation_mapper;
