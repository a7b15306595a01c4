
#[derive(Debug, Clone)]
pub struct Conversation {
    pub id: String,
    pub state: String,
    pub expiration: i64,
}
