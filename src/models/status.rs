use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct StatusViewModel {
    pub name: String,
    pub version: String,
    pub recognizer: String,
    pub endpoint: String,
}
