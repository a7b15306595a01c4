use serde::{Deserialize, Serialize};

/// Where a conversation currently sits inside the search dialog.
///
/// A conversation with no stored state has an empty dialog stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum DialogState {
    AwaitingQuery,
    AwaitingChoice { usernames: Vec<String> },
}
