pub mod activity;
pub mod card;
pub mod dialog_state;
pub mod github_user;
pub mod intent;
pub mod search_result;
pub mod status;
