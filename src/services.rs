pub mod connector_service;
pub mod dialog_service;
pub mod github_user_service;
pub mod recognizer_service;
