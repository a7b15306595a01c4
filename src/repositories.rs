pub mod conversation_repository;
