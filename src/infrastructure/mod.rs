pub mod config;
pub mod credential_store;
pub mod entry_mapper;
pub mod error;
pub mod time_log;
pub mod timecamp_client;
