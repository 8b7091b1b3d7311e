pub mod config;
pub mod db;
pub mod errors;
pub mod llm_client;
pub mod routes;
pub mod scoring;
pub mod session;
pub mod state;
