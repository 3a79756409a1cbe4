pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod http_client;
pub mod loader;
pub mod models;
pub mod persist;
pub mod provider;
pub mod state;
