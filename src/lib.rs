pub mod analysis;
pub mod api;
pub mod auth;
pub mod chats;
pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod model;
pub mod session;
