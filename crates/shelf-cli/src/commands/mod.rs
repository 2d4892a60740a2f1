pub mod auth;
pub mod clear;
pub mod config;
pub mod context;
pub mod list;
pub mod lists;
pub mod progress;
pub mod prompts;
pub mod render;
pub mod search;
