pub mod auth;
pub mod config;
pub mod cost;
pub mod formatter;
pub mod items;
pub mod models;
pub mod notes;
pub mod parser;
pub mod pipeline;
pub mod providers;
pub mod storage;
pub mod timing;
