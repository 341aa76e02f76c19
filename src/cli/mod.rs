pub mod cache_cmd;
pub mod config_cmd;
pub mod cost_cmd;
pub mod output;
pub mod process_cmd;
pub mod renderer;
