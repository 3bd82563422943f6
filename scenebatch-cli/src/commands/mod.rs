pub mod config;
pub mod plan;
pub mod render;
pub mod script;
