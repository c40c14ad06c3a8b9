pub mod client;
pub mod config;
pub mod constants;
pub mod errors;
pub mod metric;
pub mod types;
