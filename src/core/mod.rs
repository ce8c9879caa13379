pub mod common;
pub mod config;
pub mod indexing;
pub mod ingest;
pub mod types;

pub use self::config::Config;
