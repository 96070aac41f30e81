pub mod config;
pub mod engine;
pub mod error;
pub mod message;
pub mod output;
pub mod parser;
pub mod stats;
