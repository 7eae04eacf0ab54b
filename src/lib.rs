pub mod cli;
pub mod config;
pub mod geometry;
pub mod latency;
pub mod scene;
pub mod server;
