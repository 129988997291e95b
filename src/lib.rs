pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod export;
pub mod grid;
pub mod http_client;
pub mod lineup;
pub mod match_list;
pub mod session;
pub mod telemetry;
