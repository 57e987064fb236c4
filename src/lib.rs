pub mod config;
pub mod crop;
pub mod error;
pub mod et0;
pub mod models;
pub mod planner;
pub mod provider;
pub mod server;
