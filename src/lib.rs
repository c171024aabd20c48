pub mod backend;
pub mod config;
pub mod session;
pub mod web;

pub use config::AppConfig;
pub use web::{AppState, build_router};
