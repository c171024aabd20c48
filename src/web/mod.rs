pub mod admin;
pub mod auth;
pub mod pages;
pub mod router;
pub mod state;
pub mod templates;
pub mod uploads;
pub mod user;
pub mod verify;
pub mod widgets;

pub use router::build_router;
pub use state::AppState;
pub use templates::escape_html;
