//! HTTP gateway for the Startpage dashboard.
//!
//! Exposes the card CRUD surface and the reorder endpoint as JSON over axum.
//! Mutating routes require the request token handed out by `GET /cards`.

pub mod app;
pub mod error;
pub mod handlers;
pub mod model;
pub mod state;
pub mod token;

pub use app::App;
pub use state::AppState;
pub use token::{RequestToken, REQUEST_TOKEN_HEADER};
