//! Webhook server for the weather bot.
//!
//! Exposes `POST /telegram/webhook` and `GET /ping`. The `bot-server` binary
//! also runs the background pinger; the `pinger` binary runs a single pass
//! for deployments driven by an external scheduler.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use config::{Config, ConfigError};
pub use error::ServerError;
pub use state::AppState;

/// Build the application with all routes and the given state.
pub fn app(state: AppState) -> axum::Router {
    routes::router().with_state(state)
}
