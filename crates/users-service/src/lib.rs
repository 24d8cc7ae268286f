//! Users service for the weather bot.
//!
//! The bot reports every user it talks to with `PUT /users/{id}`. The first
//! report creates the record (`201 Created`), later ones are acknowledged
//! without changes (`202 Accepted`).

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use config::{Config, ConfigError};
pub use error::UsersError;
pub use state::AppState;

/// Build the application with all routes and the given state.
pub fn app(state: AppState) -> axum::Router {
    routes::router().with_state(state)
}
