#![doc = "The `bookshelf_api` library crate."]
#![doc = ""]
#![doc = "User accounts with bcrypt credentials, signed session tokens resolved to users on"]
#![doc = "every request, an idempotent database bootstrap, and a router that serves a bundled"]
#![doc = "single-page application next to the JSON API. The binary (`main.rs`) only parses the"]
#![doc = "command line, builds an `AppState` and hands it to `app::build_app`."]

pub mod app;
pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;

pub use app::build_app;
pub use error::AppError;
pub use state::AppState;
