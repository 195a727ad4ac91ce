// Public API - what other modules can use
pub use errors::LeagueError;
pub use handlers::*;
pub use service::{LeagueService, LeagueServiceBuilder};
pub use types::*;

mod errors;
mod handlers;
mod service;
mod types;
