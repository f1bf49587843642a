pub mod security;
pub mod app_state;
pub mod error;
pub mod handlers;
pub mod extractors;
pub mod openapi;
pub mod routes;


pub use security::auth_middleware;
pub use app_state::{AppState, SessionSettings};
pub use error::ApiError;
pub use routes::api_router;
