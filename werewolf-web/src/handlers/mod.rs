pub mod auth;
pub mod roles;
pub mod decks;
pub mod health;

pub use auth::*;
pub use roles::*;
pub use decks::*;
pub use health::*;
