pub mod role_service;
pub mod deck_service;

pub use role_service::{RoleService, DefaultRoleService};
pub use deck_service::{DeckService, DefaultDeckService};
