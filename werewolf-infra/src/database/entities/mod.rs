pub mod user;
pub mod role;
pub mod deck;
pub mod deck_role;
pub mod stored_image;
