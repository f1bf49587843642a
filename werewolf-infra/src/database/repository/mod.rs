pub mod role;
pub mod user;
pub mod deck;
pub mod stored_image;

pub use role::{RoleRepository, SeaOrmRoleRepository};
pub use user::{UserRepository, SeaOrmUserRepository};
pub use deck::{DeckRepository, SeaOrmDeckRepository};
pub use stored_image::{StoredImageRepository, SeaOrmStoredImageRepository};
