pub mod entities;
pub mod manager;
pub mod repository;


pub use manager::DatabaseManager;
pub use repository::{
    RoleRepository, SeaOrmRoleRepository,
    UserRepository, SeaOrmUserRepository,
    DeckRepository, SeaOrmDeckRepository,
    StoredImageRepository, SeaOrmStoredImageRepository,
};
