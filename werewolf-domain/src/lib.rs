pub mod security;
pub mod role;
pub mod deck;
pub mod image;

pub use security::{User, AuthenticatedUser, SignupRequest, LoginRequest};
pub use role::{Role, RoleInput, Team};
pub use deck::{Deck, DeckEntry, DeckRequest, DeckRoleRequest, DeckBalance, BalanceStatus, TeamDistribution};
pub use image::{StoredImage, ImagePointer};
