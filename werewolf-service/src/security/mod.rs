pub mod password_service;
pub mod user_service;

pub use password_service::{PasswordService, DefaultPasswordService};
pub use user_service::{UserService, DefaultUserService};
