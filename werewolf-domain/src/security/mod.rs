pub mod user;

pub use user::{User, AuthenticatedUser, SignupRequest, LoginRequest};
