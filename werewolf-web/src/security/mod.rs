pub mod cookie;
pub mod middleware;

pub use middleware::auth_middleware;
pub use self::cookie::{SESSION_COOKIE, session_cookie, clear_session_cookie, session_id_from_headers};
