use axum::http::header::COOKIE;
use axum::http::HeaderMap;
use cookie::time::Duration;
use cookie::{Cookie, SameSite};

/// Session Cookie名称
pub const SESSION_COOKIE: &str = "SESSION";

/// 登录/注册后下发的Session Cookie
pub fn session_cookie(session_id: &str, ttl: u64, secure: bool) -> String {
    Cookie::build((SESSION_COOKIE, session_id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::seconds(ttl as i64))
        .build()
        .to_string()
}

/// 登出时清除Cookie
pub fn clear_session_cookie() -> String {
    Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::ZERO)
        .build()
        .to_string()
}

/// 从Cookie头中提取Session ID
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == SESSION_COOKIE && !cookie.value().is_empty())
        .map(|cookie| cookie.value().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("abc", 86400, false);
        assert!(cookie.starts_with("SESSION=abc"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Max-Age=86400"));
        assert!(!cookie.contains("Secure"));

        assert!(session_cookie("abc", 60, true).contains("Secure"));
        assert!(clear_session_cookie().contains("Max-Age=0"));
    }

    #[test]
    fn test_session_id_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("theme=dark; SESSION=xyz; lang=en"));
        assert_eq!(session_id_from_headers(&headers).as_deref(), Some("xyz"));

        headers.insert(COOKIE, HeaderValue::from_static("theme=dark"));
        assert_eq!(session_id_from_headers(&headers), None);

        assert_eq!(session_id_from_headers(&HeaderMap::new()), None);
    }
}
