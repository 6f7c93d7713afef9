//! Session cookie construction.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

use crate::config::CookieConfig;

/// HTTP-only cookie whose max-age matches the token lifetime.
pub fn session_cookie(cfg: &CookieConfig, token: String, ttl: Duration) -> Cookie<'static> {
    Cookie::build((cfg.name.clone(), token))
        .http_only(true)
        .secure(cfg.secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(ttl)
        .build()
}

/// Always emits an expired cookie on the session path, whether or not the
/// request carried one.
pub fn clear_session(jar: CookieJar, cfg: &CookieConfig) -> CookieJar {
    let mut cookie = Cookie::build((cfg.name.clone(), ""))
        .http_only(true)
        .secure(cfg.secure)
        .same_site(SameSite::Lax)
        .path("/")
        .build();
    cookie.make_removal();
    jar.add(cookie)
}

pub fn session_token<'a>(jar: &'a CookieJar, cfg: &CookieConfig) -> Option<&'a str> {
    jar.get(&cfg.name)
        .map(|c| c.value())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> CookieConfig {
        CookieConfig {
            name: "auth_token".into(),
            secure: true,
        }
    }

    #[test]
    fn session_cookie_attributes() {
        let c = session_cookie(&cfg(), "abc.def.ghi".into(), Duration::hours(24));
        let rendered = c.to_string();
        assert!(rendered.starts_with("auth_token=abc.def.ghi"));
        assert!(rendered.contains("HttpOnly"));
        assert!(rendered.contains("Secure"));
        assert!(rendered.contains("SameSite=Lax"));
        assert!(rendered.contains("Path=/"));
        assert!(rendered.contains("Max-Age=86400"));
    }

    #[test]
    fn clearing_emits_expired_cookie() {
        let jar = clear_session(CookieJar::new(), &cfg());
        let c = jar.get("auth_token").expect("removal cookie");
        assert_eq!(c.value(), "");
        assert_eq!(c.max_age(), Some(Duration::ZERO));
        assert_eq!(c.path(), Some("/"));
    }

    #[test]
    fn session_token_reads_named_cookie_only() {
        let jar = CookieJar::new()
            .add(Cookie::new("other", "x"))
            .add(Cookie::new("auth_token", "tok"));
        assert_eq!(session_token(&jar, &cfg()), Some("tok"));

        let empty = CookieJar::new().add(Cookie::new("auth_token", ""));
        assert_eq!(session_token(&empty, &cfg()), None);
    }
}
