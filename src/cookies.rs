use actix_web::cookie::{time::Duration, Cookie, ParseError, SameSite};
use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse};
use std::collections::HashSet;
use std::str::Utf8Error;
use thiserror::Error;

use crate::settings::CookieSettings;

/// Common cookie names used across the application
pub const SESSION_COOKIE_NAME: &str = "shop_session-id";
pub const CURRENCY_COOKIE_NAME: &str = "shop_currency";

/// Issuance rules shared by every cookie the frontend writes.
///
/// One max-age is used both when a cookie is first issued and whenever
/// it is renewed, so a visitor who keeps browsing never loses a cookie.
#[derive(Debug, Clone)]
pub struct CookiePolicy {
    max_age: Duration,
    secure: bool,
    session_cookie: String,
    currency_cookie: String,
}

impl CookiePolicy {
    #[must_use]
    pub fn new(max_age: Duration, secure: bool) -> Self {
        Self {
            max_age,
            secure,
            session_cookie: SESSION_COOKIE_NAME.to_string(),
            currency_cookie: CURRENCY_COOKIE_NAME.to_string(),
        }
    }

    #[must_use]
    pub fn from_settings(settings: &CookieSettings) -> Self {
        Self {
            max_age: Duration::seconds(settings.max_age_seconds),
            secure: settings.secure,
            session_cookie: settings.session_cookie.clone(),
            currency_cookie: settings.currency_cookie.clone(),
        }
    }

    #[must_use]
    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    #[must_use]
    pub fn session_cookie_name(&self) -> &str {
        &self.session_cookie
    }

    #[must_use]
    pub fn currency_cookie_name(&self) -> &str {
        &self.currency_cookie
    }

    /// Build a cookie carrying the standard max-age
    #[must_use]
    pub fn issue(&self, name: &str, value: &str) -> Cookie<'static> {
        Cookie::build(name.to_owned(), value.to_owned())
            .http_only(name == self.session_cookie)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .path("/")
            .max_age(self.max_age)
            .finish()
    }

    /// Re-issue an observed cookie with its value unchanged and a fresh max-age
    #[must_use]
    pub fn renew(&self, cookie: &Cookie<'_>) -> Cookie<'static> {
        self.issue(cookie.name(), cookie.value())
    }

    /// Create an expired cookie that makes the browser drop `name` immediately
    #[must_use]
    pub fn expire(&self, name: &str) -> Cookie<'static> {
        Cookie::build(name.to_owned(), "")
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .path("/")
            .max_age(Duration::seconds(-1))
            .finish()
    }
}

impl Default for CookiePolicy {
    fn default() -> Self {
        Self::from_settings(&CookieSettings::default())
    }
}

/// Failure to read the request's `Cookie` headers
#[derive(Debug, Error)]
pub enum CookieHeaderError {
    #[error("cookie header is not valid UTF-8: {0}")]
    NotUtf8(#[from] Utf8Error),
    #[error("malformed cookie pair: {0}")]
    Malformed(#[from] ParseError),
}

/// All cookies sent with the request, values exactly as the browser sent them.
///
/// Values are not percent-decoded, so re-issuing one writes back the same
/// bytes the browser holds.
///
/// # Errors
///
/// Returns an error when a `Cookie` header is not valid UTF-8 or holds a
/// malformed pair. A request without cookies yields an empty list.
pub fn request_cookies(req: &HttpRequest) -> Result<Vec<Cookie<'static>>, CookieHeaderError> {
    let mut cookies = Vec::new();
    for value in req.headers().get_all(header::COOKIE) {
        let raw = std::str::from_utf8(value.as_bytes())?;
        for pair in raw.split(';').map(str::trim).filter(|pair| !pair.is_empty()) {
            cookies.push(Cookie::parse(pair.to_owned())?);
        }
    }
    Ok(cookies)
}

/// Look up a single request cookie, telling "absent" apart from "unreadable".
///
/// # Errors
///
/// Returns an error when the request's cookies cannot be parsed
pub fn find_cookie(
    req: &HttpRequest,
    name: &str,
) -> Result<Option<Cookie<'static>>, CookieHeaderError> {
    request_cookies(req).map(|cookies| cookies.into_iter().find(|cookie| cookie.name() == name))
}

/// Helper function to extract a cookie value from `HttpRequest`, ignoring parse failures
#[must_use]
pub fn extract_cookie_value(req: &HttpRequest, name: &str) -> Option<String> {
    find_cookie(req, name)
        .ok()
        .flatten()
        .map(|cookie| cookie.value().to_string())
}

/// Names of the cookies a response already sets
#[must_use]
pub fn response_cookie_names<B>(res: &HttpResponse<B>) -> HashSet<String> {
    res.cookies().map(|cookie| cookie.name().to_string()).collect()
}

/// Add a cookie to a response, logging instead of failing when the header is rejected
pub fn set_response_cookie<B>(res: &mut HttpResponse<B>, cookie: &Cookie<'_>) {
    if let Err(e) = res.add_cookie(cookie) {
        log::warn!("Failed to set cookie '{}': {e}", cookie.name());
    }
}
