use actix_web::HttpRequest;

use crate::cookies::extract_cookie_value;

/// Active currency for a request.
///
/// Returns the currency cookie's value verbatim when it is present and
/// non-empty, otherwise `default_code`. Unknown codes are not rejected and
/// an unreadable cookie header counts as "no preference".
#[must_use]
pub fn current_currency(req: &HttpRequest, currency_cookie: &str, default_code: &str) -> String {
    extract_cookie_value(req, currency_cookie)
        .filter(|code| !code.is_empty())
        .unwrap_or_else(|| default_code.to_string())
}
