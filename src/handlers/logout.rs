// Session teardown: forget everything the browser holds for this site
use actix_web::{web, HttpRequest, HttpResponse};
use log::info;

use crate::app::Storefront;
use crate::cookies::request_cookies;
use crate::middleware::SessionId;
use crate::utils::response_builder::ResponseBuilder;

/// Logout handler
///
/// Expires every cookie the request carried, whatever its name, and
/// redirects to the landing page.
pub async fn logout(
    req: HttpRequest,
    session: SessionId,
    storefront: web::Data<Storefront>,
) -> HttpResponse {
    info!("[logout] session_id={session}");

    let policy = storefront.cookie_policy();
    let expired = request_cookies(&req)
        .unwrap_or_default()
        .iter()
        .map(|cookie| policy.expire(cookie.name()))
        .collect();

    ResponseBuilder::redirect("/", expired)
}
