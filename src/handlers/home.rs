// Landing page: currencies + products + preference -> rendered page
use actix_web::{web, HttpRequest, HttpResponse};
use log::{debug, error, info};

use crate::app::Storefront;
use crate::currency::current_currency;
use crate::error::FrontendError;
use crate::middleware::SessionId;
use crate::render::{RenderContext, HOME_TEMPLATE};

/// Landing page handler
///
/// Fetches the currency list, then the product list, and renders the page
/// once both are known. The first failed fetch ends the request with 500
/// and nothing is rendered.
///
/// # Errors
/// Returns an error if either catalog fetch fails or the page cannot be rendered
pub async fn home(
    req: HttpRequest,
    session: SessionId,
    storefront: web::Data<Storefront>,
) -> Result<HttpResponse, FrontendError> {
    info!("[home] session_id={session}");

    let currencies = storefront.list_currencies().await.map_err(|e| {
        error!("[home] session_id={session} currency fetch failed: {e}");
        FrontendError::Currencies(e)
    })?;
    debug!("currencies: {currencies:?}");

    let products = storefront.list_products().await.map_err(|e| {
        error!("[home] session_id={session} product fetch failed: {e}");
        FrontendError::Products(e)
    })?;
    debug!("# products: {}", products.len());

    let context = RenderContext {
        user_currency: current_currency(
            &req,
            storefront.cookie_policy().currency_cookie_name(),
            storefront.default_currency(),
        ),
        currencies,
        products,
    };

    let body = storefront
        .renderer()
        .render(HOME_TEMPLATE, &context)
        .map_err(|e| {
            error!("[home] session_id={session} render failed: {e}");
            FrontendError::from(e)
        })?;

    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body))
}
