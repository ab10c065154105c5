// Preference update: persist the visitor's currency choice
use actix_web::{web, Either, HttpResponse};
use log::info;
use serde::Deserialize;

use crate::app::Storefront;
use crate::middleware::SessionId;
use crate::utils::response_builder::ResponseBuilder;

#[derive(Debug, Default, Deserialize)]
pub struct CurrencyForm {
    #[serde(default)]
    pub currency_code: String,
}

/// Currency selection handler
///
/// Stores `currency_code` (form body, or query string as a fallback) in the
/// currency cookie when it is non-empty. The code is stored verbatim, it is
/// not checked against the supported currencies. Always redirects to the
/// landing page.
pub async fn set_currency(
    session: SessionId,
    payload: Either<web::Form<CurrencyForm>, web::Query<CurrencyForm>>,
    storefront: web::Data<Storefront>,
) -> HttpResponse {
    let form = match payload {
        Either::Left(form) => form.into_inner(),
        Either::Right(query) => query.into_inner(),
    };
    info!(
        "[setCurrency] session_id={session} currency_code={:?}",
        form.currency_code
    );

    let policy = storefront.cookie_policy();
    let cookies = if form.currency_code.is_empty() {
        Vec::new()
    } else {
        vec![policy.issue(policy.currency_cookie_name(), &form.currency_code)]
    };

    ResponseBuilder::redirect("/", cookies)
}
