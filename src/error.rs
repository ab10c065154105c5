use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::render::RenderError;

/// Failures that abort a storefront request.
///
/// Clients only ever see the status code; details go to the log.
#[derive(Debug, Error)]
pub enum FrontendError {
    #[error("could not retrieve currencies: {0}")]
    Currencies(#[source] CatalogError),
    #[error("could not retrieve products: {0}")]
    Products(#[source] CatalogError),
    #[error("could not render page: {0}")]
    Render(#[from] RenderError),
}

impl ResponseError for FrontendError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).finish()
    }
}
