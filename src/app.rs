//! Application wiring: the shared [`Storefront`] state and the route table.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use actix_web::web;
use anyhow::Context;

use crate::catalog::{catalog_from_settings, Catalog, CatalogError, Product};
use crate::cookies::CookiePolicy;
use crate::handlers::{health, home, logout, set_currency};
use crate::render::{PageRenderer, TemplateRenderer};
use crate::settings::StorefrontSettings;

const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(3);

/// Everything the handlers need, built once at startup and never mutated.
pub struct Storefront {
    catalog: Arc<dyn Catalog>,
    renderer: Arc<dyn PageRenderer>,
    cookie_policy: CookiePolicy,
    default_currency: String,
    fetch_timeout: Duration,
}

impl Storefront {
    #[must_use]
    pub fn new(
        catalog: Arc<dyn Catalog>,
        renderer: Arc<dyn PageRenderer>,
        cookie_policy: CookiePolicy,
        default_currency: impl Into<String>,
    ) -> Self {
        Self {
            catalog,
            renderer,
            cookie_policy,
            default_currency: default_currency.into(),
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    /// Deadline applied to each catalog call made while serving a request
    #[must_use]
    pub fn with_fetch_timeout(mut self, fetch_timeout: Duration) -> Self {
        self.fetch_timeout = fetch_timeout;
        self
    }

    /// Build the storefront described by the settings
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog endpoints are invalid or the
    /// landing page template cannot be loaded
    pub fn from_settings(settings: &StorefrontSettings) -> anyhow::Result<Self> {
        let catalog = catalog_from_settings(&settings.catalog)
            .context("failed to configure catalog")?;
        let renderer = TemplateRenderer::from_settings(&settings.templates)
            .context("failed to load templates")?;

        Ok(Self::new(
            catalog,
            Arc::new(renderer),
            CookiePolicy::from_settings(&settings.cookies),
            settings.currency.default_code.clone(),
        )
        .with_fetch_timeout(Duration::from_millis(settings.catalog.request_timeout_ms)))
    }

    #[must_use]
    pub fn cookie_policy(&self) -> &CookiePolicy {
        &self.cookie_policy
    }

    #[must_use]
    pub fn default_currency(&self) -> &str {
        &self.default_currency
    }

    #[must_use]
    pub fn renderer(&self) -> &dyn PageRenderer {
        self.renderer.as_ref()
    }

    /// Supported currencies, bounded by the fetch deadline
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog fails or does not answer in time
    pub async fn list_currencies(&self) -> Result<Vec<String>, CatalogError> {
        self.with_deadline("currency service", self.catalog.list_currencies())
            .await
    }

    /// Products on offer, bounded by the fetch deadline
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog fails or does not answer in time
    pub async fn list_products(&self) -> Result<Vec<Product>, CatalogError> {
        self.with_deadline("product catalog", self.catalog.list_products())
            .await
    }

    async fn with_deadline<T>(
        &self,
        service: &'static str,
        fetch: impl Future<Output = Result<T, CatalogError>>,
    ) -> Result<T, CatalogError> {
        tokio::time::timeout(self.fetch_timeout, fetch)
            .await
            .map_err(|_| CatalogError::DeadlineExceeded {
                service,
                timeout_ms: self.fetch_timeout.as_millis(),
            })?
    }
}

/// Register the storefront routes
pub fn configure_services(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(home))
        .route("/setCurrency", web::post().to(set_currency))
        .route("/logout", web::route().to(logout))
        .route("/_healthz", web::get().to(health));
}
