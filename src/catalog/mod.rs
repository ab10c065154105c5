//! Catalog collaborators consulted while assembling the landing page.
//!
//! The frontend only needs two reads: the currencies it may display prices
//! in and the products to list. Both are behind the [`Catalog`] trait so the
//! page handler never knows whether it talks to the catalog services over
//! HTTP or to a list declared in the settings file.

pub mod fixed;
pub mod http;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::settings::{CatalogBackend, CatalogSettings};

pub use fixed::FixedCatalog;
pub use http::HttpCatalog;

/// An amount of money in a given currency.
///
/// `nanos` holds the fractional part in units of 10^-9.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    pub currency_code: String,
    pub units: i64,
    #[serde(default)]
    pub nanos: i32,
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.units < 0 || self.nanos < 0 { "-" } else { "" };
        let cents = (self.nanos / 10_000_000).unsigned_abs();
        write!(
            f,
            "{} {sign}{}.{cents:02}",
            self.currency_code,
            self.units.unsigned_abs()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub picture: String,
    pub price_usd: Money,
    #[serde(default)]
    pub categories: Vec<String>,
}

/// Errors raised while fetching catalog data
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid {service} endpoint: {source}")]
    Endpoint {
        service: &'static str,
        #[source]
        source: url::ParseError,
    },
    #[error("failed to reach {service}: {source}")]
    Transport {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{service} answered with status {status}")]
    Status { service: &'static str, status: u16 },
    #[error("invalid response from {service}: {source}")]
    Decode {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{service} did not answer within {timeout_ms}ms")]
    DeadlineExceeded {
        service: &'static str,
        timeout_ms: u128,
    },
    #[error("{0} is unavailable")]
    Unavailable(String),
}

/// Read access to the currency and product catalogs
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Currency codes prices can be shown in
    ///
    /// # Errors
    ///
    /// Returns an error if the currency service cannot be reached or answers badly
    async fn list_currencies(&self) -> Result<Vec<String>, CatalogError>;

    /// Every product offered on the storefront
    ///
    /// # Errors
    ///
    /// Returns an error if the product catalog cannot be reached or answers badly
    async fn list_products(&self) -> Result<Vec<Product>, CatalogError>;
}

/// Build the catalog selected in the settings
///
/// # Errors
///
/// Returns an error if a configured service URL is not a valid URL
pub fn catalog_from_settings(settings: &CatalogSettings) -> Result<Arc<dyn Catalog>, CatalogError> {
    match settings.backend {
        CatalogBackend::Http => Ok(Arc::new(HttpCatalog::new(
            &settings.currency_service_url,
            &settings.product_catalog_url,
        )?)),
        CatalogBackend::Fixed => Ok(Arc::new(FixedCatalog::new(
            settings.currencies.clone(),
            settings.products.clone(),
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_display() {
        let price = Money {
            currency_code: "USD".to_string(),
            units: 19,
            nanos: 990_000_000,
        };
        assert_eq!(price.to_string(), "USD 19.99");

        let round = Money {
            currency_code: "EUR".to_string(),
            units: 5,
            nanos: 0,
        };
        assert_eq!(round.to_string(), "EUR 5.00");
    }

    #[test]
    fn test_money_display_keeps_sign_below_one_unit() {
        let refund = Money {
            currency_code: "USD".to_string(),
            units: 0,
            nanos: -500_000_000,
        };
        assert_eq!(refund.to_string(), "USD -0.50");

        let debit = Money {
            currency_code: "USD".to_string(),
            units: -3,
            nanos: -250_000_000,
        };
        assert_eq!(debit.to_string(), "USD -3.25");
    }

    #[test]
    fn test_product_optional_fields_default() {
        let product: Product = serde_json::from_str(
            r#"{"id":"9SIQT8TOJO","name":"Bamboo Glass Jar","price_usd":{"currency_code":"USD","units":5}}"#,
        )
        .unwrap();

        assert_eq!(product.price_usd.nanos, 0);
        assert!(product.description.is_empty());
        assert!(product.categories.is_empty());
    }

    #[test]
    fn test_fixed_backend_from_settings() {
        let settings = CatalogSettings {
            backend: CatalogBackend::Fixed,
            currencies: vec!["USD".to_string()],
            ..CatalogSettings::default()
        };
        assert!(catalog_from_settings(&settings).is_ok());
    }

    #[test]
    fn test_http_backend_rejects_bad_url() {
        let settings = CatalogSettings {
            backend: CatalogBackend::Http,
            currency_service_url: "not a url".to_string(),
            ..CatalogSettings::default()
        };
        assert!(matches!(
            catalog_from_settings(&settings),
            Err(CatalogError::Endpoint { service: "currency service", .. })
        ));
    }
}
