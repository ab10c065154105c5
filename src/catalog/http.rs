use async_trait::async_trait;
use log::debug;
use serde::Deserialize;
use url::Url;

use super::{Catalog, CatalogError, Product};

const CURRENCY_SERVICE: &str = "currency service";
const PRODUCT_CATALOG: &str = "product catalog";

#[derive(Debug, Deserialize)]
struct CurrenciesResponse {
    currency_codes: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ProductsResponse {
    products: Vec<Product>,
}

/// Catalog backed by the JSON endpoints of the currency and product services.
///
/// - `GET {currency_service}/currencies` answers `{"currency_codes": [...]}`
/// - `GET {product_catalog}/products` answers `{"products": [...]}`
///
/// Calls are made once, without retries. Deadlines are enforced by the
/// caller; dropping the returned future aborts the in-flight request.
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    client: reqwest::Client,
    currencies_url: Url,
    products_url: Url,
}

impl HttpCatalog {
    /// Create a catalog client for the two service base URLs
    ///
    /// # Errors
    ///
    /// Returns an error if either base URL does not form a valid endpoint
    pub fn new(currency_service_url: &str, product_catalog_url: &str) -> Result<Self, CatalogError> {
        Ok(Self {
            client: reqwest::Client::new(),
            currencies_url: endpoint(currency_service_url, "currencies", CURRENCY_SERVICE)?,
            products_url: endpoint(product_catalog_url, "products", PRODUCT_CATALOG)?,
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &Url,
        service: &'static str,
    ) -> Result<T, CatalogError> {
        debug!("Fetching {service} data from {url}");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| CatalogError::Transport { service, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                service,
                status: status.as_u16(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|source| CatalogError::Decode { service, source })
    }
}

fn endpoint(base: &str, path: &str, service: &'static str) -> Result<Url, CatalogError> {
    Url::parse(&format!("{}/{path}", base.trim_end_matches('/')))
        .map_err(|source| CatalogError::Endpoint { service, source })
}

#[async_trait]
impl Catalog for HttpCatalog {
    async fn list_currencies(&self) -> Result<Vec<String>, CatalogError> {
        let body: CurrenciesResponse = self.get_json(&self.currencies_url, CURRENCY_SERVICE).await?;
        Ok(body.currency_codes)
    }

    async fn list_products(&self) -> Result<Vec<Product>, CatalogError> {
        let body: ProductsResponse = self.get_json(&self.products_url, PRODUCT_CATALOG).await?;
        Ok(body.products)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_are_joined_to_base() {
        let catalog = HttpCatalog::new("http://currencyservice:7000/", "http://catalog:3550/api")
            .unwrap();
        assert_eq!(
            catalog.currencies_url.as_str(),
            "http://currencyservice:7000/currencies"
        );
        assert_eq!(catalog.products_url.as_str(), "http://catalog:3550/api/products");
    }

    #[test]
    fn test_invalid_base_is_rejected() {
        let result = HttpCatalog::new("http://currencyservice:7000", "://missing-scheme");
        assert!(matches!(
            result,
            Err(CatalogError::Endpoint {
                service: PRODUCT_CATALOG,
                ..
            })
        ));
    }

    #[actix_web::test]
    async fn test_unreachable_service_is_a_transport_error() {
        // Port 9 (discard) on localhost is not expected to accept HTTP connections.
        let catalog = HttpCatalog::new("http://127.0.0.1:9", "http://127.0.0.1:9").unwrap();
        let result = catalog.list_currencies().await;
        assert!(matches!(
            result,
            Err(CatalogError::Transport {
                service: CURRENCY_SERVICE,
                ..
            })
        ));
    }
}
