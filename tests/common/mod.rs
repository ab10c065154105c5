//! Shared fakes and helpers for storefront handler tests
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use actix_web::cookie::time::Duration;
use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use async_trait::async_trait;
use storefront::catalog::{Catalog, CatalogError, Money, Product};
use storefront::render::{PageRenderer, RenderContext, RenderError};
use storefront::{CookiePolicy, Storefront};

pub const MAX_AGE: Duration = Duration::hours(48);
pub const DEFAULT_CURRENCY: &str = "USD";

/// Build an initialized test service with the production middleware stack
#[allow(unused_macros)]
macro_rules! storefront_app {
    ($shop:expr) => {{
        let shop: ::storefront::Storefront = $shop;
        let policy = shop.cookie_policy().clone();
        ::actix_web::test::init_service(
            ::actix_web::App::new()
                .app_data(::actix_web::web::Data::new(shop))
                .wrap(::storefront::SessionIdentity::new(policy.clone()))
                .wrap(::storefront::CookieRenewal::new(policy))
                .configure(::storefront::configure_services),
        )
        .await
    }};
}

pub fn policy() -> CookiePolicy {
    CookiePolicy::new(MAX_AGE, false)
}

pub fn product(id: &str, name: &str, units: i64) -> Product {
    Product {
        id: id.to_string(),
        name: name.to_string(),
        description: format!("{name} description"),
        picture: format!("/static/img/products/{id}.jpg"),
        price_usd: Money {
            currency_code: "USD".to_string(),
            units,
            nanos: 990_000_000,
        },
        categories: vec!["accessories".to_string()],
    }
}

pub fn sample_currencies() -> Vec<String> {
    ["USD", "EUR", "CAD", "JPY"]
        .iter()
        .map(ToString::to_string)
        .collect()
}

pub fn sample_products() -> Vec<Product> {
    vec![
        product("OLJCESPC7Z", "Sunglasses", 19),
        product("66VCHSJNUP", "Tank Top", 18),
        product("1YMWWN1N4O", "Watch", 109),
    ]
}

/// Catalog fake that records the order of calls and can fail either fetch
pub struct ScriptedCatalog {
    currencies: Vec<String>,
    products: Vec<Product>,
    fail_currencies: AtomicBool,
    fail_products: AtomicBool,
    calls: Mutex<Vec<&'static str>>,
}

impl ScriptedCatalog {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            currencies: sample_currencies(),
            products: sample_products(),
            fail_currencies: AtomicBool::new(false),
            fail_products: AtomicBool::new(false),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing_currencies() -> Arc<Self> {
        let catalog = Self::new();
        catalog.fail_currencies.store(true, Ordering::SeqCst);
        catalog
    }

    pub fn failing_products() -> Arc<Self> {
        let catalog = Self::new();
        catalog.fail_products.store(true, Ordering::SeqCst);
        catalog
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Catalog for ScriptedCatalog {
    async fn list_currencies(&self) -> Result<Vec<String>, CatalogError> {
        self.calls.lock().unwrap().push("currencies");
        if self.fail_currencies.load(Ordering::SeqCst) {
            return Err(CatalogError::Unavailable("currency service".to_string()));
        }
        Ok(self.currencies.clone())
    }

    async fn list_products(&self) -> Result<Vec<Product>, CatalogError> {
        self.calls.lock().unwrap().push("products");
        if self.fail_products.load(Ordering::SeqCst) {
            return Err(CatalogError::Unavailable("product catalog".to_string()));
        }
        Ok(self.products.clone())
    }
}

/// Renderer fake that keeps every context it was handed
pub struct RecordingRenderer {
    fail: bool,
    calls: Mutex<Vec<(String, RenderContext)>>,
}

impl RecordingRenderer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            fail: false,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<(String, RenderContext)> {
        self.calls.lock().unwrap().clone()
    }
}

impl PageRenderer for RecordingRenderer {
    fn render(&self, template: &str, context: &RenderContext) -> Result<String, RenderError> {
        self.calls
            .lock()
            .unwrap()
            .push((template.to_string(), context.clone()));

        if self.fail {
            return Err(RenderError::Io {
                path: template.to_string(),
                source: std::io::Error::other("template exploded"),
            });
        }
        Ok(format!(
            "currency={} products={}",
            context.user_currency,
            context.products.len()
        ))
    }
}

pub fn build_storefront(catalog: Arc<ScriptedCatalog>, renderer: Arc<RecordingRenderer>) -> Storefront {
    Storefront::new(catalog, renderer, policy(), DEFAULT_CURRENCY)
}

/// Cookies set on a response, in header order
pub fn response_cookies<B>(res: &ServiceResponse<B>) -> Vec<Cookie<'static>> {
    res.response().cookies().map(Cookie::into_owned).collect()
}

pub fn find_response_cookie<B>(res: &ServiceResponse<B>, name: &str) -> Option<Cookie<'static>> {
    response_cookies(res).into_iter().find(|c| c.name() == name)
}
