#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

/// Version of the storefront application
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod app;
pub mod catalog;
pub mod cookies;
pub mod currency;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod render;
pub mod settings;
pub mod utils;

/// Re-export commonly used items
pub use app::{configure_services, Storefront};
pub use cookies::CookiePolicy;
pub use middleware::{CookieRenewal, SessionId, SessionIdentity};
pub use settings::StorefrontSettings;
