#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use actix_web::{middleware::Logger, web, App, HttpServer};
use storefront::{
    configure_services, CookieRenewal, SessionIdentity, Storefront, StorefrontSettings, VERSION,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load configuration from Settings.toml and environment variables
    // This also loads .env file and initializes the logger
    let settings = StorefrontSettings::load()
        .map_err(|e| std::io::Error::other(format!("Failed to load settings: {e:#}")))?;

    let storefront = Storefront::from_settings(&settings)
        .map_err(|e| std::io::Error::other(format!("Failed to initialize storefront: {e:#}")))?;

    start_server(storefront, &settings).await
}

/// Start the HTTP server
///
/// # Errors
///
/// Returns an error if:
/// - Server binding fails
/// - Server fails to start
async fn start_server(storefront: Storefront, settings: &StorefrontSettings) -> std::io::Result<()> {
    let bind_address = settings.get_bind_address();
    print_startup_info(&bind_address, settings);

    let cookie_policy = storefront.cookie_policy().clone();
    let storefront = web::Data::new(storefront);

    HttpServer::new(move || {
        // Renewal wraps session identity so it only ever sees browser-sent cookies
        App::new()
            .app_data(storefront.clone())
            .wrap(SessionIdentity::new(cookie_policy.clone()))
            .wrap(CookieRenewal::new(cookie_policy.clone()))
            .wrap(Logger::default())
            .configure(configure_services)
    })
    .bind(&bind_address)?
    .run()
    .await
}

fn print_startup_info(bind_address: &str, settings: &StorefrontSettings) {
    println!("Starting Storefront frontend {VERSION} on http://{bind_address}");
    println!();
    println!("Endpoints:");
    println!("  GET  /             - Landing page");
    println!("  POST /setCurrency  - Change display currency (form field currency_code)");
    println!("  ANY  /logout       - Expire all cookies");
    println!("  GET  /_healthz     - Health check");
    println!();
    println!("Catalog backend: {:?}", settings.catalog.backend);
    println!("Default currency: {}", settings.currency.default_code);
    println!(
        "Cookie max-age: {}s (secure: {})",
        settings.cookies.max_age_seconds, settings.cookies.secure
    );
}
