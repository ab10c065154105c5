// HTTP request handlers for the storefront
pub mod health;
pub mod home;
pub mod logout;
pub mod preferences;

// Re-export the main handler functions
pub use health::health;
pub use home::home;
pub use logout::logout;
pub use preferences::{set_currency, CurrencyForm};
