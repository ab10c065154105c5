use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::catalog::Product;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StorefrontSettings {
    pub application: ApplicationSettings,
    pub cookies: CookieSettings,
    pub currency: CurrencySettings,
    pub catalog: CatalogSettings,
    pub templates: TemplateSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CookieSettings {
    /// Max-age applied when a cookie is issued and every time it is renewed
    pub max_age_seconds: i64,
    pub secure: bool,
    pub session_cookie: String,
    pub currency_cookie: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrencySettings {
    /// Currency shown to visitors who never picked one
    pub default_code: String,
}

/// Where the landing page gets its currencies and products from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogBackend {
    /// JSON endpoints of the currency and product catalog services
    Http,
    /// Lists declared inline in the settings file
    Fixed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    pub backend: CatalogBackend,
    pub currency_service_url: String,
    pub product_catalog_url: String,
    /// Deadline for each collaborator call made while serving a request
    pub request_timeout_ms: u64,
    pub currencies: Vec<String>,
    pub products: Vec<Product>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateSettings {
    /// Folder searched for `home.html`; the built-in template is used when absent
    pub folder: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for ApplicationSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for CookieSettings {
    fn default() -> Self {
        Self {
            max_age_seconds: 60 * 60 * 48,
            secure: false,
            session_cookie: crate::cookies::SESSION_COOKIE_NAME.to_string(),
            currency_cookie: crate::cookies::CURRENCY_COOKIE_NAME.to_string(),
        }
    }
}

impl Default for CurrencySettings {
    fn default() -> Self {
        Self {
            default_code: "USD".to_string(),
        }
    }
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            backend: CatalogBackend::Http,
            currency_service_url: "http://localhost:7000".to_string(),
            product_catalog_url: "http://localhost:3550".to_string(),
            request_timeout_ms: 3000,
            currencies: Vec::new(),
            products: Vec::new(),
        }
    }
}

impl Default for TemplateSettings {
    fn default() -> Self {
        Self {
            folder: "templates".to_string(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl StorefrontSettings {
    /// Load settings from configuration files and environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Logger initialization fails
    /// - A settings file cannot be read or parsed
    pub fn load() -> anyhow::Result<Self> {
        Self::load_env_file();

        let mut settings = Self::load_base_settings()?;
        Self::apply_env_overrides(&mut settings);

        env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or(settings.logging.level.as_str()),
        )
        .try_init()
        .context("failed to initialize logger")?;

        Ok(settings)
    }

    /// Load base settings from TOML file(s) or use defaults
    /// Settings are loaded with the following priority (highest to lowest):
    /// 1. Environment variables (applied separately after loading base settings)
    /// 2. Settings.toml in `STOREFRONT_CONFIG_DIR` (if specified and exists)
    /// 3. Settings.toml in current directory (if exists)
    /// 4. Default settings
    fn load_base_settings() -> anyhow::Result<Self> {
        let mut settings = Self::default();

        let default_config_path = Path::new("Settings.toml");
        if default_config_path.exists() {
            settings = Self::from_file(default_config_path)?;
            println!("✓ Loaded base settings from {}", default_config_path.display());
        }

        if let Ok(config_dir) = std::env::var("STOREFRONT_CONFIG_DIR") {
            let config_path = Path::new(&config_dir).join("Settings.toml");
            if config_path.exists() {
                settings = Self::from_file(&config_path)?;
                println!("✓ Overriding settings from {}", config_path.display());
            } else {
                println!(
                    "ℹ STOREFRONT_CONFIG_DIR set but no Settings.toml found at: {}",
                    config_path.display()
                );
            }
        }

        Ok(settings)
    }

    /// Parse a single TOML settings file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid settings TOML
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Parse settings from TOML text, filling gaps with defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid settings TOML
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        Ok(basic_toml::from_str(content)?)
    }

    /// Apply environment variable overrides to settings
    pub fn apply_env_overrides(settings: &mut Self) {
        Self::apply_application_env_overrides(&mut settings.application);
        Self::apply_cookie_env_overrides(&mut settings.cookies);
        Self::apply_currency_env_overrides(&mut settings.currency);
        Self::apply_catalog_env_overrides(&mut settings.catalog);
        Self::apply_template_env_overrides(&mut settings.templates);
        Self::apply_logging_env_overrides(&mut settings.logging);
    }

    fn apply_application_env_overrides(app_settings: &mut ApplicationSettings) {
        if let Ok(host) = std::env::var("HOST") {
            app_settings.host = host;
        }
        if let Ok(port_str) = std::env::var("PORT") {
            if let Ok(port) = port_str.parse::<u16>() {
                app_settings.port = port;
            }
        }
    }

    fn apply_cookie_env_overrides(cookie_settings: &mut CookieSettings) {
        if let Ok(max_age_str) = std::env::var("COOKIE_MAX_AGE_SECONDS") {
            if let Ok(max_age) = max_age_str.parse::<i64>() {
                cookie_settings.max_age_seconds = max_age;
            }
        }
        if let Ok(cookie_secure_str) = std::env::var("COOKIE_SECURE") {
            if let Ok(cookie_secure) = cookie_secure_str.parse::<bool>() {
                cookie_settings.secure = cookie_secure;
            }
        }
    }

    fn apply_currency_env_overrides(currency_settings: &mut CurrencySettings) {
        if let Ok(code) = std::env::var("DEFAULT_CURRENCY") {
            if !code.is_empty() {
                currency_settings.default_code = code;
            }
        }
    }

    fn apply_catalog_env_overrides(catalog_settings: &mut CatalogSettings) {
        if let Ok(url) = std::env::var("CURRENCY_SERVICE_URL") {
            catalog_settings.currency_service_url = url;
        }
        if let Ok(url) = std::env::var("PRODUCT_CATALOG_SERVICE_URL") {
            catalog_settings.product_catalog_url = url;
        }
        if let Ok(timeout_str) = std::env::var("CATALOG_TIMEOUT_MS") {
            if let Ok(timeout) = timeout_str.parse::<u64>() {
                catalog_settings.request_timeout_ms = timeout;
            }
        }
    }

    fn apply_template_env_overrides(template_settings: &mut TemplateSettings) {
        if let Ok(folder) = std::env::var("TEMPLATES_FOLDER") {
            template_settings.folder = folder;
        }
    }

    fn apply_logging_env_overrides(logging_settings: &mut LoggingSettings) {
        if let Ok(log_level) = std::env::var("RUST_LOG") {
            logging_settings.level = log_level;
        }
    }

    /// Load environment variables from .env file
    fn load_env_file() {
        if let Ok(contents) = std::fs::read_to_string(".env") {
            for line in contents.lines() {
                if let Some((key, value)) = line.split_once('=') {
                    std::env::set_var(key.trim(), value.trim());
                }
            }
        }
    }

    /// Get the bind address for the server
    #[must_use]
    pub fn get_bind_address(&self) -> String {
        format!("{}:{}", self.application.host, self.application.port)
    }
}
