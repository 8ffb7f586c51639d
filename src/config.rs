//! Environment-driven configuration. `.env` is loaded by `main` via dotenvy.

use std::env;
use std::str::FromStr;
use crate::domain::services::order_id::DEFAULT_PREFIX;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CashfreeEnvironment { Sandbox, Production }

impl CashfreeEnvironment {
    pub fn base_url(&self) -> &'static str {
        match self {
            Self::Sandbox => "https://sandbox.cashfree.com",
            Self::Production => "https://api.cashfree.com",
        }
    }
}

#[derive(Clone, Debug)]
pub struct CashfreeConfig {
    pub app_id: String,
    pub secret_key: String,
    pub environment: CashfreeEnvironment,
}

#[derive(Clone, Debug)]
pub struct EmailConfig {
    pub api_key: String,
    pub from: String,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub database_url: Option<String>,
    /// JSON product list loaded into the in-memory catalog when there is no database.
    pub catalog_seed_file: Option<String>,
    pub nats_url: Option<String>,
    pub public_base_url: String,
    pub order_id_prefix: String,
    pub order_id_max_attempts: u32,
    pub cashfree: Option<CashfreeConfig>,
    pub email: Option<EmailConfig>,
    pub admin_token: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8083,
            database_url: None,
            catalog_seed_file: None,
            nats_url: None,
            public_base_url: "http://localhost:3000".to_string(),
            order_id_prefix: DEFAULT_PREFIX.to_string(),
            order_id_max_attempts: 3,
            cashfree: None,
            email: None,
            admin_token: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let cashfree = match (get("CASHFREE_APP_ID"), get("CASHFREE_SECRET_KEY")) {
            (Some(app_id), Some(secret_key)) => Some(CashfreeConfig {
                app_id,
                secret_key,
                environment: match get("CASHFREE_ENV").as_deref() {
                    Some("production") => CashfreeEnvironment::Production,
                    _ => CashfreeEnvironment::Sandbox,
                },
            }),
            _ => None,
        };

        let email = get("RESEND_API_KEY").map(|api_key| EmailConfig {
            api_key,
            from: get("EMAIL_FROM").unwrap_or_else(|| "XCosmetic <onboarding@resend.dev>".to_string()),
        });

        Self {
            port: parse_or(get("PORT"), defaults.port),
            database_url: get("DATABASE_URL"),
            catalog_seed_file: get("CATALOG_SEED_FILE"),
            nats_url: get("NATS_URL"),
            public_base_url: get("PUBLIC_BASE_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or(defaults.public_base_url),
            order_id_prefix: get("ORDER_ID_PREFIX").unwrap_or(defaults.order_id_prefix),
            order_id_max_attempts: parse_or(get("ORDER_ID_MAX_ATTEMPTS"), defaults.order_id_max_attempts).max(1),
            cashfree,
            email,
            admin_token: get("ADMIN_TOKEN"),
        }
    }
}

fn parse_or<T: FromStr>(value: Option<String>, default: T) -> T {
    match value {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(value = %raw, "ignoring unparsable config value");
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[]));
        assert_eq!(config.port, 8083);
        assert_eq!(config.order_id_prefix, "XC");
        assert_eq!(config.order_id_max_attempts, 3);
        assert!(config.cashfree.is_none());
        assert!(config.email.is_none());
        assert!(config.database_url.is_none());
        assert!(config.catalog_seed_file.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("PORT", "9000"),
            ("PUBLIC_BASE_URL", "https://shop.example/"),
            ("CASHFREE_APP_ID", "app"),
            ("CASHFREE_SECRET_KEY", "secret"),
            ("CASHFREE_ENV", "production"),
            ("ORDER_ID_MAX_ATTEMPTS", "0"),
            ("DATABASE_URL", "  "),
            ("CATALOG_SEED_FILE", "fixtures/catalog.json"),
        ]));
        assert_eq!(config.port, 9000);
        assert_eq!(config.public_base_url, "https://shop.example");
        assert_eq!(config.cashfree.unwrap().environment, CashfreeEnvironment::Production);
        assert_eq!(config.order_id_max_attempts, 1);
        assert!(config.database_url.is_none());
        assert_eq!(config.catalog_seed_file.as_deref(), Some("fixtures/catalog.json"));
    }

    #[test]
    fn test_cashfree_needs_both_keys() {
        let config = Config::from_lookup(lookup(&[("CASHFREE_APP_ID", "app")]));
        assert!(config.cashfree.is_none());
    }

    #[test]
    fn test_bad_port_falls_back() {
        let config = Config::from_lookup(lookup(&[("PORT", "not-a-port")]));
        assert_eq!(config.port, 8083);
    }
}
