//! Process configuration, read once at cold start.

use lambda_http::tracing::warn;

use crate::models::CatalogObjectType;

pub const SQUARE_VERSION: &str = "2023-10-20";

const SANDBOX_URL: &str = "https://connect.squareupsandbox.com";
const PRODUCTION_URL: &str = "https://connect.squareup.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Sandbox,
    Production,
}

impl Environment {
    /// `sandbox` (any case, surrounding whitespace ignored) selects the sandbox,
    /// everything else, including an unset value, selects production.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.trim().eq_ignore_ascii_case("sandbox") => Environment::Sandbox,
            _ => Environment::Production,
        }
    }

    pub fn base_url(self) -> &'static str {
        match self {
            Environment::Sandbox => SANDBOX_URL,
            Environment::Production => PRODUCTION_URL,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SquareConfig {
    pub environment: Environment,
    /// Raw `SQUARE_ENVIRONMENT` value, echoed back to the browser.
    pub environment_name: Option<String>,
    pub app_id: Option<String>,
    pub location_id: Option<String>,
    pub access_token: Option<String>,
    pub currency: String,
    pub catalog_types: Vec<CatalogObjectType>,
}

impl SquareConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment_name = lookup("SQUARE_ENVIRONMENT");
        let access_token = lookup("SQUARE_ACCESS_TOKEN")
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        let catalog_types = lookup("SQUARE_CATALOG_TYPES")
            .and_then(|raw| match CatalogObjectType::parse_list(&raw) {
                Ok(types) => Some(types),
                Err(unknown) => {
                    warn!(value = %raw, unknown = %unknown, "Ignoring SQUARE_CATALOG_TYPES, using all types");
                    None
                }
            })
            .filter(|types| !types.is_empty())
            .unwrap_or_else(|| CatalogObjectType::ALL.to_vec());

        SquareConfig {
            environment: Environment::parse(environment_name.as_deref()),
            environment_name,
            app_id: lookup("SQUARE_APP_ID"),
            location_id: lookup("SQUARE_LOCATION_ID"),
            access_token,
            currency: lookup("SQUARE_CURRENCY")
                .map(|c| c.trim().to_ascii_uppercase())
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| "USD".to_string()),
            catalog_types,
        }
    }

    pub fn base_url(&self) -> &'static str {
        self.environment.base_url()
    }
}
