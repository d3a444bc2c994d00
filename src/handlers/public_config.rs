//! Public (non-secret) Square identifiers for the browser payment form.

use lambda_http::tracing::{error, info};
use lambda_http::{Body, Response};

use crate::config::SquareConfig;
use crate::http::{message_response, raw_json_response};
use crate::models::PublicConfig;

/// Returns `appId`, `locationId` and `environment`. Unset values are left out.
pub fn handle_get_config(config: &SquareConfig) -> Response<Body> {
    info!(environment = ?config.environment_name, "Config requested");

    let public = PublicConfig {
        app_id: config.app_id.clone(),
        location_id: config.location_id.clone(),
        environment: config.environment_name.clone(),
    };

    match serde_json::to_string(&public) {
        Ok(body) => raw_json_response(200, body),
        Err(e) => {
            error!(error = %e, "Failed to serialize public config");
            message_response(500, "Failed to serialize config")
        }
    }
}
