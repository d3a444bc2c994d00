mod config;
mod enrich;
mod handlers;
mod http;
mod models;
mod square;

use lambda_http::tracing::info;
use lambda_http::{run, service_fn, Body, Request, Response};

use config::SquareConfig;
use handlers::{handle_create_payment, handle_get_catalog, handle_get_config};
use http::{error_response, handle_options};
use square::{SquareApi, SquareClient};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Config,
    Payments,
    Catalog,
}

/// Match on the last path segment so the handlers answer the same under
/// `/config`, `/api/config` or `/.netlify/functions/get-square-config`.
fn route_for(path: &str) -> Option<Route> {
    let segment = path.trim_end_matches('/').rsplit('/').next().unwrap_or_default();
    match segment {
        "config" | "get-square-config" => Some(Route::Config),
        "payments" | "payment_methods" => Some(Route::Payments),
        "catalog" | "square-inventory" => Some(Route::Catalog),
        _ => None,
    }
}

/// Strip a `/Prod` or `/prod` stage segment. `/Products` is left alone.
fn strip_stage_prefix(path: &str) -> &str {
    for stage in ["/Prod", "/prod"] {
        if let Some(rest) = path.strip_prefix(stage)
            && (rest.is_empty() || rest.starts_with('/'))
        {
            return rest;
        }
    }
    path
}

/// Handle the Lambda event
async fn handle_lambda_event(event: Request, config: &SquareConfig, square: &dyn SquareApi) -> Response<Body> {
    let method = event.method().as_str();
    let path = event.uri().path();

    let path = strip_stage_prefix(path);

    info!(method, path, "Handling request");

    // Handle CORS preflight requests
    if method == "OPTIONS" {
        return handle_options();
    }

    match route_for(path) {
        Some(Route::Config) => handle_get_config(config),
        Some(Route::Payments) => handle_create_payment(&event, config, square).await,
        Some(Route::Catalog) => handle_get_catalog(&event, config, square).await,
        None => error_response(404, "Not found", path),
    }
}

/// Main Lambda handler function
async fn function_handler(
    event: Request,
    config: &SquareConfig,
    square: &dyn SquareApi,
) -> Result<Response<Body>, lambda_http::Error> {
    Ok(handle_lambda_event(event, config, square).await)
}

#[tokio::main]
async fn main() -> Result<(), lambda_http::Error> {
    lambda_http::tracing::init_default_subscriber();

    let config = SquareConfig::from_env();
    let square = SquareClient::new(&config);
    info!(
        environment = ?config.environment,
        catalog_types = %models::CatalogObjectType::join(&config.catalog_types),
        "Square storefront starting"
    );

    run(service_fn(|event| function_handler(event, &config, &square))).await
}
