//! Catalog handler. Lists items, images and modifier lists from Square and
//! returns the items enriched for display.

use lambda_http::tracing::{error, info};
use lambda_http::{Body, Request, RequestExt, Response};
use serde_json::{json, Value};

use crate::config::SquareConfig;
use crate::enrich::enrich_with_counts;
use crate::http::{error_response, json_response};
use crate::models::{CatalogObjectType, ListCatalogResponse};
use crate::square::SquareApi;

/// Fetches one page of the catalog and returns `{objects: [EnrichedItem...]}`.
///
/// # Query Parameters
/// - `types`: comma-separated object types to request, defaulting to the
///   configured set. `ITEM` is always included. Modifier lists are embedded
///   only when `MODIFIER_LIST` is requested.
/// - `cursor`: pagination cursor from a previous response.
///
/// # Responses
/// - `500 {error, message}` when no access token is configured. Square is not called.
/// - Square's own status with `{error, status, details}` when Square rejects the call.
/// - `500 {error, message}` when Square can't be reached or returns garbage.
pub async fn handle_get_catalog(
    event: &Request,
    config: &SquareConfig,
    square: &dyn SquareApi,
) -> Response<Body> {
    info!("Catalog requested");

    if config.access_token.is_none() {
        error!("CRITICAL: Missing SQUARE_ACCESS_TOKEN");
        return json_response(
            500,
            &json!({
                "error": "Configuration Error",
                "message": "SQUARE_ACCESS_TOKEN is not set",
            }),
        );
    }

    let params = event.query_string_parameters_ref();
    let types = match requested_types(params.and_then(|p| p.first("types")), config) {
        Ok(types) => types,
        Err(unknown) => {
            error!(unknown = %unknown, "Unknown catalog object type requested");
            return error_response(
                400,
                "Invalid types",
                &format!("'{}' is not one of ITEM, IMAGE, MODIFIER_LIST", unknown),
            );
        }
    };
    let cursor = params.and_then(|p| p.first("cursor"));

    match fetch_catalog(&types, cursor, square).await {
        Ok(response) | Err(response) => response,
    }
}

/// Resolve the `types` parameter against the configured default. `ITEM` is
/// always requested since enrichment produces nothing without it.
fn requested_types(
    param: Option<&str>,
    config: &SquareConfig,
) -> Result<Vec<CatalogObjectType>, String> {
    let mut types = match param {
        Some(raw) => CatalogObjectType::parse_list(raw)?,
        None => config.catalog_types.clone(),
    };
    if types.is_empty() {
        types = config.catalog_types.clone();
    }
    if !types.contains(&CatalogObjectType::Item) {
        types.insert(0, CatalogObjectType::Item);
    }
    Ok(types)
}

fn crash_response(message: &str) -> Response<Body> {
    json_response(
        500,
        &json!({
            "error": "Function Crashed",
            "message": message,
        }),
    )
}

async fn fetch_catalog(
    types: &[CatalogObjectType],
    cursor: Option<&str>,
    square: &dyn SquareApi,
) -> Result<Response<Body>, Response<Body>> {
    let remote = square.list_catalog(types, cursor).await.map_err(|e| {
        error!(error = ?e, "Function crash while fetching catalog");
        crash_response(&format!("{:#}", e))
    })?;

    if !remote.is_success() {
        error!(status = remote.status, body = %remote.body, "Square API error");
        let details = serde_json::from_str::<Value>(&remote.body).unwrap_or(Value::String(remote.body));
        return Err(json_response(
            remote.status,
            &json!({
                "error": "Square API Failed",
                "status": remote.status,
                "details": details,
            }),
        ));
    }

    let listing: ListCatalogResponse = serde_json::from_str(&remote.body).map_err(|e| {
        error!(error = %e, "Function crash while parsing catalog");
        crash_response(&e.to_string())
    })?;

    let resolve_modifiers = types.contains(&CatalogObjectType::ModifierList);
    let (items, counts) = enrich_with_counts(&listing.objects, resolve_modifiers);
    info!(
        objects = listing.objects.len(),
        items = counts.items,
        images = counts.images,
        modifier_lists = counts.modifier_lists,
        other = counts.other,
        "Fetched catalog objects"
    );

    let mut body = json!({ "objects": items });
    if let Some(cursor) = listing.cursor {
        body["cursor"] = json!(cursor);
    }
    Ok(json_response(200, &body))
}
