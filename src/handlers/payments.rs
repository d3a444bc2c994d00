//! Card payment handler. Forwards a tokenized charge to the Square Payments API.

use lambda_http::http::Method;
use lambda_http::tracing::{error, info, warn};
use lambda_http::{Body, Request, Response};
use serde_json::Value;

use crate::config::SquareConfig;
use crate::http::{body_text, generate_short_id, get_value_in_json, message_response, raw_json_response};
use crate::models::{CreatePaymentRequest, Money};
use crate::square::SquareApi;

/// Square accepts idempotency keys up to 45 characters.
const GENERATED_KEY_LEN: usize = 32;

/// Charges the card token in the request body.
///
/// # Responses
/// - `405` for anything but POST, before the body is read.
/// - `400 {error}` for a missing source/amount, or when Square declines
///   (the first error `detail` Square reports, else "Payment Failed").
/// - `500 {error}` when the token is unset, the body isn't JSON, or Square
///   can't be reached.
/// - `200` with Square's payment object, verbatim.
pub async fn handle_create_payment(
    event: &Request,
    config: &SquareConfig,
    square: &dyn SquareApi,
) -> Response<Body> {
    if *event.method() != Method::POST {
        warn!(method = %event.method(), "Payment endpoint called without POST");
        return message_response(405, "Method Not Allowed");
    }

    match create_payment(event.body(), config, square).await {
        Ok(response) | Err(response) => response,
    }
}

async fn create_payment(
    body: &Body,
    config: &SquareConfig,
    square: &dyn SquareApi,
) -> Result<Response<Body>, Response<Body>> {
    if config.access_token.is_none() {
        error!("Missing SQUARE_ACCESS_TOKEN");
        return Err(message_response(500, "Configuration Error"));
    }

    let body_str = body_text(body).map_err(|e| {
        error!(error = %e, "Payment body is not UTF-8");
        message_response(500, &e.to_string())
    })?;
    let body: Value = serde_json::from_str(body_str).map_err(|e| {
        error!(error = %e, "Payment body is not valid JSON");
        message_response(500, &e.to_string())
    })?;

    let payment = build_payment_request(&body, config).map_err(|message| {
        warn!(reason = %message, "Rejected payment request");
        message_response(400, &message)
    })?;

    info!(
        amount = payment.amount_money.amount,
        currency = %payment.amount_money.currency,
        idempotency_key = %payment.idempotency_key,
        "Submitting payment"
    );

    let remote = square.create_payment(&payment).await.map_err(|e| {
        error!(error = ?e, "Payment function error");
        message_response(500, &format!("{:#}", e))
    })?;

    let data: Value = serde_json::from_str(&remote.body).map_err(|e| {
        error!(status = remote.status, error = %e, "Square payment response is not JSON");
        message_response(500, &e.to_string())
    })?;

    if !remote.is_success() {
        error!(status = remote.status, response = %data, "Square payment error");
        let detail = data
            .pointer("/errors/0/detail")
            .and_then(Value::as_str)
            .unwrap_or("Payment Failed");
        return Err(message_response(400, detail));
    }

    let payment_id = data.pointer("/payment/id").and_then(Value::as_str).unwrap_or_default();
    let payment_status = data.pointer("/payment/status").and_then(Value::as_str).unwrap_or_default();
    info!(payment_id, status = payment_status, "Payment completed");
    Ok(raw_json_response(200, remote.body))
}

/// Validate the browser's `{sourceId, amount, idempotencyKey}` body and build
/// the Square request from it. The error is the message shown to the client.
fn build_payment_request(body: &Value, config: &SquareConfig) -> Result<CreatePaymentRequest, String> {
    let source_id = get_value_in_json::<String>(body, "sourceId")?
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| "sourceId is required".to_string())?;

    let amount = get_value_in_json::<i64>(body, "amount")
        .map_err(|_| "amount must be a whole number of the smallest currency unit".to_string())?
        .ok_or_else(|| "amount is required".to_string())?;
    if amount <= 0 {
        return Err("amount must be greater than zero".to_string());
    }

    let idempotency_key = match get_value_in_json::<String>(body, "idempotencyKey")?
        .filter(|k| !k.trim().is_empty())
    {
        Some(key) => key,
        None => {
            let key = generate_short_id(GENERATED_KEY_LEN);
            warn!(idempotency_key = %key, "No idempotencyKey supplied, generated one");
            key
        }
    };

    let currency = get_value_in_json::<String>(body, "currency")?
        .map(|c| c.trim().to_ascii_uppercase())
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| config.currency.clone());

    Ok(CreatePaymentRequest {
        source_id,
        idempotency_key,
        amount_money: Money { amount, currency },
        location_id: config.location_id.clone(),
        note: get_value_in_json(body, "note")?,
        buyer_email_address: get_value_in_json(body, "buyerEmailAddress")?,
    })
}
