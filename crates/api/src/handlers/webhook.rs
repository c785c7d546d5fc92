//! Handler for inbound payment-provider webhooks.
//!
//! Signature verification runs on the exact raw body, before any JSON
//! parsing. Response codes follow the provider's redelivery contract:
//! 401/400 are final, 5xx triggers redelivery (safe, because the grant path
//! is idempotent), and anything this service chooses not to act on is a 200.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::{Deserialize, Serialize};
use syllabee_core::email;
use syllabee_db::repositories::{GrantOutcome, ReconciliationRepo};

use crate::auth::signature::verify_signature;
use crate::state::AppState;

/// Header carrying the hex HMAC-SHA256 of the raw request body.
pub const SIGNATURE_HEADER: &str = "x-signature";

/// The only order status that triggers unlock logic.
const PAID_STATUS: &str = "paid";

// ---------------------------------------------------------------------------
// Payload / response types
// ---------------------------------------------------------------------------

/// Purchase notification payload (only the fields this service consumes).
///
/// Every field is optional at the serde level so that a structurally
/// incomplete payload surfaces as a 400 with a useful message instead of a
/// generic deserialization failure.
#[derive(Debug, Deserialize)]
struct PurchaseNotification {
    #[serde(default)]
    order_status: Option<String>,
    #[serde(default, rename = "Customer")]
    customer: Option<Customer>,
    #[serde(default, rename = "Product")]
    product: Option<Product>,
}

#[derive(Debug, Deserialize)]
struct Customer {
    #[serde(default)]
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Product {
    /// Sent as a string by current provider versions, as a bare number by
    /// older ones.
    #[serde(default)]
    product_id: Option<serde_json::Value>,
}

/// Response body for the webhook endpoint.
#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub success: bool,
    pub message: String,
}

fn ack(status: StatusCode, success: bool, message: &str) -> (StatusCode, Json<WebhookAck>) {
    (
        status,
        Json(WebhookAck {
            success,
            message: message.to_string(),
        }),
    )
}

// ---------------------------------------------------------------------------
// Handler
// ---------------------------------------------------------------------------

/// POST /api/v1/webhooks/payment
///
/// Verifies the `X-Signature` HMAC, then for a `paid` order maps the product
/// id to a module and either unlocks it directly (account exists) or parks it
/// as a pending purchase (account not created yet). Unknown products are
/// acknowledged with a 200 so the provider does not redeliver them.
pub async fn payment_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<WebhookAck>) {
    let Some(signature) = headers.get(SIGNATURE_HEADER).and_then(|v| v.to_str().ok()) else {
        return ack(StatusCode::UNAUTHORIZED, false, "Missing signature header");
    };
    if !verify_signature(&state.config.webhook_secret, &body, signature) {
        tracing::warn!("rejected webhook with invalid signature");
        return ack(StatusCode::UNAUTHORIZED, false, "Invalid signature");
    }

    let payload: PurchaseNotification = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            return ack(
                StatusCode::BAD_REQUEST,
                false,
                &format!("Malformed payload: {e}"),
            );
        }
    };

    if payload.order_status.as_deref() != Some(PAID_STATUS) {
        return ack(StatusCode::OK, true, "Ignored non-paid order status");
    }

    let raw_email = payload
        .customer
        .as_ref()
        .and_then(|c| c.email.as_deref())
        .map(str::trim)
        .filter(|e| !e.is_empty());
    let Some(raw_email) = raw_email else {
        return ack(StatusCode::BAD_REQUEST, false, "Missing customer email");
    };

    let product_id = payload
        .product
        .as_ref()
        .and_then(|p| p.product_id.as_ref())
        .and_then(product_id_string);
    let Some(product_id) = product_id else {
        return ack(StatusCode::BAD_REQUEST, false, "Missing product id");
    };

    let Some(module_id) = state.catalog.module_for_product(&product_id) else {
        tracing::warn!(product_id, "acknowledged purchase of unmapped product");
        return ack(StatusCode::OK, true, "Unknown product; nothing to unlock");
    };

    let canonical = email::normalize(raw_email);
    match ReconciliationRepo::grant_purchase(&state.pool, &state.catalog, &canonical, module_id)
        .await
    {
        Ok(GrantOutcome::Unlocked { user_id }) => {
            tracing::info!(user_id, module_id, "webhook unlocked module");
            ack(StatusCode::OK, true, "Module unlocked")
        }
        Ok(GrantOutcome::Deferred) => {
            ack(StatusCode::OK, true, "Purchase recorded; awaiting account")
        }
        Err(e) => {
            tracing::error!(error = %e, module_id, "webhook unlock failed");
            ack(
                StatusCode::INTERNAL_SERVER_ERROR,
                false,
                "Internal error; retry delivery",
            )
        }
    }
}

/// Coerce the wire `product_id` (string or number) into a lookup key.
fn product_id_string(raw: &serde_json::Value) -> Option<String> {
    match raw {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
