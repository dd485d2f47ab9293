//! Router for the push API

use std::sync::{Arc, RwLock};

use anyhow::anyhow;
use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use http::{HeaderMap, StatusCode, header};

use super::public;
use crate::api::state::AppState;
use crate::notify::{
    Delivery, DeliveryOptions, NotificationAction, PushNotificationPayload, Urgency,
    broadcast_push_notification,
};
use crate::page::get_cookie;

type SharedState = Arc<RwLock<AppState>>;

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

// Double-submit check: the token header must match the token cookie
fn csrf_ok(headers: &HeaderMap, cookie_name: &str, header_name: &str) -> bool {
    let token = header_str(headers, header_name);
    let cookie = get_cookie(header_str(headers, header::COOKIE.as_str()), cookie_name)
        .unwrap_or_default();
    !token.is_empty() && token == cookie
}

// Record a browser's push subscription
async fn push_subscription(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, crate::api::public::ApiError> {
    let (cookie_name, header_name) = {
        let state = state.read().map_err(|e| anyhow!("{}", e))?;
        (
            state.config.csrf_cookie_name.clone(),
            state.config.csrf_header_name.clone(),
        )
    };
    if !csrf_ok(&headers, &cookie_name, &header_name) {
        tracing::warn!("Rejected subscription with a bad CSRF token");
        return Ok((StatusCode::FORBIDDEN, "CSRF verification failed.").into_response());
    }

    let request: public::SubscribeRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(err) => {
            let error = public::OkResponse {
                ok: false,
                error: Some(err.to_string()),
            };
            return Ok((StatusCode::BAD_REQUEST, Json(error)).into_response());
        }
    };

    let Some(keys) = request.subscription.as_ref().and_then(|s| s.keys()) else {
        return Ok((StatusCode::BAD_REQUEST, "Invalid subscription").into_response());
    };

    let user_agent = header_str(&headers, header::USER_AGENT.as_str()).to_string();
    tracing::info!("Recorded push subscription for {}", keys.endpoint);
    state
        .write()
        .map_err(|e| anyhow!("{}", e))?
        .record(keys, &user_agent);

    Ok(Json(public::OkResponse {
        ok: true,
        error: None,
    })
    .into_response())
}

async fn status(
    State(state): State<SharedState>,
) -> Result<Json<public::StatusResponse>, crate::api::public::ApiError> {
    let server_subs = state
        .read()
        .map_err(|e| anyhow!("{}", e))?
        .subscriptions
        .len();
    Ok(Json(public::StatusResponse { server_subs }))
}

// Send a test notification to every recorded subscription
async fn test_push_me(
    State(state): State<SharedState>,
) -> Result<Json<public::TestPushResponse>, crate::api::public::ApiError> {
    let (subscriptions, options) = {
        let state = state.read().map_err(|e| anyhow!("{}", e))?;
        let vapid_private_pem_path = state
            .config
            .vapid_key_path
            .clone()
            .ok_or_else(|| anyhow!("ACARRE_VAPID_KEY_PATH is not configured"))?;
        let options = DeliveryOptions {
            vapid_private_pem_path,
            vapid_subject: state.config.vapid_subject.clone(),
            ttl: state.config.push_ttl,
            urgency: Urgency::High,
        };
        let subscriptions = state
            .subscriptions
            .iter()
            .map(|s| s.keys.clone())
            .collect::<Vec<_>>();
        (subscriptions, options)
    };

    let payload = PushNotificationPayload::with_url("Ping AcarreApp", "Notificación de prueba", "/")
        .require_interaction(true)
        .action(NotificationAction::new("ver", "Ver detalle"))
        // Keeps repeated pings from stacking up
        .tag("acarreapp-event");
    let results = broadcast_push_notification(subscriptions, payload, options).await;

    let mut response = public::TestPushResponse {
        ok: true,
        delivered: 0,
        expired: 0,
        failed: 0,
    };
    let mut state = state.write().map_err(|e| anyhow!("{}", e))?;
    for (endpoint, result) in results {
        match result {
            Ok(Delivery::Delivered) => response.delivered += 1,
            Ok(Delivery::Expired) => {
                state.forget(&endpoint);
                response.expired += 1;
            }
            Err(_) => response.failed += 1,
        }
    }

    Ok(Json(response))
}

async fn delete_subscriptions(
    State(state): State<SharedState>,
) -> Result<Json<public::OkResponse>, crate::api::public::ApiError> {
    state.write().map_err(|e| anyhow!("{}", e))?.clear();
    Ok(Json(public::OkResponse {
        ok: true,
        error: None,
    }))
}

// The page needs the VAPID public key to subscribe
async fn public_key(
    State(state): State<SharedState>,
) -> Result<Json<public::KeyResponse>, crate::api::public::ApiError> {
    let public_key = state
        .read()
        .map_err(|e| anyhow!("{}", e))?
        .config
        .vapid_public_key
        .clone();
    Ok(Json(public::KeyResponse { public_key }))
}

/// Create the push router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/subscribe/", post(push_subscription))
        .route("/status/", get(status))
        .route("/test-me/", get(test_push_me).post(test_push_me))
        .route("/subscriptions/", delete(delete_subscriptions))
        .route("/key/", get(public_key))
}
