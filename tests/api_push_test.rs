//! Integration tests for the push API endpoints

mod test_utils;

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
    };
    use std::sync::{Arc, RwLock};

    use acarre_push::api::{AppState, app};
    use acarre_push::core::PushConfig;
    use tower::util::ServiceExt;

    use crate::test_utils::{PUBLIC_KEY, body_to_string, subscription_json, test_app};

    fn subscribe_request(body: String, token: Option<&str>, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .uri("/push/subscribe/")
            .method("POST")
            .header("content-type", "application/json")
            .header("user-agent", "test-agent");
        if let Some(token) = token {
            builder = builder.header("x-csrftoken", token);
        }
        if let Some(cookie) = cookie {
            builder = builder.header("cookie", cookie);
        }
        builder.body(Body::from(body)).unwrap()
    }

    fn valid_body() -> String {
        serde_json::json!({ "subscription": subscription_json() }).to_string()
    }

    async fn server_subs(app: &Router) -> u64 {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/push/status/")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value =
            serde_json::from_str(&body_to_string(response.into_body()).await).unwrap();
        body["server_subs"].as_u64().unwrap()
    }

    /// Tests push subscription with valid request
    #[tokio::test]
    async fn it_subscribes_to_push_notifications() {
        let app = test_app().await;

        let response = app
            .clone()
            .oneshot(subscribe_request(
                valid_body(),
                Some("tok123"),
                Some("sessionid=s1; csrftoken=tok123"),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_to_string(response.into_body()).await;
        assert!(body.contains("\"ok\":true"));
        assert_eq!(server_subs(&app).await, 1);
    }

    /// Tests the same endpoint reported twice is recorded once
    #[tokio::test]
    async fn it_upserts_by_endpoint() {
        let app = test_app().await;

        for _ in 0..2 {
            let response = app
                .clone()
                .oneshot(subscribe_request(
                    valid_body(),
                    Some("tok123"),
                    Some("csrftoken=tok123"),
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        assert_eq!(server_subs(&app).await, 1);
    }

    /// Tests push subscription returns 403 without a CSRF token
    #[tokio::test]
    async fn it_returns_403_without_csrf_token() {
        let app = test_app().await;

        let response = app
            .clone()
            .oneshot(subscribe_request(valid_body(), None, Some("csrftoken=tok123")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(server_subs(&app).await, 0);
    }

    /// Tests push subscription returns 403 when header and cookie differ
    #[tokio::test]
    async fn it_returns_403_for_mismatched_csrf_token() {
        let app = test_app().await;

        let response = app
            .oneshot(subscribe_request(
                valid_body(),
                Some("forged"),
                Some("csrftoken=tok123"),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    /// Tests push subscription returns 400 for missing keys
    #[tokio::test]
    async fn it_returns_400_for_missing_keys() {
        let app = test_app().await;

        let body = serde_json::json!({
            "subscription": { "endpoint": "https://push.example.com/send/abc" }
        })
        .to_string();
        let response = app
            .clone()
            .oneshot(subscribe_request(body, Some("tok123"), Some("csrftoken=tok123")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_to_string(response.into_body()).await,
            "Invalid subscription"
        );
        assert_eq!(server_subs(&app).await, 0);
    }

    /// Tests push subscription returns 400 when the subscription is missing
    #[tokio::test]
    async fn it_returns_400_for_missing_subscription() {
        let app = test_app().await;

        let response = app
            .oneshot(subscribe_request(
                "{}".to_string(),
                Some("tok123"),
                Some("csrftoken=tok123"),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    /// Tests push subscription returns 400 with an error for malformed JSON
    #[tokio::test]
    async fn it_returns_400_for_malformed_json() {
        let app = test_app().await;

        let response = app
            .oneshot(subscribe_request(
                "{not json".to_string(),
                Some("tok123"),
                Some("csrftoken=tok123"),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_to_string(response.into_body()).await;
        assert!(body.contains("\"ok\":false"));
        assert!(body.contains("\"error\""));
    }

    /// Tests push endpoints return 405 for GET requests
    #[tokio::test]
    async fn it_returns_405_for_get_on_subscribe() {
        let app = test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/push/subscribe/")
                    .method("GET")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        // Method not allowed for GET on POST endpoint
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    /// Tests the test push fails when no VAPID key is configured
    #[tokio::test]
    async fn it_returns_500_for_test_push_without_vapid_key() {
        let app = test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/push/test-me/")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_to_string(response.into_body()).await;
        assert!(body.contains("ACARRE_VAPID_KEY_PATH"));
    }

    /// Tests deleting subscriptions empties the list
    #[tokio::test]
    async fn it_deletes_subscriptions() {
        let app = test_app().await;

        app.clone()
            .oneshot(subscribe_request(
                valid_body(),
                Some("tok123"),
                Some("csrftoken=tok123"),
            ))
            .await
            .unwrap();
        assert_eq!(server_subs(&app).await, 1);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/push/subscriptions/")
                    .method("DELETE")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(server_subs(&app).await, 0);
    }

    /// Tests the VAPID public key is handed to the page
    #[tokio::test]
    async fn it_returns_the_public_key() {
        let app = test_app().await;

        let response = app
            .oneshot(Request::builder().uri("/push/key/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_to_string(response.into_body()).await;
        assert!(body.contains(PUBLIC_KEY));
    }

    /// Tests the worker script is allowed to control the whole site
    #[tokio::test]
    async fn it_serves_the_worker_script() {
        let app = test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/static/sw.js")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["service-worker-allowed"], "/");
        assert_eq!(response.headers()["cache-control"], "no-cache");
        assert_eq!(body_to_string(response.into_body()).await, "// worker");
    }

    /// Tests the shipped worker shim forwards both events and retries a
    /// failed module load
    #[tokio::test]
    async fn it_serves_the_shipped_worker_shim() {
        let config = PushConfig {
            static_dir: format!("{}/web/static", env!("CARGO_MANIFEST_DIR")),
            ..PushConfig::default()
        };
        let app = app(Arc::new(RwLock::new(AppState::new(config)))).unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/static/sw.js")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["service-worker-allowed"], "/");
        let body = body_to_string(response.into_body()).await;
        assert!(body.contains("wasm_bindgen.handlePush(event)"));
        assert!(body.contains("wasm_bindgen.handleNotificationClick(event)"));
        assert!(body.contains("ready = null;"));
    }
}
