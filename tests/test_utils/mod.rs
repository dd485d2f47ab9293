//! Test utilities for integration tests
#![allow(dead_code)]

use std::cell::RefCell;
use std::env;
use std::fs;
use std::sync::{Arc, RwLock};
use std::time::SystemTime;

use anyhow::Result;
use async_trait::async_trait;
use axum::{Router, body::Body};
use serde_json::json;

use acarre_push::api::{AppState, app};
use acarre_push::core::PushConfig;
use acarre_push::notify::{Permission, PushSubscription};
use acarre_push::page::{PagePlatform, SubscribeOptions};

pub const PUBLIC_KEY: &str =
    "BEl62iUYgUivxIkv69yViEuiBIa-Ib9-SkvMeAtA3LFgDzkrxZJjSgSnfckjBJuBkr3qBUYIHBQFLXYp5Nksh8U";
pub const ENDPOINT: &str = "https://push.example.com/send/abc";

/// Config pointing at a fresh static directory holding a worker script.
pub fn test_config() -> PushConfig {
    // Unique per call so tests running in parallel don't share files
    let ts = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap()
        .as_nanos()
        .to_string();
    let dir = env::temp_dir().join(format!("acarre-push-{}", ts));
    fs::create_dir_all(&dir).expect("Failed to create static directory");
    fs::write(dir.join("sw.js"), "// worker").expect("Failed to write worker script");

    PushConfig {
        static_dir: dir.display().to_string(),
        vapid_public_key: Some(PUBLIC_KEY.to_string()),
        ..PushConfig::default()
    }
}

/// Creates a test application router with an empty subscription list.
pub async fn test_app() -> Router {
    app(Arc::new(RwLock::new(AppState::new(test_config())))).expect("Failed to build app")
}

/// Runs the app on an ephemeral port and returns its base URL.
pub async fn spawn_app() -> String {
    let app = test_app().await;
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

pub async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn subscription_json() -> serde_json::Value {
    json!({
        "endpoint": ENDPOINT,
        "expirationTime": null,
        "keys": {
            "p256dh": "test-p256dh-key",
            "auth": "test-auth-key"
        }
    })
}

/// A browser that supports everything and has already granted permission.
pub struct GrantedPage {
    pub cookies: String,
    pub subscribed_with: RefCell<Option<SubscribeOptions>>,
}

impl GrantedPage {
    pub fn new(csrf_token: &str) -> Self {
        Self {
            cookies: format!("sessionid=s1; csrftoken={}", csrf_token),
            subscribed_with: RefCell::new(None),
        }
    }
}

#[async_trait(?Send)]
impl PagePlatform for GrantedPage {
    type Registration = ();

    async fn register_worker(&self, _script_path: &str) -> Result<Option<()>> {
        Ok(Some(()))
    }

    fn notification_permission(&self) -> Option<Permission> {
        Some(Permission::Granted)
    }

    async fn request_permission(&self) -> Result<Permission> {
        Ok(Permission::Granted)
    }

    async fn subscribe(&self, _: &(), options: &SubscribeOptions) -> Result<PushSubscription> {
        *self.subscribed_with.borrow_mut() = Some(options.clone());
        Ok(PushSubscription(subscription_json()))
    }

    fn cookies(&self) -> Result<String> {
        Ok(self.cookies.clone())
    }
}
