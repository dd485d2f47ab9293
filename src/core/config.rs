use std::env;

pub const DEFAULT_TITLE: &str = "AcarreApp";
pub const DEFAULT_ICON: &str = "/static/icons/pwa-192.png";
pub const DEFAULT_BADGE: &str = "/static/icons/badge.png";
pub const DEFAULT_TAG: &str = "acarreapp";
pub const DEFAULT_VIBRATE: [u32; 3] = [80, 30, 80];

/// Values used by the worker for any field a push payload leaves out.
#[derive(Clone, Debug, PartialEq)]
pub struct NotificationDefaults {
    pub title: String,
    pub icon: String,
    pub badge: String,
    pub tag: String,
    pub vibrate: Vec<u32>,
}

impl Default for NotificationDefaults {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            icon: DEFAULT_ICON.to_string(),
            badge: DEFAULT_BADGE.to_string(),
            tag: DEFAULT_TAG.to_string(),
            vibrate: DEFAULT_VIBRATE.to_vec(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct PushConfig {
    // Path the page registers the service worker script from
    pub worker_script_path: String,
    // Relative endpoint the page reports subscriptions to
    pub subscribe_endpoint: String,
    pub csrf_cookie_name: String,
    pub csrf_header_name: String,
    // Directory served under /static by the dev server
    pub static_dir: String,
    pub vapid_public_key: Option<String>,
    // PEM file with the VAPID private key, only needed to send pushes
    pub vapid_key_path: Option<String>,
    pub vapid_subject: Option<String>,
    pub push_ttl: u32,
    pub notification: NotificationDefaults,
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            worker_script_path: "/static/sw.js".to_string(),
            subscribe_endpoint: "/push/subscribe/".to_string(),
            csrf_cookie_name: "csrftoken".to_string(),
            csrf_header_name: "X-CSRFToken".to_string(),
            static_dir: "./web/static".to_string(),
            vapid_public_key: None,
            vapid_key_path: None,
            vapid_subject: None,
            push_ttl: 60,
            notification: NotificationDefaults::default(),
        }
    }
}

impl PushConfig {
    /// Builds the config from `ACARRE_*` environment variables, falling
    /// back to the compiled defaults for anything unset.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let push_ttl = env::var("ACARRE_PUSH_TTL")
            .ok()
            .and_then(|ttl| ttl.parse().ok())
            .unwrap_or(defaults.push_ttl);

        Self {
            worker_script_path: env::var("ACARRE_WORKER_PATH")
                .unwrap_or(defaults.worker_script_path),
            subscribe_endpoint: env::var("ACARRE_SUBSCRIBE_ENDPOINT")
                .unwrap_or(defaults.subscribe_endpoint),
            csrf_cookie_name: env::var("ACARRE_CSRF_COOKIE").unwrap_or(defaults.csrf_cookie_name),
            csrf_header_name: env::var("ACARRE_CSRF_HEADER").unwrap_or(defaults.csrf_header_name),
            static_dir: env::var("ACARRE_STATIC_DIR").unwrap_or(defaults.static_dir),
            vapid_public_key: env::var("ACARRE_VAPID_PUBLIC_KEY").ok(),
            vapid_key_path: env::var("ACARRE_VAPID_KEY_PATH").ok(),
            vapid_subject: env::var("ACARRE_VAPID_SUBJECT").ok(),
            push_ttl,
            notification: defaults.notification,
        }
    }
}
