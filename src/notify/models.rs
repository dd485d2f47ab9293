use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

pub const SERVER_ICON: &str = "/static/icons/android-chrome-192x192.png";
pub const SERVER_BADGE: &str = "/static/icons/favicon-32x32.png";
pub const SERVER_TAG: &str = "acarreapp";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationAction {
    pub action: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl NotificationAction {
    pub fn new(action: &str, title: &str) -> Self {
        Self {
            action: action.to_string(),
            title: title.to_string(),
            icon: None,
        }
    }
}

/// The fields a push message may carry. `None` means the sender left the
/// field out (or sent it with the wrong type) and the worker default
/// applies.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotificationPayload {
    pub title: Option<String>,
    pub body: Option<String>,
    pub data: Option<Value>,
    pub icon: Option<String>,
    pub badge: Option<String>,
    pub tag: Option<String>,
    pub require_interaction: Option<bool>,
    pub actions: Option<Vec<NotificationAction>>,
}

/// Mirrors the browser's `NotificationOptions` dictionary so it can be
/// handed to `showNotification` as is.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationOptions {
    pub body: String,
    pub icon: String,
    pub badge: String,
    pub tag: String,
    pub require_interaction: bool,
    pub data: Value,
    pub actions: Vec<NotificationAction>,
    pub vibrate: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayedNotification {
    pub title: String,
    pub options: NotificationOptions,
}

/// A browser push subscription. The page never looks inside it, it is
/// forwarded to the server exactly as the browser produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PushSubscription(pub Value);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionKeys {
    pub endpoint: String,
    pub p256dh: String,
    pub auth: String,
}

impl PushSubscription {
    /// Pulls out what a push sender needs. `None` when the endpoint or
    /// either key is missing or empty.
    pub fn keys(&self) -> Option<SubscriptionKeys> {
        let non_empty = |value: &Value| {
            value
                .as_str()
                .filter(|s| !s.is_empty())
                .map(|s| s.to_string())
        };
        let keys = self.0.get("keys")?;
        Some(SubscriptionKeys {
            endpoint: non_empty(self.0.get("endpoint")?)?,
            p256dh: non_empty(keys.get("p256dh")?)?,
            auth: non_empty(keys.get("auth")?)?,
        })
    }
}

/// Body of the report the page sends after subscribing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionReport {
    pub subscription: PushSubscription,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    Granted,
    Denied,
    Default,
}

impl Permission {
    pub fn from_state(state: &str) -> Self {
        match state {
            "granted" => Self::Granted,
            "denied" => Self::Denied,
            _ => Self::Default,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Granted => "granted",
            Self::Denied => "denied",
            Self::Default => "default",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Urgency {
    VeryLow,
    Low,
    #[default]
    Normal,
    High,
}

impl Urgency {
    /// Case-insensitive. Anything unrecognized is treated as `normal`.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.to_lowercase()).as_deref() {
            Some("very-low") => Self::VeryLow,
            Some("low") => Self::Low,
            Some("high") => Self::High,
            _ => Self::Normal,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VeryLow => "very-low",
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
        }
    }
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
/// The JSON a server sends in a push message. The worker reads the same
/// field names back out, so application specific values (like the URL to
/// open on click) go in `data`.
pub struct PushNotificationPayload {
    pub title: String,
    pub body: String,
    pub data: Value,
    pub icon: String,
    pub badge: String,
    // When a tag is set, sending new notifications with the same tag
    // will update the user's notification if they have not interacted
    // with it yet.
    pub tag: String,
    pub require_interaction: bool,
    pub actions: Vec<NotificationAction>,
}

impl PushNotificationPayload {
    pub fn new(title: &str, body: &str, data: Option<Value>) -> Self {
        Self {
            title: title.to_string(),
            body: body.to_string(),
            data: data.unwrap_or_else(|| json!({})),
            icon: SERVER_ICON.to_string(),
            badge: SERVER_BADGE.to_string(),
            tag: SERVER_TAG.to_string(),
            require_interaction: false,
            actions: Vec::new(),
        }
    }

    pub fn with_url(title: &str, body: &str, url: &str) -> Self {
        Self::new(title, body, Some(json!({ "url": url })))
    }

    pub fn tag(mut self, tag: &str) -> Self {
        self.tag = tag.to_string();
        self
    }

    pub fn require_interaction(mut self, require: bool) -> Self {
        self.require_interaction = require;
        self
    }

    pub fn action(mut self, action: NotificationAction) -> Self {
        self.actions.push(action);
        self
    }
}
