use anyhow::Result;
use async_trait::async_trait;

use crate::notify::{Permission, PushSubscription, SubscriptionReport};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscribeOptions {
    pub user_visible_only: bool,
    pub application_server_key: Vec<u8>,
}

/// What the page needs from the browser to subscribe to push.
#[async_trait(?Send)]
pub trait PagePlatform {
    type Registration;

    /// `None` when the browser has no service worker support.
    async fn register_worker(&self, script_path: &str) -> Result<Option<Self::Registration>>;

    /// Current permission, `None` when there is no notification API.
    fn notification_permission(&self) -> Option<Permission>;

    /// Prompt the user.
    async fn request_permission(&self) -> Result<Permission>;

    async fn subscribe(
        &self,
        registration: &Self::Registration,
        options: &SubscribeOptions,
    ) -> Result<PushSubscription>;

    /// The page's cookie string, `document.cookie` style.
    fn cookies(&self) -> Result<String>;
}

/// Delivers a new subscription to the application server.
#[async_trait(?Send)]
pub trait SubscriptionReporter {
    async fn report(&self, report: &SubscriptionReport, csrf_token: &str) -> Result<()>;
}
