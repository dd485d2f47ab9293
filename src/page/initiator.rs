use anyhow::Result;

use super::cookie::get_cookie;
use super::key::decode_server_key;
use super::platform::{PagePlatform, SubscribeOptions, SubscriptionReporter};
use crate::core::PushConfig;
use crate::notify::{Permission, PushSubscription, SubscriptionReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    /// The subscription reached the server.
    Reported,
    /// No service worker support, or permission not granted. Nothing was
    /// sent.
    Skipped,
    /// Something went wrong along the way. Already logged.
    Failed,
}

impl InitOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reported => "reported",
            Self::Skipped => "skipped",
            Self::Failed => "failed",
        }
    }
}

/// Runs the page side of push: worker registration, the permission prompt,
/// the push subscription and reporting it to the server.
pub struct SubscriptionInitiator<P, R> {
    platform: P,
    reporter: R,
    config: PushConfig,
}

impl<P: PagePlatform, R: SubscriptionReporter> SubscriptionInitiator<P, R> {
    pub fn new(platform: P, reporter: R, config: PushConfig) -> Self {
        Self {
            platform,
            reporter,
            config,
        }
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    pub async fn register_worker(&self) -> Result<Option<P::Registration>> {
        self.platform
            .register_worker(&self.config.worker_script_path)
            .await
    }

    /// Only prompts when the user hasn't decided yet. A browser without
    /// notifications counts as denied.
    pub async fn request_permission(&self) -> Result<Permission> {
        match self.platform.notification_permission() {
            None => Ok(Permission::Denied),
            Some(Permission::Default) => self.platform.request_permission().await,
            Some(decided) => Ok(decided),
        }
    }

    pub async fn subscribe(&self, server_public_key: &str) -> Result<Option<PushSubscription>> {
        let Some(registration) = self.register_worker().await? else {
            tracing::debug!("Service workers unsupported, not subscribing");
            return Ok(None);
        };

        let permission = self.request_permission().await?;
        if permission != Permission::Granted {
            tracing::debug!("Notification permission is {}", permission.as_str());
            return Ok(None);
        }

        let options = SubscribeOptions {
            user_visible_only: true,
            application_server_key: decode_server_key(server_public_key)?,
        };
        let subscription = self.platform.subscribe(&registration, &options).await?;
        Ok(Some(subscription))
    }

    /// Subscribe and report the subscription. Push is an enhancement, so
    /// this never fails: errors are logged and come back as
    /// `InitOutcome::Failed`.
    pub async fn init_push(&self, server_public_key: &str) -> InitOutcome {
        match self.try_init_push(server_public_key).await {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::warn!("Push init failed: {:#}", err);
                InitOutcome::Failed
            }
        }
    }

    async fn try_init_push(&self, server_public_key: &str) -> Result<InitOutcome> {
        let Some(subscription) = self.subscribe(server_public_key).await? else {
            return Ok(InitOutcome::Skipped);
        };

        let cookies = self.platform.cookies()?;
        let csrf_token = get_cookie(&cookies, &self.config.csrf_cookie_name)?;
        self.reporter
            .report(&SubscriptionReport { subscription }, &csrf_token)
            .await?;
        tracing::info!("Push subscription reported");
        Ok(InitOutcome::Reported)
    }
}
