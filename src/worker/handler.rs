use anyhow::Result;

use super::scope::{ShownNotification, WindowClient, WorkerScope};
use crate::core::NotificationDefaults;
use crate::notify::{DisplayedNotification, NotificationPayload, click_target};

#[derive(Debug, Clone, PartialEq)]
pub enum PushOutcome {
    /// The push carried no data.
    Ignored,
    Displayed(DisplayedNotification),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClickOutcome {
    /// An existing window was focused and sent to `url`. `skipped` counts
    /// the windows that refused before it.
    Focused { url: String, skipped: usize },
    Opened { url: String },
}

/// Handles the `push` and `notificationclick` events of the service worker.
pub struct NotificationHandler<S> {
    scope: S,
    defaults: NotificationDefaults,
}

impl<S: WorkerScope> NotificationHandler<S> {
    pub fn new(scope: S, defaults: NotificationDefaults) -> Self {
        Self { scope, defaults }
    }

    pub fn scope(&self) -> &S {
        &self.scope
    }

    /// `data` is the push message text, `None` when the push had no body.
    pub async fn on_push(&self, data: Option<&str>) -> Result<PushOutcome> {
        let Some(text) = data else {
            tracing::debug!("Push without data, nothing to show");
            return Ok(PushOutcome::Ignored);
        };

        let notification =
            NotificationPayload::parse(text, &self.defaults).into_notification(&self.defaults);
        self.scope.show_notification(&notification).await?;
        Ok(PushOutcome::Displayed(notification))
    }

    /// Close the notification, then send the user to its target: the first
    /// open window that accepts focus and navigation, or a new window when
    /// none does. Exactly one of the two happens per click.
    pub async fn on_notification_click<N>(&self, notification: &N) -> Result<ClickOutcome>
    where
        N: ShownNotification + ?Sized,
    {
        notification.close();
        let url = click_target(&notification.data());

        let clients = self.scope.window_clients().await?;
        for (idx, client) in clients.iter().enumerate() {
            match focus_and_navigate(client, &url).await {
                Ok(()) => return Ok(ClickOutcome::Focused { url, skipped: idx }),
                Err(err) => tracing::debug!("Window client {} refused focus: {:#}", idx, err),
            }
        }

        self.scope.open_window(&url).await?;
        Ok(ClickOutcome::Opened { url })
    }
}

async fn focus_and_navigate<C: WindowClient>(client: &C, url: &str) -> Result<()> {
    client.focus().await?;
    client.navigate(url).await
}
