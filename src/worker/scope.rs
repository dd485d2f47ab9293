use std::rc::Rc;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use crate::notify::DisplayedNotification;

/// The parts of a service worker's global scope the notification handler
/// talks to.
#[async_trait(?Send)]
pub trait WorkerScope {
    type Client: WindowClient;

    async fn show_notification(&self, notification: &DisplayedNotification) -> Result<()>;

    /// Every open window of the application, including windows not
    /// controlled by this worker version.
    async fn window_clients(&self) -> Result<Vec<Self::Client>>;

    async fn open_window(&self, url: &str) -> Result<()>;
}

#[async_trait(?Send)]
pub trait WindowClient {
    async fn focus(&self) -> Result<()>;
    async fn navigate(&self, url: &str) -> Result<()>;
}

#[async_trait(?Send)]
impl<C: WindowClient + ?Sized> WindowClient for Rc<C> {
    async fn focus(&self) -> Result<()> {
        (**self).focus().await
    }

    async fn navigate(&self, url: &str) -> Result<()> {
        (**self).navigate(url).await
    }
}

/// A notification the user clicked.
pub trait ShownNotification {
    fn close(&self);
    fn data(&self) -> Value;
}
