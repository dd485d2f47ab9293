use anyhow::Result;
use async_trait::async_trait;
use js_sys::{Array, JSON, Promise};
use serde_json::{Value, json};
use wasm_bindgen::{JsCast, JsValue, prelude::wasm_bindgen};
use wasm_bindgen_futures::{JsFuture, future_to_promise};
use web_sys::{
    ClientQueryOptions, Notification, NotificationEvent, NotificationOptions, PushEvent,
    ServiceWorkerGlobalScope,
};

use super::{js_error, to_js};
use crate::core::NotificationDefaults;
use crate::notify::DisplayedNotification;
use crate::worker::{NotificationHandler, ShownNotification, WindowClient, WorkerScope};

pub struct BrowserWorker {
    scope: ServiceWorkerGlobalScope,
}

impl BrowserWorker {
    pub fn current() -> Self {
        Self {
            scope: js_sys::global().unchecked_into(),
        }
    }
}

#[async_trait(?Send)]
impl WorkerScope for BrowserWorker {
    type Client = web_sys::WindowClient;

    async fn show_notification(&self, notification: &DisplayedNotification) -> Result<()> {
        let options = to_js(&notification.options)?;
        let promise = self
            .scope
            .registration()
            .show_notification_with_options(
                &notification.title,
                options.unchecked_ref::<NotificationOptions>(),
            )
            .map_err(js_error)?;
        JsFuture::from(promise).await.map_err(js_error)?;
        Ok(())
    }

    async fn window_clients(&self) -> Result<Vec<web_sys::WindowClient>> {
        let query = to_js(&json!({ "type": "window", "includeUncontrolled": true }))?;
        let promise = self
            .scope
            .clients()
            .match_all_with_options(query.unchecked_ref::<ClientQueryOptions>());
        let clients = JsFuture::from(promise).await.map_err(js_error)?;
        Ok(Array::from(&clients)
            .iter()
            .filter_map(|client| client.dyn_into::<web_sys::WindowClient>().ok())
            .collect())
    }

    async fn open_window(&self, url: &str) -> Result<()> {
        JsFuture::from(self.scope.clients().open_window(url))
            .await
            .map_err(js_error)?;
        Ok(())
    }
}

#[async_trait(?Send)]
impl WindowClient for web_sys::WindowClient {
    async fn focus(&self) -> Result<()> {
        let promise = web_sys::WindowClient::focus(self).map_err(js_error)?;
        JsFuture::from(promise).await.map_err(js_error)?;
        Ok(())
    }

    async fn navigate(&self, url: &str) -> Result<()> {
        let promise = web_sys::WindowClient::navigate(self, url).map_err(js_error)?;
        JsFuture::from(promise).await.map_err(js_error)?;
        Ok(())
    }
}

impl ShownNotification for Notification {
    fn close(&self) {
        Notification::close(self);
    }

    fn data(&self) -> Value {
        JSON::stringify(&Notification::data(self))
            .ok()
            .and_then(|json| json.as_string())
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or(Value::Null)
    }
}

fn handler() -> NotificationHandler<BrowserWorker> {
    NotificationHandler::new(BrowserWorker::current(), NotificationDefaults::default())
}

#[wasm_bindgen(js_name = handlePush)]
pub fn handle_push(event: PushEvent) -> Promise {
    super::setup();
    let text = event.data().map(|data| data.text());
    future_to_promise(async move {
        handler()
            .on_push(text.as_deref())
            .await
            .map_err(|err| JsValue::from_str(&format!("{:#}", err)))?;
        Ok(JsValue::UNDEFINED)
    })
}

#[wasm_bindgen(js_name = handleNotificationClick)]
pub fn handle_notification_click(event: NotificationEvent) -> Promise {
    super::setup();
    let notification = event.notification();
    future_to_promise(async move {
        handler()
            .on_notification_click(&notification)
            .await
            .map_err(|err| JsValue::from_str(&format!("{:#}", err)))?;
        Ok(JsValue::UNDEFINED)
    })
}
