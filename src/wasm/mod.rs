//! Browser bindings. The page calls `initAcarrePush`; the worker script
//! registers its `push` and `notificationclick` listeners synchronously and
//! hands `handlePush` / `handleNotificationClick` promises to
//! `event.waitUntil`.

pub mod console;
pub mod page;
pub mod worker;

use std::sync::Once;

use anyhow::anyhow;
use wasm_bindgen::JsValue;

pub use page::{BrowserPage, init_acarre_push};
pub use worker::{BrowserWorker, handle_notification_click, handle_push};

pub(crate) fn js_error(value: JsValue) -> anyhow::Error {
    match value.as_string() {
        Some(message) => anyhow!(message),
        None => anyhow!("{:?}", value),
    }
}

pub(crate) fn to_js<T: serde::Serialize>(value: &T) -> anyhow::Result<JsValue> {
    let json = serde_json::to_string(value)?;
    js_sys::JSON::parse(&json).map_err(js_error)
}

static TRACING: Once = Once::new();

fn setup() {
    console_error_panic_hook::set_once();
    TRACING.call_once(crate::core::init_tracing);
}
