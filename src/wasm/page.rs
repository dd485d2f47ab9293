use anyhow::{Result, anyhow};
use async_trait::async_trait;
use js_sys::{JSON, Object, Promise, Reflect, Uint8Array};
use wasm_bindgen::{JsCast, JsValue, prelude::wasm_bindgen};
use wasm_bindgen_futures::{JsFuture, future_to_promise};
use web_sys::{
    HtmlDocument, Notification, NotificationPermission, PushSubscriptionOptionsInit,
    ServiceWorkerRegistration, Window,
};

use super::js_error;
use crate::core::PushConfig;
use crate::notify::{Permission, PushSubscription};
use crate::page::{
    HttpReporter, InitOutcome, PagePlatform, SubscribeOptions, SubscriptionInitiator,
};

fn has_property(target: &JsValue, name: &str) -> bool {
    Reflect::has(target, &JsValue::from_str(name)).unwrap_or(false)
}

pub struct BrowserPage {
    window: Window,
}

impl BrowserPage {
    pub fn new() -> Result<Self> {
        let window = web_sys::window().ok_or_else(|| anyhow!("Not running in a window"))?;
        Ok(Self { window })
    }

    pub fn origin(&self) -> Result<String> {
        self.window.location().origin().map_err(js_error)
    }
}

#[async_trait(?Send)]
impl PagePlatform for BrowserPage {
    type Registration = ServiceWorkerRegistration;

    async fn register_worker(&self, script_path: &str) -> Result<Option<ServiceWorkerRegistration>> {
        let navigator = self.window.navigator();
        if !has_property(&navigator, "serviceWorker") {
            return Ok(None);
        }

        let promise = navigator.service_worker().register(script_path);
        let registration = JsFuture::from(promise).await.map_err(js_error)?;
        Ok(Some(registration.dyn_into().map_err(js_error)?))
    }

    fn notification_permission(&self) -> Option<Permission> {
        if !has_property(&self.window, "Notification") {
            return None;
        }
        Some(match Notification::permission() {
            NotificationPermission::Granted => Permission::Granted,
            NotificationPermission::Denied => Permission::Denied,
            _ => Permission::Default,
        })
    }

    async fn request_permission(&self) -> Result<Permission> {
        let promise = Notification::request_permission().map_err(js_error)?;
        let answer = JsFuture::from(promise).await.map_err(js_error)?;
        Ok(answer
            .as_string()
            .map(|state| Permission::from_state(&state))
            .unwrap_or(Permission::Default))
    }

    async fn subscribe(
        &self,
        registration: &ServiceWorkerRegistration,
        options: &SubscribeOptions,
    ) -> Result<PushSubscription> {
        let init = Object::new();
        Reflect::set(
            &init,
            &JsValue::from_str("userVisibleOnly"),
            &JsValue::from_bool(options.user_visible_only),
        )
        .map_err(js_error)?;
        Reflect::set(
            &init,
            &JsValue::from_str("applicationServerKey"),
            &Uint8Array::from(options.application_server_key.as_slice()),
        )
        .map_err(js_error)?;

        let push_manager = registration.push_manager().map_err(js_error)?;
        let promise = push_manager
            .subscribe_with_options(init.unchecked_ref::<PushSubscriptionOptionsInit>())
            .map_err(js_error)?;
        let subscription = JsFuture::from(promise).await.map_err(js_error)?;

        // JSON.stringify goes through PushSubscription.toJSON()
        let json: String = JSON::stringify(&subscription).map_err(js_error)?.into();
        Ok(serde_json::from_str(&json)?)
    }

    fn cookies(&self) -> Result<String> {
        let document = self
            .window
            .document()
            .ok_or_else(|| anyhow!("Window has no document"))?;
        let document: HtmlDocument = document.dyn_into().map_err(js_error)?;
        document.cookie().map_err(js_error)
    }
}

/// Page entry point. Resolves to `"reported"`, `"skipped"` or `"failed"`
/// and never rejects.
#[wasm_bindgen(js_name = initAcarrePush)]
pub fn init_acarre_push(public_key: String) -> Promise {
    super::setup();
    future_to_promise(async move {
        let outcome = match browser_initiator() {
            Ok(initiator) => initiator.init_push(&public_key).await,
            Err(err) => {
                tracing::warn!("Push init failed: {:#}", err);
                InitOutcome::Failed
            }
        };
        Ok(JsValue::from_str(outcome.as_str()))
    })
}

fn browser_initiator() -> Result<SubscriptionInitiator<BrowserPage, HttpReporter>> {
    let config = PushConfig::default();
    let page = BrowserPage::new()?;
    let reporter = HttpReporter::new(&page.origin()?, &config);
    Ok(SubscriptionInitiator::new(page, reporter, config))
}
