use anyhow::Result;
use serde_json::{Value, json};

use crate::core::PushConfig;
use crate::worker::{
    ClickOutcome, NotificationHandler, PushOutcome, SimulatedNotification, SimulatedScope,
};

/// Push `payload` through the notification handler (and click the result
/// when asked) against a scope holding the given windows. Returns a JSON
/// summary of everything the worker did.
pub async fn simulate(
    payload: Option<&str>,
    click: bool,
    clients: &[String],
    closed_clients: &[String],
    config: &PushConfig,
) -> Result<Value> {
    let mut scope = SimulatedScope::default();
    for url in clients {
        scope = scope.with_client(url, true);
    }
    for url in closed_clients {
        scope = scope.with_client(url, false);
    }
    let handler = NotificationHandler::new(scope, config.notification.clone());

    let shown = match handler.on_push(payload).await? {
        PushOutcome::Ignored => return Ok(json!({ "notification": null })),
        PushOutcome::Displayed(shown) => shown,
    };
    if !click {
        return Ok(json!({ "notification": shown }));
    }

    let notification = SimulatedNotification::new(shown.options.data.clone());
    let click = match handler.on_notification_click(&notification).await? {
        ClickOutcome::Focused { url, skipped } => {
            json!({ "focused": url, "skipped": skipped })
        }
        ClickOutcome::Opened { url } => json!({ "opened": url }),
    };
    let windows = handler
        .scope()
        .clients()
        .iter()
        .map(|c| c.url())
        .collect::<Vec<_>>();

    Ok(json!({
        "notification": shown,
        "click": click,
        "windows": windows,
    }))
}

pub async fn run(
    payload: Option<String>,
    click: bool,
    clients: Vec<String>,
    closed_clients: Vec<String>,
    config: &PushConfig,
) -> Result<()> {
    let summary = simulate(payload.as_deref(), click, &clients, &closed_clients, config).await?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
