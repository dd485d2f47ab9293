//! Turning the text of a push message into the notification the worker
//! shows.

use serde_json::{Map, Value, json};

use super::models::{
    DisplayedNotification, NotificationAction, NotificationOptions, NotificationPayload,
};
use crate::core::NotificationDefaults;

impl NotificationPayload {
    /// Parse the text of a push message. Text that is not JSON becomes a
    /// notification with the default title and the raw text as its body.
    pub fn parse(text: &str, defaults: &NotificationDefaults) -> Self {
        match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(fields)) => Self::from_fields(&fields),
            // Valid JSON that isn't an object has no fields to read
            Ok(_) => Self::default(),
            Err(err) => {
                tracing::debug!("Push payload is not JSON ({}), showing raw text", err);
                Self {
                    title: Some(defaults.title.clone()),
                    body: Some(text.to_string()),
                    ..Self::default()
                }
            }
        }
    }

    fn from_fields(fields: &Map<String, Value>) -> Self {
        let string = |key: &str| fields.get(key).and_then(Value::as_str).map(String::from);

        Self {
            title: string("title"),
            body: string("body"),
            data: fields.get("data").cloned(),
            icon: string("icon"),
            badge: string("badge"),
            tag: string("tag"),
            require_interaction: fields.get("requireInteraction").and_then(Value::as_bool),
            actions: fields
                .get("actions")
                .and_then(Value::as_array)
                .map(|actions| actions.iter().filter_map(parse_action).collect()),
        }
    }

    /// Fill every missing field from `defaults`.
    pub fn into_notification(self, defaults: &NotificationDefaults) -> DisplayedNotification {
        DisplayedNotification {
            title: self.title.unwrap_or_else(|| defaults.title.clone()),
            options: NotificationOptions {
                body: self.body.unwrap_or_default(),
                icon: self.icon.unwrap_or_else(|| defaults.icon.clone()),
                badge: self.badge.unwrap_or_else(|| defaults.badge.clone()),
                tag: self.tag.unwrap_or_else(|| defaults.tag.clone()),
                require_interaction: self.require_interaction.unwrap_or(false),
                data: self.data.unwrap_or_else(|| json!({})),
                actions: self.actions.unwrap_or_default(),
                vibrate: defaults.vibrate.clone(),
            },
        }
    }
}

// Actions missing a string `action` or `title` are skipped.
fn parse_action(value: &Value) -> Option<NotificationAction> {
    Some(NotificationAction {
        action: value.get("action")?.as_str()?.to_string(),
        title: value.get("title")?.as_str()?.to_string(),
        icon: value.get("icon").and_then(Value::as_str).map(String::from),
    })
}

/// Where a click on a notification should take the user: `data.url` when
/// it is a non-empty string, otherwise the site root.
pub fn click_target(data: &Value) -> String {
    data.get("url")
        .and_then(Value::as_str)
        .filter(|url| !url.is_empty())
        .unwrap_or("/")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(text: &str) -> DisplayedNotification {
        let defaults = NotificationDefaults::default();
        NotificationPayload::parse(text, &defaults).into_notification(&defaults)
    }

    #[test]
    fn it_uses_defaults_for_an_empty_object() {
        let shown = resolve("{}");
        assert_eq!(shown.title, "AcarreApp");
        assert_eq!(shown.options.body, "");
        assert_eq!(shown.options.icon, "/static/icons/pwa-192.png");
        assert_eq!(shown.options.badge, "/static/icons/badge.png");
        assert_eq!(shown.options.tag, "acarreapp");
        assert!(!shown.options.require_interaction);
        assert_eq!(shown.options.data, json!({}));
        assert!(shown.options.actions.is_empty());
        assert_eq!(shown.options.vibrate, vec![80, 30, 80]);
    }

    #[test]
    fn it_keeps_every_field_the_sender_set() {
        let shown = resolve(
            r#"{
                "title": "Ruta lista",
                "body": "Revisa tu ruta",
                "data": {"url": "/rutas/42/", "id": 42},
                "icon": "/i.png",
                "badge": "/b.png",
                "tag": "ruta-42",
                "requireInteraction": true,
                "actions": [{"action": "ver", "title": "Ver detalle"}]
            }"#,
        );
        assert_eq!(shown.title, "Ruta lista");
        assert_eq!(shown.options.body, "Revisa tu ruta");
        assert_eq!(shown.options.data, json!({"url": "/rutas/42/", "id": 42}));
        assert_eq!(shown.options.icon, "/i.png");
        assert_eq!(shown.options.badge, "/b.png");
        assert_eq!(shown.options.tag, "ruta-42");
        assert!(shown.options.require_interaction);
        assert_eq!(
            shown.options.actions,
            vec![NotificationAction::new("ver", "Ver detalle")]
        );
    }

    #[test]
    fn it_fills_only_the_missing_fields() {
        let shown = resolve(r#"{"body": "solo cuerpo"}"#);
        assert_eq!(shown.title, "AcarreApp");
        assert_eq!(shown.options.body, "solo cuerpo");
        assert_eq!(shown.options.tag, "acarreapp");
    }

    #[test]
    fn it_falls_back_to_raw_text_for_malformed_json() {
        let shown = resolve("{not json");
        assert_eq!(shown.title, "AcarreApp");
        assert_eq!(shown.options.body, "{not json");
        assert_eq!(shown.options.tag, "acarreapp");

        let plain = resolve("Tu servicio fue asignado");
        assert_eq!(plain.options.body, "Tu servicio fue asignado");
    }

    #[test]
    fn it_treats_non_object_json_as_empty() {
        for text in ["null", "42", "\"hola\"", "[1, 2]"] {
            let shown = resolve(text);
            assert_eq!(shown.title, "AcarreApp");
            assert_eq!(shown.options.body, "");
        }
    }

    #[test]
    fn it_ignores_fields_with_the_wrong_type() {
        let shown = resolve(r#"{"title": 7, "requireInteraction": "yes", "actions": "ver"}"#);
        assert_eq!(shown.title, "AcarreApp");
        assert!(!shown.options.require_interaction);
        assert!(shown.options.actions.is_empty());
    }

    #[test]
    fn it_skips_malformed_actions() {
        let shown = resolve(
            r#"{"actions": [{"action": "ver"}, {"action": "ok", "title": "OK", "icon": "/ok.png"}]}"#,
        );
        assert_eq!(shown.options.actions.len(), 1);
        assert_eq!(shown.options.actions[0].icon.as_deref(), Some("/ok.png"));
    }

    #[test]
    fn it_preserves_null_data() {
        let shown = resolve(r#"{"data": null}"#);
        assert_eq!(shown.options.data, Value::Null);
    }

    #[test]
    fn it_serializes_options_in_camel_case() {
        let shown = resolve(r#"{"requireInteraction": true}"#);
        let value = serde_json::to_value(&shown.options).unwrap();
        assert_eq!(value["requireInteraction"], true);
        assert_eq!(value["vibrate"], json!([80, 30, 80]));
    }

    #[test]
    fn it_resolves_click_targets() {
        assert_eq!(click_target(&json!({"url": "/rutas/42/"})), "/rutas/42/");
        assert_eq!(click_target(&json!({"url": ""})), "/");
        assert_eq!(click_target(&json!({"url": 42})), "/");
        assert_eq!(click_target(&json!({})), "/");
        assert_eq!(click_target(&Value::Null), "/");
    }
}
