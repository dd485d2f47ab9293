use anyhow::{Context, Result, anyhow};

use super::report::read_subscription;
use crate::core::PushConfig;
use crate::notify::{
    Delivery, DeliveryOptions, PushNotificationPayload, Urgency, send_push_notification,
};

pub struct Message {
    pub title: String,
    pub body: String,
    pub url: Option<String>,
    pub urgency: Option<String>,
    pub tag: Option<String>,
}

impl Message {
    pub fn payload(&self) -> PushNotificationPayload {
        let payload = match &self.url {
            Some(url) => PushNotificationPayload::with_url(&self.title, &self.body, url),
            None => PushNotificationPayload::new(&self.title, &self.body, None),
        };
        match &self.tag {
            Some(tag) => payload.tag(tag),
            None => payload,
        }
    }
}

pub async fn run(
    subscription_path: &str,
    message: Message,
    dry_run: bool,
    config: &PushConfig,
) -> Result<()> {
    let payload = message.payload();
    let urgency = Urgency::parse(message.urgency.as_deref());

    if dry_run {
        println!("Urgency: {}", urgency.as_str());
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    let subscription = read_subscription(subscription_path).await?;
    let keys = subscription
        .keys()
        .context("Subscription is missing its endpoint or keys")?;
    let vapid_private_pem_path = config
        .vapid_key_path
        .clone()
        .ok_or_else(|| anyhow!("ACARRE_VAPID_KEY_PATH is not configured"))?;
    let options = DeliveryOptions {
        vapid_private_pem_path,
        vapid_subject: config.vapid_subject.clone(),
        ttl: config.push_ttl,
        urgency,
    };

    match send_push_notification(&keys, &payload, &options).await? {
        Delivery::Delivered => println!("Delivered"),
        Delivery::Expired => println!("Subscription expired, the browser must subscribe again"),
    }
    Ok(())
}
