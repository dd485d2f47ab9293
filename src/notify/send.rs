use anyhow::{Context, Error, Result, anyhow};
use web_push::{
    ContentEncoding, HyperWebPushClient, SubscriptionInfo, VapidSignatureBuilder, WebPushClient,
    WebPushError, WebPushMessageBuilder,
};

use super::models::{PushNotificationPayload, SubscriptionKeys, Urgency};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    /// The push service no longer knows the endpoint (404/410). The
    /// subscription should be forgotten.
    Expired,
}

#[derive(Debug, Clone)]
pub struct DeliveryOptions {
    pub vapid_private_pem_path: String,
    pub vapid_subject: Option<String>,
    pub ttl: u32,
    pub urgency: Urgency,
}

fn web_push_urgency(urgency: Urgency) -> web_push::Urgency {
    match urgency {
        Urgency::VeryLow => web_push::Urgency::VeryLow,
        Urgency::Low => web_push::Urgency::Low,
        Urgency::Normal => web_push::Urgency::Normal,
        Urgency::High => web_push::Urgency::High,
    }
}

pub async fn send_push_notification(
    subscription: &SubscriptionKeys,
    payload: &PushNotificationPayload,
    options: &DeliveryOptions,
) -> Result<Delivery, Error> {
    let subscription_info = SubscriptionInfo::new(
        &subscription.endpoint,
        &subscription.p256dh,
        &subscription.auth,
    );

    // Read the VAPID signing material from the PEM file
    let file = std::fs::File::open(&options.vapid_private_pem_path).with_context(|| {
        format!(
            "Unable to open VAPID key at {}",
            options.vapid_private_pem_path
        )
    })?;
    let mut sig_builder = VapidSignatureBuilder::from_pem(file, &subscription_info)?;
    if let Some(subject) = &options.vapid_subject {
        sig_builder.add_claim("sub", subject.as_str());
    }
    let signature = sig_builder.build()?;

    let mut builder = WebPushMessageBuilder::new(&subscription_info);
    let content = serde_json::to_string(payload)?;
    builder.set_payload(ContentEncoding::Aes128Gcm, content.as_bytes());
    builder.set_vapid_signature(signature);
    builder.set_ttl(options.ttl);
    builder.set_urgency(web_push_urgency(options.urgency));
    let message = builder.build()?;

    let client = HyperWebPushClient::new();
    match client.send(message).await {
        Ok(()) => {
            tracing::info!("Push sent to {}", short_endpoint(&subscription.endpoint));
            Ok(Delivery::Delivered)
        }
        Err(WebPushError::EndpointNotValid { .. } | WebPushError::EndpointNotFound { .. }) => {
            tracing::warn!(
                "Push endpoint gone, dropping {}",
                short_endpoint(&subscription.endpoint)
            );
            Ok(Delivery::Expired)
        }
        Err(err) => Err(anyhow!(err).context(format!(
            "Push to {} failed",
            short_endpoint(&subscription.endpoint)
        ))),
    }
}

/// Send `payload` to every subscription concurrently. Results come back in
/// completion order, paired with the endpoint they belong to.
pub async fn broadcast_push_notification(
    subscriptions: Vec<SubscriptionKeys>,
    payload: PushNotificationPayload,
    options: DeliveryOptions,
) -> Vec<(String, Result<Delivery, Error>)> {
    let mut tasks = tokio::task::JoinSet::new();
    for sub in subscriptions {
        let payload = payload.clone();
        let options = options.clone();
        tasks.spawn(async move {
            let result = send_push_notification(&sub, &payload, &options).await;
            (sub.endpoint, result)
        });
    }

    let mut results = Vec::new();
    while let Some(res) = tasks.join_next().await {
        match res {
            Ok((endpoint, result)) => {
                if let Err(err) = &result {
                    tracing::error!("{:#}", err);
                }
                results.push((endpoint, result));
            }
            Err(err) => tracing::error!("Push task failed: {}", err),
        }
    }
    results
}

fn short_endpoint(endpoint: &str) -> &str {
    match endpoint.char_indices().nth(60) {
        Some((idx, _)) => &endpoint[..idx],
        None => endpoint,
    }
}
