use anyhow::{Context, Result};

use crate::core::PushConfig;
use crate::notify::{PushSubscription, SubscriptionReport};
use crate::page::{HttpReporter, SubscriptionReporter};

pub async fn read_subscription(path: &str) -> Result<PushSubscription> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Unable to read subscription file {}", path))?;
    serde_json::from_str(&contents).with_context(|| format!("{} is not JSON", path))
}

pub async fn run(
    base_url: &str,
    subscription_path: &str,
    csrf_token: &str,
    config: &PushConfig,
) -> Result<()> {
    let subscription = read_subscription(subscription_path).await?;
    // The server compares the header against the cookie
    let cookie = format!("{}={}", config.csrf_cookie_name, csrf_token);
    let reporter = HttpReporter::new(base_url, config).with_cookie(&cookie);
    reporter
        .report(&SubscriptionReport { subscription }, csrf_token)
        .await?;
    println!("Reported subscription to {}", reporter.url());
    Ok(())
}
