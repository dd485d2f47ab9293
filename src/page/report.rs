use anyhow::{Error, Result};
use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, COOKIE};

use super::platform::SubscriptionReporter;
use crate::core::PushConfig;
use crate::notify::SubscriptionReport;

/// Posts subscription reports to the application server as JSON.
pub struct HttpReporter {
    client: reqwest::Client,
    url: String,
    csrf_header: String,
    // Only settable outside the browser, which attaches cookies itself
    cookie: Option<String>,
}

impl HttpReporter {
    pub fn new(base_url: &str, config: &PushConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: format!(
                "{}{}",
                base_url.trim_end_matches('/'),
                config.subscribe_endpoint
            ),
            csrf_header: config.csrf_header_name.clone(),
            cookie: None,
        }
    }

    pub fn with_cookie(mut self, cookie: &str) -> Self {
        self.cookie = Some(cookie.to_string());
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait(?Send)]
impl SubscriptionReporter for HttpReporter {
    async fn report(&self, report: &SubscriptionReport, csrf_token: &str) -> Result<(), Error> {
        let mut request = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .header(self.csrf_header.as_str(), csrf_token)
            .json(report);
        if let Some(cookie) = &self.cookie {
            request = request.header(COOKIE, cookie);
        }
        #[cfg(target_arch = "wasm32")]
        {
            request = request.fetch_credentials_include();
        }

        request.send().await?.error_for_status()?;
        Ok(())
    }
}
