use crate::core::PushConfig;
use crate::notify::SubscriptionKeys;

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedSubscription {
    pub keys: SubscriptionKeys,
    pub user_agent: String,
}

pub struct AppState {
    pub config: PushConfig,
    // Reports received since the server started. Not persisted.
    pub subscriptions: Vec<RecordedSubscription>,
}

impl AppState {
    pub fn new(config: PushConfig) -> Self {
        Self {
            config,
            subscriptions: Vec::new(),
        }
    }

    /// Insert or replace the subscription with the same endpoint.
    pub fn record(&mut self, keys: SubscriptionKeys, user_agent: &str) {
        let recorded = RecordedSubscription {
            keys,
            user_agent: user_agent.to_string(),
        };
        match self
            .subscriptions
            .iter_mut()
            .find(|s| s.keys.endpoint == recorded.keys.endpoint)
        {
            Some(existing) => *existing = recorded,
            None => self.subscriptions.push(recorded),
        }
    }

    pub fn forget(&mut self, endpoint: &str) {
        self.subscriptions.retain(|s| s.keys.endpoint != endpoint);
    }

    pub fn clear(&mut self) {
        self.subscriptions.clear();
    }
}
