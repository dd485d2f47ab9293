//! Public types for the push API
use serde::{Deserialize, Serialize};

use crate::notify::PushSubscription;

#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
    pub subscription: Option<PushSubscription>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OkResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub server_subs: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TestPushResponse {
    pub ok: bool,
    pub delivered: usize,
    pub expired: usize,
    pub failed: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct KeyResponse {
    #[serde(rename = "publicKey")]
    pub public_key: Option<String>,
}
