use anyhow::Result;

use crate::api;
use crate::core::PushConfig;

pub async fn run(host: String, port: String, config: PushConfig) -> Result<()> {
    api::serve(host, port, config).await
}
