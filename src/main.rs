#[cfg(not(target_arch = "wasm32"))]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    acarre_push::cli::run().await
}

// The browser build only ships the library; see `acarre_push::wasm`.
#[cfg(target_arch = "wasm32")]
fn main() {}
