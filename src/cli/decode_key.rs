use anyhow::Result;

use crate::page::{decode_server_key, is_uncompressed_p256};

pub fn run(key: &str) -> Result<()> {
    let bytes = decode_server_key(key)?;
    println!("{} bytes", bytes.len());
    if !is_uncompressed_p256(&bytes) {
        eprintln!("Warning: not an uncompressed P-256 public key, push services will reject it");
    }
    Ok(())
}
