use anyhow::{Context, Result};
use base64::Engine as _;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};

/// Length of an uncompressed P-256 public key, the only kind push services
/// accept as an application server key.
pub const UNCOMPRESSED_P256_LEN: usize = 65;

// Browsers' atob() is forgiving about padding and trailing bits, and so is
// this.
const FORGIVING_URL_SAFE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Decode the server's VAPID public key from URL-safe base64. Padding is
/// optional, standard alphabet characters and ASCII whitespace are
/// tolerated.
pub fn decode_server_key(key: &str) -> Result<Vec<u8>> {
    let normalized: String = key
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            c => c,
        })
        .collect();

    FORGIVING_URL_SAFE
        .decode(normalized.trim_end_matches('='))
        .context("Server public key is not valid base64")
}

pub fn is_uncompressed_p256(key: &[u8]) -> bool {
    key.len() == UNCOMPRESSED_P256_LEN && key[0] == 0x04
}
