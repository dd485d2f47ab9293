use anyhow::{Context, Result, bail};

/// Read a cookie out of a `document.cookie` style string. Missing cookies
/// read as an empty string. Only the text up to the next `=` is taken as
/// the value, which is all a CSRF token ever holds. A `%` that does not
/// start a two digit hex escape, or escapes that decode to invalid UTF-8,
/// are errors.
pub fn get_cookie(cookies: &str, name: &str) -> Result<String> {
    let prefix = format!("{}=", name);
    let Some(row) = cookies.split("; ").find(|row| row.starts_with(&prefix)) else {
        return Ok(String::new());
    };

    let raw = row.split('=').nth(1).unwrap_or_default();
    if has_malformed_escape(raw) {
        bail!("Cookie {} has a malformed percent escape", name);
    }
    let value = urlencoding::decode(raw)
        .with_context(|| format!("Cookie {} is not valid percent-encoded UTF-8", name))?;
    Ok(value.into_owned())
}

fn has_malformed_escape(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    bytes.iter().enumerate().any(|(idx, byte)| {
        *byte == b'%'
            && !matches!(
                (bytes.get(idx + 1), bytes.get(idx + 2)),
                (Some(hi), Some(lo)) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit()
            )
    })
}
