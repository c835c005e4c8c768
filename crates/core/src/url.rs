//! Download URL selection and normalization.

use percent_encoding::percent_decode_str;

use crate::error::JobError;
use crate::types::FileLocation;

/// Scheme prefixed to URLs the provider returns without one.
pub const DEFAULT_SCHEME: &str = "https";

/// Pick the primary URL, falling back to the backup, and normalize it.
pub fn resolve_download_url(location: &FileLocation) -> Result<String, JobError> {
    let chosen = [&location.primary_url, &location.backup_url]
        .into_iter()
        .flatten()
        .map(|u| u.trim())
        .find(|u| !u.is_empty());

    match chosen {
        Some(url) => Ok(normalize_download_url(url)),
        None => {
            let message = location.status_message.trim();
            Err(JobError::Retrieval(if message.is_empty() {
                "provider returned no download URL".to_string()
            } else {
                format!("provider returned no download URL ({message})")
            }))
        }
    }
}

/// Percent-decode, ensure a scheme, and drop the query string.
pub fn normalize_download_url(raw: &str) -> String {
    let decoded = percent_decode_str(raw.trim()).decode_utf8_lossy();

    let qualified = if has_scheme(&decoded) {
        decoded.into_owned()
    } else {
        format!("{DEFAULT_SCHEME}://{decoded}")
    };

    match qualified.find('?') {
        Some(idx) => qualified[..idx].to_string(),
        None => qualified,
    }
}

/// A scheme is a non-empty run of `[A-Za-z0-9+.-]` directly before `://`.
fn has_scheme(url: &str) -> bool {
    match url.find("://") {
        Some(idx) if idx > 0 => url[..idx]
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')),
        _ => false,
    }
}
