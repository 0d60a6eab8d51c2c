//! Page URL validation for batch operations.

use url::Url;

use crate::error::{Result, WonderchatError};

const ALLOWED_PREFIXES: [&str; 2] = ["http://", "https://"];

/// Check that `candidate` is an absolute `http`/`https` URL with a host.
///
/// The prefix check is case-sensitive. The authority is read from the raw
/// text, since the WHATWG parse skips extra slashes after the scheme. The
/// returned error carries the operator-facing diagnostic.
pub fn validate_page_url(candidate: &str) -> Result<Url> {
    let Some(rest) = ALLOWED_PREFIXES
        .iter()
        .find_map(|prefix| candidate.strip_prefix(prefix))
    else {
        return Err(rejection(candidate));
    };

    let authority = rest.split(['/', '\\', '?', '#']).next().unwrap_or_default();
    if authority.is_empty() {
        return Err(rejection(candidate));
    }

    let parsed = Url::parse(candidate).map_err(|_| rejection(candidate))?;
    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(parsed),
        _ => Err(rejection(candidate)),
    }
}

fn rejection(candidate: &str) -> WonderchatError {
    tracing::debug!(candidate, "rejected page url");
    WonderchatError::validation(format!(
        "Invalid URL '{candidate}'. Please enter a valid URL that starts with 'http://' or 'https://'."
    ))
}
