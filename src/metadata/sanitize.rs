use url::Url;

use crate::metadata::challenge::is_challenge;
use crate::metadata::types::Metadata;

pub const MAX_DESCRIPTION_CHARS: usize = 2000;

/// Absolute `http`/`https` with a host. Anything else is dropped, never repaired.
fn is_valid_image_url(image: &str) -> bool {
    match Url::parse(image) {
        Ok(url) => {
            matches!(url.scheme(), "http" | "https")
                && url.host_str().is_some_and(|host| !host.is_empty())
        }
        Err(_) => false,
    }
}

/// Hard cut to `max` characters, word boundaries ignored.
fn truncate_chars(value: &mut String, max: usize) {
    if let Some((idx, _)) = value.char_indices().nth(max) {
        value.truncate(idx);
    }
}

/// Final cleanup before a record leaves the engine. Returns the blocked flag
/// and also stores it on `m`.
///
/// `had_challenge` says an interstitial was seen upstream; a record that is
/// already blocked counts as such, so running this twice changes nothing.
/// The one exception is a description whose cut lands on whitespace: the
/// next pass trims it.
pub fn sanitize(m: &mut Metadata, had_challenge: bool) -> bool {
    let mut had_challenge = had_challenge || m.blocked;
    let mut blocked = false;

    if is_challenge(&m.title) {
        m.title.clear();
        m.description.clear();
        blocked = true;
        had_challenge = true;
    }

    m.title = m.title.trim().to_string();
    m.description = m.description.trim().to_string();
    m.image = m.image.trim().to_string();

    truncate_chars(&mut m.description, MAX_DESCRIPTION_CHARS);

    if !m.image.is_empty() && !is_valid_image_url(&m.image) {
        log::debug!("dropping image {:?}: not an absolute http(s) url", m.image);
        m.image.clear();
    }

    if !blocked && had_challenge && m.title.is_empty() && m.description.is_empty() {
        blocked = true;
    }

    m.blocked = blocked;
    blocked
}
