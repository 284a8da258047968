use reqwest::header::HeaderMap;

use crate::metadata::types::FetchError;

/// 2 MiB
pub const MAX_BODY_BYTES: usize = 2 << 20;

#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub status: u16,
    /// At most `max_body_bytes` of the response body
    pub body: Vec<u8>,
}

impl FetchedPage {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }
}

/// Single bounded GET. Non-2xx statuses are returned, not raised.
///
/// The body is read chunk by chunk; once `max_body_bytes` is reached the rest
/// of the stream is dropped unread. Timeouts come from the client.
pub async fn fetch(
    client: &reqwest::Client,
    url: &str,
    headers: HeaderMap,
    max_body_bytes: usize,
) -> Result<FetchedPage, FetchError> {
    let parsed = reqwest::Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{url}: {e}")))?;
    let iden = format!("{}{}", parsed.host_str().unwrap_or_default(), parsed.path());

    log::debug!("{iden}: requesting");

    let mut resp = client.get(parsed).headers(headers).send().await?;
    let status = resp.status();

    if !status.is_success() {
        log::debug!("{iden}: {status}");
    }

    let mut body = Vec::new();
    while let Some(chunk) = resp.chunk().await? {
        let room = max_body_bytes - body.len();
        if chunk.len() >= room {
            body.extend_from_slice(&chunk[..room]);
            log::debug!("{iden}: body capped at {max_body_bytes} bytes");
            break;
        }
        body.extend_from_slice(&chunk);
    }

    Ok(FetchedPage {
        status: status.as_u16(),
        body,
    })
}
