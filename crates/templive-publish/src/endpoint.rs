//! Endpoint URL handling

use crate::error::PublishError;
use url::Url;

/// Parse a configured endpoint
pub fn parse_endpoint(endpoint: &str) -> Result<Url, PublishError> {
    let url = Url::parse(endpoint.trim()).map_err(|e| PublishError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(PublishError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason: "URL cannot be a base".to_string(),
        });
    }
    Ok(url)
}

/// Append path segments to the endpoint, keeping any path it already has
///
/// `https://host/api/` and `https://host/api` both become
/// `https://host/api/publish`.
pub fn join_segments(base: &Url, segments: &[&str]) -> Result<Url, PublishError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| PublishError::InvalidEndpoint {
            endpoint: base.to_string(),
            reason: "URL cannot be a base".to_string(),
        })?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Full URL of the publish route
pub fn publish_url(base: &Url) -> Result<Url, PublishError> {
    join_segments(base, &["publish"])
}
