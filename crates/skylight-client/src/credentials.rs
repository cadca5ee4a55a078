//! Relay credential fetch against the settings boundary.
//!
//! The settings CRUD lives elsewhere; the feed core consumes exactly one
//! field from it - the StreamElements bearer token that authenticates the
//! relay channel. One GET, one envelope decode, one field out.
//!
//! A fetch that resolves after the channel was torn down still returns its
//! value: results are keyed to the request, not to channel state.

use skylight_proto::{ApiEnvelope, StreamElementsSettings};

use crate::error::ClientError;

/// Fetch the relay bearer token from the settings service.
///
/// `settings_url` is the StreamElements settings endpoint (the service's
/// `GET /one` route). Absent or failed settings yield
/// [`ClientError::Credentials`]; the caller decides whether to prompt the
/// user toward the settings page.
pub async fn fetch_relay_token(settings_url: &str) -> Result<String, ClientError> {
    let envelope: ApiEnvelope<StreamElementsSettings> = reqwest::get(settings_url)
        .await
        .map_err(|e| ClientError::Credentials(format!("settings request failed: {e}")))?
        .json()
        .await
        .map_err(|e| ClientError::Credentials(format!("settings response undecodable: {e}")))?;

    let settings = envelope.into_data().map_err(|e| ClientError::Credentials(e.to_string()))?;
    Ok(settings.token)
}
