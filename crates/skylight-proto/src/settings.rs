//! Settings boundary contract.
//!
//! The settings services (Twitch, Twitter, StreamElements) are external
//! collaborators; the feed core only ever reads one field from one of them:
//! the StreamElements bearer token used to authenticate the relay channel.
//! Their request/response envelope is modeled here so the client crate can
//! extract that credential with typed failures.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ProtocolError;

/// Response envelope shared by every settings service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    /// Whether the request succeeded.
    pub success: bool,

    /// Payload, present on success.
    #[serde(default)]
    pub data: Option<T>,

    /// Error detail, present on some failures.
    #[serde(default)]
    pub error: Option<Value>,

    /// Human-readable message, present on some failures.
    #[serde(default)]
    pub msg: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// Unwrap the payload, converting failure envelopes into a typed error.
    pub fn into_data(self) -> Result<T, ProtocolError> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            (_, _) => Err(ProtocolError::SettingsUnavailable {
                reason: self.msg.unwrap_or_else(|| "no settings returned".to_owned()),
            }),
        }
    }
}

/// StreamElements integration settings, as returned by the settings service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamElementsSettings {
    /// Bearer credential for the relay channel.
    #[serde(rename = "streamElementsToken")]
    pub token: String,

    /// StreamElements channel the credential is scoped to.
    #[serde(rename = "streamElementsChannelID")]
    pub channel_id: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{ApiEnvelope, StreamElementsSettings};
    use crate::error::ProtocolError;

    #[test]
    fn success_envelope_yields_settings() {
        let envelope: ApiEnvelope<StreamElementsSettings> = serde_json::from_value(json!({
            "success": true,
            "data": {
                "streamElementsToken": "jwt-abc",
                "streamElementsChannelID": "chan-1"
            },
            "error": null,
            "msg": null
        }))
        .unwrap();

        let settings = envelope.into_data().unwrap();
        assert_eq!(settings.token, "jwt-abc");
        assert_eq!(settings.channel_id, "chan-1");
    }

    #[test]
    fn failure_envelope_yields_typed_error() {
        let envelope: ApiEnvelope<StreamElementsSettings> = serde_json::from_value(json!({
            "success": false,
            "data": null,
            "error": null,
            "msg": "Error Updating StreamElements Settings"
        }))
        .unwrap();

        let err = envelope.into_data().unwrap_err();
        assert_eq!(
            err,
            ProtocolError::SettingsUnavailable {
                reason: "Error Updating StreamElements Settings".into()
            }
        );
    }

    #[test]
    fn success_without_data_is_still_unavailable() {
        let envelope: ApiEnvelope<StreamElementsSettings> =
            serde_json::from_value(json!({ "success": true })).unwrap();
        assert!(envelope.into_data().is_err());
    }
}
