use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::TrackerError;

/// Length of a valid API key for the service.
pub const API_KEY_LENGTH: usize = 48;

/// Inbound settings object from the host shell.
///
/// All fields arrive as camelCase JSON. Names are user-facing configuration;
/// the engine resolves them to identifiers on demand. `billable` is optional
/// on the wire: when the host omits it, the billable dimension of the active
/// filter stays a wildcard.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PluginSettings {
    pub api_key: String,
    pub server_url: String,
    pub workspace_name: String,
    pub project_name: String,
    pub task_name: String,
    /// Description of the timer ("timer name" in the configuration UI).
    pub timer_name: String,
    pub client_name: String,
    /// Comma separated tag names; `\,` escapes a literal comma.
    pub tags: String,
    pub billable: Option<bool>,
    /// Title template; see [`crate::display::render_title`].
    pub title_format: String,
    /// Show the week's total tracked time instead of a toggle timer.
    pub show_week_time: bool,
    /// Show today's total tracked time instead of a toggle timer.
    pub show_day_time: bool,
}

impl PluginSettings {
    /// Populate from the host's raw settings payload. Unknown fields are
    /// ignored and missing fields default, so older persisted payloads keep
    /// working.
    pub fn from_payload(payload: serde_json::Value) -> Self {
        serde_json::from_value(payload).unwrap_or_default()
    }

    /// Check that a connection may be established from these settings.
    /// Violations block before any remote call is made.
    pub fn validate_connection(&self) -> Result<(), TrackerError> {
        if Url::parse(&self.server_url).is_err() {
            return Err(TrackerError::ConfigurationInvalid(
                "server URL is invalid".to_string(),
            ));
        }
        if self.api_key.len() != API_KEY_LENGTH {
            return Err(TrackerError::ConfigurationInvalid(
                "invalid API key format".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub fn valid_key() -> String {
        "k".repeat(API_KEY_LENGTH)
    }

    #[test]
    fn deserializes_host_payload() {
        let json = r#"{
            "apiKey": "abc",
            "serverUrl": "https://api.clockify.me/api/v1",
            "workspaceName": "Acme",
            "projectName": "Website",
            "taskName": "Review",
            "timerName": "standup",
            "clientName": "Acme Labs",
            "tags": "urgent\\, important,billing",
            "billable": true,
            "titleFormat": "{projectName} {timer}"
        }"#;

        let settings: PluginSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.workspace_name, "Acme");
        assert_eq!(settings.timer_name, "standup");
        assert_eq!(settings.billable, Some(true));
        assert_eq!(settings.tags, r"urgent\, important,billing");
        assert!(!settings.show_week_time);
    }

    #[test]
    fn payload_with_unknown_fields_still_populates() {
        let settings = PluginSettings::from_payload(serde_json::json!({
            "workspaceName": "Acme",
            "somethingTheHostAdded": 42
        }));
        assert_eq!(settings.workspace_name, "Acme");
        assert_eq!(settings.billable, None);
    }

    #[test]
    fn missing_billable_stays_a_wildcard() {
        let settings: PluginSettings =
            serde_json::from_str(r#"{"workspaceName": "Acme"}"#).unwrap();
        assert_eq!(settings.billable, None);
    }

    #[test]
    fn relative_server_url_is_rejected() {
        let settings = PluginSettings {
            api_key: valid_key(),
            server_url: "clockify.me/api".to_string(),
            ..PluginSettings::default()
        };
        assert!(settings.validate_connection().is_err());
    }

    #[test]
    fn wrong_key_length_is_rejected() {
        let settings = PluginSettings {
            api_key: "too-short".to_string(),
            server_url: "https://api.clockify.me/api/v1".to_string(),
            ..PluginSettings::default()
        };
        assert!(settings.validate_connection().is_err());
    }

    #[test]
    fn well_formed_settings_pass_validation() {
        let settings = PluginSettings {
            api_key: valid_key(),
            server_url: "https://api.clockify.me/api/v1".to_string(),
            ..PluginSettings::default()
        };
        assert!(settings.validate_connection().is_ok());
    }
}
