use serde::{Deserialize, Serialize};

/// The authenticated user, as returned by the "who am I" endpoint.
///
/// The id scopes all in-progress time entry queries.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub active_workspace: Option<String>,
    #[serde(default)]
    pub default_workspace: Option<String>,
}
