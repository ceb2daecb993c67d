use serde::{Deserialize, Serialize};

/// A project in a workspace. `client_name` disambiguates projects that share
/// a name.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub billable: bool,
    #[serde(default)]
    pub archived: bool,
}

/// A client (customer) in a workspace, used to narrow project lookups.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceClient {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub archived: bool,
}
