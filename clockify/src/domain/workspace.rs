use serde::{Deserialize, Serialize};

/// Top level tenant in the time tracking service. Enumerated once per
/// connection; the user-facing key is the name.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    pub id: String,
    pub name: String,
}
