use super::{ClockifyQuery, MAX_PAGE_SIZE};

/// Client lookup by name. The service matches loosely; callers take the
/// first hit.
pub struct ClientQuery {
    name: String,
}

impl ClientQuery {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl ClockifyQuery for ClientQuery {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("name", self.name.clone()),
            ("page-size", MAX_PAGE_SIZE.to_string()),
        ]
    }
}
