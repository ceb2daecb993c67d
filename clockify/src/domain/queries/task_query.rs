use super::{ClockifyQuery, MAX_PAGE_SIZE};

/// Exact-name task lookup within a project.
pub struct TaskQuery {
    name: String,
}

impl TaskQuery {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl ClockifyQuery for TaskQuery {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("name", self.name.clone()),
            ("strict-name-search", "true".to_string()),
            ("page-size", MAX_PAGE_SIZE.to_string()),
        ]
    }
}
