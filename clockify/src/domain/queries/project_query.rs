use super::{ClockifyQuery, MAX_PAGE_SIZE};

/// Exact-name project lookup, optionally narrowed to a client.
pub struct ProjectQuery {
    name: String,
    client_id: Option<String>,
}

impl ProjectQuery {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            client_id: None,
        }
    }

    pub fn with_client(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }
}

impl ClockifyQuery for ProjectQuery {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("name", self.name.clone()),
            ("strict-name-search", "true".to_string()),
            ("page-size", MAX_PAGE_SIZE.to_string()),
        ];
        if let Some(client_id) = &self.client_id {
            pairs.push(("clients", client_id.clone()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_filter_is_optional() {
        let pairs = ProjectQuery::new("Website").query_pairs();
        assert!(pairs.iter().all(|(k, _)| *k != "clients"));

        let pairs = ProjectQuery::new("Website").with_client("c1").query_pairs();
        assert!(pairs.contains(&("clients", "c1".to_string())));
        assert!(pairs.contains(&("strict-name-search", "true".to_string())));
    }
}
