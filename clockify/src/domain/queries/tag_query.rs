use super::{ClockifyQuery, MAX_PAGE_SIZE};

/// Full tag list for a workspace, bounded by one large page.
#[derive(Default)]
pub struct TagQuery;

impl ClockifyQuery for TagQuery {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![("page-size", MAX_PAGE_SIZE.to_string())]
    }
}
