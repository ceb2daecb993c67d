mod client_query;
mod project_query;
mod tag_query;
mod task_query;
mod time_entry_query;

pub use client_query::ClientQuery;
pub use project_query::ProjectQuery;
pub use tag_query::TagQuery;
pub use task_query::TaskQuery;
pub use time_entry_query::TimeEntryQuery;

/// Results of name lookups are bounded by a single large page so callers
/// never need a pagination loop.
pub const MAX_PAGE_SIZE: u32 = 5000;

pub trait ClockifyQuery {
    fn query_pairs(&self) -> Vec<(&'static str, String)>;
}
