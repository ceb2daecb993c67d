use super::ClockifyQuery;

/// Time entry listing for a user. Only the in-progress view is needed here;
/// its result set is small enough to skip pagination.
pub struct TimeEntryQuery {
    in_progress: bool,
}

impl TimeEntryQuery {
    pub fn in_progress() -> Self {
        Self { in_progress: true }
    }
}

impl ClockifyQuery for TimeEntryQuery {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![("in-progress", self.in_progress.to_string())]
    }
}
