use std::sync::Arc;

use time::OffsetDateTime;
use tracing::{debug, info, warn};

use clockify::{CreateTimeEntryRequest, TimeEntry, UpdateTimeEntryRequest};

use crate::domain::{
    models::{ActiveFilter, TagId, Toggle, UserId, WorkspaceId},
    ports::outbound::TimeTracking,
};

/// Locates the running timer matching an [`ActiveFilter`] and performs the
/// start/stop transition against the remote store.
///
/// The remote system should hold at most one running entry per user and
/// workspace, but that is not assumed: surplus entries are handled by taking
/// the first match in query order, and the toggle transition stops whatever
/// is running before starting anything new.
pub struct TimerReconciler {
    api: Arc<dyn TimeTracking>,
}

impl TimerReconciler {
    pub fn new(api: Arc<dyn TimeTracking>) -> Self {
        Self { api }
    }

    /// First in-progress entry satisfying the filter, in query order.
    ///
    /// Read-only: never touches resolver caches, never mutates the remote
    /// store. Transport failures surface as `None`.
    pub async fn find_running(&self, user: &UserId, filter: &ActiveFilter) -> Option<TimeEntry> {
        let entries = match self.api.in_progress_entries(&filter.workspace, user).await {
            Ok(entries) => entries,
            Err(e) => {
                debug!("unable to list in-progress entries: {}", e);
                return None;
            }
        };

        entries.into_iter().find(|entry| filter.matches(entry))
    }

    /// One toggle transition: stop the matching entry if one runs, otherwise
    /// stop whatever else runs in the workspace and start a new entry built
    /// from the filter. Never both stops the match and starts in one call.
    pub async fn toggle(&self, user: &UserId, filter: &ActiveFilter) -> Toggle {
        if let Some(matched) = self.find_running(user, filter).await {
            self.stop(&filter.workspace, &matched).await;
            debug!("toggle successful, timer has been stopped");
            return Toggle::Stopped;
        }

        // A non-matching entry may still be running, e.g. after the user
        // changed the configured filter mid-timer. Stop it first so the
        // workspace never accumulates orphaned running entries.
        self.stop_any_running(user, &filter.workspace).await;

        let request = CreateTimeEntryRequest {
            start: OffsetDateTime::now_utc(),
            description: filter.description.clone().unwrap_or_default(),
            project_id: filter.project.as_ref().map(|p| p.as_str().to_string()),
            task_id: filter.task.as_ref().map(|t| t.as_str().to_string()),
            tag_ids: filter
                .tags
                .as_deref()
                .unwrap_or(&[])
                .iter()
                .map(TagId::to_string)
                .collect(),
            billable: filter.billable,
        };

        match self.api.create_entry(&filter.workspace, &request).await {
            Ok(entry) => {
                info!(
                    "toggle timer started entry {} in workspace {}",
                    entry.id, filter.workspace
                );
                Toggle::Started
            }
            Err(e) => {
                warn!("time entry creation failed: {}", e);
                Toggle::Rejected
            }
        }
    }

    /// Stop a specific entry: an update carrying its own fields plus an end
    /// timestamp. An entry that vanished remotely degrades to a logged no-op.
    pub async fn stop(&self, workspace: &WorkspaceId, entry: &TimeEntry) -> bool {
        let update = UpdateTimeEntryRequest::stopping(entry, OffsetDateTime::now_utc());

        match self.api.update_entry(workspace, &entry.id, &update).await {
            Ok(_) => {
                info!(
                    "timer stopped: {} ({:?}, {:?})",
                    entry.id, entry.project_id, entry.description
                );
                true
            }
            Err(e) => {
                warn!("failed to stop running timer {}: {}", entry.id, e);
                false
            }
        }
    }

    async fn stop_any_running(&self, user: &UserId, workspace: &WorkspaceId) {
        let entries = match self.api.in_progress_entries(workspace, user).await {
            Ok(entries) => entries,
            Err(e) => {
                debug!("unable to list in-progress entries: {}", e);
                return;
            }
        };

        if let Some(entry) = entries.first() {
            self.stop(workspace, entry).await;
        }
    }
}
