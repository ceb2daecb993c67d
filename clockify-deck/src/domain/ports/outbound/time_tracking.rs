use async_trait::async_trait;

use clockify::{
    CreateTimeEntryRequest, CurrentUser, Project, ProjectTask, Tag, TimeEntry,
    UpdateTimeEntryRequest, WeeklyReport, WeeklyReportRequest, Workspace, WorkspaceClient,
};

use crate::domain::{
    models::{ClientId, ProjectId, UserId, WorkspaceId},
    TrackerError,
};

/// Outbound port for the remote time tracking service.
///
/// The engine never talks HTTP directly; it goes through this capability so
/// tests can substitute an in-memory store. Name lookups are service-side
/// filtered and bounded by one large page, so no method paginates.
#[async_trait]
pub trait TimeTracking: Send + Sync + 'static {
    /// The "who am I" call used to establish the identity that scopes
    /// in-progress queries.
    async fn current_user(&self) -> Result<CurrentUser, TrackerError>;

    /// All workspaces visible to the current user.
    async fn workspaces(&self) -> Result<Vec<Workspace>, TrackerError>;

    /// Projects matching a name exactly, optionally narrowed to a client.
    async fn projects_by_name(
        &self,
        workspace: &WorkspaceId,
        name: &str,
        client: Option<&ClientId>,
    ) -> Result<Vec<Project>, TrackerError>;

    /// Clients matching a name (service-side, loose match).
    async fn clients_by_name(
        &self,
        workspace: &WorkspaceId,
        name: &str,
    ) -> Result<Vec<WorkspaceClient>, TrackerError>;

    /// Tasks in a project matching a name exactly.
    async fn tasks_by_name(
        &self,
        workspace: &WorkspaceId,
        project: &ProjectId,
        name: &str,
    ) -> Result<Vec<ProjectTask>, TrackerError>;

    /// Create a task with the given name in a project.
    async fn create_task(
        &self,
        workspace: &WorkspaceId,
        project: &ProjectId,
        name: &str,
    ) -> Result<ProjectTask, TrackerError>;

    /// The full tag list of a workspace.
    async fn tags(&self, workspace: &WorkspaceId) -> Result<Vec<Tag>, TrackerError>;

    /// In-progress entries of a user, in service order.
    async fn in_progress_entries(
        &self,
        workspace: &WorkspaceId,
        user: &UserId,
    ) -> Result<Vec<TimeEntry>, TrackerError>;

    async fn create_entry(
        &self,
        workspace: &WorkspaceId,
        request: &CreateTimeEntryRequest,
    ) -> Result<TimeEntry, TrackerError>;

    async fn update_entry(
        &self,
        workspace: &WorkspaceId,
        entry_id: &str,
        request: &UpdateTimeEntryRequest,
    ) -> Result<TimeEntry, TrackerError>;

    /// Weekly report totals, used for the week/day total display modes.
    async fn weekly_report(
        &self,
        workspace: &WorkspaceId,
        request: &WeeklyReportRequest,
    ) -> Result<WeeklyReport, TrackerError>;
}
