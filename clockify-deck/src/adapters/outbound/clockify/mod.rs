use async_trait::async_trait;

use clockify::{
    ClientQuery, ClockifyClient, ClockifyFetchError, CreateTaskRequest, CreateTimeEntryRequest,
    CurrentUser, Project, ProjectQuery, ProjectTask, Tag, TagQuery, TaskQuery, TimeEntry,
    UpdateTimeEntryRequest, WeeklyReport, WeeklyReportRequest, Workspace, WorkspaceClient,
};

use crate::domain::{
    models::{ClientId, ProjectId, UserId, WorkspaceId},
    ports::outbound::TimeTracking,
    TrackerError,
};

/// Adapter that wraps the Clockify client to implement the TimeTracking port.
pub struct ClockifyApi {
    client: ClockifyClient,
}

impl ClockifyApi {
    /// Create an adapter for the given key and server base URL. The caller
    /// validates both before constructing; nothing is checked here.
    pub fn new(api_key: impl Into<String>, server_url: impl AsRef<str>) -> Self {
        Self {
            client: ClockifyClient::new(api_key, server_url),
        }
    }
}

#[async_trait]
impl TimeTracking for ClockifyApi {
    async fn current_user(&self) -> Result<CurrentUser, TrackerError> {
        self.client
            .fetch_current_user()
            .await
            .map_err(map_fetch_error)
    }

    async fn workspaces(&self) -> Result<Vec<Workspace>, TrackerError> {
        self.client
            .fetch_workspaces()
            .await
            .map_err(map_fetch_error)
    }

    async fn projects_by_name(
        &self,
        workspace: &WorkspaceId,
        name: &str,
        client: Option<&ClientId>,
    ) -> Result<Vec<Project>, TrackerError> {
        let mut query = ProjectQuery::new(name);
        if let Some(client) = client {
            query = query.with_client(client.as_str());
        }
        self.client
            .fetch_projects(workspace.as_str(), &query)
            .await
            .map_err(map_fetch_error)
    }

    async fn clients_by_name(
        &self,
        workspace: &WorkspaceId,
        name: &str,
    ) -> Result<Vec<WorkspaceClient>, TrackerError> {
        self.client
            .fetch_clients(workspace.as_str(), &ClientQuery::new(name))
            .await
            .map_err(map_fetch_error)
    }

    async fn tasks_by_name(
        &self,
        workspace: &WorkspaceId,
        project: &ProjectId,
        name: &str,
    ) -> Result<Vec<ProjectTask>, TrackerError> {
        self.client
            .fetch_tasks(workspace.as_str(), project.as_str(), &TaskQuery::new(name))
            .await
            .map_err(map_fetch_error)
    }

    async fn create_task(
        &self,
        workspace: &WorkspaceId,
        project: &ProjectId,
        name: &str,
    ) -> Result<ProjectTask, TrackerError> {
        self.client
            .create_task(
                workspace.as_str(),
                project.as_str(),
                &CreateTaskRequest::new(name),
            )
            .await
            .map_err(map_fetch_error)
    }

    async fn tags(&self, workspace: &WorkspaceId) -> Result<Vec<Tag>, TrackerError> {
        self.client
            .fetch_tags(workspace.as_str(), &TagQuery)
            .await
            .map_err(map_fetch_error)
    }

    async fn in_progress_entries(
        &self,
        workspace: &WorkspaceId,
        user: &UserId,
    ) -> Result<Vec<TimeEntry>, TrackerError> {
        self.client
            .fetch_in_progress_entries(workspace.as_str(), user.as_str())
            .await
            .map_err(map_fetch_error)
    }

    async fn create_entry(
        &self,
        workspace: &WorkspaceId,
        request: &CreateTimeEntryRequest,
    ) -> Result<TimeEntry, TrackerError> {
        self.client
            .create_time_entry(workspace.as_str(), request)
            .await
            .map_err(map_fetch_error)
    }

    async fn update_entry(
        &self,
        workspace: &WorkspaceId,
        entry_id: &str,
        request: &UpdateTimeEntryRequest,
    ) -> Result<TimeEntry, TrackerError> {
        self.client
            .update_time_entry(workspace.as_str(), entry_id, request)
            .await
            .map_err(map_fetch_error)
    }

    async fn weekly_report(
        &self,
        workspace: &WorkspaceId,
        request: &WeeklyReportRequest,
    ) -> Result<WeeklyReport, TrackerError> {
        self.client
            .fetch_weekly_report(workspace.as_str(), request)
            .await
            .map_err(map_fetch_error)
    }
}

fn map_fetch_error(e: ClockifyFetchError) -> TrackerError {
    match e {
        ClockifyFetchError::Unauthorized => TrackerError::AuthenticationFailed,
        // a 404 on a mutation means the entity vanished remotely, e.g.
        // stopping an entry someone already deleted
        ClockifyFetchError::ResponseError(msg) if msg.starts_with("404") => {
            TrackerError::RemoteInconsistency(msg)
        }
        ClockifyFetchError::ResponseError(msg) => TrackerError::TransportFailure(msg),
        ClockifyFetchError::ParsingError(msg) => TrackerError::TransportFailure(msg),
        ClockifyFetchError::Other(msg) => TrackerError::TransportFailure(msg),
    }
}
