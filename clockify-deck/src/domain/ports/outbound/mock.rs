//! Mock time tracking service for testing.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};
use time::macros::datetime;

use clockify::{
    CreateTimeEntryRequest, CurrentUser, Project, ProjectTask, Tag, TimeEntry, TimeInterval,
    UpdateTimeEntryRequest, WeeklyReport, WeeklyReportRequest, Workspace, WorkspaceClient,
};

use crate::domain::{
    models::{ClientId, ProjectId, UserId, WorkspaceId},
    ports::outbound::TimeTracking,
    TrackerError,
};

/// In-memory implementation of the outbound port, with call counters for
/// asserting cache behavior.
///
/// Clones share state, so a test can keep a handle for assertions while the
/// engine owns another.
#[derive(Clone, Default)]
pub struct MockTimeTracking {
    state: Arc<RwLock<MockState>>,
}

#[derive(Default)]
struct MockState {
    user: CurrentUser,
    workspaces: Vec<Workspace>,
    projects: Vec<(String, Project)>,
    clients: Vec<(String, WorkspaceClient)>,
    tasks: Vec<ProjectTask>,
    tags: Vec<(String, Tag)>,
    entries: Vec<TimeEntry>,
    weekly: WeeklyReport,
    fail_transport: bool,
    counters: Counters,
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counters {
    pub user_calls: u32,
    pub workspace_calls: u32,
    pub project_queries: u32,
    pub client_queries: u32,
    pub task_queries: u32,
    pub tasks_created: u32,
    pub tag_queries: u32,
    pub entry_queries: u32,
    pub entries_created: u32,
    pub entries_updated: u32,
}

#[allow(dead_code)]
impl MockTimeTracking {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(self, id: &str, name: &str) -> Self {
        self.set_user(id, name);
        self
    }

    /// Swap the authenticated user mid-test, e.g. to repair a failing
    /// identity check.
    pub fn set_user(&self, id: &str, name: &str) {
        let mut state = self.state.write().unwrap();
        state.user = CurrentUser {
            id: id.to_string(),
            name: name.to_string(),
            ..CurrentUser::default()
        };
    }

    pub fn with_workspace(self, id: &str, name: &str) -> Self {
        {
            let mut state = self.state.write().unwrap();
            state.workspaces.push(Workspace {
                id: id.to_string(),
                name: name.to_string(),
            });
        }
        self
    }

    pub fn with_project(self, workspace: &str, project: Project) -> Self {
        {
            let mut state = self.state.write().unwrap();
            state.projects.push((workspace.to_string(), project));
        }
        self
    }

    pub fn with_client(self, workspace: &str, id: &str, name: &str) -> Self {
        {
            let mut state = self.state.write().unwrap();
            state.clients.push((
                workspace.to_string(),
                WorkspaceClient {
                    id: id.to_string(),
                    name: name.to_string(),
                    archived: false,
                },
            ));
        }
        self
    }

    pub fn with_task(self, task: ProjectTask) -> Self {
        {
            let mut state = self.state.write().unwrap();
            state.tasks.push(task);
        }
        self
    }

    pub fn with_tag(self, workspace: &str, id: &str, name: &str) -> Self {
        {
            let mut state = self.state.write().unwrap();
            state.tags.push((
                workspace.to_string(),
                Tag {
                    id: id.to_string(),
                    name: name.to_string(),
                    archived: false,
                },
            ));
        }
        self
    }

    pub fn with_entry(self, entry: TimeEntry) -> Self {
        {
            let mut state = self.state.write().unwrap();
            state.entries.push(entry);
        }
        self
    }

    pub fn with_weekly_report(self, weekly: WeeklyReport) -> Self {
        {
            let mut state = self.state.write().unwrap();
            state.weekly = weekly;
        }
        self
    }

    /// Make every call fail with a transport error.
    pub fn with_failing_transport(self) -> Self {
        self.set_transport(true);
        self
    }

    /// Flip transport failures on or off mid-test.
    pub fn set_transport(&self, failing: bool) {
        self.state.write().unwrap().fail_transport = failing;
    }

    pub fn counters(&self) -> Counters {
        self.state.read().unwrap().counters
    }

    /// All entries currently running in a workspace (for assertions).
    pub fn running_entries(&self, workspace: &str) -> Vec<TimeEntry> {
        self.state
            .read()
            .unwrap()
            .entries
            .iter()
            .filter(|e| e.workspace_id.as_deref() == Some(workspace) && e.is_running())
            .cloned()
            .collect()
    }

    pub fn all_entries(&self) -> Vec<TimeEntry> {
        self.state.read().unwrap().entries.clone()
    }

    /// Remove an entry, simulating deletion behind the engine's back.
    pub fn drop_entry(&self, entry_id: &str) {
        let mut state = self.state.write().unwrap();
        state.entries.retain(|e| e.id != entry_id);
    }

    fn check_transport(state: &MockState) -> Result<(), TrackerError> {
        if state.fail_transport {
            Err(TrackerError::TransportFailure("mock transport down".into()))
        } else {
            Ok(())
        }
    }
}

/// A running entry for seeding tests. Started at a fixed instant well in the
/// past so elapsed math stays positive.
#[allow(dead_code)]
pub fn running_entry(id: &str, workspace: &str, user: &str) -> TimeEntry {
    TimeEntry {
        id: id.to_string(),
        description: String::new(),
        project_id: None,
        task_id: None,
        tag_ids: None,
        billable: false,
        time_interval: TimeInterval {
            start: datetime!(2024-04-02 08:00 UTC),
            end: None,
        },
        workspace_id: Some(workspace.to_string()),
        user_id: Some(user.to_string()),
    }
}

#[allow(dead_code)]
pub fn project(id: &str, name: &str) -> Project {
    Project {
        id: id.to_string(),
        name: name.to_string(),
        ..Project::default()
    }
}

#[async_trait]
impl TimeTracking for MockTimeTracking {
    async fn current_user(&self) -> Result<CurrentUser, TrackerError> {
        let mut state = self.state.write().unwrap();
        state.counters.user_calls += 1;
        Self::check_transport(&state)?;
        if state.user.id.is_empty() {
            return Err(TrackerError::AuthenticationFailed);
        }
        Ok(state.user.clone())
    }

    async fn workspaces(&self) -> Result<Vec<Workspace>, TrackerError> {
        let mut state = self.state.write().unwrap();
        state.counters.workspace_calls += 1;
        Self::check_transport(&state)?;
        Ok(state.workspaces.clone())
    }

    async fn projects_by_name(
        &self,
        workspace: &WorkspaceId,
        name: &str,
        client: Option<&ClientId>,
    ) -> Result<Vec<Project>, TrackerError> {
        let mut state = self.state.write().unwrap();
        state.counters.project_queries += 1;
        Self::check_transport(&state)?;
        Ok(state
            .projects
            .iter()
            .filter(|(ws, p)| {
                ws == workspace.as_str()
                    && p.name == name
                    && client.is_none_or(|c| p.client_id.as_deref() == Some(c.as_str()))
            })
            .map(|(_, p)| p.clone())
            .collect())
    }

    async fn clients_by_name(
        &self,
        workspace: &WorkspaceId,
        name: &str,
    ) -> Result<Vec<WorkspaceClient>, TrackerError> {
        let mut state = self.state.write().unwrap();
        state.counters.client_queries += 1;
        Self::check_transport(&state)?;
        let needle = name.to_lowercase();
        Ok(state
            .clients
            .iter()
            .filter(|(ws, c)| ws == workspace.as_str() && c.name.to_lowercase().contains(&needle))
            .map(|(_, c)| c.clone())
            .collect())
    }

    async fn tasks_by_name(
        &self,
        _workspace: &WorkspaceId,
        project: &ProjectId,
        name: &str,
    ) -> Result<Vec<ProjectTask>, TrackerError> {
        let mut state = self.state.write().unwrap();
        state.counters.task_queries += 1;
        Self::check_transport(&state)?;
        Ok(state
            .tasks
            .iter()
            .filter(|t| t.project_id == project.as_str() && t.name == name)
            .cloned()
            .collect())
    }

    async fn create_task(
        &self,
        _workspace: &WorkspaceId,
        project: &ProjectId,
        name: &str,
    ) -> Result<ProjectTask, TrackerError> {
        let mut state = self.state.write().unwrap();
        state.counters.tasks_created += 1;
        Self::check_transport(&state)?;
        let task = ProjectTask {
            id: format!("task-{}", state.tasks.len() + 1),
            name: name.to_string(),
            project_id: project.as_str().to_string(),
            status: None,
        };
        state.tasks.push(task.clone());
        Ok(task)
    }

    async fn tags(&self, workspace: &WorkspaceId) -> Result<Vec<Tag>, TrackerError> {
        let mut state = self.state.write().unwrap();
        state.counters.tag_queries += 1;
        Self::check_transport(&state)?;
        Ok(state
            .tags
            .iter()
            .filter(|(ws, _)| ws == workspace.as_str())
            .map(|(_, t)| t.clone())
            .collect())
    }

    async fn in_progress_entries(
        &self,
        workspace: &WorkspaceId,
        user: &UserId,
    ) -> Result<Vec<TimeEntry>, TrackerError> {
        let mut state = self.state.write().unwrap();
        state.counters.entry_queries += 1;
        Self::check_transport(&state)?;
        Ok(state
            .entries
            .iter()
            .filter(|e| {
                e.workspace_id.as_deref() == Some(workspace.as_str())
                    && e.user_id.as_deref() == Some(user.as_str())
                    && e.is_running()
            })
            .cloned()
            .collect())
    }

    async fn create_entry(
        &self,
        workspace: &WorkspaceId,
        request: &CreateTimeEntryRequest,
    ) -> Result<TimeEntry, TrackerError> {
        let mut state = self.state.write().unwrap();
        state.counters.entries_created += 1;
        Self::check_transport(&state)?;
        let entry = TimeEntry {
            id: format!("entry-{}", state.entries.len() + 1),
            description: request.description.clone(),
            project_id: request.project_id.clone(),
            task_id: request.task_id.clone(),
            tag_ids: Some(request.tag_ids.clone()),
            billable: request.billable.unwrap_or(false),
            time_interval: TimeInterval {
                start: request.start,
                end: None,
            },
            workspace_id: Some(workspace.as_str().to_string()),
            user_id: Some(state.user.id.clone()),
        };
        state.entries.push(entry.clone());
        Ok(entry)
    }

    async fn update_entry(
        &self,
        _workspace: &WorkspaceId,
        entry_id: &str,
        request: &UpdateTimeEntryRequest,
    ) -> Result<TimeEntry, TrackerError> {
        let mut state = self.state.write().unwrap();
        state.counters.entries_updated += 1;
        Self::check_transport(&state)?;
        let entry = state
            .entries
            .iter_mut()
            .find(|e| e.id == entry_id)
            .ok_or_else(|| TrackerError::RemoteInconsistency(format!("no entry {}", entry_id)))?;
        entry.description = request.description.clone();
        entry.project_id = request.project_id.clone();
        entry.task_id = request.task_id.clone();
        entry.tag_ids = Some(request.tag_ids.clone());
        entry.billable = request.billable;
        entry.time_interval = TimeInterval {
            start: request.start,
            end: request.end,
        };
        Ok(entry.clone())
    }

    async fn weekly_report(
        &self,
        _workspace: &WorkspaceId,
        _request: &WeeklyReportRequest,
    ) -> Result<WeeklyReport, TrackerError> {
        let state = self.state.read().unwrap();
        Self::check_transport(&state)?;
        Ok(state.weekly.clone())
    }
}
