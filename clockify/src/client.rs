use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use crate::{
    domain::{
        ClientQuery, ClockifyQuery, CreateTaskRequest, CreateTimeEntryRequest, CurrentUser,
        Project, ProjectQuery, ProjectTask, Tag, TagQuery, TaskQuery, TimeEntry, TimeEntryQuery,
        UpdateTimeEntryRequest, WeeklyReport, WeeklyReportRequest, Workspace, WorkspaceClient,
    },
    ClockifyUrl,
};

pub struct ClockifyClient {
    http: reqwest::Client,
    base_url: ClockifyUrl,
    api_key: String,
}

impl ClockifyClient {
    /// Creates a client against the given server base URL, e.g.
    /// `https://api.clockify.me/api/v1`. The key is sent as `X-Api-Key` on
    /// every request.
    pub fn new(api_key: impl Into<String>, server_url: impl AsRef<str>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: ClockifyUrl::new(server_url),
            api_key: api_key.into(),
        }
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        url: ClockifyUrl,
        query: &[(&str, String)],
    ) -> Result<T, ClockifyFetchError> {
        let resp = self
            .http
            .get(url.as_ref())
            .query(query)
            .header("X-Api-Key", &self.api_key)
            .send()
            .await
            .map_err(|e| ClockifyFetchError::ResponseError(e.to_string()))?;

        Self::parse(resp).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        url: ClockifyUrl,
        body: &B,
    ) -> Result<T, ClockifyFetchError> {
        let resp = self
            .http
            .post(url.as_ref())
            .header("X-Api-Key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| ClockifyFetchError::ResponseError(e.to_string()))?;

        Self::parse(resp).await
    }

    async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        url: ClockifyUrl,
        body: &B,
    ) -> Result<T, ClockifyFetchError> {
        let resp = self
            .http
            .put(url.as_ref())
            .header("X-Api-Key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| ClockifyFetchError::ResponseError(e.to_string()))?;

        Self::parse(resp).await
    }

    async fn parse<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ClockifyFetchError> {
        let status = resp.status();
        if status == 401 || status == 403 {
            return Err(ClockifyFetchError::Unauthorized);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClockifyFetchError::ResponseError(format!(
                "{}: {}",
                status, body
            )));
        }

        resp.json::<T>().await.map_err(|e| {
            ClockifyFetchError::ParsingError(format!("Failed to parse response as JSON: {}", e))
        })
    }

    /// The "who am I" call. Establishing a connection is not complete until
    /// this succeeds.
    pub async fn fetch_current_user(&self) -> Result<CurrentUser, ClockifyFetchError> {
        let url = self.base_url.append_path("/user");
        self.fetch(url, &[]).await
    }

    pub async fn fetch_workspaces(&self) -> Result<Vec<Workspace>, ClockifyFetchError> {
        let url = self.base_url.append_path("/workspaces");
        self.fetch(url, &[]).await
    }

    pub async fn fetch_projects(
        &self,
        workspace_id: &str,
        query: &ProjectQuery,
    ) -> Result<Vec<Project>, ClockifyFetchError> {
        let url = self
            .base_url
            .append_path(&format!("/workspaces/{}/projects", workspace_id));
        self.fetch(url, &query.query_pairs()).await
    }

    pub async fn fetch_clients(
        &self,
        workspace_id: &str,
        query: &ClientQuery,
    ) -> Result<Vec<WorkspaceClient>, ClockifyFetchError> {
        let url = self
            .base_url
            .append_path(&format!("/workspaces/{}/clients", workspace_id));
        self.fetch(url, &query.query_pairs()).await
    }

    pub async fn fetch_tasks(
        &self,
        workspace_id: &str,
        project_id: &str,
        query: &TaskQuery,
    ) -> Result<Vec<ProjectTask>, ClockifyFetchError> {
        let url = self.base_url.append_path(&format!(
            "/workspaces/{}/projects/{}/tasks",
            workspace_id, project_id
        ));
        self.fetch(url, &query.query_pairs()).await
    }

    pub async fn create_task(
        &self,
        workspace_id: &str,
        project_id: &str,
        request: &CreateTaskRequest,
    ) -> Result<ProjectTask, ClockifyFetchError> {
        let url = self.base_url.append_path(&format!(
            "/workspaces/{}/projects/{}/tasks",
            workspace_id, project_id
        ));
        self.post(url, request).await
    }

    pub async fn fetch_tags(
        &self,
        workspace_id: &str,
        query: &TagQuery,
    ) -> Result<Vec<Tag>, ClockifyFetchError> {
        let url = self
            .base_url
            .append_path(&format!("/workspaces/{}/tags", workspace_id));
        self.fetch(url, &query.query_pairs()).await
    }

    /// In-progress entries for a user, newest first in service order.
    pub async fn fetch_in_progress_entries(
        &self,
        workspace_id: &str,
        user_id: &str,
    ) -> Result<Vec<TimeEntry>, ClockifyFetchError> {
        let url = self.base_url.append_path(&format!(
            "/workspaces/{}/user/{}/time-entries",
            workspace_id, user_id
        ));
        self.fetch(url, &TimeEntryQuery::in_progress().query_pairs())
            .await
    }

    pub async fn create_time_entry(
        &self,
        workspace_id: &str,
        request: &CreateTimeEntryRequest,
    ) -> Result<TimeEntry, ClockifyFetchError> {
        let url = self
            .base_url
            .append_path(&format!("/workspaces/{}/time-entries", workspace_id));
        self.post(url, request).await
    }

    pub async fn update_time_entry(
        &self,
        workspace_id: &str,
        entry_id: &str,
        request: &UpdateTimeEntryRequest,
    ) -> Result<TimeEntry, ClockifyFetchError> {
        let url = self.base_url.append_path(&format!(
            "/workspaces/{}/time-entries/{}",
            workspace_id, entry_id
        ));
        self.put(url, request).await
    }

    pub async fn fetch_weekly_report(
        &self,
        workspace_id: &str,
        request: &WeeklyReportRequest,
    ) -> Result<WeeklyReport, ClockifyFetchError> {
        let url = self
            .base_url
            .append_path(&format!("/workspaces/{}/reports/weekly", workspace_id));
        self.post(url, request).await
    }
}

#[derive(Error, Debug)]
pub enum ClockifyFetchError {
    #[error("Unauthorized")]
    Unauthorized,
    #[error("ResponseError: {0}")]
    ResponseError(String),
    #[error("ParsingError: {0}")]
    ParsingError(String),
    #[error("Other: {0}")]
    Other(String),
}
