use itertools::Itertools;

use clockify::TimeEntry;

use super::{ProjectId, TagId, TaskId, WorkspaceId};

/// The resolved tuple that defines what "the" timer means for the current
/// configuration. Every dimension except the workspace may be unset, and an
/// unset dimension is a wildcard, not a requirement for absence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveFilter {
    pub workspace: WorkspaceId,
    pub project: Option<ProjectId>,
    pub task: Option<TaskId>,
    pub description: Option<String>,
    pub tags: Option<Vec<TagId>>,
    pub billable: Option<bool>,
}

impl ActiveFilter {
    pub fn new(workspace: WorkspaceId) -> Self {
        Self {
            workspace,
            project: None,
            task: None,
            description: None,
            tags: None,
            billable: None,
        }
    }

    pub fn with_project(mut self, project: ProjectId) -> Self {
        self.project = Some(project);
        self
    }

    pub fn with_task(mut self, task: TaskId) -> Self {
        self.task = Some(task);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_tags(mut self, tags: Vec<TagId>) -> Self {
        self.tags = Some(tags);
        self
    }

    pub fn with_billable(mut self, billable: bool) -> Self {
        self.billable = Some(billable);
        self
    }

    /// Whether an in-progress entry belongs to this filter.
    ///
    /// Without a project dimension only the description is checked. With one,
    /// every set dimension must hold: project and task by id, description by
    /// equality, tags by order-independent set equality, billable by value.
    pub fn matches(&self, entry: &TimeEntry) -> bool {
        let Some(project) = &self.project else {
            return self.description_matches(entry);
        };

        if entry.project_id.as_deref() != Some(project.as_str()) {
            return false;
        }
        if !self.description_matches(entry) {
            return false;
        }
        if let Some(task) = &self.task {
            if entry.task_id.as_deref() != Some(task.as_str()) {
                return false;
            }
        }
        if let Some(tags) = &self.tags {
            let entry_tags = entry.tags().iter().map(String::as_str).sorted();
            let filter_tags = tags.iter().map(TagId::as_str).sorted();
            if !entry_tags.eq(filter_tags) {
                return false;
            }
        }
        if let Some(billable) = self.billable {
            if entry.billable != billable {
                return false;
            }
        }

        true
    }

    fn description_matches(&self, entry: &TimeEntry) -> bool {
        match &self.description {
            Some(description) => entry.description == *description,
            None => true,
        }
    }
}
