use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use clockify::{Tag, Workspace};

use crate::domain::{
    models::{ClientId, ProjectId, Resolution, TagId, TaskId, WorkspaceId},
    ports::outbound::TimeTracking,
};
use crate::tags;

/// Name-to-identifier resolution with a per-connection cache.
///
/// The cache is an explicit keyed store: the workspace list, fetched once per
/// connection, plus one scope per workspace name holding definitive lookup
/// outcomes. Entries never expire; they leave only through [`invalidate`]
/// (connection change) or [`reload_workspaces`] (workspace renamed in the
/// settings). Transport failures are reported as unresolved and are never
/// cached, since a cached miss would stick for the connection's lifetime.
///
/// [`invalidate`]: ConfigResolver::invalidate
/// [`reload_workspaces`]: ConfigResolver::reload_workspaces
pub struct ConfigResolver {
    api: Arc<dyn TimeTracking>,
    cache: ResolverCache,
}

#[derive(Default)]
struct ResolverCache {
    workspaces: Option<Vec<Workspace>>,
    scopes: HashMap<String, WorkspaceScope>,
}

#[derive(Default)]
struct WorkspaceScope {
    projects: HashMap<ProjectKey, Resolution<ProjectId>>,
    clients: HashMap<String, Option<ClientId>>,
    tasks: HashMap<(ProjectId, String), TaskId>,
    tags: Option<Vec<Tag>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ProjectKey {
    name: String,
    client: Option<String>,
}

impl ConfigResolver {
    pub fn new(api: Arc<dyn TimeTracking>) -> Self {
        Self {
            api,
            cache: ResolverCache::default(),
        }
    }

    /// Drop the whole store. The next lookup starts from scratch.
    pub fn invalidate(&mut self) {
        self.cache = ResolverCache::default();
    }

    /// Refetch the workspace list and drop every per-workspace scope.
    pub async fn reload_workspaces(&mut self) {
        self.cache.scopes.clear();
        match self.api.workspaces().await {
            Ok(workspaces) => self.cache.workspaces = Some(workspaces),
            Err(e) => {
                warn!("unable to retrieve available workspaces: {}", e);
                self.cache.workspaces = None;
            }
        }
    }

    pub fn has_workspaces(&self) -> bool {
        self.cache.workspaces.is_some()
    }

    /// Workspace id for a configured name, from the cached list.
    pub async fn resolve_workspace(&mut self, name: &str) -> Option<WorkspaceId> {
        if name.trim().is_empty() {
            warn!("workspace name is blank");
            return None;
        }
        if self.cache.workspaces.is_none() {
            self.reload_workspaces().await;
        }

        let found = self
            .cache
            .workspaces
            .as_ref()?
            .iter()
            .find(|w| w.name == name)
            .map(|w| WorkspaceId::new(&w.id));
        if found.is_none() {
            warn!("workspace {} not found", name);
        }
        found
    }

    /// Exact-name project lookup, optionally narrowed by a client name.
    ///
    /// Zero matches and several matches both block the caller; the first of
    /// several is never picked silently.
    pub async fn resolve_project(
        &mut self,
        workspace: &WorkspaceId,
        name: &str,
        client_name: Option<&str>,
    ) -> Resolution<ProjectId> {
        let scope_key = self.scope_key(workspace);
        let key = ProjectKey {
            name: name.to_string(),
            client: client_name.map(str::to_string),
        };
        if let Some(resolution) = self
            .cache
            .scopes
            .get(&scope_key)
            .and_then(|scope| scope.projects.get(&key))
        {
            return resolution.clone();
        }

        let client = match client_name {
            Some(client_name) => self.resolve_client(workspace, client_name).await,
            None => None,
        };

        let projects = match self
            .api
            .projects_by_name(workspace, name, client.as_ref())
            .await
        {
            Ok(projects) => projects,
            Err(e) => {
                warn!("unable to retrieve project {}: {}", name, e);
                return Resolution::NotFound;
            }
        };

        let resolution = match projects.len() {
            0 => {
                warn!(
                    "unable to find project {} on workspace {} for client {}",
                    name,
                    scope_key,
                    client_name.unwrap_or_default()
                );
                Resolution::NotFound
            }
            1 => Resolution::Found(ProjectId::new(&projects[0].id)),
            _ => {
                warn!(
                    "multiple projects with the name {} on workspace {}, consider setting a client name",
                    name, scope_key
                );
                Resolution::Ambiguous
            }
        };
        self.scope_mut(&scope_key)
            .projects
            .insert(key, resolution.clone());
        resolution
    }

    /// First client whose name matches, service-side filtered.
    pub async fn resolve_client(
        &mut self,
        workspace: &WorkspaceId,
        name: &str,
    ) -> Option<ClientId> {
        if name.trim().is_empty() {
            return None;
        }
        let scope_key = self.scope_key(workspace);
        if let Some(cached) = self
            .cache
            .scopes
            .get(&scope_key)
            .and_then(|scope| scope.clients.get(name))
        {
            return cached.clone();
        }

        let found = match self.api.clients_by_name(workspace, name).await {
            Ok(clients) => clients.first().map(|c| ClientId::new(&c.id)),
            Err(e) => {
                debug!("unable to retrieve client {}: {}", name, e);
                return None;
            }
        };
        if found.is_none() {
            debug!("no client named {} on workspace {}", name, scope_key);
        }
        self.scope_mut(&scope_key)
            .clients
            .insert(name.to_string(), found.clone());
        found
    }

    /// Exact-name task lookup within a project; no creation. A missing task
    /// is not cached, so it is re-queried (and possibly created) later.
    pub async fn find_task(
        &mut self,
        workspace: &WorkspaceId,
        project: &ProjectId,
        name: &str,
    ) -> Option<TaskId> {
        let scope_key = self.scope_key(workspace);
        let key = (project.clone(), name.to_string());
        if let Some(task) = self
            .cache
            .scopes
            .get(&scope_key)
            .and_then(|scope| scope.tasks.get(&key))
        {
            return Some(task.clone());
        }

        let found = match self.api.tasks_by_name(workspace, project, name).await {
            Ok(tasks) => tasks.first().map(|t| TaskId::new(&t.id)),
            Err(e) => {
                debug!("unable to retrieve task {}: {}", name, e);
                return None;
            }
        };
        if let Some(task) = &found {
            self.scope_mut(&scope_key)
                .tasks
                .insert(key, task.clone());
        }
        found
    }

    /// Task id for a configured name, creating the task when no exact match
    /// exists. This is the one mutating resolution step. Name collisions are
    /// out of scope: the first match always wins.
    pub async fn resolve_task(
        &mut self,
        workspace: &WorkspaceId,
        project: &ProjectId,
        name: &str,
    ) -> Option<TaskId> {
        if let Some(task) = self.find_task(workspace, project, name).await {
            return Some(task);
        }

        match self.api.create_task(workspace, project, name).await {
            Ok(task) => {
                debug!("created task {} ({}) in project {}", name, task.id, project);
                let scope_key = self.scope_key(workspace);
                let task_id = TaskId::new(&task.id);
                self.scope_mut(&scope_key)
                    .tasks
                    .insert((project.clone(), name.to_string()), task_id.clone());
                Some(task_id)
            }
            Err(e) => {
                warn!("unable to create task {}: {}", name, e);
                None
            }
        }
    }

    /// Ids of the configured tags. Names that match nothing are dropped
    /// without error; the tag list is fetched once per workspace scope.
    pub async fn resolve_tags(&mut self, workspace: &WorkspaceId, filter: &str) -> Vec<TagId> {
        let names = tags::parse_tag_filter(filter);
        if names.is_empty() {
            return Vec::new();
        }

        let scope_key = self.scope_key(workspace);
        let workspace_tags = match self
            .cache
            .scopes
            .get(&scope_key)
            .and_then(|scope| scope.tags.clone())
        {
            Some(cached) => cached,
            None => match self.api.tags(workspace).await {
                Ok(fetched) => {
                    self.scope_mut(&scope_key).tags = Some(fetched.clone());
                    fetched
                }
                Err(e) => {
                    warn!("unable to retrieve tags on workspace {}: {}", scope_key, e);
                    return Vec::new();
                }
            },
        };

        workspace_tags
            .iter()
            .filter(|tag| names.iter().any(|name| *name == tag.name))
            .map(|tag| TagId::new(&tag.id))
            .collect()
    }

    /// Scopes are keyed by workspace name (the user-facing key); an id the
    /// cached list does not know falls back to the id itself.
    fn scope_key(&self, workspace: &WorkspaceId) -> String {
        self.cache
            .workspaces
            .as_ref()
            .and_then(|workspaces| workspaces.iter().find(|w| w.id == workspace.as_str()))
            .map(|w| w.name.clone())
            .unwrap_or_else(|| workspace.as_str().to_string())
    }

    fn scope_mut(&mut self, key: &str) -> &mut WorkspaceScope {
        self.cache.scopes.entry(key.to_string()).or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::outbound::mock::{project, MockTimeTracking};
    use clockify::Project;

    fn acme_mock() -> MockTimeTracking {
        MockTimeTracking::new()
            .with_user("u1", "Tester")
            .with_workspace("ws1", "Acme")
    }

    fn resolver(mock: &MockTimeTracking) -> ConfigResolver {
        ConfigResolver::new(Arc::new(mock.clone()))
    }

    fn website_project(id: &str, client_id: &str, client_name: &str) -> Project {
        Project {
            client_id: Some(client_id.to_string()),
            client_name: Some(client_name.to_string()),
            ..project(id, "Website")
        }
    }

    #[tokio::test]
    async fn blank_workspace_name_resolves_to_none_without_remote_call() {
        let mock = acme_mock();
        let mut resolver = resolver(&mock);

        assert_eq!(resolver.resolve_workspace("  ").await, None);
        assert_eq!(mock.counters().workspace_calls, 0);
    }

    #[tokio::test]
    async fn workspace_list_is_fetched_once_per_connection() {
        let mock = acme_mock();
        let mut resolver = resolver(&mock);

        let first = resolver.resolve_workspace("Acme").await;
        let second = resolver.resolve_workspace("Acme").await;
        assert_eq!(first, Some(WorkspaceId::new("ws1")));
        assert_eq!(second, first);
        assert_eq!(resolver.resolve_workspace("Unknown").await, None);
        assert_eq!(mock.counters().workspace_calls, 1);
    }

    #[tokio::test]
    async fn same_name_projects_are_ambiguous_until_a_client_disambiguates() {
        let mock = acme_mock()
            .with_project("ws1", website_project("p1", "c1", "Acme Corp"))
            .with_project("ws1", website_project("p2", "c2", "Acme Labs"))
            .with_client("ws1", "c1", "Acme Corp")
            .with_client("ws1", "c2", "Acme Labs");
        let mut resolver = resolver(&mock);
        let ws = resolver.resolve_workspace("Acme").await.unwrap();

        assert_eq!(
            resolver.resolve_project(&ws, "Website", None).await,
            Resolution::Ambiguous
        );
        assert_eq!(
            resolver
                .resolve_project(&ws, "Website", Some("Acme Labs"))
                .await,
            Resolution::Found(ProjectId::new("p2"))
        );
    }

    #[tokio::test]
    async fn missing_project_is_not_found_not_first_match() {
        let mock = acme_mock().with_project("ws1", project("p1", "Website"));
        let mut resolver = resolver(&mock);
        let ws = resolver.resolve_workspace("Acme").await.unwrap();

        assert_eq!(
            resolver.resolve_project(&ws, "Backend", None).await,
            Resolution::NotFound
        );
    }

    #[tokio::test]
    async fn project_resolution_is_cached_per_workspace_scope() {
        let mock = acme_mock().with_project("ws1", project("p1", "Website"));
        let mut resolver = resolver(&mock);
        let ws = resolver.resolve_workspace("Acme").await.unwrap();

        let first = resolver.resolve_project(&ws, "Website", None).await;
        let second = resolver.resolve_project(&ws, "Website", None).await;
        assert_eq!(first, Resolution::Found(ProjectId::new("p1")));
        assert_eq!(second, first);
        assert_eq!(mock.counters().project_queries, 1);
    }

    #[tokio::test]
    async fn transport_failures_are_not_cached() {
        let mock = acme_mock().with_project("ws1", project("p1", "Website"));
        let mut resolver = resolver(&mock);
        let ws = resolver.resolve_workspace("Acme").await.unwrap();

        mock.set_transport(true);
        assert_eq!(
            resolver.resolve_project(&ws, "Website", None).await,
            Resolution::NotFound
        );

        mock.set_transport(false);
        assert_eq!(
            resolver.resolve_project(&ws, "Website", None).await,
            Resolution::Found(ProjectId::new("p1"))
        );
    }

    #[tokio::test]
    async fn task_is_created_once_and_found_afterwards() {
        let mock = acme_mock().with_project("ws1", project("p1", "Website"));
        let mut resolver = resolver(&mock);
        let ws = resolver.resolve_workspace("Acme").await.unwrap();
        let project_id = ProjectId::new("p1");

        let first = resolver.resolve_task(&ws, &project_id, "Review").await;
        let second = resolver.resolve_task(&ws, &project_id, "Review").await;

        assert!(first.is_some());
        assert_eq!(second, first);
        assert_eq!(mock.counters().tasks_created, 1);
        assert_eq!(mock.counters().task_queries, 1);
    }

    #[tokio::test]
    async fn unmatched_tag_names_are_dropped_silently() {
        let mock = acme_mock()
            .with_tag("ws1", "t1", "urgent")
            .with_tag("ws1", "t2", "billing");
        let mut resolver = resolver(&mock);
        let ws = resolver.resolve_workspace("Acme").await.unwrap();

        let resolved = resolver.resolve_tags(&ws, "urgent, nonexistent").await;
        assert_eq!(resolved, vec![TagId::new("t1")]);

        // the tag list itself is cached for the scope
        resolver.resolve_tags(&ws, "billing").await;
        assert_eq!(mock.counters().tag_queries, 1);
    }

    #[tokio::test]
    async fn reload_workspaces_drops_scopes() {
        let mock = acme_mock().with_project("ws1", project("p1", "Website"));
        let mut resolver = resolver(&mock);
        let ws = resolver.resolve_workspace("Acme").await.unwrap();

        resolver.resolve_project(&ws, "Website", None).await;
        resolver.reload_workspaces().await;
        resolver.resolve_project(&ws, "Website", None).await;

        assert_eq!(mock.counters().project_queries, 2);
        assert_eq!(mock.counters().workspace_calls, 2);
    }
}
