use std::sync::Arc;

use time::{Duration, OffsetDateTime};
use tracing::{debug, info, warn};

use clockify::{TimeEntry, WeeklyReport, WeeklyReportRequest};

use crate::adapters::outbound::ClockifyApi;
use crate::display::{self, KeyStatus};
use crate::domain::{
    models::{ActiveFilter, Resolution, Toggle, UserId},
    ports::outbound::TimeTracking,
    TrackerError,
};
use crate::reconciler::TimerReconciler;
use crate::resolver::ConfigResolver;
use crate::settings::PluginSettings;

/// Builds the outbound port for a validated key/server pair. Injectable so
/// tests drive the whole context against the in-memory mock.
pub type ApiFactory = dyn Fn(&str, &str) -> Arc<dyn TimeTracking> + Send + Sync;

/// The engine facade the host shell drives.
///
/// One logical thread of control: all methods take `&mut self` and the host
/// invokes them sequentially from its two triggers (key press, periodic
/// tick). Overlapping triggers are not serialized here; a tick racing a
/// toggle may observe a transient stopped-but-not-restarted state, which
/// heals on the next tick.
pub struct TrackerContext {
    factory: Box<ApiFactory>,
    connection: Option<Connection>,
    settings: PluginSettings,
}

/// Everything scoped to one validated key/server pair. Replaced wholesale on
/// a credential change, which is what invalidates all caches.
struct Connection {
    api: Arc<dyn TimeTracking>,
    identity: UserId,
    resolver: ConfigResolver,
    reconciler: TimerReconciler,
}

impl Default for TrackerContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackerContext {
    pub fn new() -> Self {
        Self::with_factory(Box::new(|api_key, server_url| {
            Arc::new(ClockifyApi::new(api_key, server_url))
        }))
    }

    pub fn with_factory(factory: Box<ApiFactory>) -> Self {
        Self {
            factory,
            connection: None,
            settings: PluginSettings::default(),
        }
    }

    /// Whether a connection is established and operations may hit the API.
    pub fn is_valid(&self) -> bool {
        self.connection.is_some()
    }

    pub fn settings(&self) -> &PluginSettings {
        &self.settings
    }

    /// Apply a settings change from the host.
    ///
    /// A key or server change validates the pair, rebuilds the connection and
    /// re-runs the identity check; failure tears the connection down until
    /// the next settings change. A workspace rename reloads the workspace
    /// list and drops the per-workspace resolver scopes. Name changes only
    /// swap the lookup keys used on demand.
    pub async fn update_settings(&mut self, settings: &PluginSettings) {
        if self.connection.is_none()
            || settings.api_key != self.settings.api_key
            || settings.server_url != self.settings.server_url
        {
            if let Err(e) = settings.validate_connection() {
                warn!("{}", e);
                return;
            }

            self.settings.api_key = settings.api_key.clone();
            self.settings.server_url = settings.server_url.clone();

            let api = (self.factory)(&settings.api_key, &settings.server_url);
            let identity = match api.current_user().await {
                Ok(user) => UserId::new(user.id),
                Err(e) => {
                    warn!("invalid server URL or API key: {}", e);
                    self.connection = None;
                    return;
                }
            };

            info!("connection to time tracking service established");
            self.connection = Some(Connection {
                api: api.clone(),
                identity,
                resolver: ConfigResolver::new(api.clone()),
                reconciler: TimerReconciler::new(api),
            });
        }

        let workspace_changed = settings.workspace_name != self.settings.workspace_name;
        if let Some(connection) = self.connection.as_mut() {
            if !connection.resolver.has_workspaces() || workspace_changed {
                connection.resolver.reload_workspaces().await;
            }
        }

        self.settings = settings.clone();
    }

    /// One key press: stop the matching running timer or start a new one.
    pub async fn toggle_timer(&mut self) -> Toggle {
        if self.connection.is_none() || self.settings.workspace_name.trim().is_empty() {
            warn!(
                "invalid settings for toggle {}, {}, {}",
                self.settings.workspace_name, self.settings.project_name, self.settings.timer_name
            );
            return Toggle::Rejected;
        }

        let filter = match self.build_filter(FilterIntent::Toggle).await {
            Ok(filter) => filter,
            Err(e) => {
                debug!("toggle blocked: {}", e);
                return Toggle::Rejected;
            }
        };
        let Some(connection) = self.connection.as_ref() else {
            return Toggle::Rejected;
        };

        connection
            .reconciler
            .toggle(&connection.identity, &filter)
            .await
    }

    /// Read-only view of the matching running timer, for the refresh tick.
    /// Never creates tasks and never mutates the remote store.
    pub async fn running_timer(&mut self) -> Option<TimeEntry> {
        if self.connection.is_none() || self.settings.workspace_name.trim().is_empty() {
            warn!(
                "invalid settings for running timer {}",
                self.settings.workspace_name
            );
            return None;
        }

        let filter = match self.build_filter(FilterIntent::Read).await {
            Ok(filter) => filter,
            Err(e) => {
                debug!("running timer lookup blocked: {}", e);
                return None;
            }
        };
        let connection = self.connection.as_ref()?;
        connection
            .reconciler
            .find_running(&connection.identity, &filter)
            .await
    }

    /// Total tracked time in the current week (Monday based).
    pub async fn current_week_total(&mut self) -> Option<Duration> {
        let (report, _) = self.fetch_weekly_report().await?;
        report
            .totals
            .first()
            .map(|total| Duration::seconds(total.total_time))
    }

    /// Total tracked time today.
    pub async fn current_day_total(&mut self) -> Option<Duration> {
        let (report, today) = self.fetch_weekly_report().await?;
        report
            .totals_by_day
            .iter()
            .find(|day| day.date == today)
            .map(|day| Duration::seconds(day.duration))
    }

    /// One full refresh of the key: active flag plus rendered title,
    /// honoring the week/day total display modes.
    pub async fn refresh_status(&mut self) -> KeyStatus {
        if self.settings.show_week_time {
            let total = self.current_week_total().await;
            return KeyStatus {
                active: true,
                title: display::render_title(&self.settings, total),
            };
        }
        if self.settings.show_day_time {
            let total = self.current_day_total().await;
            return KeyStatus {
                active: true,
                title: display::render_title(&self.settings, total),
            };
        }

        let elapsed = self.running_timer().await.map(|entry| entry.elapsed());
        KeyStatus {
            active: elapsed.is_some(),
            title: display::render_title(&self.settings, elapsed),
        }
    }

    /// Resolve the configured names into an [`ActiveFilter`]. Any configured
    /// dimension that fails to resolve blocks the caller, except the task on
    /// the read path, where a missing task collapses to a wildcard instead of
    /// being created.
    async fn build_filter(&mut self, intent: FilterIntent) -> Result<ActiveFilter, TrackerError> {
        let settings = self.settings.clone();
        let connection = self.connection.as_mut().ok_or_else(|| {
            TrackerError::ConfigurationInvalid("no connection established".to_string())
        })?;

        let workspace = connection
            .resolver
            .resolve_workspace(&settings.workspace_name)
            .await
            .ok_or_else(|| {
                TrackerError::ResolutionFailed(format!(
                    "workspace {}",
                    settings.workspace_name
                ))
            })?;

        let mut filter = ActiveFilter::new(workspace.clone());
        filter.billable = settings.billable;
        if !settings.timer_name.is_empty() {
            filter = filter.with_description(settings.timer_name.clone());
        }

        if !settings.project_name.is_empty() {
            let client_name = {
                let trimmed = settings.client_name.trim();
                (!trimmed.is_empty()).then_some(trimmed)
            };
            let project = match connection
                .resolver
                .resolve_project(&workspace, &settings.project_name, client_name)
                .await
            {
                Resolution::Found(project) => project,
                Resolution::NotFound | Resolution::Ambiguous => {
                    return Err(TrackerError::ResolutionFailed(format!(
                        "project {}",
                        settings.project_name
                    )))
                }
            };

            if !settings.task_name.is_empty() {
                let task = match intent {
                    FilterIntent::Toggle => {
                        connection
                            .resolver
                            .resolve_task(&workspace, &project, &settings.task_name)
                            .await
                    }
                    FilterIntent::Read => {
                        connection
                            .resolver
                            .find_task(&workspace, &project, &settings.task_name)
                            .await
                    }
                };
                match task {
                    Some(task) => filter = filter.with_task(task),
                    None if intent == FilterIntent::Toggle => {
                        return Err(TrackerError::ResolutionFailed(format!(
                            "task {}",
                            settings.task_name
                        )))
                    }
                    None => {}
                }
            }

            filter = filter.with_project(project);
        }

        if !settings.tags.trim().is_empty() {
            let tags = connection.resolver.resolve_tags(&workspace, &settings.tags).await;
            filter = filter.with_tags(tags);
        }

        Ok(filter)
    }

    async fn fetch_weekly_report(&mut self) -> Option<(WeeklyReport, String)> {
        if self.settings.workspace_name.trim().is_empty() {
            return None;
        }
        let workspace_name = self.settings.workspace_name.clone();
        let connection = self.connection.as_mut()?;
        let workspace = connection.resolver.resolve_workspace(&workspace_name).await?;

        let today = OffsetDateTime::now_utc().date();
        let monday = today - Duration::days(today.weekday().number_days_from_monday() as i64);
        let start = monday.midnight().assume_utc();
        let end = start + Duration::days(7) - Duration::nanoseconds(1);

        match connection
            .api
            .weekly_report(&workspace, &WeeklyReportRequest::new(start, end))
            .await
        {
            Ok(report) => Some((report, today.to_string())),
            Err(e) => {
                debug!("unable to fetch weekly report: {}", e);
                None
            }
        }
    }
}

/// Whether a filter is being built for a mutation or a read. Reads must not
/// create tasks as a side effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FilterIntent {
    Toggle,
    Read,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::outbound::mock::{project, running_entry, MockTimeTracking};
    use clockify::{DayTotal, Project, ProjectTask, ReportTotal};
    use std::sync::atomic::{AtomicU32, Ordering};

    fn context_for(mock: &MockTimeTracking) -> (TrackerContext, Arc<AtomicU32>) {
        let factory_calls = Arc::new(AtomicU32::new(0));
        let context = TrackerContext::with_factory({
            let mock = mock.clone();
            let factory_calls = factory_calls.clone();
            Box::new(move |_key, _url| {
                factory_calls.fetch_add(1, Ordering::SeqCst);
                Arc::new(mock.clone())
            })
        });
        (context, factory_calls)
    }

    fn valid_settings() -> PluginSettings {
        PluginSettings {
            api_key: "k".repeat(48),
            server_url: "https://api.clockify.me/api/v1".to_string(),
            workspace_name: "Acme".to_string(),
            ..PluginSettings::default()
        }
    }

    fn acme_mock() -> MockTimeTracking {
        MockTimeTracking::new()
            .with_user("u1", "Tester")
            .with_workspace("ws1", "Acme")
    }

    #[tokio::test]
    async fn malformed_url_blocks_connection_without_remote_call() {
        let mock = acme_mock();
        let (mut context, factory_calls) = context_for(&mock);

        let settings = PluginSettings {
            server_url: "not a url".to_string(),
            ..valid_settings()
        };
        context.update_settings(&settings).await;

        assert!(!context.is_valid());
        assert_eq!(factory_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn wrong_key_length_blocks_connection() {
        let mock = acme_mock();
        let (mut context, factory_calls) = context_for(&mock);

        let settings = PluginSettings {
            api_key: "short".to_string(),
            ..valid_settings()
        };
        context.update_settings(&settings).await;

        assert!(!context.is_valid());
        assert_eq!(factory_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn identity_failure_tears_the_connection_down() {
        let mock = MockTimeTracking::new().with_workspace("ws1", "Acme"); // no user
        let (mut context, _) = context_for(&mock);

        context.update_settings(&valid_settings()).await;
        assert!(!context.is_valid());

        // the next settings change retries and succeeds once identity works
        mock.set_user("u1", "Tester");
        context.update_settings(&valid_settings()).await;
        assert!(context.is_valid());
    }

    #[tokio::test]
    async fn connection_is_established_once_and_workspaces_cached() {
        let mock = acme_mock();
        let (mut context, factory_calls) = context_for(&mock);

        context.update_settings(&valid_settings()).await;
        context.update_settings(&valid_settings()).await;

        assert!(context.is_valid());
        assert_eq!(factory_calls.load(Ordering::SeqCst), 1);
        assert_eq!(mock.counters().workspace_calls, 1);
    }

    #[tokio::test]
    async fn credential_change_rebuilds_connection_and_caches() {
        let mock = acme_mock();
        let (mut context, factory_calls) = context_for(&mock);

        context.update_settings(&valid_settings()).await;
        let changed = PluginSettings {
            api_key: "n".repeat(48),
            ..valid_settings()
        };
        context.update_settings(&changed).await;

        assert_eq!(factory_calls.load(Ordering::SeqCst), 2);
        assert_eq!(mock.counters().workspace_calls, 2);
    }

    #[tokio::test]
    async fn workspace_rename_reloads_the_workspace_list() {
        let mock = acme_mock().with_workspace("ws2", "Globex");
        let (mut context, _) = context_for(&mock);

        context.update_settings(&valid_settings()).await;
        let renamed = PluginSettings {
            workspace_name: "Globex".to_string(),
            ..valid_settings()
        };
        context.update_settings(&renamed).await;

        assert_eq!(mock.counters().workspace_calls, 2);
    }

    #[tokio::test]
    async fn toggle_resolves_names_and_starts_an_entry() {
        let mock = acme_mock()
            .with_project("ws1", project("p1", "Website"))
            .with_tag("ws1", "t1", "urgent");
        let (mut context, _) = context_for(&mock);

        let settings = PluginSettings {
            project_name: "Website".to_string(),
            task_name: "Review".to_string(),
            timer_name: "standup".to_string(),
            tags: "urgent".to_string(),
            billable: Some(true),
            ..valid_settings()
        };
        context.update_settings(&settings).await;

        assert_eq!(context.toggle_timer().await, Toggle::Started);

        let running = mock.running_entries("ws1");
        assert_eq!(running.len(), 1);
        assert_eq!(running[0].project_id.as_deref(), Some("p1"));
        assert_eq!(running[0].description, "standup");
        assert!(running[0].billable);
        assert_eq!(mock.counters().tasks_created, 1);
        assert_eq!(running[0].task_id.as_deref(), Some("task-1"));
    }

    #[tokio::test]
    async fn toggle_rejects_on_ambiguous_project_without_mutating() {
        let website = |id: &str, client: &str| Project {
            client_id: Some(client.to_string()),
            ..project(id, "Website")
        };
        let mock = acme_mock()
            .with_project("ws1", website("p1", "c1"))
            .with_project("ws1", website("p2", "c2"));
        let (mut context, _) = context_for(&mock);

        let settings = PluginSettings {
            project_name: "Website".to_string(),
            ..valid_settings()
        };
        context.update_settings(&settings).await;

        assert_eq!(context.toggle_timer().await, Toggle::Rejected);
        assert_eq!(mock.counters().entries_created, 0);
        assert_eq!(mock.counters().entries_updated, 0);
    }

    #[tokio::test]
    async fn toggle_rejects_when_workspace_is_blank() {
        let mock = acme_mock();
        let (mut context, _) = context_for(&mock);

        let settings = PluginSettings {
            workspace_name: String::new(),
            ..valid_settings()
        };
        context.update_settings(&settings).await;

        assert_eq!(context.toggle_timer().await, Toggle::Rejected);
        assert_eq!(mock.counters().entry_queries, 0);
    }

    #[tokio::test]
    async fn read_path_never_creates_tasks() {
        let mut entry = running_entry("e1", "ws1", "u1");
        entry.project_id = Some("p1".to_string());
        let mock = acme_mock()
            .with_project("ws1", project("p1", "Website"))
            .with_entry(entry);
        let (mut context, _) = context_for(&mock);

        let settings = PluginSettings {
            project_name: "Website".to_string(),
            task_name: "Unseen".to_string(),
            ..valid_settings()
        };
        context.update_settings(&settings).await;

        // the configured task does not exist: the dimension collapses to a
        // wildcard on reads and the running entry still matches
        let found = context.running_timer().await;
        assert_eq!(found.unwrap().id, "e1");
        assert_eq!(mock.counters().tasks_created, 0);
    }

    #[tokio::test]
    async fn existing_task_constrains_the_read_path() {
        let mut entry = running_entry("e1", "ws1", "u1");
        entry.project_id = Some("p1".to_string());
        entry.task_id = Some("t-other".to_string());
        let mock = acme_mock()
            .with_project("ws1", project("p1", "Website"))
            .with_task(ProjectTask {
                id: "t-review".to_string(),
                name: "Review".to_string(),
                project_id: "p1".to_string(),
                status: None,
            })
            .with_entry(entry);
        let (mut context, _) = context_for(&mock);

        let settings = PluginSettings {
            project_name: "Website".to_string(),
            task_name: "Review".to_string(),
            ..valid_settings()
        };
        context.update_settings(&settings).await;

        assert!(context.running_timer().await.is_none());
    }

    #[tokio::test]
    async fn week_and_day_totals_come_from_the_weekly_report() {
        let today = OffsetDateTime::now_utc().date().to_string();
        let mock = acme_mock().with_weekly_report(WeeklyReport {
            totals: vec![ReportTotal { total_time: 7200 }],
            totals_by_day: vec![DayTotal {
                date: today,
                duration: 1800,
            }],
        });
        let (mut context, _) = context_for(&mock);
        context.update_settings(&valid_settings()).await;

        assert_eq!(
            context.current_week_total().await,
            Some(Duration::seconds(7200))
        );
        assert_eq!(
            context.current_day_total().await,
            Some(Duration::seconds(1800))
        );
    }

    #[tokio::test]
    async fn refresh_status_reports_active_running_timer() {
        let mut entry = running_entry("e1", "ws1", "u1");
        entry.description = "standup".to_string();
        let mock = acme_mock().with_entry(entry);
        let (mut context, _) = context_for(&mock);

        let settings = PluginSettings {
            timer_name: "standup".to_string(),
            ..valid_settings()
        };
        context.update_settings(&settings).await;

        let status = context.refresh_status().await;
        assert!(status.active);
        assert!(status.title.starts_with("standup\n"));

        mock.drop_entry("e1");
        let status = context.refresh_status().await;
        assert!(!status.active);
        assert_eq!(status.title, "standup");
    }
}
