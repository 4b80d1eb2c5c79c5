use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc;

use chrono::Local;
use tracing::{info, warn};

use crate::docker::DockerClient;
use crate::layout::Layout;
use crate::error::{DockerError, Result as DockerResult};
use crate::model::{
    AggregateMetrics, AppView, ContainerInfo, ImageInfo, ListUIState, MetricsHistory,
    MetricsSample, NetworkInfo, StoppedContainerInfo, VolumeInfo,
};
use crate::stats;

/// Receiver for background Docker action results.
type ActionReceiver = mpsc::Receiver<Result<String, String>>;

/// The per-tab list gathered alongside the running containers.
#[derive(Debug)]
pub enum TabData {
    Stopped(DockerResult<Vec<StoppedContainerInfo>>),
    Images(DockerResult<Vec<ImageInfo>>),
    Networks(DockerResult<Vec<NetworkInfo>>),
    Volumes(DockerResult<Vec<VolumeInfo>>),
    Nothing,
}

/// Everything one background refresh read from the engine.
#[derive(Debug)]
pub struct Snapshot {
    pub time: String,
    pub running: DockerResult<Vec<ContainerInfo>>,
    pub tab: TabData,
}

impl Snapshot {
    async fn collect(client: &DockerClient, view: AppView) -> Self {
        let running = client.list_running().await;
        let tab = match view {
            AppView::Containers => TabData::Stopped(client.list_stopped().await),
            AppView::Images => TabData::Images(client.list_images().await),
            AppView::Networks => TabData::Networks(client.list_networks().await),
            AppView::Volumes => TabData::Volumes(client.list_volumes().await),
            AppView::Metrics => TabData::Nothing,
        };
        Self {
            time: Local::now().format("%H:%M:%S").to_string(),
            running,
            tab,
        }
    }
}

/// A state-changing request against the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    StartContainer(String),
    StopContainer(String),
    RemoveContainer(String),
    RunImage(String),
    RemoveImage(String),
    CreateNetwork(String),
    RemoveNetwork(String),
    ComposeUp(PathBuf),
}

impl Action {
    /// Status line shown while the action is in flight.
    pub fn progress_message(&self) -> String {
        match self {
            Action::StartContainer(id) => format!("Starting container {}...", id),
            Action::StopContainer(id) => format!("Stopping container {}...", id),
            Action::RemoveContainer(id) => format!("Removing container {}...", id),
            Action::RunImage(image) => format!("Running image {}...", image),
            Action::RemoveImage(image) => format!("Removing image {}...", image),
            Action::CreateNetwork(name) => format!("Creating network {}...", name),
            Action::RemoveNetwork(name) => format!("Removing network {}...", name),
            Action::ComposeUp(dir) => format!("Running docker compose up in {}...", dir.display()),
        }
    }

    async fn execute(self, client: &DockerClient) -> Result<String, String> {
        let result = match &self {
            Action::StartContainer(id) => client
                .start_container(id)
                .await
                .map(|_| format!("Started {}", id)),
            Action::StopContainer(id) => client
                .stop_container(id)
                .await
                .map(|_| format!("Stopped {}", id)),
            Action::RemoveContainer(id) => client
                .remove_container(id)
                .await
                .map(|_| format!("Removed {}", id)),
            Action::RunImage(image) => client
                .run_image(image)
                .await
                .map(|id| format!("Running {} as container {}", image, id)),
            Action::RemoveImage(image) => client
                .remove_image(image)
                .await
                .map(|_| format!("Removed image {}", image)),
            Action::CreateNetwork(name) => client
                .create_network(name)
                .await
                .map(|_| format!("New network {} is successfully added", name)),
            Action::RemoveNetwork(name) => client
                .remove_network(name)
                .await
                .map(|_| format!("Network {} is successfully removed", name)),
            Action::ComposeUp(dir) => client
                .compose_up(dir)
                .await
                .map(|networks| compose_summary(&networks)),
        };
        result.map_err(|e| {
            warn!(action = ?self, error = %e, "action failed");
            e.to_string()
        })
    }
}

fn compose_summary(networks: &[NetworkInfo]) -> String {
    if networks.is_empty() {
        return "Compose up finished; the project defines no networks of its own".to_string();
    }
    let parts: Vec<String> = networks
        .iter()
        .map(|n| format!("{} ({} containers)", n.name, n.containers.len()))
        .collect();
    format!("Compose up finished: {}", parts.join(", "))
}

/// Row at a given index in the Containers tab: running rows first, then stopped.
#[derive(Debug)]
pub enum ContainerRow<'a> {
    Running(&'a ContainerInfo),
    Stopped(&'a StoppedContainerInfo),
}

/// Manages Docker data collection and background actions for the dashboard.
pub struct DockerMonitor {
    client: Option<DockerClient>,
    rt: Arc<tokio::runtime::Runtime>,
    pub docker_available: bool,
    pub running: Vec<ContainerInfo>,
    pub stopped: Vec<StoppedContainerInfo>,
    pub images: Vec<ImageInfo>,
    pub networks: Vec<NetworkInfo>,
    pub volumes: Vec<VolumeInfo>,
    pub aggregate: AggregateMetrics,
    pub history: MetricsHistory,
    pub containers_ui: ListUIState,
    pub images_ui: ListUIState,
    pub networks_ui: ListUIState,
    pub volumes_ui: ListUIState,
    pub metrics_ui: ListUIState,
    pub metrics_layout: Layout,
    pub status_message: Option<String>,
    action_receiver: Option<ActionReceiver>,
    pub action_in_progress: bool,
    /// Set when a finished action changed engine state the lists should reflect.
    pub refresh_requested: bool,
    refresh_receiver: Option<mpsc::Receiver<Snapshot>>,
    /// Tab to refresh once the in-flight refresh lands.
    queued_refresh: Option<AppView>,
}

impl DockerMonitor {
    pub fn new(rt: Arc<tokio::runtime::Runtime>) -> Self {
        let client = DockerClient::connect().ok();

        // Verify daemon is actually reachable
        let docker_available = match client {
            Some(ref c) => rt.block_on(c.is_available()),
            None => false,
        };
        if !docker_available {
            warn!("Docker daemon not reachable; dashboard will stay empty");
        }

        let mut monitor = Self::detached(rt);
        monitor.client = if docker_available { client } else { None };
        monitor.docker_available = docker_available;
        monitor
    }

    /// A monitor with no engine connection.
    pub fn detached(rt: Arc<tokio::runtime::Runtime>) -> Self {
        Self {
            client: None,
            rt,
            docker_available: false,
            running: Vec::new(),
            stopped: Vec::new(),
            images: Vec::new(),
            networks: Vec::new(),
            volumes: Vec::new(),
            aggregate: AggregateMetrics::default(),
            history: MetricsHistory::default(),
            containers_ui: ListUIState::default(),
            images_ui: ListUIState::default(),
            networks_ui: ListUIState::default(),
            volumes_ui: ListUIState::default(),
            metrics_ui: ListUIState::default(),
            metrics_layout: Layout::default_layout(),
            status_message: None,
            action_receiver: None,
            action_in_progress: false,
            refresh_requested: false,
            refresh_receiver: None,
            queued_refresh: None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.docker_available
    }

    /// Start a background refresh of the running containers (always, for counts
    /// and history) plus the given tab's list. With one already in flight the
    /// request is queued instead, so at most one refresh runs at a time.
    pub fn request_refresh(&mut self, view: AppView) {
        let Some(client) = self.client.clone() else { return };
        self.refresh_requested = false;
        if self.refresh_receiver.is_some() {
            self.queued_refresh = Some(view);
            return;
        }

        let (tx, rx) = mpsc::channel();
        self.refresh_receiver = Some(rx);
        self.rt.spawn(async move {
            let _ = tx.send(Snapshot::collect(&client, view).await);
        });
    }

    pub fn refresh_in_flight(&self) -> bool {
        self.refresh_receiver.is_some()
    }

    /// Apply a finished refresh, if any. Returns true when the lists changed.
    pub fn poll_refresh(&mut self) -> bool {
        let Some(ref rx) = self.refresh_receiver else { return false };
        let snapshot = match rx.try_recv() {
            Ok(snapshot) => Some(snapshot),
            Err(mpsc::TryRecvError::Empty) => return false,
            Err(mpsc::TryRecvError::Disconnected) => {
                warn!("refresh task ended without a snapshot");
                None
            }
        };
        self.refresh_receiver = None;
        let changed = match snapshot {
            Some(snapshot) => {
                self.apply_snapshot(snapshot);
                true
            }
            None => false,
        };
        if let Some(view) = self.queued_refresh.take() {
            self.request_refresh(view);
        }
        changed
    }

    pub fn apply_snapshot(&mut self, snapshot: Snapshot) {
        match snapshot.running {
            Ok(running) => {
                self.running = running;
                self.aggregate = stats::aggregate(&self.running);
                self.history.push(MetricsSample {
                    time: snapshot.time,
                    cpu_percent: self.aggregate.cpu_percent,
                    memory_percent: self.aggregate.memory_percent,
                });
            }
            Err(e) => self.report_error("listing containers", &e),
        }

        match snapshot.tab {
            TabData::Stopped(Ok(stopped)) => self.stopped = stopped,
            TabData::Images(Ok(images)) => self.images = images,
            TabData::Networks(Ok(networks)) => self.networks = networks,
            TabData::Volumes(Ok(volumes)) => self.volumes = volumes,
            TabData::Stopped(Err(e)) => self.report_error("listing stopped containers", &e),
            TabData::Images(Err(e)) => self.report_error("listing images", &e),
            TabData::Networks(Err(e)) => self.report_error("listing networks", &e),
            TabData::Volumes(Err(e)) => self.report_error("listing volumes", &e),
            TabData::Nothing => {}
        }

        self.clamp_selections();
    }

    fn report_error(&mut self, what: &str, err: &DockerError) {
        warn!(error = %err, "{} failed", what);
        self.status_message = Some(format!("Error: {}", err));
    }

    /// Keep every selection inside its list.
    pub fn clamp_selections(&mut self) {
        self.containers_ui.set_total(self.running.len() + self.stopped.len());
        self.images_ui.set_total(self.images.len());
        self.networks_ui.set_total(self.networks.len());
        self.volumes_ui.set_total(self.volumes.len());
        self.metrics_ui.set_total(self.metrics_layout.sections.len());
    }

    pub fn container_row(&self, index: usize) -> Option<ContainerRow<'_>> {
        if let Some(c) = self.running.get(index) {
            return Some(ContainerRow::Running(c));
        }
        self.stopped
            .get(index.checked_sub(self.running.len())?)
            .map(ContainerRow::Stopped)
    }

    pub fn selected_container(&self) -> Option<ContainerRow<'_>> {
        self.container_row(self.containers_ui.selected_index)
    }

    pub fn selected_image(&self) -> Option<&ImageInfo> {
        self.images.get(self.images_ui.selected_index)
    }

    pub fn selected_network(&self) -> Option<&NetworkInfo> {
        self.networks.get(self.networks_ui.selected_index)
    }

    pub fn selected_volume(&self) -> Option<&VolumeInfo> {
        self.volumes.get(self.volumes_ui.selected_index)
    }

    /// Run an action on the runtime so the TUI stays responsive.
    pub fn run_action(&mut self, action: Action) {
        if self.action_in_progress {
            self.status_message = Some("An action is already in progress...".to_string());
            return;
        }
        let Some(client) = self.client.clone() else {
            self.status_message = Some("Error: Docker is not available".to_string());
            return;
        };

        let (tx, rx) = mpsc::channel();
        self.action_receiver = Some(rx);
        self.action_in_progress = true;
        self.status_message = Some(action.progress_message());
        info!(action = ?action, "dispatching action");

        self.rt.spawn(async move {
            let result = action.execute(&client).await;
            let _ = tx.send(result);
        });
    }

    /// Poll for background action completion. Returns true if status changed.
    pub fn poll_action(&mut self) -> bool {
        let Some(ref rx) = self.action_receiver else { return false };
        let message = match rx.try_recv() {
            Ok(Ok(msg)) => msg,
            Ok(Err(msg)) => format!("Error: {}", msg),
            Err(mpsc::TryRecvError::Empty) => return false,
            Err(mpsc::TryRecvError::Disconnected) => "Action failed unexpectedly".to_string(),
        };
        self.status_message = Some(message);
        self.action_in_progress = false;
        self.action_receiver = None;
        self.refresh_requested = true;
        true
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runtime() -> Arc<tokio::runtime::Runtime> {
        Arc::new(
            tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap(),
        )
    }

    fn running(id: &str) -> ContainerInfo {
        ContainerInfo { id: id.into(), name: format!("{}-name", id), ..Default::default() }
    }

    fn stopped(id: &str) -> StoppedContainerInfo {
        StoppedContainerInfo { id: id.into(), ..Default::default() }
    }

    #[test]
    fn container_rows_span_running_then_stopped() {
        let mut monitor = DockerMonitor::detached(runtime());
        monitor.running = vec![running("a"), running("b")];
        monitor.stopped = vec![stopped("c")];

        assert!(matches!(monitor.container_row(1), Some(ContainerRow::Running(c)) if c.id == "b"));
        assert!(matches!(monitor.container_row(2), Some(ContainerRow::Stopped(c)) if c.id == "c"));
        assert!(monitor.container_row(3).is_none());
    }

    #[test]
    fn clamp_selections_tracks_list_lengths() {
        let mut monitor = DockerMonitor::detached(runtime());
        monitor.containers_ui.selected_index = 9;
        monitor.running = vec![running("a")];
        monitor.stopped = vec![stopped("b")];
        monitor.clamp_selections();
        assert_eq!(monitor.containers_ui.total_rows, 2);
        assert_eq!(monitor.containers_ui.selected_index, 1);
        assert_eq!(monitor.metrics_ui.total_rows, monitor.metrics_layout.sections.len());
    }

    #[test]
    fn run_action_without_docker_reports_error() {
        let mut monitor = DockerMonitor::detached(runtime());
        monitor.run_action(Action::StopContainer("abc".into()));
        assert!(!monitor.action_in_progress);
        assert_eq!(monitor.status_message.as_deref(), Some("Error: Docker is not available"));
    }

    #[test]
    fn second_action_waits_for_the_first() {
        let mut monitor = DockerMonitor::detached(runtime());
        monitor.action_in_progress = true;
        monitor.status_message = Some("Stopping container web...".into());
        monitor.run_action(Action::RemoveContainer("web".into()));
        assert!(monitor.action_in_progress);
        assert_eq!(
            monitor.status_message.as_deref(),
            Some("An action is already in progress...")
        );
    }

    fn pending(monitor: &mut DockerMonitor) -> mpsc::Sender<Result<String, String>> {
        let (tx, rx) = mpsc::channel();
        monitor.action_receiver = Some(rx);
        monitor.action_in_progress = true;
        tx
    }

    #[test]
    fn finished_action_sets_status_and_requests_refresh() {
        let mut monitor = DockerMonitor::detached(runtime());
        let tx = pending(&mut monitor);
        assert!(!monitor.poll_action());
        assert!(monitor.action_in_progress);

        tx.send(Ok("Stopped web".into())).unwrap();
        assert!(monitor.poll_action());
        assert_eq!(monitor.status_message.as_deref(), Some("Stopped web"));
        assert!(!monitor.action_in_progress);
        assert!(monitor.refresh_requested);
        assert!(!monitor.poll_action());
    }

    #[test]
    fn failed_action_is_prefixed() {
        let mut monitor = DockerMonitor::detached(runtime());
        let tx = pending(&mut monitor);
        tx.send(Err("no such container: web".into())).unwrap();
        assert!(monitor.poll_action());
        assert_eq!(monitor.status_message.as_deref(), Some("Error: no such container: web"));
        assert!(monitor.refresh_requested);
    }

    #[test]
    fn dropped_action_task_is_reported() {
        let mut monitor = DockerMonitor::detached(runtime());
        drop(pending(&mut monitor));
        assert!(monitor.poll_action());
        assert_eq!(monitor.status_message.as_deref(), Some("Action failed unexpectedly"));
        assert!(!monitor.action_in_progress);
    }

    fn snapshot(running: Vec<ContainerInfo>, tab: TabData) -> Snapshot {
        Snapshot { time: "12:00:00".into(), running: Ok(running), tab }
    }

    #[test]
    fn snapshot_replaces_lists_and_samples_history() {
        let mut monitor = DockerMonitor::detached(runtime());
        monitor.volumes_ui.selected_index = 4;
        let volume = VolumeInfo { name: "pgdata".into(), ..Default::default() };
        monitor.apply_snapshot(snapshot(
            vec![running("a"), running("b")],
            TabData::Volumes(Ok(vec![volume])),
        ));

        assert_eq!(monitor.running.len(), 2);
        assert_eq!(monitor.aggregate.container_count, 2);
        assert_eq!(monitor.volumes[0].name, "pgdata");
        assert_eq!(monitor.volumes_ui.selected_index, 0);
        assert_eq!(monitor.history.len(), 1);
        assert_eq!(monitor.history.samples[0].time, "12:00:00");
    }

    #[test]
    fn failed_snapshot_keeps_previous_lists() {
        let mut monitor = DockerMonitor::detached(runtime());
        monitor.running = vec![running("a")];
        monitor.images = vec![ImageInfo { repository: "redis".into(), ..Default::default() }];
        monitor.apply_snapshot(Snapshot {
            time: "12:00:03".into(),
            running: Err(DockerError::Unavailable),
            tab: TabData::Images(Err(DockerError::NotFound("redis".into()))),
        });

        assert_eq!(monitor.running.len(), 1);
        assert_eq!(monitor.images.len(), 1);
        assert!(monitor.history.is_empty());
        assert_eq!(monitor.status_message.as_deref(), Some("Error: not found: redis"));
    }

    #[test]
    fn refresh_lands_without_blocking() {
        let mut monitor = DockerMonitor::detached(runtime());
        let (tx, rx) = mpsc::channel();
        monitor.refresh_receiver = Some(rx);
        monitor.queued_refresh = Some(AppView::Images);
        assert!(monitor.refresh_in_flight());
        assert!(!monitor.poll_refresh());

        tx.send(snapshot(vec![running("a")], TabData::Nothing)).unwrap();
        assert!(monitor.poll_refresh());
        assert_eq!(monitor.running.len(), 1);
        // Without an engine the queued refresh has nowhere to go.
        assert!(monitor.queued_refresh.is_none());
        assert!(!monitor.refresh_in_flight());
    }

    #[test]
    fn refresh_without_docker_is_noop() {
        let mut monitor = DockerMonitor::detached(runtime());
        monitor.refresh_requested = true;
        monitor.request_refresh(AppView::Containers);
        assert!(!monitor.refresh_in_flight());
        assert!(monitor.refresh_requested);
    }

    #[test]
    fn poll_action_without_pending_is_noop() {
        let mut monitor = DockerMonitor::detached(runtime());
        assert!(!monitor.poll_action());
        assert!(!monitor.refresh_requested);
    }

    #[test]
    fn progress_messages() {
        assert_eq!(
            Action::StopContainer("web".into()).progress_message(),
            "Stopping container web..."
        );
        assert_eq!(
            Action::ComposeUp(PathBuf::from("/srv/app")).progress_message(),
            "Running docker compose up in /srv/app..."
        );
    }

    #[test]
    fn compose_summary_lists_networks() {
        let nets = vec![NetworkInfo {
            name: "app_default".into(),
            containers: vec!["api".into(), "db".into()],
            ..Default::default()
        }];
        assert_eq!(compose_summary(&nets), "Compose up finished: app_default (2 containers)");
        assert!(compose_summary(&[]).contains("no networks"));
    }
}
