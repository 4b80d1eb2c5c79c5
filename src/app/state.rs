use std::time::{Duration, Instant};

use crate::docker_controller::{Action, ContainerRow, DockerMonitor};
use crate::model::AppView;

/// How long a confirmation prompt stays open.
pub const CONFIRM_TIMEOUT: Duration = Duration::from_secs(5);

/// Pending destructive action awaiting confirmation.
pub struct PendingAction {
    pub description: String,
    pub kind: Action,
    pub expires: Instant,
}

impl PendingAction {
    pub fn new(kind: Action, description: String) -> Self {
        Self {
            description,
            kind,
            expires: Instant::now() + CONFIRM_TIMEOUT,
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now > self.expires
    }
}

/// Confirmation for removing whatever is selected on the current tab.
pub fn removal_for_selection(monitor: &DockerMonitor, view: AppView) -> Option<PendingAction> {
    match view {
        AppView::Containers => {
            let (id, name) = match monitor.selected_container()? {
                ContainerRow::Running(c) => (c.id.clone(), c.name.clone()),
                ContainerRow::Stopped(c) => (c.id.clone(), c.name.clone()),
            };
            Some(PendingAction::new(
                Action::RemoveContainer(id),
                format!("Remove container {}?", name),
            ))
        }
        AppView::Images => {
            let reference = monitor.selected_image()?.reference();
            Some(PendingAction::new(
                Action::RemoveImage(reference.clone()),
                format!("Remove image {}?", reference),
            ))
        }
        AppView::Networks => {
            let name = monitor.selected_network()?.name.clone();
            Some(PendingAction::new(
                Action::RemoveNetwork(name.clone()),
                format!("Delete network {}?", name),
            ))
        }
        AppView::Volumes | AppView::Metrics => None,
    }
}
