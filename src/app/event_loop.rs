use std::time::Instant;

use super::App;

impl App {
    /// Process tick-based data refresh. The engine is read in the background;
    /// [`App::poll_refresh`] picks up the result.
    pub fn process_tick(&mut self) -> bool {
        let now = Instant::now();
        if now.duration_since(self.last_tick) < self.tick_rate {
            return false;
        }

        if self.docker_monitor.is_available() {
            self.docker_monitor.request_refresh(self.app_view);
        }

        self.last_tick = now;
        true
    }

    /// Poll background actions, refreshing straight away once one lands.
    pub fn poll_actions(&mut self) -> bool {
        if !(self.docker_monitor.action_in_progress && self.docker_monitor.poll_action()) {
            return false;
        }
        if self.docker_monitor.refresh_requested {
            self.docker_monitor.request_refresh(self.app_view);
            self.last_tick = Instant::now();
        }
        true
    }

    /// Apply a background refresh that has landed.
    pub fn poll_refresh(&mut self) -> bool {
        self.docker_monitor.poll_refresh()
    }

    /// Immediate refresh on tab switch.
    pub fn refresh_on_tab_switch(&mut self) -> bool {
        let now = Instant::now();
        if self.app_view != self.prev_app_view {
            let since_last = now.duration_since(self.last_tab_refresh);
            if since_last >= self.min_refresh_interval && self.docker_monitor.is_available() {
                self.docker_monitor.request_refresh(self.app_view);
                self.last_tab_refresh = now;
            }
            self.prev_app_view = self.app_view;
            return true;
        }
        false
    }

    /// Expire pending confirmation if timed out.
    pub fn expire_pending_action(&mut self) -> bool {
        if let Some(ref pa) = self.pending_action {
            if pa.is_expired(Instant::now()) {
                self.pending_action = None;
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use crate::app::{App, PendingAction};
    use crate::docker_controller::{Action, DockerMonitor};
    use crate::model::AppView;

    fn app() -> App {
        let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let rt = Arc::new(rt);
        App::with_monitor(DockerMonitor::detached(rt), Duration::from_secs(3))
    }

    #[test]
    fn tab_switch_triggers_render_once() {
        let mut app = app();
        assert!(!app.refresh_on_tab_switch());
        app.app_view = AppView::Images;
        assert!(app.refresh_on_tab_switch());
        assert!(!app.refresh_on_tab_switch());
    }

    #[test]
    fn expired_confirmation_is_dropped() {
        let mut app = app();
        let mut pa = PendingAction::new(Action::RemoveContainer("abc".into()), "Remove?".into());
        pa.expires -= Duration::from_secs(10);
        app.pending_action = Some(pa);
        assert!(app.expire_pending_action());
        assert!(app.pending_action.is_none());
        assert!(!app.expire_pending_action());
    }

    #[test]
    fn nothing_to_apply_without_a_refresh() {
        let mut app = app();
        assert!(app.process_tick());
        assert!(!app.poll_refresh());
        assert!(app.docker_monitor.running.is_empty());
    }

    #[test]
    fn first_tick_is_due_immediately() {
        let mut app = app();
        assert!(app.process_tick());
        assert!(!app.process_tick());
    }
}
