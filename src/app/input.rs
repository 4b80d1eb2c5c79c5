use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::docker_controller::{Action, ContainerRow};
use crate::model::{AppView, InputMode, ListUIState};
use crate::validate::{check_network_removable, validate_network_name};

use super::state::{removal_for_selection, PendingAction};
use super::App;

/// Result of handling a key: Quit the app, or key was consumed (needs render).
/// None means the key was not handled.
pub enum InputResult {
    Quit,
    Consumed,
}

/// Handle a key event. Returns Some(Quit) to exit, Some(Consumed) if key was handled and
/// a render is needed, None if the key was not handled.
pub fn handle_key(app: &mut App, key_event: KeyEvent) -> Option<InputResult> {
    let KeyEvent { code, modifiers, .. } = key_event;

    if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
        return Some(InputResult::Quit);
    }

    if let Some(pa) = app.pending_action.take() {
        if code == KeyCode::Char('y') || code == KeyCode::Char('Y') {
            app.docker_monitor.run_action(pa.kind);
        }
        return Some(InputResult::Consumed);
    }

    if app.input_mode.is_editing() {
        return handle_text_input(app, code);
    }

    match code {
        KeyCode::Char('q') => return Some(InputResult::Quit),
        KeyCode::Tab => {
            app.app_view = app.app_view.next();
            app.docker_monitor.clear_status();
            return Some(InputResult::Consumed);
        }
        KeyCode::BackTab => {
            app.app_view = app.app_view.prev();
            app.docker_monitor.clear_status();
            return Some(InputResult::Consumed);
        }
        KeyCode::Esc => {
            app.docker_monitor.clear_status();
            return Some(InputResult::Consumed);
        }
        KeyCode::Up => return consumed_if(current_ui(app).select_prev()),
        KeyCode::Down => return consumed_if(current_ui(app).select_next()),
        _ => {}
    }

    match app.app_view {
        AppView::Containers => handle_containers(app, code),
        AppView::Images => handle_images(app, code),
        AppView::Networks => handle_networks(app, code),
        AppView::Volumes => handle_volumes(app, code),
        AppView::Metrics => handle_metrics(app, code),
    }
}

fn consumed_if(changed: bool) -> Option<InputResult> {
    changed.then_some(InputResult::Consumed)
}

fn current_ui(app: &mut App) -> &mut ListUIState {
    let monitor = &mut app.docker_monitor;
    match app.app_view {
        AppView::Containers => &mut monitor.containers_ui,
        AppView::Images => &mut monitor.images_ui,
        AppView::Networks => &mut monitor.networks_ui,
        AppView::Volumes => &mut monitor.volumes_ui,
        AppView::Metrics => &mut monitor.metrics_ui,
    }
}

fn confirm_removal(app: &mut App) -> Option<InputResult> {
    app.pending_action = Some(removal_for_selection(&app.docker_monitor, app.app_view)?);
    Some(InputResult::Consumed)
}

fn handle_containers(app: &mut App, code: KeyCode) -> Option<InputResult> {
    let monitor = &mut app.docker_monitor;
    match code {
        KeyCode::Right | KeyCode::Left | KeyCode::Enter => {
            let id = match monitor.selected_container()? {
                ContainerRow::Running(c) => c.id.clone(),
                ContainerRow::Stopped(c) => c.id.clone(),
            };
            monitor.containers_ui.toggle_expanded(&id);
            Some(InputResult::Consumed)
        }
        KeyCode::Char('s') => {
            let action = match monitor.selected_container()? {
                ContainerRow::Stopped(c) => Ok(PendingAction::new(
                    Action::StartContainer(c.id.clone()),
                    format!("Start {}?", c.name),
                )),
                ContainerRow::Running(c) => Err(format!("{} is already running", c.name)),
            };
            confirm_or_report(app, action)
        }
        KeyCode::Char('t') => {
            let action = match monitor.selected_container()? {
                ContainerRow::Running(c) => Ok(PendingAction::new(
                    Action::StopContainer(c.id.clone()),
                    format!("Stop {}?", c.name),
                )),
                ContainerRow::Stopped(c) => Err(format!("{} is not running", c.name)),
            };
            confirm_or_report(app, action)
        }
        KeyCode::Char('d') => confirm_removal(app),
        _ => None,
    }
}

fn handle_volumes(app: &mut App, code: KeyCode) -> Option<InputResult> {
    let monitor = &mut app.docker_monitor;
    match code {
        KeyCode::Right | KeyCode::Left | KeyCode::Enter => {
            let name = monitor.selected_volume()?.name.clone();
            monitor.volumes_ui.toggle_expanded(&name);
            Some(InputResult::Consumed)
        }
        _ => None,
    }
}

fn confirm_or_report(app: &mut App, pending: Result<PendingAction, String>) -> Option<InputResult> {
    match pending {
        Ok(pa) => app.pending_action = Some(pa),
        Err(msg) => app.docker_monitor.status_message = Some(msg),
    }
    Some(InputResult::Consumed)
}

fn handle_images(app: &mut App, code: KeyCode) -> Option<InputResult> {
    match code {
        KeyCode::Char('r') | KeyCode::Enter => {
            let reference = app.docker_monitor.selected_image()?.reference();
            app.pending_action = Some(PendingAction::new(
                Action::RunImage(reference.clone()),
                format!("Run a new container from {}?", reference),
            ));
            Some(InputResult::Consumed)
        }
        KeyCode::Char('d') => confirm_removal(app),
        _ => None,
    }
}

fn handle_networks(app: &mut App, code: KeyCode) -> Option<InputResult> {
    match code {
        KeyCode::Right | KeyCode::Left | KeyCode::Enter => {
            let name = app.docker_monitor.selected_network()?.name.clone();
            app.docker_monitor.networks_ui.toggle_expanded(&name);
            Some(InputResult::Consumed)
        }
        KeyCode::Char('n') => {
            app.input_mode = InputMode::NetworkName(String::new());
            app.docker_monitor.clear_status();
            Some(InputResult::Consumed)
        }
        KeyCode::Char('c') => {
            app.input_mode = InputMode::ComposePath(String::new());
            app.docker_monitor.clear_status();
            Some(InputResult::Consumed)
        }
        KeyCode::Char('d') => {
            let name = app.docker_monitor.selected_network()?.name.clone();
            if let Err(e) = check_network_removable(&name) {
                app.docker_monitor.status_message = Some(format!("Error: {}", e));
                return Some(InputResult::Consumed);
            }
            confirm_removal(app)
        }
        _ => None,
    }
}

fn handle_metrics(app: &mut App, code: KeyCode) -> Option<InputResult> {
    let monitor = &mut app.docker_monitor;
    match code {
        KeyCode::Right | KeyCode::Left | KeyCode::Enter => {
            let id = monitor.metrics_layout.section_at(monitor.metrics_ui.selected_index)?;
            let collapsed = monitor.metrics_layout.is_collapsed(id);
            if (code == KeyCode::Right && !collapsed) || (code == KeyCode::Left && collapsed) {
                return None;
            }
            monitor.metrics_layout.toggle_section(id);
            Some(InputResult::Consumed)
        }
        _ => None,
    }
}

fn handle_text_input(app: &mut App, code: KeyCode) -> Option<InputResult> {
    match code {
        KeyCode::Esc => app.input_mode = InputMode::Normal,
        KeyCode::Backspace => {
            if let Some(buf) = app.input_mode.buffer_mut() {
                buf.pop();
            }
        }
        KeyCode::Char(ch) => {
            if let Some(buf) = app.input_mode.buffer_mut() {
                buf.push(ch);
            }
        }
        KeyCode::Enter => submit_input(app),
        _ => return None,
    }
    Some(InputResult::Consumed)
}

/// Validate the typed value; on error the prompt stays open with the message shown.
fn submit_input(app: &mut App) {
    let monitor = &mut app.docker_monitor;
    match &app.input_mode {
        InputMode::Normal => {}
        InputMode::NetworkName(buf) => {
            let name = buf.trim().to_string();
            let existing = monitor.networks.iter().map(|n| n.name.as_str());
            if let Err(e) = validate_network_name(&name, existing) {
                monitor.status_message = Some(format!("Error: {}", e));
                return;
            }
            app.input_mode = InputMode::Normal;
            monitor.run_action(Action::CreateNetwork(name));
        }
        InputMode::ComposePath(buf) => {
            let path = buf.trim();
            if path.is_empty() {
                monitor.status_message = Some("Error: Please enter a compose directory.".to_string());
                return;
            }
            let dir = PathBuf::from(path);
            app.input_mode = InputMode::Normal;
            monitor.run_action(Action::ComposeUp(dir));
        }
    }
}
