use std::io;

use chrono::Local;
use crossterm::{execute, cursor::MoveTo, terminal::Clear, terminal::ClearType};

use crate::model::AppView;
use crate::view::{Presenter, TabCounts};

use super::App;

pub fn render(app: &mut App) -> io::Result<()> {
    let time_str = Local::now().format("%H:%M:%S").to_string();
    let monitor = &app.docker_monitor;
    let counts = TabCounts {
        running: monitor.running.len(),
        stopped: monitor.stopped.len(),
        images: monitor.images.len(),
        networks: monitor.networks.len(),
        volumes: monitor.volumes.len(),
    };

    let mut out = io::stdout();
    execute!(out, Clear(ClearType::All), MoveTo(0, 0))?;
    Presenter::render_tab_bar(&mut out, app.app_view, &counts, monitor.is_available(), &time_str)?;

    match app.app_view {
        AppView::Containers => Presenter::render_containers(
            &mut out,
            &monitor.running,
            &monitor.stopped,
            &monitor.containers_ui,
            &monitor.status_message,
        )?,
        AppView::Images => Presenter::render_images(
            &mut out,
            &monitor.images,
            &monitor.images_ui,
            &monitor.status_message,
        )?,
        AppView::Networks => Presenter::render_networks(
            &mut out,
            &monitor.networks,
            &monitor.networks_ui,
            &app.input_mode,
            &monitor.status_message,
        )?,
        AppView::Volumes => Presenter::render_volumes(
            &mut out,
            &monitor.volumes,
            &monitor.volumes_ui,
            &monitor.status_message,
        )?,
        AppView::Metrics => Presenter::render_metrics(
            &mut out,
            &monitor.aggregate,
            &monitor.history,
            &monitor.running,
            &monitor.metrics_layout,
            &monitor.metrics_ui,
            &monitor.status_message,
        )?,
    }

    if let Some(ref pa) = app.pending_action {
        Presenter::render_confirmation(&mut out, &pa.description)?;
    }

    Ok(())
}
