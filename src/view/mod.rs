mod shared;
mod tab_bar;
mod containers;
mod images;
mod networks;
mod volumes;
mod metrics;
mod confirmation;

use std::io::{self, Write};
use crossterm::{execute, cursor, queue, style::{Color, SetForegroundColor, ResetColor}, terminal};

use crate::layout::Layout;
use crate::model::{
    AggregateMetrics, AppView, ContainerInfo, ImageInfo, InputMode, ListUIState, MetricsHistory,
    NetworkInfo, StoppedContainerInfo, VolumeInfo,
};

pub use shared::{truncate_str, progress_bar, sparkline};
pub use tab_bar::TabCounts;

pub struct Presenter;

/// Minimum terminal dimensions for usable rendering.
pub const MIN_COLS: u16 = 80;
pub const MIN_ROWS: u16 = 10;

impl Presenter {
    /// Check if the terminal is large enough. If not, render a "too small"
    /// message and return `true` (meaning "skip normal rendering").
    pub fn render_size_guard() -> io::Result<bool> {
        let (cols, rows) = terminal::size()?;
        if cols < MIN_COLS || rows < MIN_ROWS {
            let mut out = std::io::stdout();
            execute!(out, terminal::Clear(terminal::ClearType::All), cursor::MoveTo(0, 0))?;
            let msg = format!(
                "Terminal too small ({}x{}). Resize to at least {}x{}.",
                cols, rows, MIN_COLS, MIN_ROWS
            );
            let y = rows / 2;
            let x = cols.saturating_sub(msg.len() as u16) / 2;
            queue!(out, cursor::MoveTo(x, y), SetForegroundColor(Color::Yellow))?;
            write!(out, "{}", msg)?;
            queue!(out, ResetColor)?;
            out.flush()?;
            return Ok(true);
        }
        Ok(false)
    }

    pub fn render_tab_bar(
        out: &mut impl Write,
        current_view: AppView,
        counts: &TabCounts,
        docker_available: bool,
        time: &str,
    ) -> io::Result<()> {
        tab_bar::render_tab_bar(out, current_view, counts, docker_available, time)
    }

    pub fn render_containers(
        out: &mut impl Write,
        running: &[ContainerInfo],
        stopped: &[StoppedContainerInfo],
        ui_state: &ListUIState,
        status_message: &Option<String>,
    ) -> io::Result<()> {
        containers::render_containers(out, running, stopped, ui_state, status_message)
    }

    pub fn render_images(
        out: &mut impl Write,
        images: &[ImageInfo],
        ui_state: &ListUIState,
        status_message: &Option<String>,
    ) -> io::Result<()> {
        images::render_images(out, images, ui_state, status_message)
    }

    pub fn render_networks(
        out: &mut impl Write,
        networks: &[NetworkInfo],
        ui_state: &ListUIState,
        input_mode: &InputMode,
        status_message: &Option<String>,
    ) -> io::Result<()> {
        networks::render_networks(out, networks, ui_state, input_mode, status_message)
    }

    pub fn render_volumes(
        out: &mut impl Write,
        volumes: &[VolumeInfo],
        ui_state: &ListUIState,
        status_message: &Option<String>,
    ) -> io::Result<()> {
        volumes::render_volumes(out, volumes, ui_state, status_message)
    }

    pub fn render_metrics(
        out: &mut impl Write,
        aggregate: &AggregateMetrics,
        history: &MetricsHistory,
        running: &[ContainerInfo],
        layout: &Layout,
        ui_state: &ListUIState,
        status_message: &Option<String>,
    ) -> io::Result<()> {
        metrics::render_metrics(out, aggregate, history, running, layout, ui_state, status_message)
    }

    pub fn render_confirmation(out: &mut impl Write, prompt: &str) -> io::Result<()> {
        confirmation::render_confirmation(out, prompt)
    }
}
