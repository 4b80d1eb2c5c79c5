mod state;
mod event_loop;
mod render;
mod input;

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, Clear, ClearType},
};
use tracing::info;

use crate::docker_controller::DockerMonitor;
use crate::model::{AppView, InputMode};
use crate::view::Presenter;

pub use state::{PendingAction, CONFIRM_TIMEOUT, removal_for_selection};
pub use input::{handle_key, InputResult};

/// Restore the terminal to normal mode. Safe to call multiple times.
pub fn restore_terminal() {
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
    let _ = disable_raw_mode();
}

/// Main application state and event loop.
pub struct App {
    pub docker_monitor: DockerMonitor,
    pub app_view: AppView,
    pub prev_app_view: AppView,
    pub pending_action: Option<PendingAction>,
    pub input_mode: InputMode,
    pub last_tick: Instant,
    pub last_tab_refresh: Instant,
    pub tick_rate: Duration,
    pub min_refresh_interval: Duration,
}

impl App {
    pub fn new(rt: Arc<tokio::runtime::Runtime>, tick_rate: Duration) -> Self {
        Self::with_monitor(DockerMonitor::new(rt), tick_rate)
    }

    pub fn with_monitor(docker_monitor: DockerMonitor, tick_rate: Duration) -> Self {
        let now = Instant::now();
        Self {
            docker_monitor,
            app_view: AppView::Containers,
            prev_app_view: AppView::Containers,
            pending_action: None,
            input_mode: InputMode::Normal,
            last_tick: now.checked_sub(tick_rate).unwrap_or(now),
            last_tab_refresh: now,
            tick_rate,
            min_refresh_interval: Duration::from_millis(500),
        }
    }
}

/// Runs its closure when dropped, so the terminal is restored on every way out of [`run`].
struct RestoreGuard<F: FnMut()>(F);

impl<F: FnMut()> Drop for RestoreGuard<F> {
    fn drop(&mut self) {
        (self.0)()
    }
}

/// Route one terminal event. A resize counts as consumed so the screen is redrawn.
fn dispatch_event(app: &mut App, event: Event) -> Option<InputResult> {
    match event {
        Event::Key(key_event) => handle_key(app, key_event),
        Event::Resize(_, _) => Some(InputResult::Consumed),
        _ => None,
    }
}

/// Run the application. Sets up terminal, runs the main loop, restores terminal on exit.
pub fn run(should_quit: Arc<AtomicBool>, tick_rate: Duration) -> io::Result<()> {
    let rt = Arc::new(
        tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .worker_threads(2)
            .build()?,
    );

    let mut app = App::new(Arc::clone(&rt), tick_rate);
    info!(available = app.docker_monitor.is_available(), "dashboard starting");

    enable_raw_mode()?;
    let _restore = RestoreGuard(restore_terminal);
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, Clear(ClearType::All))?;

    let mut needs_render = true;

    loop {
        if should_quit.load(Ordering::Relaxed) {
            break;
        }

        let now = Instant::now();

        if app.expire_pending_action() {
            needs_render = true;
        }
        if app.process_tick() {
            needs_render = true;
        }
        if app.poll_refresh() {
            needs_render = true;
        }
        if app.poll_actions() {
            needs_render = true;
        }
        if app.refresh_on_tab_switch() {
            needs_render = true;
        }

        if needs_render {
            needs_render = false;
            if !Presenter::render_size_guard()? {
                render::render(&mut app)?;
            }
        }

        let timeout = app.tick_rate.saturating_sub(now.elapsed());
        if event::poll(timeout.min(Duration::from_millis(100)))? {
            match dispatch_event(&mut app, event::read()?) {
                Some(InputResult::Quit) => break,
                Some(InputResult::Consumed) => needs_render = true,
                None => {}
            }
        }
    }

    info!("dashboard stopped");
    Ok(())
}
