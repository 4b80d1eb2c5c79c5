use std::io;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use clap::Parser;
use signal_hook::consts::{SIGINT, SIGTERM};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use dockdash::app;
use dockdash::config::{Cli, Command};
use dockdash::server;

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("dockdash=info"))
}

/// The terminal owns stdout, so logs go to a daily file instead.
fn init_file_logging(cli: &Cli) -> WorkerGuard {
    let appender = tracing_appender::rolling::daily(cli.log_dir(), "dockdash.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(writer)
        .with_ansi(false)
        .init();
    guard
}

fn init_stdout_logging() {
    tracing_subscriber::fmt().with_env_filter(env_filter()).init();
}

fn run_terminal(cli: &Cli) -> io::Result<()> {
    let _guard = init_file_logging(cli);

    let should_quit = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register(SIGINT, Arc::clone(&should_quit))?;
    signal_hook::flag::register(SIGTERM, Arc::clone(&should_quit))?;

    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        app::restore_terminal();
        default_hook(panic_info);
    }));

    info!(interval = cli.interval, "starting terminal dashboard");
    app::run(should_quit, cli.tick_rate())
}

fn run_server(cli: &Cli, bind: std::net::SocketAddr, history: usize) -> io::Result<()> {
    init_stdout_logging();
    let rt = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;
    rt.block_on(server::serve(bind, cli.tick_rate(), history))
        .map_err(io::Error::other)
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    match &cli.command {
        Some(Command::Serve { bind, history }) => run_server(&cli, *bind, *history),
        None => run_terminal(&cli),
    }
}
