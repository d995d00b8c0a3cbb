//! vix entrypoint.
mod render;

use anyhow::Result;
use clap::Parser;
use core_actions::{FsStore, Session};
use core_config::{EditorOptions, load_from};
use core_events::{EVENT_CHANNEL_CAP, Event, EventSourceRegistry, InputEvent, KeyEvent};
use core_input::{AsyncInputShutdown, TerminalInputSource};
use core_terminal::{CrosstermBackend, TerminalBackend, TerminalGuard};
use core_text::Buffer;
use render::Viewport;
use std::fmt;
use std::io::stdout;
use std::path::{Path, PathBuf};
use std::sync::Once;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, trace, warn};
use tracing_appender::non_blocking::WorkerGuard;

const LOG_FILE: &str = "vix.log";

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "vix", version, about = "A small modal text editor")]
struct Args {
    /// File to edit. A missing file opens empty and is created on the first `:w`.
    pub path: Option<PathBuf>,
    /// Configuration file (overrides discovery of `vix.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
}

fn configure_logging() -> Option<WorkerGuard> {
    let log_dir = Path::new(".");
    let log_path = log_dir.join(LOG_FILE);
    if log_path.exists() {
        let _ = std::fs::remove_file(&log_path);
    }

    let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(nb_writer)
        .try_init()
        .ok()
        // A subscriber was already installed; dropping the guard stops our writer.
        .map(|_| guard)
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            core_terminal::restore_terminal();
            error!(target: "runtime.panic", ?info, "panic");
            default_panic(info);
        }));
    });
}

fn open_session(args: &Args, options: EditorOptions) -> Result<Session> {
    let store = Box::new(FsStore);
    let session = match &args.path {
        Some(path) => Session::open(path, options, store)?,
        None => Session::new(Buffer::new(), options, store),
    };
    info!(
        target: "runtime.startup",
        path = args.path.as_ref().map(|p| p.display().to_string()).as_deref(),
        lines = session.state().buffer().line_count(),
        config_override = args.config.is_some(),
        tab_width = options.tab_width,
        undo_levels = options.undo_levels,
        "bootstrap_complete"
    );
    Ok(session)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShutdownReason {
    CommandQuit,
    ShutdownEvent,
    ChannelClosed,
}

impl ShutdownReason {
    fn as_str(&self) -> &'static str {
        match self {
            ShutdownReason::CommandQuit => "command_quit",
            ShutdownReason::ShutdownEvent => "shutdown_event",
            ShutdownReason::ChannelClosed => "channel_closed",
        }
    }
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

enum LoopControl {
    Continue { repaint: bool },
    Break { reason: ShutdownReason },
}

fn log_shutdown_stage(reason: ShutdownReason, stage: &'static str) {
    info!(
        target: "runtime.shutdown",
        reason = reason.as_str(),
        stage = stage,
        "shutdown_stage"
    );
}

struct EditorRuntime<'a> {
    session: Session,
    viewport: Viewport,
    size: (u16, u16),
    rx: mpsc::Receiver<Event>,
    tx: Option<mpsc::Sender<Event>>,
    source_handles: Vec<tokio::task::JoinHandle<()>>,
    input_shutdown: Option<AsyncInputShutdown>,
    _terminal_guard: TerminalGuard<'a>,
}

impl<'a> EditorRuntime<'a> {
    fn new(
        mut session: Session,
        terminal_guard: TerminalGuard<'a>,
        tx: mpsc::Sender<Event>,
        rx: mpsc::Receiver<Event>,
        source_handles: Vec<tokio::task::JoinHandle<()>>,
        input_shutdown: AsyncInputShutdown,
    ) -> Self {
        let size = crossterm::terminal::size().unwrap_or((80, 24));
        let viewport = Viewport::for_terminal(size.1);
        session.set_view_rows(viewport.height);
        Self {
            session,
            viewport,
            size,
            rx,
            tx: Some(tx),
            source_handles,
            input_shutdown: Some(input_shutdown),
            _terminal_guard: terminal_guard,
        }
    }

    async fn run(&mut self) -> Result<()> {
        self.repaint();

        let loop_span = tracing::debug_span!(target: "runtime", "event_loop");
        let _enter_loop = loop_span.enter();

        let mut shutdown_reason = ShutdownReason::ChannelClosed;
        while let Some(event) = self.rx.recv().await {
            let control = match &event {
                Event::Input(InputEvent::Key(key)) => self.handle_key(*key),
                Event::Input(InputEvent::Resize(w, h)) => self.handle_resize(*w, *h),
                Event::Shutdown => LoopControl::Break {
                    reason: ShutdownReason::ShutdownEvent,
                },
            };
            match control {
                LoopControl::Break { reason } => {
                    shutdown_reason = reason;
                    break;
                }
                LoopControl::Continue { repaint: true } => self.repaint(),
                LoopControl::Continue { repaint: false } => {}
            }
        }

        self.rx.close();
        self.finalize_shutdown(shutdown_reason).await;
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) -> LoopControl {
        match self.session.handle_key(key) {
            Ok(result) if result.quit => LoopControl::Break {
                reason: ShutdownReason::CommandQuit,
            },
            Ok(result) => LoopControl::Continue {
                repaint: result.dirty || !self.session.is_pending(),
            },
            // The session already put the message in the status line.
            Err(_) => LoopControl::Continue { repaint: true },
        }
    }

    fn handle_resize(&mut self, width: u16, height: u16) -> LoopControl {
        trace!(target: "runtime", width, height, "resize");
        self.size = (width, height);
        self.viewport.resize(height);
        self.session.set_view_rows(self.viewport.height);
        LoopControl::Continue { repaint: true }
    }

    fn repaint(&mut self) {
        let snap = self.session.snapshot();
        self.viewport.follow(snap.cursor.line);
        let tab_width = self.session.options().tab_width;
        let mut out = stdout().lock();
        if let Err(e) = render::paint(&mut out, &snap, &self.viewport, self.size, tab_width) {
            error!(target: "runtime", ?e, "render_error");
        }
    }

    async fn finalize_shutdown(&mut self, reason: ShutdownReason) {
        log_shutdown_stage(reason, "begin");
        if let Some(tx) = self.tx.take() {
            trace!(
                target: "runtime.shutdown",
                reason = reason.as_str(),
                "dropping_runtime_sender"
            );
            drop(tx);
        }

        // The input task may be parked on the terminal; wake it before joining.
        if let Some(shutdown) = self.input_shutdown.take() {
            trace!(
                target: "runtime.shutdown",
                reason = reason.as_str(),
                "input_task_shutdown_signal"
            );
            shutdown.signal();
        }

        while let Some(handle) = self.source_handles.pop() {
            match tokio::time::timeout(Duration::from_millis(200), handle).await {
                Ok(Ok(_)) => trace!(
                    target: "runtime.shutdown",
                    reason = reason.as_str(),
                    "event_source_task_stopped"
                ),
                Ok(Err(err)) if err.is_cancelled() => trace!(
                    target: "runtime.shutdown",
                    reason = reason.as_str(),
                    "event_source_task_cancelled"
                ),
                Ok(Err(err)) => error!(
                    target: "runtime.shutdown",
                    reason = reason.as_str(),
                    ?err,
                    "event_source_task_error"
                ),
                Err(_) => warn!(
                    target: "runtime.shutdown",
                    reason = reason.as_str(),
                    "event_source_task_timeout"
                ),
            }
        }

        log_shutdown_stage(reason, "complete");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = configure_logging();
    install_panic_hook();
    info!(target: "runtime", "startup");

    let options = load_from(args.config.clone())?.effective();
    let session = open_session(&args, options)?;

    let mut backend = CrosstermBackend::new();
    backend.set_title("vix")?;
    let guard = backend.enter_guard()?;

    let (tx, rx) = mpsc::channel::<Event>(EVENT_CHANNEL_CAP);
    let (input, input_shutdown) = TerminalInputSource::new();
    let mut registry = EventSourceRegistry::new();
    registry.register(input);
    let source_handles = registry.spawn_all(&tx);

    let mut runtime = EditorRuntime::new(session, guard, tx, rx, source_handles, input_shutdown);
    runtime.run().await
}
