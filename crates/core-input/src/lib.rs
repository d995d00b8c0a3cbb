//! Terminal input source for the host runtime.
//!
//! Reads `crossterm::EventStream` on a tokio task and forwards key, resize and paste
//! events as `core_events::Event`s. Registered with the `EventSourceRegistry` like any
//! other async source.

mod async_service;
mod key_map;

pub use async_service::AsyncInputShutdown;

use async_service::{AsyncEventStreamTask, ShutdownListener};
use core_events::{AsyncEventSource, Event};
use crossterm::event::EventStream;
use tokio::sync::mpsc::Sender;
use tokio::task::JoinHandle;
use tracing::Instrument;

/// Keyboard and terminal events from the controlling terminal.
pub struct TerminalInputSource {
    listener: ShutdownListener,
}

impl TerminalInputSource {
    /// Build the source together with a handle that stops it early.
    pub fn new() -> (Self, AsyncInputShutdown) {
        let (shutdown, listener) = ShutdownListener::new_pair();
        (Self { listener }, shutdown)
    }
}

impl AsyncEventSource for TerminalInputSource {
    fn name(&self) -> &'static str {
        "terminal_input"
    }

    fn spawn(self: Box<Self>, tx: Sender<Event>) -> JoinHandle<()> {
        let listener = self.listener;
        let span = tracing::debug_span!(target: "input.thread", "input_async_task");
        tokio::spawn(
            async move {
                AsyncEventStreamTask::new(tx, EventStream::new(), listener)
                    .run()
                    .await;
            }
            .instrument(span),
        )
    }
}
