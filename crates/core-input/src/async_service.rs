use crate::key_map::{map_key_event, paste_key};
use core_events::{Event, InputEvent, KeyEvent};
use crossterm::event::Event as CEvent;
use std::io;
use std::sync::Arc;
use tokio::sync::{Notify, mpsc::Sender};
use tokio_stream::StreamExt;
use tracing::{info, trace, warn};

#[derive(Clone, Debug)]
pub struct AsyncInputShutdown {
    notify: Arc<Notify>,
}

impl AsyncInputShutdown {
    pub fn signal(&self) {
        self.notify.notify_one();
    }
}

#[derive(Clone, Debug)]
pub(crate) struct ShutdownListener {
    notify: Arc<Notify>,
}

impl ShutdownListener {
    pub(crate) fn new_pair() -> (AsyncInputShutdown, Self) {
        let notify = Arc::new(Notify::new());
        (
            AsyncInputShutdown {
                notify: notify.clone(),
            },
            ShutdownListener { notify },
        )
    }

    async fn wait(&self) {
        self.notify.notified().await;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ExitReason {
    ShutdownSignal,
    ChannelClosed,
    StreamEnded,
    StreamError,
}

impl ExitReason {
    fn as_str(&self) -> &'static str {
        match self {
            ExitReason::ShutdownSignal => "shutdown_signal",
            ExitReason::ChannelClosed => "channel_closed",
            ExitReason::StreamEnded => "stream_ended",
            ExitReason::StreamError => "stream_error",
        }
    }
}

/// Pump terminal events from `stream` into `sender` until shutdown, channel close or the
/// end of the stream.
pub(crate) struct AsyncEventStreamTask<S>
where
    S: tokio_stream::Stream<Item = io::Result<CEvent>> + Send + Unpin + 'static,
{
    sender: Sender<Event>,
    stream: S,
    shutdown: ShutdownListener,
}

impl<S> AsyncEventStreamTask<S>
where
    S: tokio_stream::Stream<Item = io::Result<CEvent>> + Send + Unpin + 'static,
{
    pub(crate) fn new(sender: Sender<Event>, stream: S, shutdown: ShutdownListener) -> Self {
        Self {
            sender,
            stream,
            shutdown,
        }
    }

    pub(crate) async fn run(mut self) -> ExitReason {
        info!(target: "input.thread", "async_input_task_started");
        let reason = loop {
            let maybe_result = tokio::select! {
                biased;
                _ = self.shutdown.wait() => break ExitReason::ShutdownSignal,
                result = self.stream.next() => result,
            };
            let Some(result) = maybe_result else {
                break ExitReason::StreamEnded;
            };
            let delivered = match result {
                Ok(CEvent::Key(key)) => match map_key_event(&key) {
                    Some(ev) => self.send_key(ev).await,
                    None => true,
                },
                Ok(CEvent::Resize(w, h)) => {
                    trace!(target: "input.event", w, h, "resize");
                    self.send(Event::Input(InputEvent::Resize(w, h))).await
                }
                Ok(CEvent::Paste(data)) => self.send_paste(&data).await,
                Ok(_) => true,
                Err(err) => {
                    warn!(target: "input.thread", error_kind = ?err.kind(), "async_input_task_stream_error");
                    break ExitReason::StreamError;
                }
            };
            if !delivered {
                break ExitReason::ChannelClosed;
            }
        };
        info!(target: "input.thread", reason = reason.as_str(), "async_input_task_stopped");
        reason
    }

    async fn send_key(&mut self, key: KeyEvent) -> bool {
        trace!(target: "input.event", kind = "keypress", key = %key);
        self.send(Event::Input(InputEvent::Key(key))).await
    }

    /// A bracketed paste is replayed as typed keys.
    async fn send_paste(&mut self, data: &str) -> bool {
        // Length only; pasted content stays out of the log.
        trace!(target: "input.paste", len = data.len(), "paste_event");
        for key in data.chars().filter_map(paste_key) {
            if !self.send(Event::Input(InputEvent::Key(key))).await {
                return false;
            }
        }
        true
    }

    async fn send(&self, event: Event) -> bool {
        self.sender.send(event).await.is_ok()
    }
}
