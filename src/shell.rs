// Outbound signals to the host shell.
//
// The controller never talks to the process supervisor directly: it
// writes `ShellSignal`s into a sink and whoever hosts it decides what a
// `progress` or `quit` means (terminal title, exiting the event loop, a
// JSON line for an external supervisor).

use serde::{Deserialize, Serialize};
use std::io::Write;
use std::sync::mpsc::Sender;
use tracing::{debug, warn};

/// Named signal emitted to the host shell.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(tag = "event", content = "payload", rename_all = "lowercase")]
pub enum ShellSignal {
    /// Upload progress, always a multiple of ten.
    Progress { progress: u8 },
    Quit,
}

/// Destination for shell signals. Emitting is fire-and-forget.
pub trait ShellSink: Send {
    fn emit(&mut self, signal: ShellSignal);
}

/// Forwards signals into an event loop channel.
pub struct ChannelSink<T> {
    tx: Sender<T>,
}

impl<T> ChannelSink<T> {
    pub fn new(tx: Sender<T>) -> Self {
        ChannelSink { tx }
    }
}

impl<T> ShellSink for ChannelSink<T>
where
    T: From<ShellSignal> + Send,
{
    fn emit(&mut self, signal: ShellSignal) {
        if self.tx.send(T::from(signal)).is_err() {
            debug!(?signal, "shell channel closed, dropping signal");
        }
    }
}

/// Writes one JSON object per line, e.g. `{"event":"quit"}`.
pub struct JsonLinesSink<W> {
    out: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        JsonLinesSink { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> ShellSink for JsonLinesSink<W> {
    fn emit(&mut self, signal: ShellSignal) {
        let written = serde_json::to_writer(&mut self.out, &signal)
            .map_err(std::io::Error::from)
            .and_then(|_| self.out.write_all(b"\n"))
            .and_then(|_| self.out.flush());
        if let Err(e) = written {
            warn!("Failed to write shell signal: {e}");
        }
    }
}

/// Sink for hosts that have nobody listening; signals only reach the log.
#[derive(Default)]
pub struct LogSink;

impl ShellSink for LogSink {
    fn emit(&mut self, signal: ShellSignal) {
        debug!(?signal, "shell signal");
    }
}
