//! Monotonic progress reporting

use tracing::debug;

use crate::messages::HostMessage;

/// Emits `export-progress` messages, never going backwards within a run
pub struct ProgressReporter {
    sink: Box<dyn FnMut(HostMessage) + Send>,
    last: f64,
}

impl ProgressReporter {
    pub fn new(sink: impl FnMut(HostMessage) + Send + 'static) -> Self {
        Self {
            sink: Box::new(sink),
            last: 0.0,
        }
    }

    /// Reporter that forwards into a channel, ignoring a closed receiver
    pub fn to_channel(sender: tokio::sync::mpsc::UnboundedSender<HostMessage>) -> Self {
        Self::new(move |message| {
            if sender.send(message).is_err() {
                debug!("Progress receiver closed");
            }
        })
    }

    /// Report `percent` (clamped to 0..=100 and to the last reported value)
    pub fn report(&mut self, percent: f64, message: impl Into<String>) {
        let percent = percent.clamp(0.0, 100.0).max(self.last);
        self.last = percent;
        (self.sink)(HostMessage::progress(percent, message));
    }

    /// Forward any other message unchanged
    pub fn emit(&mut self, message: HostMessage) {
        (self.sink)(message);
    }

    /// Start a new run from 0
    pub fn reset(&mut self) {
        self.last = 0.0;
    }

    pub fn last(&self) -> f64 {
        self.last
    }
}
