//! Cross-context channel between the design host and the UI frame

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;

use crate::messages::{HostMessage, UiMessage};

/// Host side of the channel: receives [`UiMessage`], sends [`HostMessage`]
pub struct HostEndpoint {
    outbound: UnboundedSender<HostMessage>,
    inbound: UnboundedReceiver<UiMessage>,
}

/// UI side of the channel: receives [`HostMessage`], sends [`UiMessage`]
pub struct UiEndpoint {
    outbound: UnboundedSender<UiMessage>,
    inbound: UnboundedReceiver<HostMessage>,
}

/// Create a connected endpoint pair
pub fn channel() -> (HostEndpoint, UiEndpoint) {
    let (host_tx, ui_rx) = mpsc::unbounded_channel();
    let (ui_tx, host_rx) = mpsc::unbounded_channel();

    (
        HostEndpoint {
            outbound: host_tx,
            inbound: host_rx,
        },
        UiEndpoint {
            outbound: ui_tx,
            inbound: ui_rx,
        },
    )
}

impl HostEndpoint {
    /// Returns false once the UI frame is gone
    pub fn send(&self, message: HostMessage) -> bool {
        self.outbound.send(message).is_ok()
    }

    pub async fn recv(&mut self) -> Option<UiMessage> {
        self.inbound.recv().await
    }

    /// A cloneable sender for progress reporting from inside a run
    pub fn sender(&self) -> UnboundedSender<HostMessage> {
        self.outbound.clone()
    }
}

impl UiEndpoint {
    /// Returns false once the host is gone
    pub fn send(&self, message: UiMessage) -> bool {
        let delivered = self.outbound.send(message).is_ok();
        if !delivered {
            debug!("Host endpoint closed, message dropped");
        }
        delivered
    }

    pub async fn recv(&mut self) -> Option<HostMessage> {
        self.inbound.recv().await
    }
}
