//! Handle to one live peer connection.
//!
//! A [`ConnectionHandle`] is the registry's view of a connection: its id and
//! the sending half of a bounded outbound frame queue. The transport task
//! owns the receiving half and writes the queued frames to the socket, so a
//! send through the handle never waits on the peer's network.

use tokio::sync::mpsc;

use super::ConnectionId;
use crate::error::RelayError;

/// Cloneable handle used to push text frames to a connection.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    id: ConnectionId,
    outbound: mpsc::Sender<String>,
}

impl ConnectionHandle {
    /// Creates a handle and the receiver its transport task must drain.
    ///
    /// `capacity` is clamped to at least one frame.
    #[must_use]
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<String>) {
        let (outbound, rx) = mpsc::channel(capacity.max(1));
        let handle = Self {
            id: ConnectionId::new(),
            outbound,
        };
        (handle, rx)
    }

    /// Returns the connection id.
    #[must_use]
    pub const fn id(&self) -> ConnectionId {
        self.id
    }

    /// Queues a text frame without waiting.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::PeerBackpressure`] when the queue is full and
    /// [`RelayError::PeerClosed`] when the transport task has gone away.
    pub fn send(&self, frame: impl Into<String>) -> Result<(), RelayError> {
        self.outbound.try_send(frame.into()).map_err(|err| match err {
            mpsc::error::TrySendError::Full(_) => RelayError::PeerBackpressure(self.id),
            mpsc::error::TrySendError::Closed(_) => RelayError::PeerClosed(self.id),
        })
    }

    /// Returns `true` once the transport side has dropped its receiver.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.outbound.is_closed()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn send_reaches_receiver() {
        let (handle, mut rx) = ConnectionHandle::new(4);
        assert!(handle.send("hello").is_ok());
        assert_eq!(rx.recv().await.as_deref(), Some("hello"));
    }

    #[test]
    fn full_queue_reports_backpressure() {
        let (handle, _rx) = ConnectionHandle::new(1);
        assert!(handle.send("a").is_ok());
        let Err(err) = handle.send("b") else {
            panic!("second frame should not fit");
        };
        assert!(matches!(err, RelayError::PeerBackpressure(id) if id == handle.id()));
    }

    #[test]
    fn dropped_receiver_reports_closed() {
        let (handle, rx) = ConnectionHandle::new(4);
        drop(rx);
        assert!(handle.is_closed());
        assert!(matches!(handle.send("x"), Err(RelayError::PeerClosed(_))));
    }
}
