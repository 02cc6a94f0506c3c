//! Live status synchronizer: merges the status socket and the status poll
//! into one authoritative snapshot.
//!
//! Precedence: while the socket is `Open` and has delivered at least one
//! valid message on the current connection, the latest socket message wins.
//! Otherwise the latest successful poll wins. Arrival order between the two
//! channels does not matter; only this rule does.
use crate::error::FetchError;
use crate::status::Status;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SocketState {
    #[default]
    Connecting,
    Open,
    Closing,
    Closed,
}

impl SocketState {
    /// Map a `WebSocket.readyState` value.
    pub fn from_ready_state(ready_state: u16) -> Self {
        match ready_state {
            0 => SocketState::Connecting,
            1 => SocketState::Open,
            2 => SocketState::Closing,
            _ => SocketState::Closed,
        }
    }

    #[inline]
    pub fn is_open(self) -> bool {
        self == SocketState::Open
    }
}

/// Everything the resolver needs to know about both channels.
#[derive(Clone, Debug, Default)]
pub struct ChannelState {
    pub socket: SocketState,
    /// Last valid socket message on the current connection.
    pub socket_status: Option<Rc<Status>>,
    /// Last successful poll result. Survives socket reconnects.
    pub polled_status: Option<Rc<Status>>,
}

/// Which channel the current snapshot came from.
#[derive(Clone, Debug, PartialEq)]
pub enum Authoritative {
    Live(Rc<Status>),
    Polled(Rc<Status>),
}

impl Authoritative {
    pub fn status(&self) -> &Rc<Status> {
        match self {
            Authoritative::Live(s) | Authoritative::Polled(s) => s,
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, Authoritative::Live(_))
    }

    fn same_as(&self, other: &Authoritative) -> bool {
        match (self, other) {
            (Authoritative::Live(a), Authoritative::Live(b))
            | (Authoritative::Polled(a), Authoritative::Polled(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Pure precedence rule.
pub fn resolve_authoritative(channels: &ChannelState) -> Option<Authoritative> {
    match (channels.socket, &channels.socket_status) {
        (SocketState::Open, Some(live)) => Some(Authoritative::Live(live.clone())),
        _ => channels.polled_status.clone().map(Authoritative::Polled),
    }
}

#[derive(Debug)]
pub struct StatusSynchronizer {
    channels: ChannelState,
    authoritative: Option<Authoritative>,
    poll_interval_ms: u32,
    version: u64,
    discarded_messages: u64,
}

impl StatusSynchronizer {
    pub fn new(poll_interval_ms: u32) -> Self {
        Self {
            channels: ChannelState::default(),
            authoritative: None,
            poll_interval_ms,
            version: 0,
            discarded_messages: 0,
        }
    }

    pub fn channels(&self) -> &ChannelState {
        &self.channels
    }

    pub fn socket_state(&self) -> SocketState {
        self.channels.socket
    }

    /// Returns `true` when the authoritative snapshot changed.
    pub fn on_socket_state(&mut self, state: SocketState) -> bool {
        if state != self.channels.socket {
            log::info!("[status] socket {:?} -> {:?}", self.channels.socket, state);
        }
        self.channels.socket = state;
        if !state.is_open() {
            // a new connection must deliver its own message before it is trusted
            self.channels.socket_status = None;
        }
        self.reevaluate()
    }

    /// Feed one raw socket frame. Invalid frames are dropped and leave the
    /// current authority untouched.
    pub fn on_socket_message(&mut self, text: &str) -> bool {
        if !self.channels.socket.is_open() {
            log::debug!("[status] socket message while {:?}; ignored", self.channels.socket);
            return false;
        }
        match Status::from_json(text) {
            Ok(status) => {
                self.channels.socket_status = Some(Rc::new(status));
                self.reevaluate()
            }
            Err(e) => {
                self.discarded_messages += 1;
                log::warn!("[status] discarding socket message: {}", e);
                false
            }
        }
    }

    /// Feed one poll completion. Failures keep the previous poll result.
    pub fn on_poll_result(&mut self, result: Result<Status, FetchError>) -> bool {
        match result {
            Ok(status) => {
                self.channels.polled_status = Some(Rc::new(status));
                self.reevaluate()
            }
            Err(e) => {
                log::warn!("[status] poll failed: {}", e);
                false
            }
        }
    }

    fn reevaluate(&mut self) -> bool {
        let next = resolve_authoritative(&self.channels);
        let changed = match (&self.authoritative, &next) {
            (Some(a), Some(b)) => !a.same_as(b),
            (None, None) => false,
            _ => true,
        };
        if changed {
            self.version += 1;
            if let Some(a) = &next {
                log::debug!(
                    "[status] authority -> {} ({})",
                    if a.is_live() { "socket" } else { "poll" },
                    a.status().headline()
                );
            }
        }
        self.authoritative = next;
        changed
    }

    pub fn authoritative(&self) -> Option<&Authoritative> {
        self.authoritative.as_ref()
    }

    /// The current snapshot. Cheap to clone and never partially updated.
    pub fn current(&self) -> Option<Rc<Status>> {
        self.authoritative.as_ref().map(|a| a.status().clone())
    }

    /// `true` while the current snapshot came from the socket. An open
    /// socket that has not delivered a message yet is not live.
    pub fn is_live(&self) -> bool {
        self.authoritative.as_ref().is_some_and(Authoritative::is_live)
    }

    /// Connection state only; polling stops as soon as this holds.
    pub fn socket_open(&self) -> bool {
        self.channels.socket.is_open()
    }

    /// Poll period while the socket is not open; `None` disables polling.
    pub fn poll_interval_ms(&self) -> Option<u32> {
        if self.socket_open() {
            None
        } else {
            Some(self.poll_interval_ms)
        }
    }

    /// Window focus always triggers one refetch; the result only becomes
    /// authoritative if the socket is not live.
    pub fn refetch_on_focus(&self) -> bool {
        true
    }

    /// Bumped every time the authoritative snapshot changes.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn discarded_messages(&self) -> u64 {
        self.discarded_messages
    }
}
