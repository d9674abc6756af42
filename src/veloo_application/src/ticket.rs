use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use veloo_core::{GatewayError, GatewayRequest};

static NEXT_TICKET: AtomicU64 = AtomicU64::new(1);

/// Process-unique stamp attached to every gateway call.
///
/// A response is only applied when its ticket is still the one the issuing
/// controller is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestTicket(u64);

impl RequestTicket {
    fn issue() -> Self {
        Self(NEXT_TICKET.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for RequestTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Pending flag for one kind of request.
#[derive(Debug, Default)]
pub struct InFlight {
    current: Option<RequestTicket>,
}

impl InFlight {
    pub fn is_pending(&self) -> bool {
        self.current.is_some()
    }

    /// Marks a request as in flight. Returns `None` while another one is.
    pub fn begin(&mut self) -> Option<RequestTicket> {
        if self.current.is_some() {
            return None;
        }
        let ticket = RequestTicket::issue();
        self.current = Some(ticket);
        Some(ticket)
    }

    /// Clears the flag if `ticket` is the outstanding request.
    ///
    /// This is the only place the flag is cleared after a response, whatever
    /// the outcome. Returns false for stale tickets.
    pub fn settle(&mut self, ticket: RequestTicket) -> bool {
        if self.current == Some(ticket) {
            self.current = None;
            true
        } else {
            false
        }
    }

    /// Forgets the outstanding request so its response will be ignored.
    pub fn abandon(&mut self) {
        self.current = None;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Submit,
    Verify,
    Resend,
}

/// A gateway call a controller wants performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    pub ticket: RequestTicket,
    pub kind: RequestKind,
    pub request: GatewayRequest,
}

/// The outcome of a [`PendingRequest`], fed back to the flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settled {
    pub ticket: RequestTicket,
    pub kind: RequestKind,
    pub outcome: Result<(), GatewayError>,
}

impl PendingRequest {
    pub fn settled(&self, outcome: Result<(), GatewayError>) -> Settled {
        Settled {
            ticket: self.ticket,
            kind: self.kind,
            outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_refuses_while_pending() {
        let mut in_flight = InFlight::default();
        let ticket = in_flight.begin().unwrap();
        assert!(in_flight.is_pending());
        assert!(in_flight.begin().is_none());

        assert!(in_flight.settle(ticket));
        assert!(!in_flight.is_pending());
    }

    #[test]
    fn test_abandoned_ticket_is_stale() {
        let mut in_flight = InFlight::default();
        let old = in_flight.begin().unwrap();
        in_flight.abandon();
        let new = in_flight.begin().unwrap();

        assert_ne!(old, new);
        assert!(!in_flight.settle(old));
        assert!(in_flight.is_pending());
        assert!(in_flight.settle(new));
    }
}
