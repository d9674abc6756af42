use serde::Serialize;
use tokio::sync::broadcast::{self, error::RecvError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropdownKind {
    BusinessType,
    Location,
}

/// Open/closed state of the two single-select dropdowns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Dropdowns {
    business_type_open: bool,
    location_open: bool,
}

impl Dropdowns {
    pub fn is_open(&self, kind: DropdownKind) -> bool {
        match kind {
            DropdownKind::BusinessType => self.business_type_open,
            DropdownKind::Location => self.location_open,
        }
    }

    pub fn toggle(&mut self, kind: DropdownKind) {
        let open = self.slot(kind);
        *open = !*open;
    }

    pub fn close(&mut self, kind: DropdownKind) {
        *self.slot(kind) = false;
    }

    pub fn close_all(&mut self) {
        self.business_type_open = false;
        self.location_open = false;
    }

    fn slot(&mut self, kind: DropdownKind) -> &mut bool {
        match kind {
            DropdownKind::BusinessType => &mut self.business_type_open,
            DropdownKind::Location => &mut self.location_open,
        }
    }
}

/// A click that reached the document, i.e. landed outside every dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentClick;

/// Document-wide click source, owned by the host and handed to the flow.
#[derive(Debug, Clone)]
pub struct DocumentClicks {
    sender: broadcast::Sender<DocumentClick>,
}

impl DocumentClicks {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(16);
        Self { sender }
    }

    /// Returns how many listeners saw the click.
    pub fn publish(&self) -> usize {
        self.sender.send(DocumentClick).unwrap_or(0)
    }

    pub fn listener_count(&self) -> usize {
        self.sender.receiver_count()
    }

    pub fn subscribe(&self) -> OutsideClickSubscription {
        OutsideClickSubscription {
            receiver: self.sender.subscribe(),
        }
    }
}

impl Default for DocumentClicks {
    fn default() -> Self {
        Self::new()
    }
}

/// Live registration for outside clicks. Dropping it unsubscribes.
#[derive(Debug)]
pub struct OutsideClickSubscription {
    receiver: broadcast::Receiver<DocumentClick>,
}

impl OutsideClickSubscription {
    /// Waits for the next outside click. `None` once the source is gone.
    pub async fn next_click(&mut self) -> Option<DocumentClick> {
        match self.receiver.recv().await {
            Ok(click) => Some(click),
            // Missed clicks still mean at least one click happened.
            Err(RecvError::Lagged(_)) => Some(DocumentClick),
            Err(RecvError::Closed) => None,
        }
    }
}
