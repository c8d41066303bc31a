//! Domain events, fanned out over a tokio channel and logged by a background
//! processor. Handlers never block on event delivery; a full channel drops
//! the event with a warning.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::entities::voucher::VoucherType;

// Define the various events that can occur in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    // Voucher events
    VoucherCreated {
        voucher_id: i32,
        voucher_type: VoucherType,
        transaction_number: String,
    },
    VoucherUpdated {
        voucher_id: i32,
        voucher_type: VoucherType,
    },
    VoucherDeleted {
        voucher_id: i32,
        transaction_number: String,
    },

    // Master data lifecycle
    CustomerCreated(i32),
    CustomerDeactivated(i32),
    ItemCreated(i32),
    ItemDeactivated(i32),
    BankCreated(i32),
    BankDeactivated(i32),
    ProjectCreated(i32),
    ProjectDeactivated(i32),
    ExpenseHeadCreated(i32),
    ExpenseHeadDeactivated(i32),

    // Cash drawer
    CashAdjusted {
        adjustment_id: i32,
        reference_number: String,
    },

    // Auth
    UserLoggedIn(i32),
    UserCreated(i32),
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }

    /// Best-effort send used on hot paths; drops the event when the channel
    /// is full rather than applying backpressure to the request.
    pub fn send_or_log(&self, event: Event) {
        if let Err(e) = self.sender.try_send(event) {
            warn!("Dropping domain event: {}", e);
        }
    }
}

/// Background task draining the event channel.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>) {
    info!("Event processor started");
    while let Some(event) = receiver.recv().await {
        match &event {
            Event::VoucherCreated {
                voucher_id,
                voucher_type,
                transaction_number,
            } => {
                info!(
                    voucher_id,
                    %voucher_type,
                    transaction_number,
                    "Voucher created"
                );
            }
            Event::VoucherUpdated {
                voucher_id,
                voucher_type,
            } => {
                info!(voucher_id, %voucher_type, "Voucher updated");
            }
            Event::VoucherDeleted {
                voucher_id,
                transaction_number,
            } => {
                info!(voucher_id, transaction_number, "Voucher deleted");
            }
            other => {
                info!(event = ?other, "Domain event");
            }
        }
    }
    info!("Event processor stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn events_flow_through_the_channel() {
        let (tx, mut rx) = mpsc::channel(4);
        let sender = EventSender::new(tx);

        sender
            .send(Event::VoucherCreated {
                voucher_id: 1,
                voucher_type: VoucherType::Sale,
                transaction_number: "SAL-1".into(),
            })
            .await
            .unwrap();

        match rx.recv().await {
            Some(Event::VoucherCreated { voucher_id, .. }) => assert_eq!(voucher_id, 1),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn send_or_log_drops_when_full_without_panicking() {
        let (tx, _rx) = mpsc::channel(1);
        let sender = EventSender::new(tx);
        sender.send_or_log(Event::UserLoggedIn(1));
        // Channel now full; second send is dropped, not an error
        sender.send_or_log(Event::UserLoggedIn(2));
    }
}
