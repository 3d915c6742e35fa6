use {
    crate::models::UserId,
    serde::Serialize,
    tokio::sync::broadcast,
    uuid::Uuid,
};

pub const NOTIFICATIONS_CHAN_LEN: usize = 1000;

/// Fire-and-forget events for the notification collaborator. Delivery and
/// retry are the collaborator's responsibility; workflows never block on a
/// receiver, and a lagging or absent receiver never fails an operation.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NotificationEvent {
    BidReceived {
        recipient: UserId,
        tender_id: Uuid,
        bid_id:    Uuid,
        message:   String,
    },
    BidSubmitted {
        recipient: UserId,
        tender_id: Uuid,
        bid_id:    Uuid,
        message:   String,
    },
    TenderAwarded {
        recipient: UserId,
        tender_id: Uuid,
        bid_id:    Uuid,
        message:   String,
    },
    TenderLost {
        recipient: UserId,
        tender_id: Uuid,
        bid_id:    Uuid,
        message:   String,
    },
    PrivateInvite {
        recipient: UserId,
        tender_id: Uuid,
        message:   String,
    },
}

impl NotificationEvent {
    pub fn recipient(&self) -> UserId {
        match self {
            NotificationEvent::BidReceived { recipient, .. }
            | NotificationEvent::BidSubmitted { recipient, .. }
            | NotificationEvent::TenderAwarded { recipient, .. }
            | NotificationEvent::TenderLost { recipient, .. }
            | NotificationEvent::PrivateInvite { recipient, .. } => *recipient,
        }
    }
}

pub fn channel() -> (
    broadcast::Sender<NotificationEvent>,
    broadcast::Receiver<NotificationEvent>,
) {
    broadcast::channel(NOTIFICATIONS_CHAN_LEN)
}
