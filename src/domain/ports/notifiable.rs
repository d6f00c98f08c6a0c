//! Notifiable port - capability for receiving notices
//!
//! Publishing is broadcast-and-filter: the hub delivers a notice to
//! every subscriber of an event, and each recipient decides from the
//! notice's target whether it is addressed to them.

use std::fmt;

/// A notice delivered to subscribers when an event fires
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// An overdue return was fined
    FineAssessed {
        member_uid: String,
        book_uid: String,
        amount: f64,
    },
    /// A reserved book is waiting for the front of its queue
    ReservationReady { member_uid: String, book_uid: String },
    /// A membership card has been printed
    CardReady {
        member_uid: String,
        card_number: String,
    },
    /// Broadcast to every subscriber
    Announcement { text: String },
}

impl Notice {
    /// The member this notice is addressed to; `None` means broadcast
    pub fn target(&self) -> Option<&str> {
        match self {
            Notice::FineAssessed { member_uid, .. }
            | Notice::ReservationReady { member_uid, .. }
            | Notice::CardReady { member_uid, .. } => Some(member_uid),
            Notice::Announcement { .. } => None,
        }
    }

    /// Whether a recipient with this uid should act on the notice
    pub fn addressed_to(&self, uid: &str) -> bool {
        match self.target() {
            Some(target) => target == uid,
            None => true,
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::FineAssessed {
                book_uid, amount, ..
            } => write!(f, "overdue fine of {amount:.2} assessed for book '{book_uid}'"),
            Notice::ReservationReady { book_uid, .. } => {
                write!(f, "reserved book '{book_uid}' is ready for collection")
            }
            Notice::CardReady { card_number, .. } => {
                write!(f, "membership card '{card_number}' is ready for collection")
            }
            Notice::Announcement { text } => write!(f, "{text}"),
        }
    }
}

/// Delivery failure reported by a recipient
#[derive(Debug)]
pub enum DeliveryError {
    /// The subscriber uid resolved to nobody
    UnknownRecipient,
    /// The recipient refused the notice
    Refused { reason: String },
}

impl fmt::Display for DeliveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryError::UnknownRecipient => write!(f, "recipient is not registered"),
            DeliveryError::Refused { reason } => write!(f, "delivery refused: {reason}"),
        }
    }
}

impl std::error::Error for DeliveryError {}

/// Capability for receiving notices
pub trait Notifiable {
    /// Uid the hub subscribes this recipient under
    fn uid(&self) -> &str;

    /// Handle one notice; recipients filter on `addressed_to` themselves
    fn notify(&self, notice: &Notice) -> Result<(), DeliveryError>;
}

/// Resolves subscriber uids to recipients at publish time
pub trait NotifiableDirectory {
    fn notifiable(&self, uid: &str) -> Option<&dyn Notifiable>;
}
