use {
    std::fmt::{
        Display,
        Formatter,
    },
    time::OffsetDateTime,
};

/// Business-rule refusals surfaced to the caller. Infrastructure failures
/// (storage unavailable) are collapsed into `TemporarilyUnavailable` so they
/// can be retried by the transport layer instead of being mistaken for a
/// caller error.
#[derive(Clone, Debug, PartialEq)]
pub enum CoreError {
    /// The referenced tender does not exist
    TenderNotFound,
    /// The referenced bid does not exist
    BidNotFound,
    /// The actor lacks ownership or role for the requested operation
    Forbidden,
    /// The operation is not legal in the entity's current status
    InvalidState(String),
    /// The tender is no longer accepting bids
    TenderClosed,
    /// A sealed tender cannot be awarded before its closing time
    TooEarly { closes_at: OffsetDateTime },
    /// The vendor already holds a bid on this tender
    DuplicateBid,
    /// The nominated winning bid is not awardable
    InvalidBid(String),
    /// Field-level validation failure
    InvalidInput(String),
    /// Structural conflict, e.g. editing a tender that already has bids
    Conflict(String),
    /// Transient storage failure, retryable by the caller
    TemporarilyUnavailable,
}

impl Display for CoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CoreError::TenderNotFound => write!(f, "Tender with the specified id was not found"),
            CoreError::BidNotFound => write!(f, "Bid with the specified id was not found"),
            CoreError::Forbidden => write!(f, "Not authorized to perform this operation"),
            CoreError::InvalidState(msg) => write!(f, "Invalid state: {}", msg),
            CoreError::TenderClosed => write!(f, "This tender is not accepting bids"),
            CoreError::TooEarly { closes_at } => write!(
                f,
                "Sealed tenders cannot be awarded before the closing time: {}",
                closes_at
            ),
            CoreError::DuplicateBid => {
                write!(f, "You have already submitted a bid for this tender")
            }
            CoreError::InvalidBid(msg) => write!(f, "Invalid bid: {}", msg),
            CoreError::InvalidInput(msg) => write!(f, "Bad parameters: {}", msg),
            CoreError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            CoreError::TemporarilyUnavailable => {
                write!(f, "This service is temporarily unavailable")
            }
        }
    }
}

impl std::error::Error for CoreError {}
