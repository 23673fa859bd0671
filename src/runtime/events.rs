//! Runtime event stream payloads.

use crate::types::{AuthorId, BookId, CopyId, CopyState, LoanId, ReaderId, SubscriptionId};

/// Events emitted from the single-writer runtime loop after a mutation succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LibraryEvent {
    /// An author was registered.
    AuthorCreated {
        /// New author id.
        id: AuthorId,
    },
    /// A book was registered.
    BookCreated {
        /// New book id.
        id: BookId,
    },
    /// A copy was added to the shelf.
    CopyCreated {
        /// New copy id.
        id: CopyId,
    },
    /// A reader was registered.
    ReaderCreated {
        /// New reader id.
        id: ReaderId,
    },
    /// A copy changed state, through a loan, a return or an override.
    CopyStateChanged {
        /// Affected copy.
        copy_id: CopyId,
        /// State after the change.
        state: CopyState,
    },
    /// A loan was placed.
    LoanPlaced {
        /// New loan id.
        loan_id: LoanId,
        /// Borrowing reader.
        reader_id: ReaderId,
        /// Borrowed copy.
        copy_id: CopyId,
    },
    /// A loan was closed.
    LoanReturned {
        /// Closed loan id.
        loan_id: LoanId,
        /// Whole days late.
        delay_days: u32,
        /// Penalty days charged.
        penalty_days_added: u32,
    },
    /// A reader's penalty was lowered.
    PenaltyReduced {
        /// Affected reader.
        reader_id: ReaderId,
        /// Remaining penalty days.
        penalty_days: u32,
    },
    /// A reader subscribed to a book.
    Subscribed {
        /// New subscription id.
        subscription_id: SubscriptionId,
        /// Subscribed reader.
        reader_id: ReaderId,
        /// Watched book.
        book_id: BookId,
    },
    /// A subscription was removed.
    Unsubscribed {
        /// Removed subscription id.
        subscription_id: SubscriptionId,
    },
    /// Notifications were appended to the log by the last command.
    NotificationsSent {
        /// How many were sent.
        count: usize,
    },
}
