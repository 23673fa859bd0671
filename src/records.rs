//! Library domain records and the drafts used to create them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::types::{AuthorId, BookId, CopyId, CopyState, LoanId, ReaderId, SubscriptionId};

/// Author of one or more books.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorRecord {
    /// Stable author identifier.
    pub id: AuthorId,
    /// Display name.
    pub name: String,
    /// Date of birth.
    pub birth_date: NaiveDate,
}

/// Bibliographic entry; lendable through its copies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRecord {
    /// Stable book identifier.
    pub id: BookId,
    /// Title.
    pub name: String,
    /// Publication year.
    pub year: i32,
    /// Author that wrote the book.
    pub author_id: AuthorId,
}

/// One physical instance of a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyRecord {
    /// Stable copy identifier.
    pub id: CopyId,
    /// Book this copy belongs to.
    pub book_id: BookId,
    /// Current state.
    pub state: CopyState,
}

/// Registered library user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReaderRecord {
    /// Stable reader identifier.
    pub id: ReaderId,
    /// Display name.
    pub name: String,
    /// Address notifications are sent to.
    pub email: String,
    /// Outstanding penalty; blocks new loans while positive.
    pub penalty_days: u32,
}

/// Loan of one copy to one reader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanRecord {
    /// Stable loan identifier.
    pub id: LoanId,
    /// Borrowing reader.
    pub reader_id: ReaderId,
    /// Borrowed copy.
    pub copy_id: CopyId,
    /// When the loan was placed.
    pub loan_time: DateTime<Utc>,
    /// When the copy is expected back.
    pub due_time: DateTime<Utc>,
    /// When the copy came back; `None` while the loan is active.
    pub return_time: Option<DateTime<Utc>>,
}

impl LoanRecord {
    /// True while the copy has not been returned.
    pub fn is_active(&self) -> bool {
        self.return_time.is_none()
    }
}

/// Standing request to hear about a book coming back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionRecord {
    /// Stable subscription identifier.
    pub id: SubscriptionId,
    /// Subscribed reader.
    pub reader_id: ReaderId,
    /// Watched book.
    pub book_id: BookId,
    /// When the subscription was made.
    pub subscribed_time: DateTime<Utc>,
}

/// Insert payload for [`AuthorRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct AuthorDraft {
    /// Display name.
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    /// Date of birth.
    pub birth_date: NaiveDate,
}

/// Insert payload for [`BookRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct BookDraft {
    /// Title.
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    /// Publication year.
    pub year: i32,
    /// Author that wrote the book.
    pub author_id: AuthorId,
}

/// Insert payload for [`ReaderRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ReaderDraft {
    /// Display name.
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    /// Address notifications are sent to.
    #[validate(
        email(message = "is not a valid email address"),
        custom(function = "dotted_domain")
    )]
    pub email: String,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}

// `email` alone accepts single-label hosts such as `user@localhost`.
fn dotted_domain(value: &str) -> Result<(), ValidationError> {
    match value.rsplit_once('@') {
        Some((_, domain)) if domain.contains('.') => Ok(()),
        _ => {
            let mut err = ValidationError::new("email_domain");
            err.message = Some("domain must contain a dot".into());
            Err(err)
        }
    }
}
