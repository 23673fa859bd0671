//! Shared primitive IDs and lending enums.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Monotonic author identifier.
pub type AuthorId = u64;
/// Monotonic book identifier.
pub type BookId = u64;
/// Monotonic copy identifier.
pub type CopyId = u64;
/// Monotonic reader identifier.
pub type ReaderId = u64;
/// Monotonic loan identifier.
pub type LoanId = u64;
/// Monotonic subscription identifier.
pub type SubscriptionId = u64;

/// Physical state of a lendable copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CopyState {
    /// On the shelf and available for loan.
    #[default]
    InLibrary,
    /// Out with a reader.
    Loaned,
    /// Held for someone.
    Reserved,
    /// Past its due date.
    Overdue,
    /// Being repaired.
    InRepair,
}

impl CopyState {
    /// Wire name of the state.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InLibrary => "IN_LIBRARY",
            Self::Loaned => "LOANED",
            Self::Reserved => "RESERVED",
            Self::Overdue => "OVERDUE",
            Self::InRepair => "IN_REPAIR",
        }
    }
}

impl fmt::Display for CopyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entity kinds that can be referenced by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Entity {
    /// An author.
    Author,
    /// A book.
    Book,
    /// A physical copy.
    Copy,
    /// A reader.
    Reader,
    /// A loan.
    Loan,
    /// A subscription.
    Subscription,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::Author => "Autor no encontrado",
            Self::Book => "Libro no encontrado",
            Self::Copy => "Copia no encontrada",
            Self::Reader => "Lector no encontrado",
            Self::Loan => "Préstamo no encontrado",
            Self::Subscription => "Suscripción no encontrada",
        };
        f.write_str(msg)
    }
}
