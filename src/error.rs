//! Error types shared by the store, the loan engine and the runtime.

use thiserror::Error;
use validator::ValidationErrors;

use crate::types::{CopyState, Entity};

/// Result alias for library operations.
pub type LibraryResult<T> = Result<T, LibraryError>;

/// Terminal outcome of a failed library operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LibraryError {
    /// A referenced id does not exist.
    #[error("{0}")]
    NotFound(Entity),
    /// A lending precondition was violated.
    #[error("{0}")]
    InvalidState(Rejection),
    /// Malformed input rejected before any policy runs.
    #[error("{0}")]
    Validation(String),
}

/// Lending precondition that refused an operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    /// Reader still has penalty days outstanding.
    #[error("Lector tiene {days} días de sanción. No puede pedir libros.")]
    UnderPenalty {
        /// Remaining penalty days.
        days: u32,
    },
    /// Reader already holds the maximum number of active loans.
    #[error("El lector ya tiene {cap} libros en préstamo. Máximo permitido alcanzado.")]
    LoanCapReached {
        /// Configured cap.
        cap: usize,
    },
    /// Copy is not on the shelf.
    #[error("La copia no está disponible. Estado actual: {state}")]
    CopyUnavailable {
        /// Current copy state.
        state: CopyState,
    },
    /// Loan was already closed.
    #[error("El libro ya fue devuelto")]
    AlreadyReturned,
}

impl From<Rejection> for LibraryError {
    fn from(value: Rejection) -> Self {
        Self::InvalidState(value)
    }
}

impl From<ValidationErrors> for LibraryError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}
