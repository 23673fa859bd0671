//! Lending policy: loans, returns, penalties and availability alerts.

/// Time source abstraction.
pub mod clock;
/// Loan placement and return.
pub mod loans;
/// Lending rule constants.
pub mod policy;
/// Availability subscriptions.
pub mod subscriptions;
