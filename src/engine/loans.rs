use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    core::store::RecordStore,
    error::{LibraryError, LibraryResult, Rejection},
    notify::NotificationLog,
    records::LoanRecord,
    types::{CopyId, CopyState, Entity, LoanId, ReaderId},
};

use super::{clock::Clock, policy::LoanPolicy, subscriptions};

/// Outcome of a successful return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnReceipt {
    /// The closed loan.
    pub loan: LoanRecord,
    /// Whole days past the due time, zero when on time.
    pub delay_days: u32,
    /// Penalty days charged to the reader for this return.
    pub penalty_days_added: u32,
}

/// Places and closes loans, keeping copy state and reader penalties in step.
///
/// Every check runs before the first mutation, so a refused operation leaves
/// the store untouched.
#[derive(Debug)]
pub struct LoanEngine<C: Clock> {
    policy: LoanPolicy,
    clock: C,
}

impl<C: Clock> LoanEngine<C> {
    /// Engine applying `policy` with time from `clock`.
    pub fn new(policy: LoanPolicy, clock: C) -> Self {
        Self { policy, clock }
    }

    /// Policy in force.
    pub fn policy(&self) -> &LoanPolicy {
        &self.policy
    }

    /// Time source.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Lends `copy_id` to `reader_id`.
    ///
    /// Checks run in order and the first failure wins: reader exists, reader
    /// has no penalty, reader is under the loan cap, copy exists, copy is on
    /// the shelf.
    pub fn place_loan(
        &self,
        store: &mut RecordStore,
        reader_id: ReaderId,
        copy_id: CopyId,
    ) -> LibraryResult<LoanRecord> {
        let reader = store
            .reader(reader_id)
            .ok_or(LibraryError::NotFound(Entity::Reader))?;
        if reader.penalty_days > 0 {
            return Err(Rejection::UnderPenalty {
                days: reader.penalty_days,
            }
            .into());
        }

        let cap = self.policy.max_active_loans;
        if store.active_loans_for(reader_id).len() >= cap {
            return Err(Rejection::LoanCapReached { cap }.into());
        }

        let copy = store
            .copy(copy_id)
            .ok_or(LibraryError::NotFound(Entity::Copy))?;
        if copy.state != CopyState::InLibrary {
            return Err(Rejection::CopyUnavailable { state: copy.state }.into());
        }

        let now = self.clock.now();
        let loan = store.insert_loan(reader_id, copy_id, now, now + self.policy.loan_period());
        store.set_copy_state(copy_id, CopyState::Loaned)?;

        tracing::info!(loan_id = loan.id, reader_id, copy_id, due = %loan.due_time, "loan placed");
        Ok(loan)
    }

    /// Closes `loan_id`, charges any delay to the reader and alerts subscribers of the book.
    pub fn return_loan(
        &self,
        store: &mut RecordStore,
        log: &mut NotificationLog,
        loan_id: LoanId,
    ) -> LibraryResult<ReturnReceipt> {
        let loan = store
            .loan(loan_id)
            .ok_or(LibraryError::NotFound(Entity::Loan))?;
        if !loan.is_active() {
            return Err(Rejection::AlreadyReturned.into());
        }
        let (reader_id, copy_id) = (loan.reader_id, loan.copy_id);
        let book_id = store
            .copy(copy_id)
            .ok_or(LibraryError::NotFound(Entity::Copy))?
            .book_id;
        if store.reader(reader_id).is_none() {
            return Err(LibraryError::NotFound(Entity::Reader));
        }

        let now = self.clock.now();
        let loan = store.mark_returned(loan_id, now)?;
        store.set_copy_state(copy_id, CopyState::InLibrary)?;

        let delay_days = delay_days(loan.due_time, now);
        let penalty_days_added = if delay_days > 0 {
            self.policy.penalty_for(delay_days)
        } else {
            0
        };
        if penalty_days_added > 0 {
            let reader = store.add_penalty(reader_id, penalty_days_added)?;
            tracing::info!(
                reader_id,
                delay_days,
                penalty_days_added,
                penalty_days = reader.penalty_days,
                "late return penalised"
            );
        }

        let alerted = subscriptions::notify_available(store, log, book_id);
        tracing::info!(loan_id, copy_id, delay_days, alerted, "loan returned");

        Ok(ReturnReceipt {
            loan,
            delay_days,
            penalty_days_added,
        })
    }
}

/// Whole days between `due` and `returned`; partial days are dropped and early returns count as zero.
pub fn delay_days(due: DateTime<Utc>, returned: DateTime<Utc>) -> u32 {
    let days = (returned - due).num_days().max(0);
    u32::try_from(days).unwrap_or(u32::MAX)
}
