//! Synchronous library facade owning the store, the notification log and the loan engine.

use crate::{
    core::{
        join::{self, BookWithAuthor},
        store::RecordStore,
    },
    engine::{
        clock::{Clock, SystemClock},
        loans::{LoanEngine, ReturnReceipt},
        policy::LoanPolicy,
        subscriptions,
    },
    error::{LibraryError, LibraryResult},
    notify::{Notification, NotificationLog},
    records::{
        AuthorDraft, AuthorRecord, BookDraft, BookRecord, CopyRecord, LoanRecord, ReaderDraft,
        ReaderRecord, SubscriptionRecord,
    },
    types::{
        AuthorId, BookId, CopyId, CopyState, Entity, LoanId, ReaderId, SubscriptionId,
    },
};

/// All library state behind one `&mut self` entry point.
///
/// Each method runs to completion before the next call can start, which is
/// what keeps the check-then-act sequences of the loan engine consistent.
#[derive(Debug)]
pub struct Library<C: Clock = SystemClock> {
    store: RecordStore,
    notifications: NotificationLog,
    engine: LoanEngine<C>,
}

impl Library<SystemClock> {
    /// Empty library on the wall clock with the default policy.
    pub fn new() -> Self {
        Self::with_clock(LoanPolicy::default(), SystemClock)
    }
}

impl Default for Library<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> Library<C> {
    /// Empty library with explicit policy and clock.
    pub fn with_clock(policy: LoanPolicy, clock: C) -> Self {
        Self::from_parts(RecordStore::new(), NotificationLog::new(), LoanEngine::new(policy, clock))
    }

    /// Assembles a library from already constructed parts.
    pub fn from_parts(store: RecordStore, notifications: NotificationLog, engine: LoanEngine<C>) -> Self {
        Self {
            store,
            notifications,
            engine,
        }
    }

    /// Every notification sent so far, oldest first.
    pub fn notifications(&self) -> &[Notification] {
        self.notifications.history()
    }

    /// Lending policy in force.
    pub fn policy(&self) -> &LoanPolicy {
        self.engine.policy()
    }

    // authors

    /// Validates and stores an author.
    pub fn create_author(&mut self, draft: AuthorDraft) -> LibraryResult<AuthorRecord> {
        self.store.create_author(draft)
    }

    /// Author by id.
    pub fn author(&self, id: AuthorId) -> LibraryResult<AuthorRecord> {
        self.store
            .author(id)
            .cloned()
            .ok_or(LibraryError::NotFound(Entity::Author))
    }

    /// All authors in creation order.
    pub fn authors(&self) -> Vec<AuthorRecord> {
        self.store.authors().into_iter().cloned().collect()
    }

    // books

    /// Validates and stores a book; its author must exist.
    pub fn create_book(&mut self, draft: BookDraft) -> LibraryResult<BookRecord> {
        self.store.create_book(draft)
    }

    /// Book by id, joined with its author.
    pub fn book(&self, id: BookId) -> LibraryResult<BookWithAuthor> {
        let book = self.store.book(id).ok_or(LibraryError::NotFound(Entity::Book))?;
        Ok(join::book_with_author(&self.store, book))
    }

    /// All books joined with their authors.
    pub fn books(&self) -> Vec<BookWithAuthor> {
        join::books_with_authors(&self.store, self.store.books())
    }

    /// Books whose author name contains `fragment`, ignoring case.
    pub fn search_books_by_author(&self, fragment: &str) -> Vec<BookWithAuthor> {
        join::books_with_authors(&self.store, self.store.books_by_author_name(fragment))
    }

    // copies

    /// Adds a copy of an existing book.
    pub fn create_copy(&mut self, book_id: BookId) -> LibraryResult<CopyRecord> {
        self.store.create_copy(book_id)
    }

    /// Copy by id.
    pub fn copy(&self, id: CopyId) -> LibraryResult<CopyRecord> {
        self.store
            .copy(id)
            .cloned()
            .ok_or(LibraryError::NotFound(Entity::Copy))
    }

    /// All copies in creation order.
    pub fn copies(&self) -> Vec<CopyRecord> {
        self.store.copies().into_iter().cloned().collect()
    }

    /// Copies of an existing book.
    pub fn copies_by_book(&self, book_id: BookId) -> LibraryResult<Vec<CopyRecord>> {
        self.require_book(book_id)?;
        Ok(self.store.copies_by_book(book_id).into_iter().cloned().collect())
    }

    /// Administrative override of a copy state. Accepts any state, even for a loaned copy.
    pub fn set_copy_state(&mut self, id: CopyId, state: CopyState) -> LibraryResult<CopyRecord> {
        if let Some(current) = self.store.copy(id) {
            if let Some(loan) = self.store.active_loan_for_copy(id) {
                if state != CopyState::Loaned {
                    tracing::warn!(
                        copy_id = id,
                        loan_id = loan.id,
                        from = %current.state,
                        to = %state,
                        "overriding state of a loaned copy"
                    );
                }
            }
        }
        self.store.set_copy_state(id, state)
    }

    // readers

    /// Validates and stores a reader.
    pub fn create_reader(&mut self, draft: ReaderDraft) -> LibraryResult<ReaderRecord> {
        self.store.create_reader(draft)
    }

    /// Reader by id.
    pub fn reader(&self, id: ReaderId) -> LibraryResult<ReaderRecord> {
        self.store
            .reader(id)
            .cloned()
            .ok_or(LibraryError::NotFound(Entity::Reader))
    }

    /// All readers in creation order.
    pub fn readers(&self) -> Vec<ReaderRecord> {
        self.store.readers().into_iter().cloned().collect()
    }

    /// Forgives up to `days` of a reader's penalty.
    pub fn reduce_penalty(&mut self, id: ReaderId, days: u32) -> LibraryResult<ReaderRecord> {
        self.store.reduce_penalty(id, days)
    }

    // loans

    /// Lends a copy to a reader under the lending policy.
    pub fn place_loan(&mut self, reader_id: ReaderId, copy_id: CopyId) -> LibraryResult<LoanRecord> {
        self.engine.place_loan(&mut self.store, reader_id, copy_id)
    }

    /// Closes a loan, charges any delay and alerts subscribers of the book.
    pub fn return_loan(&mut self, loan_id: LoanId) -> LibraryResult<ReturnReceipt> {
        self.engine
            .return_loan(&mut self.store, &mut self.notifications, loan_id)
    }

    /// Loan by id.
    pub fn loan(&self, id: LoanId) -> LibraryResult<LoanRecord> {
        self.store
            .loan(id)
            .cloned()
            .ok_or(LibraryError::NotFound(Entity::Loan))
    }

    /// All loans in creation order.
    pub fn loans(&self) -> Vec<LoanRecord> {
        self.store.loans().into_iter().cloned().collect()
    }

    /// Open loans of an existing reader.
    pub fn active_loans_for(&self, reader_id: ReaderId) -> LibraryResult<Vec<LoanRecord>> {
        if self.store.reader(reader_id).is_none() {
            return Err(LibraryError::NotFound(Entity::Reader));
        }
        Ok(self
            .store
            .active_loans_for(reader_id)
            .into_iter()
            .cloned()
            .collect())
    }

    // subscriptions

    /// Subscribes a reader to availability alerts for a book.
    pub fn subscribe(&mut self, reader_id: ReaderId, book_id: BookId) -> LibraryResult<SubscriptionRecord> {
        subscriptions::subscribe(
            &mut self.store,
            &mut self.notifications,
            self.engine.clock(),
            reader_id,
            book_id,
        )
    }

    /// Subscriptions on an existing book.
    pub fn subscriptions_for_book(&self, book_id: BookId) -> LibraryResult<Vec<SubscriptionRecord>> {
        self.require_book(book_id)?;
        Ok(self
            .store
            .subscriptions_for_book(book_id)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Drops a subscription.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> LibraryResult<SubscriptionRecord> {
        self.store.delete_subscription(id)
    }

    fn require_book(&self, book_id: BookId) -> LibraryResult<()> {
        if self.store.book(book_id).is_none() {
            return Err(LibraryError::NotFound(Entity::Book));
        }
        Ok(())
    }
}
