use chrono::{DateTime, Utc};
use hashbrown::HashMap;
use validator::Validate;

use crate::{
    error::{LibraryError, LibraryResult, Rejection},
    records::{
        AuthorDraft, AuthorRecord, BookDraft, BookRecord, CopyRecord, LoanRecord, ReaderDraft,
        ReaderRecord, SubscriptionRecord,
    },
    types::{
        AuthorId, BookId, CopyId, CopyState, Entity, LoanId, ReaderId, SubscriptionId,
    },
};

use super::indices::{self, VecIndex};

/// Keyed records of one entity type plus their id counter.
#[derive(Debug)]
struct Table<R> {
    records: HashMap<u64, R>,
    order: Vec<u64>,
    next_id: u64,
}

impl<R> Default for Table<R> {
    fn default() -> Self {
        Self {
            records: HashMap::new(),
            order: Vec::new(),
            next_id: 1,
        }
    }
}

impl<R> Table<R> {
    fn take_next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn insert(&mut self, id: u64, rec: R) {
        self.order.push(id);
        self.records.insert(id, rec);
    }

    fn get(&self, id: u64) -> Option<&R> {
        self.records.get(&id)
    }

    fn get_mut(&mut self, id: u64) -> Option<&mut R> {
        self.records.get_mut(&id)
    }

    fn contains(&self, id: u64) -> bool {
        self.records.contains_key(&id)
    }

    fn remove(&mut self, id: u64) -> Option<R> {
        let rec = self.records.remove(&id)?;
        if let Some(pos) = self.order.iter().position(|x| *x == id) {
            self.order.remove(pos);
        }
        Some(rec)
    }

    fn ordered(&self) -> Vec<&R> {
        self.order
            .iter()
            .filter_map(|id| self.records.get(id))
            .collect()
    }

    fn select<'a>(&'a self, ids: &'a [u64]) -> impl Iterator<Item = &'a R> + 'a {
        ids.iter().filter_map(|id| self.records.get(id))
    }
}

/// In-memory record store: one table per entity type plus foreign-key indices.
///
/// The store only checks that referenced records exist. Lending policy lives in
/// [`crate::engine::loans::LoanEngine`].
#[derive(Debug, Default)]
pub struct RecordStore {
    authors: Table<AuthorRecord>,
    books: Table<BookRecord>,
    copies: Table<CopyRecord>,
    readers: Table<ReaderRecord>,
    loans: Table<LoanRecord>,
    subscriptions: Table<SubscriptionRecord>,
    loans_by_reader: VecIndex<ReaderId>,
    loans_by_copy: VecIndex<CopyId>,
    copies_by_book: VecIndex<BookId>,
    subscriptions_by_book: VecIndex<BookId>,
}

impl RecordStore {
    /// Empty store; every id counter starts at 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and stores an author.
    pub fn create_author(&mut self, draft: AuthorDraft) -> LibraryResult<AuthorRecord> {
        draft.validate()?;
        let id = self.authors.take_next_id();
        let rec = AuthorRecord {
            id,
            name: draft.name,
            birth_date: draft.birth_date,
        };
        self.authors.insert(id, rec.clone());
        Ok(rec)
    }

    /// Author by id.
    pub fn author(&self, id: AuthorId) -> Option<&AuthorRecord> {
        self.authors.get(id)
    }

    /// All authors in creation order.
    pub fn authors(&self) -> Vec<&AuthorRecord> {
        self.authors.ordered()
    }

    /// Validates and stores a book. The author must exist.
    pub fn create_book(&mut self, draft: BookDraft) -> LibraryResult<BookRecord> {
        draft.validate()?;
        if !self.authors.contains(draft.author_id) {
            return Err(LibraryError::NotFound(Entity::Author));
        }
        let id = self.books.take_next_id();
        let rec = BookRecord {
            id,
            name: draft.name,
            year: draft.year,
            author_id: draft.author_id,
        };
        self.books.insert(id, rec.clone());
        Ok(rec)
    }

    /// Book by id.
    pub fn book(&self, id: BookId) -> Option<&BookRecord> {
        self.books.get(id)
    }

    /// All books in creation order.
    pub fn books(&self) -> Vec<&BookRecord> {
        self.books.ordered()
    }

    /// Books whose author name contains `fragment`, ignoring case.
    pub fn books_by_author_name(&self, fragment: &str) -> Vec<&BookRecord> {
        let needle = fragment.to_lowercase();
        self.books
            .ordered()
            .into_iter()
            .filter(|book| {
                self.authors
                    .get(book.author_id)
                    .is_some_and(|author| author.name.to_lowercase().contains(&needle))
            })
            .collect()
    }

    /// Adds a copy of an existing book, on the shelf.
    pub fn create_copy(&mut self, book_id: BookId) -> LibraryResult<CopyRecord> {
        if !self.books.contains(book_id) {
            return Err(LibraryError::NotFound(Entity::Book));
        }
        let id = self.copies.take_next_id();
        let rec = CopyRecord {
            id,
            book_id,
            state: CopyState::InLibrary,
        };
        indices::push(&mut self.copies_by_book, book_id, id);
        self.copies.insert(id, rec.clone());
        Ok(rec)
    }

    /// Copy by id.
    pub fn copy(&self, id: CopyId) -> Option<&CopyRecord> {
        self.copies.get(id)
    }

    /// All copies in creation order.
    pub fn copies(&self) -> Vec<&CopyRecord> {
        self.copies.ordered()
    }

    /// Copies of one book in creation order.
    pub fn copies_by_book(&self, book_id: BookId) -> Vec<&CopyRecord> {
        self.copies
            .select(indices::ids(&self.copies_by_book, book_id))
            .collect()
    }

    /// Overwrites the copy state without looking at its loans.
    pub fn set_copy_state(&mut self, id: CopyId, state: CopyState) -> LibraryResult<CopyRecord> {
        let rec = self
            .copies
            .get_mut(id)
            .ok_or(LibraryError::NotFound(Entity::Copy))?;
        rec.state = state;
        Ok(rec.clone())
    }

    /// Validates and stores a reader with no penalty.
    pub fn create_reader(&mut self, draft: ReaderDraft) -> LibraryResult<ReaderRecord> {
        draft.validate()?;
        let id = self.readers.take_next_id();
        let rec = ReaderRecord {
            id,
            name: draft.name,
            email: draft.email,
            penalty_days: 0,
        };
        self.readers.insert(id, rec.clone());
        Ok(rec)
    }

    /// Reader by id.
    pub fn reader(&self, id: ReaderId) -> Option<&ReaderRecord> {
        self.readers.get(id)
    }

    /// All readers in creation order.
    pub fn readers(&self) -> Vec<&ReaderRecord> {
        self.readers.ordered()
    }

    /// Adds penalty days, saturating at `u32::MAX`.
    pub fn add_penalty(&mut self, id: ReaderId, days: u32) -> LibraryResult<ReaderRecord> {
        let rec = self
            .readers
            .get_mut(id)
            .ok_or(LibraryError::NotFound(Entity::Reader))?;
        rec.penalty_days = rec.penalty_days.saturating_add(days);
        Ok(rec.clone())
    }

    /// Lowers the penalty, never below zero.
    pub fn reduce_penalty(&mut self, id: ReaderId, days: u32) -> LibraryResult<ReaderRecord> {
        let rec = self
            .readers
            .get_mut(id)
            .ok_or(LibraryError::NotFound(Entity::Reader))?;
        rec.penalty_days = rec.penalty_days.saturating_sub(days);
        Ok(rec.clone())
    }

    /// Stores a new active loan. Callers are responsible for the copy state.
    pub fn insert_loan(
        &mut self,
        reader_id: ReaderId,
        copy_id: CopyId,
        loan_time: DateTime<Utc>,
        due_time: DateTime<Utc>,
    ) -> LoanRecord {
        let id = self.loans.take_next_id();
        let rec = LoanRecord {
            id,
            reader_id,
            copy_id,
            loan_time,
            due_time,
            return_time: None,
        };
        indices::push(&mut self.loans_by_reader, reader_id, id);
        indices::push(&mut self.loans_by_copy, copy_id, id);
        self.loans.insert(id, rec.clone());
        rec
    }

    /// Loan by id.
    pub fn loan(&self, id: LoanId) -> Option<&LoanRecord> {
        self.loans.get(id)
    }

    /// All loans, active or closed, in creation order.
    pub fn loans(&self) -> Vec<&LoanRecord> {
        self.loans.ordered()
    }

    /// Loans of one reader that have not been returned.
    pub fn active_loans_for(&self, reader_id: ReaderId) -> Vec<&LoanRecord> {
        self.loans
            .select(indices::ids(&self.loans_by_reader, reader_id))
            .filter(|loan| loan.is_active())
            .collect()
    }

    /// Open loan on a copy, if any.
    pub fn active_loan_for_copy(&self, copy_id: CopyId) -> Option<&LoanRecord> {
        self.loans
            .select(indices::ids(&self.loans_by_copy, copy_id))
            .find(|loan| loan.is_active())
    }

    /// Closes a loan. A loan can only be closed once.
    pub fn mark_returned(&mut self, id: LoanId, at: DateTime<Utc>) -> LibraryResult<LoanRecord> {
        let rec = self
            .loans
            .get_mut(id)
            .ok_or(LibraryError::NotFound(Entity::Loan))?;
        if !rec.is_active() {
            return Err(Rejection::AlreadyReturned.into());
        }
        rec.return_time = Some(at);
        Ok(rec.clone())
    }

    /// Stores a subscription. Duplicates for the same reader and book are kept.
    pub fn insert_subscription(
        &mut self,
        reader_id: ReaderId,
        book_id: BookId,
        at: DateTime<Utc>,
    ) -> SubscriptionRecord {
        let id = self.subscriptions.take_next_id();
        let rec = SubscriptionRecord {
            id,
            reader_id,
            book_id,
            subscribed_time: at,
        };
        indices::push(&mut self.subscriptions_by_book, book_id, id);
        self.subscriptions.insert(id, rec.clone());
        rec
    }

    /// Subscriptions on one book in subscription order.
    pub fn subscriptions_for_book(&self, book_id: BookId) -> Vec<&SubscriptionRecord> {
        self.subscriptions
            .select(indices::ids(&self.subscriptions_by_book, book_id))
            .collect()
    }

    /// Removes a subscription and its index entry.
    pub fn delete_subscription(&mut self, id: SubscriptionId) -> LibraryResult<SubscriptionRecord> {
        let rec = self
            .subscriptions
            .remove(id)
            .ok_or(LibraryError::NotFound(Entity::Subscription))?;
        indices::remove(&mut self.subscriptions_by_book, rec.book_id, id);
        Ok(rec)
    }
}
