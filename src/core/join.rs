use serde::{Deserialize, Serialize};

use crate::records::{AuthorRecord, BookRecord};

use super::store::RecordStore;

/// A book together with its author, resolved at read time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookWithAuthor {
    /// The book itself.
    #[serde(flatten)]
    pub book: BookRecord,
    /// The author, if it is still present in the store.
    pub author: Option<AuthorRecord>,
}

/// Joins one book with its author.
pub fn book_with_author(store: &RecordStore, book: &BookRecord) -> BookWithAuthor {
    BookWithAuthor {
        book: book.clone(),
        author: store.author(book.author_id).cloned(),
    }
}

/// Joins every book with its author, keeping input order.
pub fn books_with_authors<'a>(
    store: &RecordStore,
    books: impl IntoIterator<Item = &'a BookRecord>,
) -> Vec<BookWithAuthor> {
    books
        .into_iter()
        .map(|book| book_with_author(store, book))
        .collect()
}
