use crate::{
    core::store::RecordStore,
    error::{LibraryError, LibraryResult},
    notify::NotificationLog,
    records::SubscriptionRecord,
    types::{BookId, Entity, ReaderId},
};

use super::clock::Clock;

/// Subscribes a reader to availability alerts for a book and confirms by notification.
///
/// The same reader may subscribe to the same book more than once; every
/// subscription receives its own alert on return.
pub fn subscribe(
    store: &mut RecordStore,
    log: &mut NotificationLog,
    clock: &impl Clock,
    reader_id: ReaderId,
    book_id: BookId,
) -> LibraryResult<SubscriptionRecord> {
    let email = store
        .reader(reader_id)
        .ok_or(LibraryError::NotFound(Entity::Reader))?
        .email
        .clone();
    let title = store
        .book(book_id)
        .ok_or(LibraryError::NotFound(Entity::Book))?
        .name
        .clone();

    let sub = store.insert_subscription(reader_id, book_id, clock.now());
    let message = format!(
        "Te has suscrito exitosamente a '{title}'. Te avisaremos cuando vuelva a la biblioteca."
    );
    log.notify(email, title, message);
    tracing::info!(subscription_id = sub.id, reader_id, book_id, "reader subscribed");
    Ok(sub)
}

/// Tells every subscriber of `book_id` that a copy is back. Returns how many were notified.
pub fn notify_available(store: &RecordStore, log: &mut NotificationLog, book_id: BookId) -> usize {
    let Some(book) = store.book(book_id) else {
        tracing::warn!(book_id, "availability alert for unknown book");
        return 0;
    };

    let message = format!("El libro '{}' está ahora disponible.", book.name);
    let mut sent = 0;
    for sub in store.subscriptions_for_book(book_id) {
        let Some(reader) = store.reader(sub.reader_id) else {
            tracing::warn!(subscription_id = sub.id, reader_id = sub.reader_id, "subscriber missing");
            continue;
        };
        log.notify(reader.email.as_str(), book.name.as_str(), message.as_str());
        sent += 1;
    }
    sent
}
