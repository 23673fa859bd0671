use biblioteca::{
    error::LibraryError,
    library::Library,
    records::{AuthorDraft, BookDraft, ReaderDraft},
    types::Entity,
};
use chrono::NaiveDate;

fn library_with_book() -> (Library, u64) {
    let mut lib = Library::new();
    let author = lib
        .create_author(AuthorDraft {
            name: "Ian Somerville".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1951, 2, 23).unwrap(),
        })
        .unwrap();
    let book = lib
        .create_book(BookDraft {
            name: "Software Engineering".to_string(),
            year: 2015,
            author_id: author.id,
        })
        .unwrap();
    (lib, book.id)
}

fn reader(lib: &mut Library, name: &str) -> (u64, String) {
    let email = format!("{name}@example.com");
    let rec = lib
        .create_reader(ReaderDraft {
            name: name.to_string(),
            email: email.clone(),
        })
        .unwrap();
    (rec.id, email)
}

fn availability_alerts<'a>(lib: &'a Library, email: &'a str) -> Vec<&'a str> {
    lib.notifications()
        .iter()
        .filter(|n| n.email == email && n.message.contains("disponible"))
        .map(|n| n.message.as_str())
        .collect()
}

#[test]
fn subscribing_sends_a_confirmation() {
    let (mut lib, book) = library_with_book();
    let (s, email) = reader(&mut lib, "sofia");

    let sub = lib.subscribe(s, book).unwrap();
    assert_eq!((sub.reader_id, sub.book_id), (s, book));

    let history = lib.notifications();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].email, email);
    assert_eq!(history[0].subject, "Software Engineering");
    assert!(history[0].message.contains("suscrito exitosamente"));
}

#[test]
fn subscribe_requires_reader_then_book() {
    let (mut lib, book) = library_with_book();
    let (s, _) = reader(&mut lib, "sofia");

    assert_eq!(lib.subscribe(99, 99), Err(LibraryError::NotFound(Entity::Reader)));
    assert_eq!(lib.subscribe(s, 99), Err(LibraryError::NotFound(Entity::Book)));
    assert_eq!(lib.subscribe(99, book), Err(LibraryError::NotFound(Entity::Reader)));
    assert!(lib.notifications().is_empty());
}

#[test]
fn subscriber_hears_once_when_a_copy_comes_back() {
    let (mut lib, book) = library_with_book();
    let (s, s_email) = reader(&mut lib, "sofia");
    let (t, t_email) = reader(&mut lib, "tomas");

    // subscribed before any copy exists
    lib.subscribe(s, book).unwrap();
    let copy = lib.create_copy(book).unwrap();
    let loan = lib.place_loan(t, copy.id).unwrap();
    lib.return_loan(loan.id).unwrap();

    let alerts = availability_alerts(&lib, &s_email);
    assert_eq!(alerts.len(), 1);
    assert!(alerts[0].contains("Software Engineering"));
    assert!(availability_alerts(&lib, &t_email).is_empty());
}

#[test]
fn every_subscriber_is_notified_and_subscriptions_persist() {
    let (mut lib, book) = library_with_book();
    let (borrower, _) = reader(&mut lib, "juan");
    let subscribers: Vec<_> = ["lector0", "lector1", "lector2"]
        .into_iter()
        .map(|name| reader(&mut lib, name))
        .collect();
    for (id, _) in &subscribers {
        lib.subscribe(*id, book).unwrap();
    }
    let copy = lib.create_copy(book).unwrap();

    for round in 1..=2 {
        let loan = lib.place_loan(borrower, copy.id).unwrap();
        lib.return_loan(loan.id).unwrap();
        for (_, email) in &subscribers {
            assert_eq!(availability_alerts(&lib, email).len(), round);
        }
    }
    assert_eq!(lib.subscriptions_for_book(book).unwrap().len(), 3);
}

#[test]
fn duplicate_subscriptions_mean_duplicate_alerts() {
    let (mut lib, book) = library_with_book();
    let (s, email) = reader(&mut lib, "sofia");
    let (t, _) = reader(&mut lib, "tomas");
    lib.subscribe(s, book).unwrap();
    lib.subscribe(s, book).unwrap();

    let copy = lib.create_copy(book).unwrap();
    let loan = lib.place_loan(t, copy.id).unwrap();
    lib.return_loan(loan.id).unwrap();

    assert_eq!(availability_alerts(&lib, &email).len(), 2);
}

#[test]
fn unsubscribed_reader_is_not_notified() {
    let (mut lib, book) = library_with_book();
    let (s, email) = reader(&mut lib, "sofia");
    let (t, _) = reader(&mut lib, "tomas");
    let sub = lib.subscribe(s, book).unwrap();
    lib.unsubscribe(sub.id).unwrap();

    let copy = lib.create_copy(book).unwrap();
    let loan = lib.place_loan(t, copy.id).unwrap();
    lib.return_loan(loan.id).unwrap();

    assert!(availability_alerts(&lib, &email).is_empty());
    assert_eq!(
        lib.subscriptions_for_book(99),
        Err(LibraryError::NotFound(Entity::Book))
    );
}

#[test]
fn other_books_do_not_trigger_alerts() {
    let (mut lib, book) = library_with_book();
    let author_id = lib.book(book).unwrap().book.author_id;
    let other = lib
        .create_book(BookDraft {
            name: "Requirements Engineering".to_string(),
            year: 1997,
            author_id,
        })
        .unwrap();
    let (s, email) = reader(&mut lib, "sofia");
    let (t, _) = reader(&mut lib, "tomas");
    lib.subscribe(s, book).unwrap();

    let copy = lib.create_copy(other.id).unwrap();
    let loan = lib.place_loan(t, copy.id).unwrap();
    lib.return_loan(loan.id).unwrap();

    assert!(availability_alerts(&lib, &email).is_empty());
}
