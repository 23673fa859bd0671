use biblioteca::{
    engine::{
        clock::{Clock, ManualClock},
        policy::LoanPolicy,
    },
    error::{LibraryError, Rejection},
    library::Library,
    records::{AuthorDraft, BookDraft, ReaderDraft},
    types::{BookId, CopyId, CopyState, Entity, ReaderId},
};
use chrono::{DateTime, Duration, NaiveDate};

struct Fixture {
    lib: Library<ManualClock>,
    clock: ManualClock,
    book: BookId,
    reader: ReaderId,
}

fn fixture() -> Fixture {
    let clock = ManualClock::new(DateTime::from_timestamp(1_700_000_000, 0).unwrap());
    let mut lib = Library::with_clock(LoanPolicy::default(), clock.clone());
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
    let reader = lib
        .create_reader(ReaderDraft {
            name: "Juan Estudiante".to_string(),
            email: "juan@example.com".to_string(),
        })
        .unwrap();
    Fixture {
        lib,
        clock,
        book: book.id,
        reader: reader.id,
    }
}

fn copies(fx: &mut Fixture, n: usize) -> Vec<CopyId> {
    (0..n).map(|_| fx.lib.create_copy(fx.book).unwrap().id).collect()
}

#[test]
fn loan_sets_due_date_and_marks_copy_loaned() {
    let mut fx = fixture();
    let copy = copies(&mut fx, 1)[0];

    let loan = fx.lib.place_loan(fx.reader, copy).unwrap();
    assert_eq!(loan.loan_time, fx.clock.now());
    assert_eq!(loan.due_time, loan.loan_time + Duration::days(30));
    assert!(loan.return_time.is_none());
    assert_eq!(fx.lib.copy(copy).unwrap().state, CopyState::Loaned);
}

#[test]
fn fourth_active_loan_is_refused() {
    let mut fx = fixture();
    let ids = copies(&mut fx, 4);

    for copy in &ids[..3] {
        fx.lib.place_loan(fx.reader, *copy).unwrap();
    }
    let err = fx.lib.place_loan(fx.reader, ids[3]).unwrap_err();
    assert_eq!(err, LibraryError::InvalidState(Rejection::LoanCapReached { cap: 3 }));
    assert!(err.to_string().contains("3 libros en préstamo"));
    assert!(err.to_string().contains("Máximo permitido alcanzado"));

    assert_eq!(fx.lib.copy(ids[3]).unwrap().state, CopyState::InLibrary);
    assert_eq!(fx.lib.active_loans_for(fx.reader).unwrap().len(), 3);
}

#[test]
fn returning_frees_a_slot() {
    let mut fx = fixture();
    let ids = copies(&mut fx, 4);

    let first = fx.lib.place_loan(fx.reader, ids[0]).unwrap();
    fx.lib.place_loan(fx.reader, ids[1]).unwrap();
    fx.lib.place_loan(fx.reader, ids[2]).unwrap();
    fx.lib.return_loan(first.id).unwrap();

    fx.lib.place_loan(fx.reader, ids[3]).unwrap();
    assert_eq!(fx.lib.active_loans_for(fx.reader).unwrap().len(), 3);
}

#[test]
fn checks_run_in_order() {
    let mut fx = fixture();
    let ids = copies(&mut fx, 4);

    assert_eq!(
        fx.lib.place_loan(99, ids[0]),
        Err(LibraryError::NotFound(Entity::Reader))
    );

    // cap is checked before the copy exists
    for copy in &ids[..3] {
        fx.lib.place_loan(fx.reader, *copy).unwrap();
    }
    assert_eq!(
        fx.lib.place_loan(fx.reader, 999),
        Err(LibraryError::InvalidState(Rejection::LoanCapReached { cap: 3 }))
    );

    let other = fx
        .lib
        .create_reader(ReaderDraft {
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
        })
        .unwrap();
    assert_eq!(
        fx.lib.place_loan(other.id, 999),
        Err(LibraryError::NotFound(Entity::Copy))
    );
    assert_eq!(
        fx.lib.place_loan(other.id, ids[0]),
        Err(LibraryError::InvalidState(Rejection::CopyUnavailable {
            state: CopyState::Loaned
        }))
    );
}

#[test]
fn copy_in_repair_cannot_be_lent() {
    let mut fx = fixture();
    let copy = copies(&mut fx, 1)[0];
    fx.lib.set_copy_state(copy, CopyState::InRepair).unwrap();

    let err = fx.lib.place_loan(fx.reader, copy).unwrap_err();
    assert_eq!(err.to_string(), "La copia no está disponible. Estado actual: IN_REPAIR");
    assert!(fx.lib.loans().is_empty());
}

#[test]
fn return_on_due_time_has_no_penalty() {
    let mut fx = fixture();
    let copy = copies(&mut fx, 1)[0];
    let loan = fx.lib.place_loan(fx.reader, copy).unwrap();

    fx.clock.advance(Duration::days(30));
    let receipt = fx.lib.return_loan(loan.id).unwrap();

    assert_eq!(receipt.delay_days, 0);
    assert_eq!(receipt.penalty_days_added, 0);
    assert_eq!(receipt.loan.return_time, Some(loan.due_time));
    assert_eq!(fx.lib.reader(fx.reader).unwrap().penalty_days, 0);
    assert_eq!(fx.lib.copy(copy).unwrap().state, CopyState::InLibrary);
}

#[test]
fn less_than_a_day_late_is_not_late() {
    let mut fx = fixture();
    let copy = copies(&mut fx, 1)[0];
    let loan = fx.lib.place_loan(fx.reader, copy).unwrap();

    fx.clock.advance(Duration::days(30) + Duration::hours(23));
    let receipt = fx.lib.return_loan(loan.id).unwrap();
    assert_eq!(receipt.delay_days, 0);
    assert_eq!(fx.lib.reader(fx.reader).unwrap().penalty_days, 0);
}

#[test]
fn five_days_late_costs_ten_penalty_days_and_blocks_loans() {
    let mut fx = fixture();
    let ids = copies(&mut fx, 2);
    let loan = fx.lib.place_loan(fx.reader, ids[0]).unwrap();

    fx.clock.advance(Duration::days(35));
    let receipt = fx.lib.return_loan(loan.id).unwrap();
    assert_eq!(receipt.delay_days, 5);
    assert_eq!(receipt.penalty_days_added, 10);
    assert_eq!(fx.lib.reader(fx.reader).unwrap().penalty_days, 10);

    let err = fx.lib.place_loan(fx.reader, ids[1]).unwrap_err();
    assert_eq!(err, LibraryError::InvalidState(Rejection::UnderPenalty { days: 10 }));
    assert!(err.to_string().contains("10 días de sanción"));
    assert!(err.to_string().contains("No puede pedir libros"));
}

#[test]
fn penalties_accumulate_and_can_be_forgiven() {
    let mut fx = fixture();
    let ids = copies(&mut fx, 2);
    let a = fx.lib.place_loan(fx.reader, ids[0]).unwrap();
    let b = fx.lib.place_loan(fx.reader, ids[1]).unwrap();

    fx.clock.advance(Duration::days(31));
    fx.lib.return_loan(a.id).unwrap();
    fx.clock.advance(Duration::days(2));
    fx.lib.return_loan(b.id).unwrap();
    assert_eq!(fx.lib.reader(fx.reader).unwrap().penalty_days, 2 + 6);

    assert_eq!(fx.lib.reduce_penalty(fx.reader, 5).unwrap().penalty_days, 3);
    assert_eq!(fx.lib.reduce_penalty(fx.reader, 5).unwrap().penalty_days, 0);
    fx.lib.place_loan(fx.reader, ids[0]).unwrap();
}

#[test]
fn admin_override_on_loaned_copy_is_undone_by_return() {
    let mut fx = fixture();
    let copy = copies(&mut fx, 1)[0];
    let loan = fx.lib.place_loan(fx.reader, copy).unwrap();

    let forced = fx.lib.set_copy_state(copy, CopyState::InRepair).unwrap();
    assert_eq!(forced.state, CopyState::InRepair);
    assert!(fx.lib.loan(loan.id).unwrap().is_active());
    assert_eq!(fx.lib.active_loans_for(fx.reader).unwrap().len(), 1);

    let receipt = fx.lib.return_loan(loan.id).unwrap();
    assert_eq!(receipt.delay_days, 0);
    assert_eq!(fx.lib.copy(copy).unwrap().state, CopyState::InLibrary);
    assert!(fx.lib.place_loan(fx.reader, copy).is_ok());
}

#[test]
fn second_return_is_refused() {
    let mut fx = fixture();
    let copy = copies(&mut fx, 1)[0];
    let loan = fx.lib.place_loan(fx.reader, copy).unwrap();
    fx.lib.return_loan(loan.id).unwrap();

    let err = fx.lib.return_loan(loan.id).unwrap_err();
    assert_eq!(err, LibraryError::InvalidState(Rejection::AlreadyReturned));
    assert_eq!(err.to_string(), "El libro ya fue devuelto");
    assert_eq!(fx.lib.return_loan(77), Err(LibraryError::NotFound(Entity::Loan)));
}

#[test]
fn custom_policy_changes_cap_and_rate() {
    let clock = ManualClock::new(DateTime::from_timestamp(1_700_000_000, 0).unwrap());
    let policy = LoanPolicy {
        loan_period_days: 7,
        max_active_loans: 1,
        penalty_per_late_day: 3,
    };
    let mut lib = Library::with_clock(policy, clock.clone());
    let author = lib
        .create_author(AuthorDraft {
            name: "Ada".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1815, 12, 10).unwrap(),
        })
        .unwrap();
    let book = lib
        .create_book(BookDraft {
            name: "Notes".to_string(),
            year: 1843,
            author_id: author.id,
        })
        .unwrap();
    let c1 = lib.create_copy(book.id).unwrap();
    let c2 = lib.create_copy(book.id).unwrap();
    let reader = lib
        .create_reader(ReaderDraft {
            name: "Juan".to_string(),
            email: "juan@example.com".to_string(),
        })
        .unwrap();

    let loan = lib.place_loan(reader.id, c1.id).unwrap();
    assert_eq!(
        lib.place_loan(reader.id, c2.id),
        Err(LibraryError::InvalidState(Rejection::LoanCapReached { cap: 1 }))
    );

    clock.advance(Duration::days(9));
    let receipt = lib.return_loan(loan.id).unwrap();
    assert_eq!((receipt.delay_days, receipt.penalty_days_added), (2, 6));
}
