use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use biblioteca::{
    library::Library,
    records::{AuthorDraft, BookDraft, ReaderDraft},
};
use chrono::NaiveDate;

fn seeded(copies: u64, readers: u64) -> Library {
    let mut lib = Library::new();
    let author = lib
        .create_author(AuthorDraft {
            name: "Ian Somerville".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1951, 2, 23).expect("date"),
        })
        .expect("author");
    let book = lib
        .create_book(BookDraft {
            name: "Software Engineering".to_string(),
            year: 2015,
            author_id: author.id,
        })
        .expect("book");
    for _ in 0..copies {
        lib.create_copy(book.id).expect("copy");
    }
    for i in 0..readers {
        lib.create_reader(ReaderDraft {
            name: format!("Lector {i}"),
            email: format!("lector{i}@example.com"),
        })
        .expect("reader");
    }
    lib
}

fn bench_loan_cycle(c: &mut Criterion) {
    c.bench_function("loan_return_cycle_10k", |b| {
        b.iter(|| {
            let mut lib = seeded(100, 100);
            for i in 0..10_000u64 {
                let n = i % 100 + 1;
                let loan = lib.place_loan(n, n).expect("loan");
                let _ = lib.return_loan(loan.id).expect("return");
            }
        });
    });
}

fn bench_fanout(c: &mut Criterion) {
    let mut group = c.benchmark_group("return_fanout");
    for subscribers in [10u64, 100, 1000] {
        group.bench_with_input(
            BenchmarkId::from_parameter(subscribers),
            &subscribers,
            |b, &subscribers| {
                b.iter(|| {
                    let mut lib = seeded(1, subscribers + 1);
                    for reader in 2..=subscribers + 1 {
                        lib.subscribe(reader, 1).expect("subscribe");
                    }
                    let loan = lib.place_loan(1, 1).expect("loan");
                    let _ = lib.return_loan(loan.id).expect("return");
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_loan_cycle, bench_fanout);
criterion_main!(benches);
