//! In-memory library lending service: authors, books, copies, readers, loans
//! and availability alerts.
//!
//! # Examples
//!
//! Synchronous usage with [`library::Library`]:
//! ```
//! use biblioteca::{
//!     library::Library,
//!     records::{AuthorDraft, BookDraft, ReaderDraft},
//! };
//! use chrono::NaiveDate;
//!
//! let mut lib = Library::new();
//! let author = lib.create_author(AuthorDraft {
//!     name: "Ian Somerville".to_string(),
//!     birth_date: NaiveDate::from_ymd_opt(1951, 2, 23).expect("date"),
//! }).expect("author");
//! let book = lib.create_book(BookDraft {
//!     name: "Software Engineering".to_string(),
//!     year: 2015,
//!     author_id: author.id,
//! }).expect("book");
//! let copy = lib.create_copy(book.id).expect("copy");
//! let reader = lib.create_reader(ReaderDraft {
//!     name: "Juan".to_string(),
//!     email: "juan@example.com".to_string(),
//! }).expect("reader");
//!
//! let loan = lib.place_loan(reader.id, copy.id).expect("loan");
//! let receipt = lib.return_loan(loan.id).expect("return");
//! assert_eq!(receipt.delay_days, 0);
//! ```
//!
//! Serving the HTTP API from a single-writer runtime:
//! ```no_run
//! use biblioteca::{http, library::Library, runtime::handle::{spawn_library, RuntimeConfig}};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let handle = spawn_library(Library::new(), RuntimeConfig::default());
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8000").await.expect("bind");
//! axum::serve(listener, http::router(handle)).await.expect("serve");
//! # }
//! ```
#![warn(missing_docs)]

/// Service configuration and builder.
pub mod config;
/// Record store, indices and read-time joins.
pub mod core;
/// Loan engine, lending policy, clock and subscriptions.
pub mod engine;
/// Error types.
pub mod error;
/// HTTP routes and error mapping.
pub mod http;
/// Synchronous facade over all library state.
pub mod library;
/// Notification log.
pub mod notify;
/// Domain records and drafts.
pub mod records;
/// Single-writer runtime handle and events.
pub mod runtime;
/// Shared primitive types and enums.
pub mod types;

pub use config::Config;
pub use error::{LibraryError, LibraryResult, Rejection};
pub use library::Library;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
