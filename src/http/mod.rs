//! HTTP surface: axum routes over a [`LibraryHandle`].

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::runtime::handle::LibraryHandle;

/// Error to response mapping.
pub mod error;
/// Extractors that report rejections through the API error body.
pub mod extract;
/// Route handlers and request bodies.
pub mod handlers;

/// Builds the service router. All state lives behind `handle`.
pub fn router(handle: LibraryHandle) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/autores/", post(handlers::create_author).get(handlers::list_authors))
        .route("/autores/:id", get(handlers::get_author))
        .route("/libros/", post(handlers::create_book).get(handlers::list_books))
        .route("/libros/:id", get(handlers::get_book))
        .route("/libros/buscar/:author", get(handlers::search_books))
        .route("/copias/", post(handlers::create_copy).get(handlers::list_copies))
        .route("/copias/:id", get(handlers::get_copy))
        .route("/copias/:id/estado", put(handlers::set_copy_state))
        .route("/copias/libro/:book_id", get(handlers::copies_by_book))
        .route("/lectores/", post(handlers::create_reader).get(handlers::list_readers))
        .route("/lectores/:id", get(handlers::get_reader))
        .route("/prestamos/", post(handlers::place_loan).get(handlers::list_loans))
        .route("/prestamos/:id", get(handlers::get_loan))
        .route("/prestamos/:id/devolver", post(handlers::return_loan))
        .route("/prestamos/lector/:reader_id", get(handlers::active_loans))
        .route("/bioalert/suscribir", post(handlers::subscribe))
        .route("/bioalert/notificaciones", get(handlers::notifications))
        .route(
            "/bioalert/suscripciones/libro/:book_id",
            get(handlers::subscriptions_for_book),
        )
        .with_state(handle)
}
