use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{
    core::join::BookWithAuthor,
    engine::loans::ReturnReceipt,
    notify::Notification,
    records::{
        AuthorDraft, AuthorRecord, BookDraft, BookRecord, CopyRecord, LoanRecord, ReaderDraft,
        ReaderRecord, SubscriptionRecord,
    },
    runtime::handle::LibraryHandle,
    types::{AuthorId, BookId, CopyId, CopyState, LoanId, ReaderId},
};

use super::{
    error::ApiResult,
    extract::{JsonBody, PathParam},
};

type Created<T> = (StatusCode, Json<T>);

fn created<T>(value: T) -> Created<T> {
    (StatusCode::CREATED, Json(value))
}

/// Body of `POST /copias/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCopy {
    /// Book the copy belongs to.
    pub book_id: BookId,
}

/// Body of `PUT /copias/{id}/estado`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CopyStateChange {
    /// State to force.
    pub state: CopyState,
}

/// Body of `POST /prestamos/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanRequest {
    /// Borrowing reader.
    pub reader_id: ReaderId,
    /// Copy to lend.
    pub copy_id: CopyId,
}

/// Body of `POST /bioalert/suscribir`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionRequest {
    /// Reader to alert.
    pub reader_id: ReaderId,
    /// Book to watch.
    pub book_id: BookId,
}

/// Response of `GET /bioalert/notificaciones`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationHistory {
    /// Every notification sent, oldest first.
    pub notifications: Vec<Notification>,
}

/// `GET /`: service banner and endpoint index.
pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "Sistema de Biblioteca API",
        "endpoints": {
            "autores": "/autores",
            "libros": "/libros",
            "copias": "/copias",
            "lectores": "/lectores",
            "prestamos": "/prestamos",
            "bioalert": "/bioalert",
        },
    }))
}

// authors

/// `POST /autores/`
pub async fn create_author(
    State(lib): State<LibraryHandle>,
    JsonBody(draft): JsonBody<AuthorDraft>,
) -> ApiResult<Created<AuthorRecord>> {
    Ok(created(lib.create_author(draft).await?))
}

/// `GET /autores/`
pub async fn list_authors(State(lib): State<LibraryHandle>) -> ApiResult<Json<Vec<AuthorRecord>>> {
    Ok(Json(lib.authors().await?))
}

/// `GET /autores/{id}`
pub async fn get_author(
    State(lib): State<LibraryHandle>,
    PathParam(id): PathParam<AuthorId>,
) -> ApiResult<Json<AuthorRecord>> {
    Ok(Json(lib.author(id).await?))
}

// books

/// `POST /libros/`
pub async fn create_book(
    State(lib): State<LibraryHandle>,
    JsonBody(draft): JsonBody<BookDraft>,
) -> ApiResult<Created<BookRecord>> {
    Ok(created(lib.create_book(draft).await?))
}

/// `GET /libros/`
pub async fn list_books(State(lib): State<LibraryHandle>) -> ApiResult<Json<Vec<BookWithAuthor>>> {
    Ok(Json(lib.books().await?))
}

/// `GET /libros/{id}`
pub async fn get_book(
    State(lib): State<LibraryHandle>,
    PathParam(id): PathParam<BookId>,
) -> ApiResult<Json<BookWithAuthor>> {
    Ok(Json(lib.book(id).await?))
}

/// `GET /libros/buscar/{author}`
pub async fn search_books(
    State(lib): State<LibraryHandle>,
    PathParam(author): PathParam<String>,
) -> ApiResult<Json<Vec<BookWithAuthor>>> {
    Ok(Json(lib.search_books_by_author(author).await?))
}

// copies

/// `POST /copias/`
pub async fn create_copy(
    State(lib): State<LibraryHandle>,
    JsonBody(body): JsonBody<NewCopy>,
) -> ApiResult<Created<CopyRecord>> {
    Ok(created(lib.create_copy(body.book_id).await?))
}

/// `GET /copias/`
pub async fn list_copies(State(lib): State<LibraryHandle>) -> ApiResult<Json<Vec<CopyRecord>>> {
    Ok(Json(lib.copies().await?))
}

/// `GET /copias/{id}`
pub async fn get_copy(
    State(lib): State<LibraryHandle>,
    PathParam(id): PathParam<CopyId>,
) -> ApiResult<Json<CopyRecord>> {
    Ok(Json(lib.copy(id).await?))
}

/// `GET /copias/libro/{book_id}`
pub async fn copies_by_book(
    State(lib): State<LibraryHandle>,
    PathParam(book_id): PathParam<BookId>,
) -> ApiResult<Json<Vec<CopyRecord>>> {
    Ok(Json(lib.copies_by_book(book_id).await?))
}

/// `PUT /copias/{id}/estado`
pub async fn set_copy_state(
    State(lib): State<LibraryHandle>,
    PathParam(id): PathParam<CopyId>,
    JsonBody(body): JsonBody<CopyStateChange>,
) -> ApiResult<Json<CopyRecord>> {
    Ok(Json(lib.set_copy_state(id, body.state).await?))
}

// readers

/// `POST /lectores/`
pub async fn create_reader(
    State(lib): State<LibraryHandle>,
    JsonBody(draft): JsonBody<ReaderDraft>,
) -> ApiResult<Created<ReaderRecord>> {
    Ok(created(lib.create_reader(draft).await?))
}

/// `GET /lectores/`
pub async fn list_readers(State(lib): State<LibraryHandle>) -> ApiResult<Json<Vec<ReaderRecord>>> {
    Ok(Json(lib.readers().await?))
}

/// `GET /lectores/{id}`
pub async fn get_reader(
    State(lib): State<LibraryHandle>,
    PathParam(id): PathParam<ReaderId>,
) -> ApiResult<Json<ReaderRecord>> {
    Ok(Json(lib.reader(id).await?))
}

// loans

/// `POST /prestamos/`
pub async fn place_loan(
    State(lib): State<LibraryHandle>,
    JsonBody(req): JsonBody<LoanRequest>,
) -> ApiResult<Created<LoanRecord>> {
    Ok(created(lib.place_loan(req.reader_id, req.copy_id).await?))
}

/// `POST /prestamos/{id}/devolver`
pub async fn return_loan(
    State(lib): State<LibraryHandle>,
    PathParam(id): PathParam<LoanId>,
) -> ApiResult<Json<ReturnReceipt>> {
    Ok(Json(lib.return_loan(id).await?))
}

/// `GET /prestamos/`
pub async fn list_loans(State(lib): State<LibraryHandle>) -> ApiResult<Json<Vec<LoanRecord>>> {
    Ok(Json(lib.loans().await?))
}

/// `GET /prestamos/{id}`
pub async fn get_loan(
    State(lib): State<LibraryHandle>,
    PathParam(id): PathParam<LoanId>,
) -> ApiResult<Json<LoanRecord>> {
    Ok(Json(lib.loan(id).await?))
}

/// `GET /prestamos/lector/{reader_id}`
pub async fn active_loans(
    State(lib): State<LibraryHandle>,
    PathParam(reader_id): PathParam<ReaderId>,
) -> ApiResult<Json<Vec<LoanRecord>>> {
    Ok(Json(lib.active_loans_for(reader_id).await?))
}

// bioalert

/// `POST /bioalert/suscribir`
pub async fn subscribe(
    State(lib): State<LibraryHandle>,
    JsonBody(req): JsonBody<SubscriptionRequest>,
) -> ApiResult<Created<SubscriptionRecord>> {
    Ok(created(lib.subscribe(req.reader_id, req.book_id).await?))
}

/// `GET /bioalert/notificaciones`
pub async fn notifications(State(lib): State<LibraryHandle>) -> ApiResult<Json<NotificationHistory>> {
    Ok(Json(NotificationHistory {
        notifications: lib.notifications().await?,
    }))
}

/// `GET /bioalert/suscripciones/libro/{book_id}`
pub async fn subscriptions_for_book(
    State(lib): State<LibraryHandle>,
    PathParam(book_id): PathParam<BookId>,
) -> ApiResult<Json<Vec<SubscriptionRecord>>> {
    Ok(Json(lib.subscriptions_for_book(book_id).await?))
}
