use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot};

use crate::{
    core::join::BookWithAuthor,
    engine::{clock::Clock, loans::ReturnReceipt},
    error::{LibraryError, LibraryResult},
    library::Library,
    notify::Notification,
    records::{
        AuthorDraft, AuthorRecord, BookDraft, BookRecord, CopyRecord, LoanRecord, ReaderDraft,
        ReaderRecord, SubscriptionRecord,
    },
    types::{AuthorId, BookId, CopyId, CopyState, LoanId, ReaderId, SubscriptionId},
};

use super::events::LibraryEvent;

/// Failure seen by a [`LibraryHandle`] caller.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The operation itself was refused.
    #[error(transparent)]
    Library(#[from] LibraryError),
    /// The runtime task has stopped.
    #[error("library runtime is not running")]
    ChannelClosed,
}

/// Channel sizes for the runtime task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Pending commands before senders wait.
    pub command_queue_bound: usize,
    /// Events buffered per lagging subscriber.
    pub event_capacity: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            command_queue_bound: 256,
            event_capacity: 1024,
        }
    }
}

/// Cloneable front end of the runtime task.
#[derive(Debug, Clone)]
pub struct LibraryHandle {
    cmd_tx: mpsc::Sender<Command>,
    events_tx: broadcast::Sender<LibraryEvent>,
}

type Reply<T> = oneshot::Sender<LibraryResult<T>>;

enum Command {
    CreateAuthor {
        draft: AuthorDraft,
        resp: Reply<AuthorRecord>,
    },
    Author {
        id: AuthorId,
        resp: Reply<AuthorRecord>,
    },
    Authors {
        resp: oneshot::Sender<Vec<AuthorRecord>>,
    },
    CreateBook {
        draft: BookDraft,
        resp: Reply<BookRecord>,
    },
    Book {
        id: BookId,
        resp: Reply<BookWithAuthor>,
    },
    Books {
        resp: oneshot::Sender<Vec<BookWithAuthor>>,
    },
    SearchBooks {
        author_fragment: String,
        resp: oneshot::Sender<Vec<BookWithAuthor>>,
    },
    CreateCopy {
        book_id: BookId,
        resp: Reply<CopyRecord>,
    },
    Copy {
        id: CopyId,
        resp: Reply<CopyRecord>,
    },
    Copies {
        resp: oneshot::Sender<Vec<CopyRecord>>,
    },
    CopiesByBook {
        book_id: BookId,
        resp: Reply<Vec<CopyRecord>>,
    },
    SetCopyState {
        id: CopyId,
        state: CopyState,
        resp: Reply<CopyRecord>,
    },
    CreateReader {
        draft: ReaderDraft,
        resp: Reply<ReaderRecord>,
    },
    Reader {
        id: ReaderId,
        resp: Reply<ReaderRecord>,
    },
    Readers {
        resp: oneshot::Sender<Vec<ReaderRecord>>,
    },
    ReducePenalty {
        id: ReaderId,
        days: u32,
        resp: Reply<ReaderRecord>,
    },
    PlaceLoan {
        reader_id: ReaderId,
        copy_id: CopyId,
        resp: Reply<LoanRecord>,
    },
    ReturnLoan {
        id: LoanId,
        resp: Reply<ReturnReceipt>,
    },
    Loan {
        id: LoanId,
        resp: Reply<LoanRecord>,
    },
    Loans {
        resp: oneshot::Sender<Vec<LoanRecord>>,
    },
    ActiveLoans {
        reader_id: ReaderId,
        resp: Reply<Vec<LoanRecord>>,
    },
    Subscribe {
        reader_id: ReaderId,
        book_id: BookId,
        resp: Reply<SubscriptionRecord>,
    },
    Unsubscribe {
        id: SubscriptionId,
        resp: Reply<SubscriptionRecord>,
    },
    SubscriptionsForBook {
        book_id: BookId,
        resp: Reply<Vec<SubscriptionRecord>>,
    },
    Notifications {
        resp: oneshot::Sender<Vec<Notification>>,
    },
    Shutdown {
        resp: oneshot::Sender<()>,
    },
}

/// Moves `library` into a dedicated task and returns the handle that drives it.
///
/// Commands are applied one at a time in arrival order.
pub fn spawn_library<C: Clock>(library: Library<C>, config: RuntimeConfig) -> LibraryHandle {
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<Command>(config.command_queue_bound);
    let (events_tx, _) = broadcast::channel::<LibraryEvent>(config.event_capacity);

    let events_tx_loop = events_tx.clone();

    tokio::spawn(async move {
        let mut library = library;
        while let Some(cmd) = cmd_rx.recv().await {
            let sent_before = library.notifications().len();
            let done = handle_command(cmd, &mut library, &events_tx_loop);

            let count = library.notifications().len() - sent_before;
            if count > 0 {
                let _ = events_tx_loop.send(LibraryEvent::NotificationsSent { count });
            }
            if done {
                break;
            }
        }
        tracing::debug!("library runtime stopped");
    });

    LibraryHandle { cmd_tx, events_tx }
}

impl LibraryHandle {
    /// Receiver for events emitted after each applied command.
    pub fn subscribe_events(&self) -> broadcast::Receiver<LibraryEvent> {
        self.events_tx.subscribe()
    }

    async fn request<T>(&self, make: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(make(tx))
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    async fn call<T>(&self, make: impl FnOnce(Reply<T>) -> Command) -> Result<T, RuntimeError> {
        Ok(self.request(make).await??)
    }

    /// See [`Library::create_author`].
    pub async fn create_author(&self, draft: AuthorDraft) -> Result<AuthorRecord, RuntimeError> {
        self.call(|resp| Command::CreateAuthor { draft, resp }).await
    }

    /// See [`Library::author`].
    pub async fn author(&self, id: AuthorId) -> Result<AuthorRecord, RuntimeError> {
        self.call(|resp| Command::Author { id, resp }).await
    }

    /// See [`Library::authors`].
    pub async fn authors(&self) -> Result<Vec<AuthorRecord>, RuntimeError> {
        self.request(|resp| Command::Authors { resp }).await
    }

    /// See [`Library::create_book`].
    pub async fn create_book(&self, draft: BookDraft) -> Result<BookRecord, RuntimeError> {
        self.call(|resp| Command::CreateBook { draft, resp }).await
    }

    /// See [`Library::book`].
    pub async fn book(&self, id: BookId) -> Result<BookWithAuthor, RuntimeError> {
        self.call(|resp| Command::Book { id, resp }).await
    }

    /// See [`Library::books`].
    pub async fn books(&self) -> Result<Vec<BookWithAuthor>, RuntimeError> {
        self.request(|resp| Command::Books { resp }).await
    }

    /// See [`Library::search_books_by_author`].
    pub async fn search_books_by_author(
        &self,
        author_fragment: impl Into<String>,
    ) -> Result<Vec<BookWithAuthor>, RuntimeError> {
        let author_fragment = author_fragment.into();
        self.request(|resp| Command::SearchBooks {
            author_fragment,
            resp,
        })
        .await
    }

    /// See [`Library::create_copy`].
    pub async fn create_copy(&self, book_id: BookId) -> Result<CopyRecord, RuntimeError> {
        self.call(|resp| Command::CreateCopy { book_id, resp }).await
    }

    /// See [`Library::copy`].
    pub async fn copy(&self, id: CopyId) -> Result<CopyRecord, RuntimeError> {
        self.call(|resp| Command::Copy { id, resp }).await
    }

    /// See [`Library::copies`].
    pub async fn copies(&self) -> Result<Vec<CopyRecord>, RuntimeError> {
        self.request(|resp| Command::Copies { resp }).await
    }

    /// See [`Library::copies_by_book`].
    pub async fn copies_by_book(&self, book_id: BookId) -> Result<Vec<CopyRecord>, RuntimeError> {
        self.call(|resp| Command::CopiesByBook { book_id, resp }).await
    }

    /// See [`Library::set_copy_state`].
    pub async fn set_copy_state(&self, id: CopyId, state: CopyState) -> Result<CopyRecord, RuntimeError> {
        self.call(|resp| Command::SetCopyState { id, state, resp }).await
    }

    /// See [`Library::create_reader`].
    pub async fn create_reader(&self, draft: ReaderDraft) -> Result<ReaderRecord, RuntimeError> {
        self.call(|resp| Command::CreateReader { draft, resp }).await
    }

    /// See [`Library::reader`].
    pub async fn reader(&self, id: ReaderId) -> Result<ReaderRecord, RuntimeError> {
        self.call(|resp| Command::Reader { id, resp }).await
    }

    /// See [`Library::readers`].
    pub async fn readers(&self) -> Result<Vec<ReaderRecord>, RuntimeError> {
        self.request(|resp| Command::Readers { resp }).await
    }

    /// See [`Library::reduce_penalty`].
    pub async fn reduce_penalty(&self, id: ReaderId, days: u32) -> Result<ReaderRecord, RuntimeError> {
        self.call(|resp| Command::ReducePenalty { id, days, resp }).await
    }

    /// See [`Library::place_loan`].
    pub async fn place_loan(&self, reader_id: ReaderId, copy_id: CopyId) -> Result<LoanRecord, RuntimeError> {
        self.call(|resp| Command::PlaceLoan {
            reader_id,
            copy_id,
            resp,
        })
        .await
    }

    /// See [`Library::return_loan`].
    pub async fn return_loan(&self, id: LoanId) -> Result<ReturnReceipt, RuntimeError> {
        self.call(|resp| Command::ReturnLoan { id, resp }).await
    }

    /// See [`Library::loan`].
    pub async fn loan(&self, id: LoanId) -> Result<LoanRecord, RuntimeError> {
        self.call(|resp| Command::Loan { id, resp }).await
    }

    /// See [`Library::loans`].
    pub async fn loans(&self) -> Result<Vec<LoanRecord>, RuntimeError> {
        self.request(|resp| Command::Loans { resp }).await
    }

    /// See [`Library::active_loans_for`].
    pub async fn active_loans_for(&self, reader_id: ReaderId) -> Result<Vec<LoanRecord>, RuntimeError> {
        self.call(|resp| Command::ActiveLoans { reader_id, resp }).await
    }

    /// See [`Library::subscribe`].
    pub async fn subscribe(&self, reader_id: ReaderId, book_id: BookId) -> Result<SubscriptionRecord, RuntimeError> {
        self.call(|resp| Command::Subscribe {
            reader_id,
            book_id,
            resp,
        })
        .await
    }

    /// See [`Library::unsubscribe`].
    pub async fn unsubscribe(&self, id: SubscriptionId) -> Result<SubscriptionRecord, RuntimeError> {
        self.call(|resp| Command::Unsubscribe { id, resp }).await
    }

    /// See [`Library::subscriptions_for_book`].
    pub async fn subscriptions_for_book(&self, book_id: BookId) -> Result<Vec<SubscriptionRecord>, RuntimeError> {
        self.call(|resp| Command::SubscriptionsForBook { book_id, resp }).await
    }

    /// Snapshot of the notification history.
    pub async fn notifications(&self) -> Result<Vec<Notification>, RuntimeError> {
        self.request(|resp| Command::Notifications { resp }).await
    }

    /// Stops the runtime task after the commands queued before this one.
    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        self.request(|resp| Command::Shutdown { resp }).await
    }
}

fn handle_command<C: Clock>(
    cmd: Command,
    library: &mut Library<C>,
    events_tx: &broadcast::Sender<LibraryEvent>,
) -> bool {
    let emit = |event: LibraryEvent| {
        let _ = events_tx.send(event);
    };

    match cmd {
        Command::CreateAuthor { draft, resp } => {
            let res = library.create_author(draft);
            if let Ok(rec) = &res {
                emit(LibraryEvent::AuthorCreated { id: rec.id });
            }
            let _ = resp.send(res);
        }
        Command::Author { id, resp } => {
            let _ = resp.send(library.author(id));
        }
        Command::Authors { resp } => {
            let _ = resp.send(library.authors());
        }
        Command::CreateBook { draft, resp } => {
            let res = library.create_book(draft);
            if let Ok(rec) = &res {
                emit(LibraryEvent::BookCreated { id: rec.id });
            }
            let _ = resp.send(res);
        }
        Command::Book { id, resp } => {
            let _ = resp.send(library.book(id));
        }
        Command::Books { resp } => {
            let _ = resp.send(library.books());
        }
        Command::SearchBooks {
            author_fragment,
            resp,
        } => {
            let _ = resp.send(library.search_books_by_author(&author_fragment));
        }
        Command::CreateCopy { book_id, resp } => {
            let res = library.create_copy(book_id);
            if let Ok(rec) = &res {
                emit(LibraryEvent::CopyCreated { id: rec.id });
            }
            let _ = resp.send(res);
        }
        Command::Copy { id, resp } => {
            let _ = resp.send(library.copy(id));
        }
        Command::Copies { resp } => {
            let _ = resp.send(library.copies());
        }
        Command::CopiesByBook { book_id, resp } => {
            let _ = resp.send(library.copies_by_book(book_id));
        }
        Command::SetCopyState { id, state, resp } => {
            let res = library.set_copy_state(id, state);
            if let Ok(rec) = &res {
                emit(LibraryEvent::CopyStateChanged {
                    copy_id: rec.id,
                    state: rec.state,
                });
            }
            let _ = resp.send(res);
        }
        Command::CreateReader { draft, resp } => {
            let res = library.create_reader(draft);
            if let Ok(rec) = &res {
                emit(LibraryEvent::ReaderCreated { id: rec.id });
            }
            let _ = resp.send(res);
        }
        Command::Reader { id, resp } => {
            let _ = resp.send(library.reader(id));
        }
        Command::Readers { resp } => {
            let _ = resp.send(library.readers());
        }
        Command::ReducePenalty { id, days, resp } => {
            let res = library.reduce_penalty(id, days);
            if let Ok(rec) = &res {
                emit(LibraryEvent::PenaltyReduced {
                    reader_id: rec.id,
                    penalty_days: rec.penalty_days,
                });
            }
            let _ = resp.send(res);
        }
        Command::PlaceLoan {
            reader_id,
            copy_id,
            resp,
        } => {
            let res = library.place_loan(reader_id, copy_id);
            match &res {
                Ok(loan) => {
                    emit(LibraryEvent::LoanPlaced {
                        loan_id: loan.id,
                        reader_id: loan.reader_id,
                        copy_id: loan.copy_id,
                    });
                    emit(LibraryEvent::CopyStateChanged {
                        copy_id: loan.copy_id,
                        state: CopyState::Loaned,
                    });
                }
                Err(err) => tracing::debug!(reader_id, copy_id, %err, "loan refused"),
            }
            let _ = resp.send(res);
        }
        Command::ReturnLoan { id, resp } => {
            let res = library.return_loan(id);
            match &res {
                Ok(receipt) => {
                    emit(LibraryEvent::LoanReturned {
                        loan_id: receipt.loan.id,
                        delay_days: receipt.delay_days,
                        penalty_days_added: receipt.penalty_days_added,
                    });
                    emit(LibraryEvent::CopyStateChanged {
                        copy_id: receipt.loan.copy_id,
                        state: CopyState::InLibrary,
                    });
                }
                Err(err) => tracing::debug!(loan_id = id, %err, "return refused"),
            }
            let _ = resp.send(res);
        }
        Command::Loan { id, resp } => {
            let _ = resp.send(library.loan(id));
        }
        Command::Loans { resp } => {
            let _ = resp.send(library.loans());
        }
        Command::ActiveLoans { reader_id, resp } => {
            let _ = resp.send(library.active_loans_for(reader_id));
        }
        Command::Subscribe {
            reader_id,
            book_id,
            resp,
        } => {
            let res = library.subscribe(reader_id, book_id);
            if let Ok(sub) = &res {
                emit(LibraryEvent::Subscribed {
                    subscription_id: sub.id,
                    reader_id: sub.reader_id,
                    book_id: sub.book_id,
                });
            }
            let _ = resp.send(res);
        }
        Command::Unsubscribe { id, resp } => {
            let res = library.unsubscribe(id);
            if res.is_ok() {
                emit(LibraryEvent::Unsubscribed { subscription_id: id });
            }
            let _ = resp.send(res);
        }
        Command::SubscriptionsForBook { book_id, resp } => {
            let _ = resp.send(library.subscriptions_for_book(book_id));
        }
        Command::Notifications { resp } => {
            let _ = resp.send(library.notifications().to_vec());
        }
        Command::Shutdown { resp } => {
            let _ = resp.send(());
            return true;
        }
    }

    false
}
