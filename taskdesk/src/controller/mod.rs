//! List view controller: keeps one screen's visible page in step with its
//! search box, filter and page number.
//!
//! # Architecture
//!
//! ```text
//!   ListController (handle)            background task (owns ListState)
//!   set_search_input ─┐                ┌─ Debounced<String> ── apply_search
//!   set_extra_filter ─┼─ mpsc ────────>┤
//!   set_page/refetch ─┘                ├─ spawned fetches ──── settle
//!                                      │
//!   subscribe()/state() <── watch ─────┘
//! ```
//!
//! Fetches run as independent tasks and are never cancelled; the state
//! machine ignores any outcome that is not for the latest issued fetch.

mod state;

pub use state::{FetchTicket, ListState, Settlement};

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::{DEFAULT_DEBOUNCE, DEFAULT_PAGE_SIZE};
use crate::debounce::Debounced;
use crate::error::Result;
use crate::navigation::{Navigator, Route};
use crate::session::SessionStore;
use crate::types::{PageRequest, PageResult};

/// Future returned by a page fetch function.
pub type FetchFuture<T> = Pin<Box<dyn Future<Output = Result<PageResult<T>>> + Send>>;

/// Page fetch function supplied by the host screen.
pub type FetchFn<T> = dyn Fn(PageRequest) -> FetchFuture<T> + Send + Sync;

/// Per-screen controller parameters.
#[derive(Debug, Clone)]
pub struct ListOptions {
    pub page_size: u32,
    pub debounce: Duration,
    pub extra_filter: Option<String>,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            debounce: DEFAULT_DEBOUNCE,
            extra_filter: None,
        }
    }
}

#[derive(Debug)]
enum Command {
    SearchInput(String),
    ExtraFilter(Option<String>),
    SetPage(u32),
    NextPage,
    PrevPage,
    Refetch,
}

/// Handle to a mounted list view. Dropping it unmounts the view.
pub struct ListController<T> {
    commands: mpsc::UnboundedSender<Command>,
    sent_commands: AtomicU64,
    state_rx: watch::Receiver<ListState<T>>,
    cancel: CancellationToken,
    task_handle: Option<JoinHandle<()>>,
}

impl<T> ListController<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Mount the view: spawn the controller task and issue the first fetch.
    /// Must be called from within a tokio runtime.
    pub fn mount(
        fetch: Arc<FetchFn<T>>,
        session: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
        options: ListOptions,
    ) -> Self {
        let (commands, command_rx) = mpsc::unbounded_channel();
        let mut initial = ListState::new(options.page_size, options.extra_filter.clone());
        let first = initial.mount();
        let (state_tx, state_rx) = watch::channel(initial.clone());
        let cancel = CancellationToken::new();

        let handle = tokio::spawn(run_controller(
            initial,
            first,
            fetch,
            session,
            navigator,
            options.debounce,
            command_rx,
            state_tx,
            cancel.clone(),
        ));

        Self {
            commands,
            sent_commands: AtomicU64::new(0),
            state_rx,
            cancel,
            task_handle: Some(handle),
        }
    }

    pub fn set_search_input(&self, text: impl Into<String>) {
        self.send(Command::SearchInput(text.into()));
    }

    pub fn set_extra_filter(&self, filter: Option<String>) {
        self.send(Command::ExtraFilter(filter));
    }

    pub fn set_page(&self, page: u32) {
        self.send(Command::SetPage(page));
    }

    pub fn next_page(&self) {
        self.send(Command::NextPage);
    }

    pub fn prev_page(&self) {
        self.send(Command::PrevPage);
    }

    /// Re-issue the fetch for the current page, search and filter. Call
    /// after a server-side mutation to resynchronise the list.
    pub fn refetch(&self) {
        self.send(Command::Refetch);
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> ListState<T> {
        self.state_rx.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<ListState<T>> {
        self.state_rx.clone()
    }

    /// Wait until every command sent so far has been applied and nothing
    /// is pending. Returns early with the last state if the view was left
    /// (e.g. redirected to login).
    pub async fn settled(&self) -> ListState<T> {
        let sent = self.sent_commands.load(Ordering::SeqCst);
        let mut rx = self.state_rx.clone();
        let result = rx
            .wait_for(|s| s.applied_commands() >= sent && s.is_settled())
            .await
            .map(|s| s.clone());
        match result {
            Ok(state) => state,
            Err(_) => rx.borrow().clone(),
        }
    }

    /// Whether the controller task is still running.
    pub fn is_mounted(&self) -> bool {
        self.task_handle
            .as_ref()
            .is_some_and(|h| !h.is_finished())
    }

    /// Tear the view down. Pending debounces and in-flight results are
    /// dropped.
    pub fn unmount(&mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.task_handle.take() {
            handle.abort();
        }
    }

    fn send(&self, cmd: Command) {
        if self.commands.send(cmd).is_ok() {
            self.sent_commands.fetch_add(1, Ordering::SeqCst);
        }
    }
}

impl<T> Drop for ListController<T> {
    fn drop(&mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.task_handle.take() {
            handle.abort();
        }
    }
}

// ---------------------------------------------------------------------------
// Background task
// ---------------------------------------------------------------------------

type Settled<T> = (FetchTicket, Result<PageResult<T>>);

#[allow(clippy::too_many_arguments)]
async fn run_controller<T>(
    mut state: ListState<T>,
    first: FetchTicket,
    fetch: Arc<FetchFn<T>>,
    session: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
    debounce: Duration,
    mut command_rx: mpsc::UnboundedReceiver<Command>,
    state_tx: watch::Sender<ListState<T>>,
    cancel: CancellationToken,
) where
    T: Clone + Send + Sync + 'static,
{
    let search = Debounced::new(String::new(), debounce);
    let mut search_rx = search.subscribe();
    let (settle_tx, mut settle_rx) = mpsc::unbounded_channel::<Settled<T>>();

    spawn_fetch(&fetch, first, &settle_tx);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!("list view unmounted");
                break;
            }
            cmd = command_rx.recv() => {
                let Some(cmd) = cmd else { break };
                let ticket = match cmd {
                    Command::SearchInput(text) => {
                        search.set(text.clone());
                        state.set_search_input(text);
                        None
                    }
                    Command::ExtraFilter(filter) => state.set_extra_filter(filter),
                    Command::SetPage(n) => state.set_page(n),
                    Command::NextPage => state.next_page(),
                    Command::PrevPage => state.prev_page(),
                    Command::Refetch => Some(state.refetch()),
                };
                if let Some(ticket) = ticket {
                    spawn_fetch(&fetch, ticket, &settle_tx);
                }
                state.mark_command_applied();
                state_tx.send_replace(state.clone());
            }
            changed = search_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let text = search_rx.borrow_and_update().clone();
                if let Some(ticket) = state.apply_search(text) {
                    spawn_fetch(&fetch, ticket, &settle_tx);
                }
                state_tx.send_replace(state.clone());
            }
            Some((ticket, outcome)) = settle_rx.recv() => {
                if let Err(e) = &outcome {
                    if !e.is_auth_failure() {
                        warn!(page = ticket.request.page, error = %e, "page fetch failed");
                    }
                }
                match state.settle(&ticket, outcome) {
                    Settlement::Unauthorized => {
                        warn!("credentials rejected, signing out");
                        session.clear();
                        navigator.go_to(Route::Login);
                        state_tx.send_replace(state.clone());
                        break;
                    }
                    Settlement::Applied => {
                        debug!(
                            page = state.current_page,
                            total_pages = state.total_pages,
                            total_items = state.total_items,
                            "page applied"
                        );
                    }
                    Settlement::Failed | Settlement::Stale => {}
                }
                state_tx.send_replace(state.clone());
            }
        }
    }
}

fn spawn_fetch<T>(
    fetch: &Arc<FetchFn<T>>,
    ticket: FetchTicket,
    settle_tx: &mpsc::UnboundedSender<Settled<T>>,
) where
    T: Send + 'static,
{
    debug!(
        seq = ticket.seq,
        page = ticket.request.page,
        search = %ticket.request.search,
        filter = ?ticket.request.filter,
        "fetching page"
    );
    let fut = fetch(ticket.request.clone());
    let tx = settle_tx.clone();
    tokio::spawn(async move {
        let outcome = fut.await;
        // The view may be gone; superseded results are simply dropped.
        let _ = tx.send((ticket, outcome));
    });
}
