//! Pure state machine behind a list view.
//!
//! Every operation returns the fetch it wants issued (if any) as a
//! [`FetchTicket`]; the driver runs the fetch and hands the outcome back to
//! [`ListState::settle`]. Only the most recently issued ticket may change
//! the visible state.

use tracing::debug;

use crate::error::TaskdeskError;
use crate::types::{PageRequest, PageResult};

/// An issued fetch: the request plus a sequence number that orders it
/// against every other fetch of the same view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub seq: u64,
    pub request: PageRequest,
}

/// What applying a fetch outcome did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// Result stored.
    Applied,
    /// Error message stored; items kept.
    Failed,
    /// Credentials rejected. The caller must drop the session and leave
    /// the view.
    Unauthorized,
    /// Superseded by a later fetch; nothing changed.
    Stale,
}

/// View-local state of one list screen.
#[derive(Debug, Clone, PartialEq)]
pub struct ListState<T> {
    /// Text box contents, updated on every keystroke.
    pub search_input: String,
    /// Search text actually sent to the API.
    pub debounced_search: String,
    pub extra_filter: Option<String>,
    /// Page the view wants to show.
    pub page: u32,
    pub page_size: u32,
    pub items: Vec<T>,
    /// Page the last applied result reported.
    pub current_page: u32,
    pub total_pages: u32,
    pub total_items: u64,
    pub loading: bool,
    pub error: Option<String>,
    next_seq: u64,
    in_flight: Option<FetchTicket>,
    applied_commands: u64,
}

impl<T> ListState<T> {
    pub fn new(page_size: u32, extra_filter: Option<String>) -> Self {
        Self {
            search_input: String::new(),
            debounced_search: String::new(),
            extra_filter: normalize_filter(extra_filter),
            page: 1,
            page_size: page_size.max(1),
            items: Vec::new(),
            current_page: 1,
            total_pages: 1,
            total_items: 0,
            loading: false,
            error: None,
            next_seq: 0,
            in_flight: None,
            applied_commands: 0,
        }
    }

    /// Initial fetch when the view appears.
    pub fn mount(&mut self) -> FetchTicket {
        self.issue()
    }

    /// Echo typed text into the search box. Fetching waits for the
    /// debounced value.
    pub fn set_search_input(&mut self, text: String) {
        self.search_input = text;
        self.error = None;
    }

    /// A new debounced search value arrived.
    ///
    /// A changed search always lands on page 1 and produces a single fetch
    /// for `(1, new text)`.
    pub fn apply_search(&mut self, text: String) -> Option<FetchTicket> {
        if text == self.debounced_search {
            return None;
        }
        self.debounced_search = text;
        self.page = 1;
        Some(self.issue())
    }

    /// Change the secondary filter. Empty strings mean "no filter".
    pub fn set_extra_filter(&mut self, filter: Option<String>) -> Option<FetchTicket> {
        let filter = normalize_filter(filter);
        if filter == self.extra_filter {
            return None;
        }
        self.extra_filter = filter;
        self.page = 1;
        Some(self.issue())
    }

    /// Move to page `n`, clamped to `[1, total_pages]`. Staying on the same
    /// page issues nothing.
    pub fn set_page(&mut self, n: u32) -> Option<FetchTicket> {
        let target = n.clamp(1, self.total_pages.max(1));
        if target == self.page {
            return None;
        }
        self.page = target;
        Some(self.issue())
    }

    pub fn next_page(&mut self) -> Option<FetchTicket> {
        self.set_page(self.page.saturating_add(1))
    }

    pub fn prev_page(&mut self) -> Option<FetchTicket> {
        self.set_page(self.page.saturating_sub(1))
    }

    /// Fetch the current `(page, search, filter)` again.
    pub fn refetch(&mut self) -> FetchTicket {
        self.issue()
    }

    /// Apply the outcome of `ticket`. Anything but the latest ticket is
    /// discarded.
    pub fn settle(
        &mut self,
        ticket: &FetchTicket,
        outcome: Result<PageResult<T>, TaskdeskError>,
    ) -> Settlement {
        if self.in_flight.as_ref() != Some(ticket) {
            debug!(
                seq = ticket.seq,
                page = ticket.request.page,
                search = %ticket.request.search,
                "discarding stale page"
            );
            return Settlement::Stale;
        }
        self.in_flight = None;
        self.loading = false;

        match outcome {
            Ok(result) => {
                self.items = result.items;
                self.total_items = result.total_items;
                self.total_pages = if result.total_items == 0 {
                    1
                } else {
                    result.total_pages.max(1)
                };
                self.current_page = result.current_page.max(1);
                self.page = self.current_page;
                self.error = None;
                Settlement::Applied
            }
            Err(e) if e.is_auth_failure() => Settlement::Unauthorized,
            Err(e) => {
                self.error = Some(e.user_message());
                Settlement::Failed
            }
        }
    }

    /// The fetch whose result the view is waiting for.
    pub fn in_flight(&self) -> Option<&FetchTicket> {
        self.in_flight.as_ref()
    }

    /// Nothing outstanding: no fetch in flight and no typed text waiting
    /// for the debounce.
    pub fn is_settled(&self) -> bool {
        !self.loading && self.search_input == self.debounced_search
    }

    /// Number of user commands the driver has folded into this state.
    pub fn applied_commands(&self) -> u64 {
        self.applied_commands
    }

    pub(crate) fn mark_command_applied(&mut self) {
        self.applied_commands += 1;
    }

    fn issue(&mut self) -> FetchTicket {
        self.next_seq += 1;
        let ticket = FetchTicket {
            seq: self.next_seq,
            request: PageRequest::new(self.page, self.page_size)
                .with_search(self.debounced_search.clone())
                .with_filter(self.extra_filter.clone()),
        };
        self.in_flight = Some(ticket.clone());
        self.loading = true;
        ticket
    }
}

fn normalize_filter(filter: Option<String>) -> Option<String> {
    filter.filter(|f| !f.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(items: Vec<u32>, total: u64, current: u32) -> PageResult<u32> {
        PageResult {
            items,
            total_items: total,
            current_page: current,
            total_pages: crate::types::page_count(total, 10),
            page_size: 10,
        }
    }

    /// State that has loaded page 1 of `total` rows.
    fn loaded(total: u64) -> ListState<u32> {
        let mut s = ListState::new(10, None);
        let t = s.mount();
        assert_eq!(s.settle(&t, Ok(page(vec![1, 2, 3], total, 1))), Settlement::Applied);
        s
    }

    #[test]
    fn test_mount_requests_first_page() {
        let mut s: ListState<u32> = ListState::new(10, None);
        let t = s.mount();
        assert_eq!(t.request, PageRequest::new(1, 10));
        assert!(s.loading);
    }

    #[test]
    fn test_search_change_on_later_page_fetches_page_one_once() {
        let mut s = loaded(50);
        let t = s.set_page(3).unwrap();
        s.settle(&t, Ok(page(vec![21], 50, 3)));
        assert_eq!(s.page, 3);

        let t = s.apply_search("alice".into()).unwrap();
        assert_eq!(t.request.page, 1);
        assert_eq!(t.request.search, "alice");
        assert_eq!(s.page, 1);

        // Same debounced value again is not a change.
        assert!(s.apply_search("alice".into()).is_none());
    }

    #[test]
    fn test_set_page_clamps_to_total_pages() {
        let mut s = loaded(23);
        assert_eq!(s.total_pages, 3);
        let t = s.set_page(4).unwrap();
        assert_eq!(t.request.page, 3);
        assert_eq!(s.page, 3);
        assert!(s.set_page(0).unwrap().request.page == 1);
    }

    #[test]
    fn test_set_page_to_current_page_is_noop() {
        let mut s = loaded(23);
        assert!(s.set_page(1).is_none());
        assert!(s.prev_page().is_none());
        assert_eq!(s.next_page().unwrap().request.page, 2);
    }

    #[test]
    fn test_empty_result_reports_one_page() {
        let mut s: ListState<u32> = ListState::new(10, None);
        let t = s.mount();
        let empty = PageResult {
            items: vec![],
            total_items: 0,
            current_page: 1,
            total_pages: 0,
            page_size: 10,
        };
        s.settle(&t, Ok(empty));
        assert_eq!(s.total_pages, 1);
        assert!(s.items.is_empty());
    }

    #[test]
    fn test_stale_ticket_is_discarded() {
        let mut s = loaded(30);
        let a = s.refetch();
        let b = s.set_page(2).unwrap();

        assert_eq!(s.settle(&b, Ok(page(vec![11, 12], 30, 2))), Settlement::Applied);
        assert_eq!(s.settle(&a, Ok(page(vec![1, 2], 30, 1))), Settlement::Stale);
        assert_eq!(s.items, vec![11, 12]);
        assert_eq!(s.current_page, 2);
    }

    #[test]
    fn test_loading_keeps_previous_items() {
        let mut s = loaded(30);
        s.set_page(2);
        assert!(s.loading);
        assert_eq!(s.items, vec![1, 2, 3]);
    }

    #[test]
    fn test_failure_keeps_items_and_sets_message() {
        let mut s = loaded(30);
        let t = s.refetch();
        let outcome = Err(TaskdeskError::ServerUnavailable("Server unavailable".into()));
        assert_eq!(s.settle(&t, outcome), Settlement::Failed);
        assert_eq!(s.error.as_deref(), Some("Server unavailable"));
        assert!(!s.loading);
        assert_eq!(s.items, vec![1, 2, 3]);
    }

    #[test]
    fn test_typing_clears_error() {
        let mut s = loaded(30);
        let t = s.refetch();
        s.settle(&t, Err(TaskdeskError::ServerUnavailable("down".into())));
        s.set_search_input("a".into());
        assert!(s.error.is_none());
        assert!(!s.is_settled());
    }

    #[test]
    fn test_auth_failure_sets_no_error() {
        let mut s = loaded(30);
        let t = s.refetch();
        assert_eq!(
            s.settle(&t, Err(TaskdeskError::Unauthorized)),
            Settlement::Unauthorized
        );
        assert!(s.error.is_none());
    }

    #[test]
    fn test_filter_change_resets_page() {
        let mut s = loaded(30);
        let t = s.set_page(2).unwrap();
        s.settle(&t, Ok(page(vec![11], 30, 2)));

        let t = s.set_extra_filter(Some("D".into())).unwrap();
        assert_eq!(t.request.page, 1);
        assert_eq!(t.request.filter.as_deref(), Some("D"));
        assert!(s.set_extra_filter(Some("D".into())).is_none());
        // Empty string clears the filter.
        let t = s.set_extra_filter(Some(String::new())).unwrap();
        assert_eq!(t.request.filter, None);
    }
}
