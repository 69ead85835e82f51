//! In-memory view of the signed-in user's task list.
//!
//! The controller owns the visible page, the active filter and the page
//! cursor. Every list call is tagged with a generation number; only the
//! response to the most recently issued call may replace the visible page.

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use crate::error::Result;
use crate::models::{page_count, Task, TaskFilter};
use crate::tasks::TaskQueryService;

/// What a list-affecting operation did to the visible state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListOutcome {
    /// A fresh page replaced the visible tasks.
    Applied,
    /// A newer list call was issued while this one was in flight; the
    /// response was dropped.
    Stale,
    /// State changed locally without a round trip.
    Local,
}

/// Point-in-time copy of the controller state for rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSnapshot {
    pub tasks: Vec<Task>,
    pub filter: TaskFilter,
    pub page_number: u32,
    pub page_size: u32,
    pub total_count: u64,
    pub page_count: u64,
}

#[derive(Debug)]
struct ListState {
    tasks: Vec<Task>,
    filter: TaskFilter,
    page_number: u32,
    total_count: u64,
    generation: u64,
}

impl Default for ListState {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            filter: TaskFilter::default(),
            page_number: 1,
            total_count: 0,
            generation: 0,
        }
    }
}

/// A list call that has been issued but not yet answered. The filter and
/// page it asks for only become visible once its response is applied.
struct Ticket {
    generation: u64,
    filter: TaskFilter,
    page_number: u32,
}

pub struct TaskListController {
    service: TaskQueryService,
    owner_id: String,
    page_size: u32,
    state: Mutex<ListState>,
}

impl TaskListController {
    pub fn new(service: TaskQueryService, owner_id: impl Into<String>, page_size: u32) -> Self {
        Self {
            service,
            owner_id: owner_id.into(),
            page_size,
            state: Mutex::new(ListState::default()),
        }
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Replace the active filter and re-list. A changed filter starts over
    /// at page 1; a page number inside `filter` only counts when the
    /// constraints are unchanged.
    pub async fn apply_filter(&self, filter: &TaskFilter) -> Result<ListOutcome> {
        let requested = filter.stripped();
        let next = requested.without_pagination();
        let ticket = {
            let mut state = self.lock();
            let page_number = if next == state.filter {
                requested.page_number.unwrap_or(state.page_number)
            } else {
                1
            };
            Self::issue(&mut state, next, page_number)
        };
        self.fetch(ticket).await
    }

    pub async fn change_page(&self, page_number: u32) -> Result<ListOutcome> {
        let ticket = {
            let mut state = self.lock();
            let filter = state.filter.clone();
            Self::issue(&mut state, filter, page_number.max(1))
        };
        self.fetch(ticket).await
    }

    /// Re-list with the current filter and page.
    pub async fn refresh(&self) -> Result<ListOutcome> {
        let ticket = {
            let mut state = self.lock();
            let (filter, page_number) = (state.filter.clone(), state.page_number);
            Self::issue(&mut state, filter, page_number)
        };
        self.fetch(ticket).await
    }

    pub async fn after_create(&self) -> Result<ListOutcome> {
        self.refresh().await
    }

    pub async fn after_update(&self) -> Result<ListOutcome> {
        self.refresh().await
    }

    /// Drop `id` from the visible page. Steps back one page and re-lists when
    /// that leaves a page past the first empty.
    pub async fn after_delete(&self, id: &str) -> Result<ListOutcome> {
        let ticket = {
            let mut state = self.lock();
            let before = state.tasks.len();
            state.tasks.retain(|task| task.id != id);
            if state.tasks.len() < before {
                state.total_count = state.total_count.saturating_sub(1);
            }
            if !state.tasks.is_empty() || state.page_number <= 1 {
                return Ok(ListOutcome::Local);
            }
            let (filter, page_number) = (state.filter.clone(), state.page_number - 1);
            Self::issue(&mut state, filter, page_number)
        };
        self.fetch(ticket).await
    }

    pub fn page_count(&self) -> u64 {
        page_count(self.lock().total_count, self.page_size)
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.lock().tasks.clone()
    }

    pub fn filter(&self) -> TaskFilter {
        self.lock().filter.clone()
    }

    pub fn page_number(&self) -> u32 {
        self.lock().page_number
    }

    pub fn total_count(&self) -> u64 {
        self.lock().total_count
    }

    pub fn snapshot(&self) -> ListSnapshot {
        let state = self.lock();
        ListSnapshot {
            tasks: state.tasks.clone(),
            filter: state.filter.clone(),
            page_number: state.page_number,
            page_size: self.page_size,
            total_count: state.total_count,
            page_count: page_count(state.total_count, self.page_size),
        }
    }

    fn issue(state: &mut ListState, filter: TaskFilter, page_number: u32) -> Ticket {
        state.generation += 1;
        Ticket {
            generation: state.generation,
            filter,
            page_number,
        }
    }

    async fn fetch(&self, ticket: Ticket) -> Result<ListOutcome> {
        let query = ticket
            .filter
            .clone()
            .with_page(ticket.page_number, self.page_size);
        let page = self.service.list(&self.owner_id, &query).await?;

        let mut state = self.lock();
        if state.generation != ticket.generation {
            tracing::debug!(
                "Dropping stale list response (generation {} < {})",
                ticket.generation,
                state.generation
            );
            return Ok(ListOutcome::Stale);
        }
        state.filter = ticket.filter;
        state.page_number = ticket.page_number;
        state.tasks = page.items;
        state.total_count = page.total_count;
        drop(state);
        Ok(ListOutcome::Applied)
    }

    fn lock(&self) -> MutexGuard<'_, ListState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
