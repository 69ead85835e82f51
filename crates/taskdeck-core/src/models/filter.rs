//! Sparse task list filter and its query-string mapping.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::task::{wire_date, TaskPriority, TaskStatus};
use crate::util::normalize_text_option;

/// Query constraints for the task list. Only populated fields constrain the
/// request; blank text counts as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub star: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

impl TaskFilter {
    /// Drop blank text and zero page values so they are never sent.
    #[must_use]
    pub fn stripped(&self) -> Self {
        Self {
            title: normalize_text_option(self.title.clone()),
            page_number: self.page_number.filter(|page| *page > 0),
            page_size: self.page_size.filter(|size| *size > 0),
            ..self.clone()
        }
    }

    /// The same constraints without pagination fields.
    #[must_use]
    pub fn without_pagination(&self) -> Self {
        Self {
            page_number: None,
            page_size: None,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_page(mut self, page_number: u32, page_size: u32) -> Self {
        self.page_number = Some(page_number);
        self.page_size = Some(page_size);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.stripped() == Self::default()
    }

    /// Query parameters for the stripped filter, using the server's names.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let filter = self.stripped();
        let mut query = Vec::new();
        if let Some(title) = filter.title {
            query.push(("title", title));
        }
        if let Some(priority) = filter.priority {
            query.push(("priority", priority.index().to_string()));
        }
        if let Some(status) = filter.status {
            query.push(("status", status.index().to_string()));
        }
        if let Some(star) = filter.star {
            query.push(("star", star.to_string()));
        }
        if let Some(is_active) = filter.is_active {
            query.push(("isActive", is_active.to_string()));
        }
        if let Some(start_date) = filter.start_date {
            query.push(("startDate", wire_date::format(start_date)));
        }
        if let Some(end_date) = filter.end_date {
            query.push(("endDate", wire_date::format(end_date)));
        }
        if let Some(page_number) = filter.page_number {
            query.push(("pageNumber", page_number.to_string()));
        }
        if let Some(page_size) = filter.page_size {
            query.push(("pageSize", page_size.to_string()));
        }
        query
    }
}
