//! One fetched slice of the task list.

use serde::{Deserialize, Serialize};

use super::task::Task;

/// Tasks returned by a list call plus pagination metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub items: Vec<Task>,
    pub total_count: u64,
    pub page_number: u32,
}

impl Page {
    /// Decode a list payload. Servers either send the paged object or a bare
    /// array of tasks; the latter is treated as a single complete page.
    pub fn from_payload(payload: PagePayload, requested_page: u32) -> Self {
        match payload {
            PagePayload::Paged {
                items,
                total_count,
                page_number,
            } => {
                let total_count = total_count.unwrap_or(items.len() as u64);
                Self {
                    items,
                    total_count,
                    page_number: page_number.filter(|page| *page > 0).unwrap_or(requested_page),
                }
            }
            PagePayload::Bare(items) => Self {
                total_count: items.len() as u64,
                items,
                page_number: requested_page,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PagePayload {
    #[serde(rename_all = "camelCase")]
    Paged {
        #[serde(alias = "data", alias = "tasks")]
        items: Vec<Task>,
        #[serde(default)]
        total_count: Option<u64>,
        #[serde(default)]
        page_number: Option<u32>,
    },
    Bare(Vec<Task>),
}

/// Number of pages for `total_count` items; zero when either input is zero.
pub fn page_count(total_count: u64, page_size: u32) -> u64 {
    if page_size == 0 {
        return 0;
    }
    total_count.div_ceil(u64::from(page_size))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn task_json(id: &str) -> serde_json::Value {
        json!({
            "id": id,
            "title": format!("Task {id}"),
            "startDate": "2024-01-01",
            "endDate": "2024-01-02",
            "userId": "u1"
        })
    }

    #[test]
    fn page_count_edge_cases() {
        assert_eq!(page_count(0, 10), 0);
        assert_eq!(page_count(25, 10), 3);
        assert_eq!(page_count(20, 10), 2);
        assert_eq!(page_count(1, 10), 1);
        assert_eq!(page_count(25, 0), 0);
    }

    #[test]
    fn decodes_paged_payload() {
        let payload: PagePayload = serde_json::from_value(json!({
            "items": [task_json("a"), task_json("b")],
            "totalCount": 12,
            "pageNumber": 2
        }))
        .unwrap();
        let page = Page::from_payload(payload, 1);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total_count, 12);
        assert_eq!(page.page_number, 2);
    }

    #[test]
    fn bare_array_becomes_a_complete_page() {
        let payload: PagePayload =
            serde_json::from_value(json!([task_json("a"), task_json("b"), task_json("c")]))
                .unwrap();
        let page = Page::from_payload(payload, 1);
        assert_eq!(page.total_count, 3);
        assert_eq!(page.page_number, 1);
    }

    #[test]
    fn missing_metadata_falls_back_to_request() {
        let payload: PagePayload =
            serde_json::from_value(json!({ "items": [task_json("a")] })).unwrap();
        let page = Page::from_payload(payload, 4);
        assert_eq!(page.total_count, 1);
        assert_eq!(page.page_number, 4);
    }
}
