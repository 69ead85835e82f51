//! Typed task operations mapped onto the HTTP gateway.
//!
//! Request shaping only: errors from the gateway are returned untouched.

use reqwest::{Method, RequestBuilder};
use serde::de::IgnoredAny;
use serde_json::Value;

use crate::error::Result;
use crate::gateway::{HttpGateway, Reply};
use crate::models::{Page, PagePayload, Task, TaskDraft, TaskFilter, TaskPatch};

const TODO_PATH: &str = "/todo";
const TODOS_BY_USER_PATH: &str = "/Todo/GetToDosByUserId";

#[derive(Clone)]
pub struct TaskQueryService {
    gateway: HttpGateway,
}

impl TaskQueryService {
    pub const fn new(gateway: HttpGateway) -> Self {
        Self { gateway }
    }

    /// Tasks owned by `owner_id` matching `filter`.
    pub async fn list(&self, owner_id: &str, filter: &TaskFilter) -> Result<Page> {
        let path = format!("{TODOS_BY_USER_PATH}/{}", encode_segment(owner_id));
        self.fetch_page(&path, filter).await
    }

    /// Tasks visible to the caller, without an explicit owner.
    pub async fn list_all(&self, filter: &TaskFilter) -> Result<Page> {
        self.fetch_page(TODO_PATH, filter).await
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Task> {
        let request = self.gateway.request(Method::GET, &task_path(id));
        self.gateway.execute::<Task>(request).await?.into_data()
    }

    pub async fn create(&self, draft: &TaskDraft) -> Result<Reply<Task>> {
        let request = self.gateway.request(Method::POST, TODO_PATH).json(draft);
        self.mutate(request).await
    }

    pub async fn update(&self, id: &str, patch: &TaskPatch) -> Result<Reply<Task>> {
        let request = self
            .gateway
            .request(Method::PUT, &task_path(id))
            .json(patch);
        self.mutate(request).await
    }

    pub async fn delete(&self, id: &str) -> Result<Reply<()>> {
        let request = self.gateway.request(Method::DELETE, &task_path(id));
        let reply = self.gateway.execute::<IgnoredAny>(request).await?;
        Ok(Reply {
            message: reply.message,
            data: reply.data.map(|_| ()),
        })
    }

    /// Run a create or update. The server may echo the task, an id or
    /// nothing at all; anything that is not a task leaves `data` empty.
    async fn mutate(&self, request: RequestBuilder) -> Result<Reply<Task>> {
        let reply = self.gateway.execute::<Value>(request).await?;
        let data = reply.data.and_then(|value| {
            serde_json::from_value::<Task>(value)
                .map_err(|error| tracing::debug!("Ignoring non-task mutation payload: {error}"))
                .ok()
        });
        Ok(Reply {
            message: reply.message,
            data,
        })
    }

    async fn fetch_page(&self, path: &str, filter: &TaskFilter) -> Result<Page> {
        let query = filter.to_query();
        let requested_page = filter.stripped().page_number.unwrap_or(1);
        let request = self.gateway.request(Method::GET, path).query(&query);
        let payload = self
            .gateway
            .execute::<PagePayload>(request)
            .await?
            .into_data()?;
        Ok(Page::from_payload(payload, requested_page))
    }
}

fn task_path(id: &str) -> String {
    format!("{TODO_PATH}/{}", encode_segment(id))
}

fn encode_segment(raw: &str) -> String {
    urlencoding::encode(raw.trim()).into_owned()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::auth::{CredentialStore, MemoryCredentialStore, Session};
    use crate::config::ClientConfig;
    use crate::models::{TaskPriority, TaskStatus};
    use crate::navigation::RecordingNavigator;

    fn service(server: &MockServer) -> TaskQueryService {
        let store = Arc::new(MemoryCredentialStore::new());
        store
            .save(&Session::new("u1", "alice", "tok").unwrap())
            .unwrap();
        let gateway = HttpGateway::new(
            &ClientConfig::new(server.uri()).unwrap(),
            store,
            Arc::new(RecordingNavigator::default()),
        )
        .unwrap();
        TaskQueryService::new(gateway)
    }

    fn task_json(id: &str) -> serde_json::Value {
        json!({
            "id": id,
            "title": format!("Task {id}"),
            "description": "",
            "status": 1,
            "priority": 0,
            "startDate": "2024-01-01",
            "endDate": "2024-01-02",
            "star": false,
            "isActive": true,
            "userId": "u1"
        })
    }

    #[tokio::test]
    async fn list_maps_filter_to_query_and_omits_unset_fields() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/Todo/GetToDosByUserId/u1"))
            .and(query_param("title", "milk"))
            .and(query_param("star", "true"))
            .and(query_param("pageNumber", "2"))
            .and(query_param_is_missing("priority"))
            .and(query_param_is_missing("status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": { "items": [task_json("a")], "totalCount": 11, "pageNumber": 2 }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let filter = TaskFilter {
            title: Some(" milk ".to_string()),
            star: Some(true),
            page_number: Some(2),
            ..TaskFilter::default()
        };
        let page = service(&server).list("u1", &filter).await.unwrap();
        assert_eq!(page.total_count, 11);
        assert_eq!(page.page_number, 2);
        assert_eq!(page.items[0].id, "a");
    }

    #[tokio::test]
    async fn list_all_uses_generic_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/todo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": [task_json("a"), task_json("b")]
            })))
            .mount(&server)
            .await;

        let page = service(&server)
            .list_all(&TaskFilter::default())
            .await
            .unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total_count, 2);
    }

    #[tokio::test]
    async fn get_by_id_requires_data() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/todo/a"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "success": true, "data": task_json("a") })),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/todo/empty"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
            .mount(&server)
            .await;

        let service = service(&server);
        assert_eq!(service.get_by_id("a").await.unwrap().title, "Task a");
        assert!(matches!(
            service.get_by_id("empty").await,
            Err(crate::Error::Malformed(_))
        ));
    }

    #[tokio::test]
    async fn create_posts_the_draft() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/todo"))
            .and(body_json(json!({
                "title": "Buy milk",
                "description": "",
                "status": 0,
                "priority": 1,
                "startDate": "2024-07-04",
                "endDate": "2024-07-05",
                "star": false,
                "isActive": true,
                "userId": "u1"
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "success": true, "message": "Todo created" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let draft = TaskDraft {
            title: "Buy milk".to_string(),
            description: String::new(),
            status: TaskStatus::Draft,
            priority: TaskPriority::Medium,
            start_date: NaiveDate::from_ymd_opt(2024, 7, 4).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 7, 5).unwrap(),
            star: false,
            is_active: true,
            user_id: "u1".to_string(),
        };
        let reply = service(&server).create(&draft).await.unwrap();
        assert_eq!(reply.message.as_deref(), Some("Todo created"));
        assert_eq!(reply.data, None);
    }

    #[tokio::test]
    async fn update_and_delete_encode_ids() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/todo/a%20b"))
            .and(body_json(json!({ "star": true })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": task_json("a b")
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/todo/a%20b"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "success": true, "message": "Deleted", "data": true })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let service = service(&server);
        let updated = service.update("a b", &TaskPatch::star(true)).await.unwrap();
        assert_eq!(updated.into_data().unwrap().id, "a b");

        let deleted = service.delete("a b").await.unwrap();
        assert_eq!(deleted.message.as_deref(), Some("Deleted"));
    }

    #[tokio::test]
    async fn mutations_accept_non_task_data() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/todo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "message": "Todo created",
                "data": 42
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/todo/7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "message": "Todo updated",
                "data": { "id": "7" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let draft = TaskDraft {
            title: "Buy milk".to_string(),
            description: String::new(),
            status: TaskStatus::Draft,
            priority: TaskPriority::Low,
            start_date: NaiveDate::from_ymd_opt(2024, 7, 4).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 7, 4).unwrap(),
            star: false,
            is_active: true,
            user_id: "u1".to_string(),
        };
        let service = service(&server);
        let created = service.create(&draft).await.unwrap();
        assert_eq!(created.message.as_deref(), Some("Todo created"));
        assert_eq!(created.data, None);

        let updated = service.update("7", &TaskPatch::star(true)).await.unwrap();
        assert_eq!(updated.message.as_deref(), Some("Todo updated"));
        assert_eq!(updated.data, None);
    }
}
