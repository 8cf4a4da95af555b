use crate::models::{ContactPerson, TaskId, TaskPage, TaskScope, TaskStatus, TaskType, UserId};
use reqwest::header::AUTHORIZATION;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};


#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ApiErrorKind {
    Unauthorized,
    Network,
    Http,
    Parse,
}

#[derive(Clone, Debug, thiserror::Error)]
#[error("{message}")]
pub(crate) struct ApiError {
    pub kind: ApiErrorKind,
    pub status: Option<u16>,
    pub message: String,
}

impl ApiError {
    fn network(e: reqwest::Error) -> Self {
        Self {
            kind: ApiErrorKind::Network,
            status: None,
            message: e.to_string(),
        }
    }

    fn parse(e: impl std::fmt::Display) -> Self {
        Self {
            kind: ApiErrorKind::Parse,
            status: None,
            message: e.to_string(),
        }
    }

    fn unauthorized(body: &str) -> Self {
        Self {
            kind: ApiErrorKind::Unauthorized,
            status: Some(StatusCode::UNAUTHORIZED.as_u16()),
            message: server_message(body).unwrap_or_else(|| "Unauthorized".to_string()),
        }
    }

    fn http(status: StatusCode, body: &str) -> Self {
        Self {
            kind: ApiErrorKind::Http,
            status: Some(status.as_u16()),
            message: server_message(body)
                .unwrap_or_else(|| format!("Request failed ({status})")),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.kind == ApiErrorKind::Unauthorized
    }
}

pub(crate) type ApiResult<T> = Result<T, ApiError>;

/// Pulls the human-readable reason out of an error body. Task routes answer
/// with `message`; the JWT layer answers with `msg`.
fn server_message(body: &str) -> Option<String> {
    let v: serde_json::Value = serde_json::from_str(body).ok()?;
    ["message", "msg"]
        .iter()
        .find_map(|k| v.get(*k).and_then(|m| m.as_str()))
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct LoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub id: Option<UserId>,
    #[serde(default)]
    pub name: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct SignupRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// Body of every mutation response.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct CreateTaskRequest {
    pub entity_name: String,
    pub task_type: TaskType,
    /// Naive UTC, `YYYY-MM-DDTHH:MM:SS`.
    pub time_of_task: String,
    pub contact_person: String,
    pub contact_person_id: Option<UserId>,
    pub note: String,
    pub status: TaskStatus,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct DuplicateTaskRequest {
    pub entity_name: String,
    pub task_type: TaskType,
    /// `YYYY-MM-DDTHH:MM:SS.fffZ`; the backend parses exactly this shape.
    pub time_of_task: String,
    pub contact_person: String,
    pub note: Option<String>,
    pub status: TaskStatus,
    pub user_id: Option<UserId>,
}

/// Partial update. Absent fields are left untouched by the backend.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub(crate) struct UpdateTaskRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_type: Option<TaskType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_of_task: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_person: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_person_id: Option<UserId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
}

impl UpdateTaskRequest {
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn note(note: String) -> Self {
        Self {
            note: Some(note),
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ApiClient {
    pub(crate) base_url: String,
    pub(crate) token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            token: None,
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    pub fn clear_token(&mut self) {
        self.token = None;
    }

    /// Value of the `Authorization` header. Empty when signed out; the
    /// backend rejects the call in that case.
    pub(crate) fn auth_header_value(&self) -> String {
        match &self.token {
            Some(token) => format!("Bearer {token}"),
            None => String::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn anonymous(&self, method: Method, path: &str) -> RequestBuilder {
        reqwest::Client::new().request(method, self.url(path))
    }

    fn authed(&self, method: Method, path: &str) -> RequestBuilder {
        self.anonymous(method, path)
            .header(AUTHORIZATION, self.auth_header_value())
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder, ctx: &str) -> ApiResult<T> {
        tracing::debug!(ctx, "api request");

        let res = req.send().await.map_err(|e| {
            tracing::warn!(ctx, error = %e, "network error");
            ApiError::network(e)
        })?;

        let status = res.status();
        if status.is_success() {
            return res.json().await.map_err(|e| {
                tracing::warn!(ctx, error = %e, "unexpected response body");
                ApiError::parse(e)
            });
        }

        let body = res.text().await.unwrap_or_default();
        let err = if status == StatusCode::UNAUTHORIZED {
            ApiError::unauthorized(&body)
        } else {
            ApiError::http(status, &body)
        };
        tracing::warn!(ctx, status = status.as_u16(), error = %err, "request failed");
        Err(err)
    }

    pub async fn login(&self, email: &str, password: &str) -> ApiResult<LoginResponse> {
        let req = self.anonymous(Method::POST, "/auth/login").json(&LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        });
        self.send(req, "login").await
    }

    pub async fn signup(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> ApiResult<MessageResponse> {
        let req = self.anonymous(Method::POST, "/auth/signup").json(&SignupRequest {
            email: email.to_string(),
            password: password.to_string(),
            name: name.to_string(),
        });
        self.send(req, "signup").await
    }

    pub async fn list_tasks(
        &self,
        scope: TaskScope,
        page: u32,
        per_page: u32,
    ) -> ApiResult<TaskPage> {
        let req = self
            .authed(Method::GET, scope.endpoint())
            .query(&[("page", page), ("per_page", per_page)]);
        self.send(req, scope.endpoint()).await
    }

    pub async fn create_task(&self, task: &CreateTaskRequest) -> ApiResult<MessageResponse> {
        let req = self.authed(Method::POST, "/tasks/create-task").json(task);
        self.send(req, "create-task").await
    }

    pub async fn duplicate_task(
        &self,
        task: &DuplicateTaskRequest,
    ) -> ApiResult<MessageResponse> {
        let req = self.authed(Method::POST, "/tasks/duplicate-task").json(task);
        self.send(req, "duplicate-task").await
    }

    pub async fn update_task(
        &self,
        id: TaskId,
        fields: &UpdateTaskRequest,
    ) -> ApiResult<MessageResponse> {
        let req = self
            .authed(Method::PUT, &format!("/tasks/update/{id}"))
            .json(fields);
        self.send(req, "update").await
    }

    pub async fn delete_task(&self, id: TaskId) -> ApiResult<MessageResponse> {
        let req = self.authed(Method::DELETE, &format!("/tasks/delete/{id}"));
        self.send(req, "delete").await
    }

    pub async fn list_contact_persons(&self) -> ApiResult<Vec<ContactPerson>> {
        let req = self.authed(Method::GET, "/tasks/contact-persons");
        self.send(req, "contact-persons").await
    }
}
