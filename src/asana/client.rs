//! Asana REST API client.

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::error::AsanaError;
use super::{
    NewTask, Project, Section, Task, TaskFilter, TaskStore, TaskUpdate, User, Workspace,
};

pub const ASANA_API_URL: &str = "https://app.asana.com/api/1.0";

/// Task fields the session reads.
const TASK_FIELDS: &str = "name,completed,due_on,assignee.name,projects.name";

/// Asana client authenticated with a personal access token.
pub struct AsanaClient {
    client: Client,
    base_url: String,
    access_token: String,
}

/// Request and response bodies are wrapped in `{"data": ...}`.
#[derive(Debug, Serialize, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Vec<ErrorMessage>,
}

#[derive(Debug, Deserialize)]
struct ErrorMessage {
    message: String,
}

impl AsanaClient {
    /// Create a client for the public Asana API.
    pub fn new(access_token: &str) -> Self {
        Self::with_base_url(access_token, ASANA_API_URL)
    }

    /// Create a client for a different API host.
    pub fn with_base_url(access_token: &str, base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: access_token.to_string(),
        }
    }

    /// Send a request and return the raw body of a successful response.
    async fn execute<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&B>,
    ) -> Result<String, AsanaError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("Asana {} {}", method, path);

        let mut request = self
            .client
            .request(method, &url)
            .bearer_auth(&self.access_token)
            .header("Accept", "application/json");
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(&Envelope { data: body });
        }

        let resp = match request.send().await {
            Ok(r) => r,
            Err(e) => {
                if e.is_timeout() {
                    return Err(AsanaError::network(format!("Request timeout: {}", e)));
                } else if e.is_connect() {
                    return Err(AsanaError::network(format!("Connection failed: {}", e)));
                } else {
                    return Err(AsanaError::network(format!("Request failed: {}", e)));
                }
            }
        };

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| AsanaError::network(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&text)
                .ok()
                .map(|b| {
                    b.errors
                        .into_iter()
                        .map(|e| e.message)
                        .collect::<Vec<_>>()
                        .join("; ")
                })
                .filter(|m| !m.is_empty())
                .unwrap_or(text);
            return Err(AsanaError::from_status(status.as_u16(), message));
        }

        Ok(text)
    }

    async fn get_data<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, AsanaError> {
        let text = self.execute::<()>(Method::GET, path, query, None).await?;
        Self::parse_data(&text)
    }

    async fn send_data<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, AsanaError> {
        let text = self
            .execute(method, path, &[("opt_fields", TASK_FIELDS)], Some(body))
            .await?;
        Self::parse_data(&text)
    }

    fn parse_data<T: DeserializeOwned>(text: &str) -> Result<T, AsanaError> {
        serde_json::from_str::<Envelope<T>>(text)
            .map(|e| e.data)
            .map_err(|e| AsanaError::parse(format!("Failed to parse response: {}, body: {}", e, text)))
    }
}

#[async_trait]
impl TaskStore for AsanaClient {
    async fn find_workspaces(&self) -> Result<Vec<Workspace>, AsanaError> {
        self.get_data("/workspaces", &[]).await
    }

    async fn find_projects(&self, workspace_id: &str) -> Result<Vec<Project>, AsanaError> {
        self.get_data("/projects", &[("workspace", workspace_id)])
            .await
    }

    async fn find_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, AsanaError> {
        let mut query = vec![("opt_fields", TASK_FIELDS)];
        if let Some(project) = filter.project.as_deref() {
            query.push(("project", project));
        }
        if let Some(section) = filter.section.as_deref() {
            query.push(("section", section));
        }
        if let Some(workspace) = filter.workspace.as_deref() {
            query.push(("workspace", workspace));
        }
        if let Some(assignee) = filter.assignee.as_deref() {
            query.push(("assignee", assignee));
        }
        self.get_data("/tasks", &query).await
    }

    async fn get_task(&self, task_id: &str) -> Result<Task, AsanaError> {
        self.get_data(&format!("/tasks/{}", task_id), &[("opt_fields", TASK_FIELDS)])
            .await
    }

    async fn create_task(&self, task: &NewTask) -> Result<Task, AsanaError> {
        self.send_data(Method::POST, "/tasks", task).await
    }

    async fn update_task(&self, task_id: &str, update: &TaskUpdate) -> Result<Task, AsanaError> {
        self.send_data(Method::PUT, &format!("/tasks/{}", task_id), update)
            .await
    }

    async fn delete_task(&self, task_id: &str) -> Result<(), AsanaError> {
        self.execute::<()>(Method::DELETE, &format!("/tasks/{}", task_id), &[], None)
            .await?;
        Ok(())
    }

    async fn find_sections(&self, project_id: &str) -> Result<Vec<Section>, AsanaError> {
        self.get_data(&format!("/projects/{}/sections", project_id), &[])
            .await
    }

    async fn find_users(&self, workspace_id: &str) -> Result<Vec<User>, AsanaError> {
        self.get_data("/users", &[("workspace", workspace_id)])
            .await
    }
}
