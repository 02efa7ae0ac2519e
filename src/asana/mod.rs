//! Asana task store.
//!
//! [`TaskStore`] is the narrow set of CRUD verbs the session drives;
//! [`AsanaClient`] implements it against the Asana REST API.

mod client;
mod error;

pub use client::{AsanaClient, ASANA_API_URL};
pub use error::{classify_http_status, AsanaError, AsanaErrorKind};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A named Asana object (workspace, project, section, user).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    #[serde(rename = "gid")]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

impl Resource {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

pub type Workspace = Resource;
pub type Project = Resource;
pub type Section = Resource;
pub type User = Resource;

/// A task as returned by the API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    #[serde(rename = "gid")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub completed: bool,
    /// `YYYY-MM-DD`, kept raw until the lifecycle parses it.
    #[serde(default)]
    pub due_on: Option<String>,
    #[serde(default)]
    pub assignee: Option<Resource>,
    #[serde(default)]
    pub projects: Vec<Resource>,
}

/// Which tasks to list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub project: Option<String>,
    pub section: Option<String>,
    pub workspace: Option<String>,
    pub assignee: Option<String>,
}

impl TaskFilter {
    pub fn project(project_id: &str) -> Self {
        Self {
            project: Some(project_id.to_string()),
            ..Self::default()
        }
    }
}

/// Places a new task in a project section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Membership {
    pub project: String,
    pub section: String,
}

/// Fields for a task to be created.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NewTask {
    pub name: String,
    pub workspace: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub projects: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub memberships: Vec<Membership>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_on: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
}

/// Fields to change on an existing task. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaskUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_on: Option<String>,
}

impl TaskUpdate {
    pub fn due_on(due_on: impl Into<String>) -> Self {
        Self {
            due_on: Some(due_on.into()),
            ..Self::default()
        }
    }
}

/// CRUD verbs against the remote task tracker.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn find_workspaces(&self) -> Result<Vec<Workspace>, AsanaError>;

    async fn find_projects(&self, workspace_id: &str) -> Result<Vec<Project>, AsanaError>;

    async fn find_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, AsanaError>;

    async fn get_task(&self, task_id: &str) -> Result<Task, AsanaError>;

    async fn create_task(&self, task: &NewTask) -> Result<Task, AsanaError>;

    async fn update_task(&self, task_id: &str, update: &TaskUpdate) -> Result<Task, AsanaError>;

    async fn delete_task(&self, task_id: &str) -> Result<(), AsanaError>;

    async fn find_sections(&self, project_id: &str) -> Result<Vec<Section>, AsanaError>;

    async fn find_users(&self, workspace_id: &str) -> Result<Vec<User>, AsanaError>;
}
