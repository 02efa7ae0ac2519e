//! Session over one Asana workspace and project.
//!
//! Resolves the configured workspace/project names once, then drives the
//! task store with decisions from [`crate::lifecycle`] and
//! [`crate::recurrence`]. Each pass reads "today" from the clock exactly once.

use std::collections::HashSet;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::asana::{Membership, NewTask, Resource, Task, TaskFilter, TaskStore, TaskUpdate};
use crate::clock::Clock;
use crate::config::SessionConfig;
use crate::lifecycle::{self, Classification, DueSnapshot};
use crate::recurrence::{self, CreateInstruction, Frequency, RecurrenceFeed, RecurrenceRecord};
use crate::resolve;

/// Connected session bound to a workspace and project.
pub struct Session {
    store: Arc<dyn TaskStore>,
    clock: Arc<dyn Clock>,
    workspace_id: String,
    project_id: String,
    late_threshold: u32,
}

/// Short view of a task for reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskSummary {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_on: Option<String>,
}

impl From<&Task> for TaskSummary {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            name: task.name.clone(),
            due_on: task.due_on.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RescheduledTask {
    pub id: String,
    pub name: String,
    pub previous_due_on: String,
    pub due_on: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvalidTask {
    pub id: String,
    pub name: String,
    pub error: String,
}

/// Outcome of a due-date pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DueDateReport {
    pub rescheduled: Vec<RescheduledTask>,
    pub past_due: Vec<TaskSummary>,
    pub on_time: usize,
    pub no_due_date: usize,
    pub completed: usize,
    pub invalid: Vec<InvalidTask>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedTask {
    pub id: String,
    pub name: String,
    pub section: String,
    pub owner: String,
    pub due_on: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRecord {
    pub task_name: String,
    pub reason: String,
}

/// Outcome of a recurrence pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecurrenceReport {
    pub created: Vec<CreatedTask>,
    /// Records with nothing to create today.
    pub not_due: usize,
    /// Instructions whose task already exists with the same due date.
    pub already_present: Vec<String>,
    /// WEEKLY records whose day-of-week is not a weekday name.
    pub unrecognized_day: Vec<String>,
    pub skipped: Vec<SkippedRecord>,
}

impl Session {
    /// Resolve the configured workspace and project and open a session.
    pub async fn connect(
        config: &SessionConfig,
        store: Arc<dyn TaskStore>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let workspaces = store
            .find_workspaces()
            .await
            .context("Failed to list workspaces")?;
        let workspace_id = resolve::id_by_name(&workspaces, "workspace", &config.workspace_name)?;

        let projects = store
            .find_projects(&workspace_id)
            .await
            .context("Failed to list projects")?;
        let project_id = resolve::id_by_name(&projects, "project", &config.project_name)?;

        tracing::info!(
            "Session opened for workspace {:?} ({}) project {:?} ({})",
            config.workspace_name,
            workspace_id,
            config.project_name,
            project_id
        );

        Ok(Self {
            store,
            clock,
            workspace_id,
            project_id,
            late_threshold: config.late_threshold,
        })
    }

    pub fn workspace_id(&self) -> &str {
        &self.workspace_id
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn late_threshold(&self) -> u32 {
        self.late_threshold
    }

    async fn project_tasks(&self) -> Result<Vec<Task>> {
        self.store
            .find_tasks(&TaskFilter::project(&self.project_id))
            .await
            .context("Failed to list project tasks")
    }

    /// Create a task in the project due `due_date_offset` days from today.
    pub async fn create_task(&self, task_name: &str, due_date_offset: i64) -> Result<Task> {
        let due = lifecycle::due_on_after(self.clock.today(), due_date_offset)?;
        let task = NewTask {
            name: task_name.to_string(),
            workspace: self.workspace_id.clone(),
            projects: vec![self.project_id.clone()],
            due_on: Some(due.clone()),
            ..NewTask::default()
        };
        let created = self
            .store
            .create_task(&task)
            .await
            .with_context(|| format!("Failed to create task {:?}", task_name))?;
        tracing::info!("Created task {:?} ({}) due {}", created.name, created.id, due);
        Ok(created)
    }

    pub async fn get_task_details(&self, task_id: &str) -> Result<Task> {
        self.store
            .get_task(task_id)
            .await
            .with_context(|| format!("Failed to fetch task {}", task_id))
    }

    /// Delete every project task whose name matches `task_name` case-insensitively.
    pub async fn delete_task(&self, task_name: &str) -> Result<Vec<TaskSummary>> {
        let wanted = task_name.trim().to_uppercase();
        let mut deleted = Vec::new();
        for task in self.project_tasks().await? {
            if task.name.trim().to_uppercase() != wanted {
                continue;
            }
            self.store
                .delete_task(&task.id)
                .await
                .with_context(|| format!("Failed to delete task {}", task.id))?;
            tracing::info!("Deleted task {:?} ({})", task.name, task.id);
            deleted.push(TaskSummary::from(&task));
        }
        if deleted.is_empty() {
            tracing::warn!("No task named {:?} in project", task_name);
        }
        Ok(deleted)
    }

    /// Reschedule every really-late open task to `today + due_date_offset`.
    ///
    /// Past-due tasks inside the grace period are reported, not moved.
    pub async fn update_due_dates(&self, due_date_offset: i64) -> Result<DueDateReport> {
        let today = self.clock.today();
        let new_due = lifecycle::due_on_after(today, due_date_offset)?;
        let mut report = DueDateReport::default();

        for task in self.project_tasks().await? {
            let snapshot = match DueSnapshot::from_task(&task) {
                Ok(s) => s,
                Err(e) => {
                    tracing::warn!("Skipping task {:?} ({}): {}", task.name, task.id, e);
                    report.invalid.push(InvalidTask {
                        id: task.id.clone(),
                        name: task.name.clone(),
                        error: e.to_string(),
                    });
                    continue;
                }
            };

            match lifecycle::classify(&snapshot, today, self.late_threshold) {
                Classification::Completed => report.completed += 1,
                Classification::NoDueDate => report.no_due_date += 1,
                Classification::OnTime => report.on_time += 1,
                Classification::PastDue => {
                    tracing::info!(
                        "Task {:?} ({}) is past due ({}) but within the grace period",
                        task.name,
                        task.id,
                        task.due_on.as_deref().unwrap_or_default()
                    );
                    report.past_due.push(TaskSummary::from(&task));
                }
                Classification::ReallyLate => {
                    self.store
                        .update_task(&task.id, &TaskUpdate::due_on(new_due.clone()))
                        .await
                        .with_context(|| format!("Failed to reschedule task {}", task.id))?;
                    let previous = task.due_on.clone().unwrap_or_default();
                    tracing::info!(
                        "Rescheduled task {:?} ({}) from {} to {}",
                        task.name,
                        task.id,
                        previous,
                        new_due
                    );
                    report.rescheduled.push(RescheduledTask {
                        id: task.id,
                        name: task.name,
                        previous_due_on: previous,
                        due_on: new_due.clone(),
                    });
                }
            }
        }

        Ok(report)
    }

    /// Load records from `feed` and create today's recurring tasks.
    pub async fn load_recurring_from(&self, feed: &dyn RecurrenceFeed) -> Result<RecurrenceReport> {
        let records = feed
            .records()
            .await
            .context("Failed to read recurrence feed")?;
        self.load_recurring(&records).await
    }

    /// Create the tasks `records` call for today.
    ///
    /// A record that cannot be scheduled or resolved is skipped and reported.
    /// An instruction whose task already exists in the project with the same
    /// due date is not created again, so a replayed pass is harmless.
    pub async fn load_recurring(&self, records: &[RecurrenceRecord]) -> Result<RecurrenceReport> {
        let today = self.clock.today();
        let mut report = RecurrenceReport::default();

        let mut instructions = Vec::new();
        for record in records {
            match recurrence::decide(record, today) {
                Ok(Some(instruction)) => instructions.push(instruction),
                Ok(None) => {
                    report.not_due += 1;
                    if let Some(day) = unrecognized_day(record) {
                        tracing::warn!(
                            "Recurring task {:?} has unrecognized day of week {:?}",
                            record.task_name,
                            day
                        );
                        report.unrecognized_day.push(record.task_name.clone());
                    }
                }
                Err(e) => {
                    tracing::warn!("Skipping recurring task {:?}: {}", record.task_name, e);
                    report.skipped.push(SkippedRecord {
                        task_name: record.task_name.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        if instructions.is_empty() {
            return Ok(report);
        }

        let sections = self
            .store
            .find_sections(&self.project_id)
            .await
            .context("Failed to list sections")?;
        let users = self
            .store
            .find_users(&self.workspace_id)
            .await
            .context("Failed to list users")?;
        let mut existing: HashSet<(String, String)> = self
            .project_tasks()
            .await?
            .into_iter()
            .filter(|t| !t.completed)
            .filter_map(|t| Some((t.name.trim().to_uppercase(), t.due_on?)))
            .collect();

        for instruction in instructions {
            let due_on = lifecycle::due_on_after(today, instruction.due_offset_days)?;
            let key = (instruction.name.trim().to_uppercase(), due_on.clone());
            if existing.contains(&key) {
                tracing::info!(
                    "Recurring task {:?} already exists for {}",
                    instruction.name,
                    due_on
                );
                report.already_present.push(instruction.name);
                continue;
            }

            let new_task = match self.build_task(&instruction, &sections, &users, &due_on) {
                Ok(t) => t,
                Err(e) => {
                    tracing::warn!("Skipping recurring task {:?}: {}", instruction.name, e);
                    report.skipped.push(SkippedRecord {
                        task_name: instruction.name,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            let created = self
                .store
                .create_task(&new_task)
                .await
                .with_context(|| format!("Failed to create recurring task {:?}", instruction.name))?;
            tracing::info!(
                "Created recurring task {:?} ({}) due {}",
                created.name,
                created.id,
                due_on
            );
            existing.insert(key);
            report.created.push(CreatedTask {
                id: created.id,
                name: instruction.name,
                section: instruction.section,
                owner: instruction.owner,
                due_on,
            });
        }

        Ok(report)
    }

    fn build_task(
        &self,
        instruction: &CreateInstruction,
        sections: &[Resource],
        users: &[Resource],
        due_on: &str,
    ) -> Result<NewTask, crate::error::ResolveError> {
        let section_id = resolve::id_by_name(sections, "section", &instruction.section)?;
        let owner_id = resolve::id_by_name(users, "user", &instruction.owner)?;
        Ok(NewTask {
            name: instruction.name.clone(),
            workspace: self.workspace_id.clone(),
            // Membership already places the task in the project.
            projects: Vec::new(),
            memberships: vec![Membership {
                project: self.project_id.clone(),
                section: section_id,
            }],
            due_on: Some(due_on.to_string()),
            assignee: Some(owner_id),
        })
    }
}

/// Day-of-week of a WEEKLY record that names no weekday.
fn unrecognized_day(record: &RecurrenceRecord) -> Option<&str> {
    let weekly = matches!(record.frequency.parse::<Frequency>(), Ok(Frequency::Weekly));
    let day = record.day_of_week.as_deref()?;
    (weekly && recurrence::parse_weekday_label(day).is_err()).then_some(day)
}
