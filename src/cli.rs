use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::models::{AppState, Goal, GoalType, Priority, StudySession, Subject, Task};
use crate::store::{Action, Store};
use crate::storage::{Storage, StorageError};
use crate::utils::parse_date;

#[derive(Parser)]
#[command(name = "sgt")]
#[command(about = "Study planner - sessions, goals and tasks in the terminal")]
#[command(version)]
pub struct Cli {
    /// Custom config file path
    #[arg(short, long)]
    pub config: Option<String>,

    /// Use development mode (uses separate dev config/storage)
    #[arg(long)]
    pub dev: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Launch interactive TUI (default if no subcommand)
    Tui,
    /// Quickly log a study session
    AddSession {
        /// Subject name (or id)
        subject: String,
        /// Duration in minutes
        duration: u32,
        /// Activity type (e.g. Reading, Practice)
        #[arg(long)]
        activity: Option<String>,
        /// Session notes
        #[arg(long)]
        notes: Option<String>,
    },
    /// Quickly add a new task
    AddTask {
        /// Task title
        title: String,
        /// Subject name (or id)
        subject: String,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
        /// Priority: low, medium or high
        #[arg(long)]
        priority: Option<String>,
        /// Estimated time in minutes
        #[arg(long)]
        estimate: Option<u32>,
    },
    /// Quickly add a new goal
    AddGoal {
        /// Goal title
        title: String,
        /// Goal type: daily, weekly or subject
        #[arg(long, default_value = "weekly")]
        goal_type: String,
        /// Target study time in minutes
        #[arg(long)]
        target_time: Option<u32>,
        /// Target number of tasks
        #[arg(long)]
        target_tasks: Option<u32>,
        /// Subject name (or id), required for subject goals
        #[arg(long)]
        subject: Option<String>,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
    },
    /// Add a new subject
    AddSubject {
        /// Subject name
        name: String,
        /// Display color (#RRGGBB or a named terminal color)
        #[arg(long, default_value = "#4F46E5")]
        color: String,
    },
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),
    #[error("Failed to parse date: {0}")]
    DateParseError(String),
    #[error("Unknown subject: {0}")]
    UnknownSubject(String),
    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

/// Resolve a subject given by name (case-insensitive) or id
fn resolve_subject(state: &AppState, reference: &str) -> Result<String, CliError> {
    let lowered = reference.to_lowercase();
    state
        .subjects
        .iter()
        .find(|s| s.name.to_lowercase() == lowered || s.id == reference)
        .map(|s| s.id.clone())
        .ok_or_else(|| CliError::UnknownSubject(reference.to_string()))
}

fn validated_due_date(due: Option<String>) -> Result<Option<String>, CliError> {
    match due {
        Some(due_str) => {
            parse_date(&due_str).map_err(|e| {
                CliError::DateParseError(format!("Invalid date format '{}': {}", due_str, e))
            })?;
            Ok(Some(due_str))
        }
        None => Ok(None),
    }
}

/// Handle the add-session command
pub fn handle_add_session(
    subject: String,
    duration: u32,
    activity: Option<String>,
    notes: Option<String>,
    store: &mut Store,
    storage: &Storage,
) -> Result<(), CliError> {
    if duration == 0 {
        return Err(CliError::InvalidValue("Duration must be positive".to_string()));
    }
    let subject_id = resolve_subject(store.state(), &subject)?;

    let mut session = StudySession::new(subject_id, duration);
    if let Some(activity) = activity {
        session.activity_type = activity;
    }
    if let Some(notes) = notes {
        session.notes = notes;
    }

    let id = session.id.clone();
    store.dispatch(Action::AddSession(session));
    storage.save(store.state())?;
    println!("Session logged successfully (ID: {})", id);

    Ok(())
}

/// Handle the add-task command
pub fn handle_add_task(
    title: String,
    subject: String,
    due: Option<String>,
    priority: Option<String>,
    estimate: Option<u32>,
    store: &mut Store,
    storage: &Storage,
) -> Result<(), CliError> {
    let subject_id = resolve_subject(store.state(), &subject)?;
    let due_date = validated_due_date(due)?;

    let mut task = Task::new(title, subject_id);
    if let Some(due_date) = due_date {
        task.due_date = due_date;
    }
    if let Some(priority_str) = priority {
        task.priority = priority_str.parse::<Priority>().map_err(CliError::InvalidValue)?;
    }
    task.estimated_time = estimate;

    let id = task.id.clone();
    store.dispatch(Action::AddTask(task));
    storage.save(store.state())?;
    println!("Task created successfully (ID: {})", id);

    Ok(())
}

/// Handle the add-goal command
pub fn handle_add_goal(
    title: String,
    goal_type: String,
    target_time: Option<u32>,
    target_tasks: Option<u32>,
    subject: Option<String>,
    due: Option<String>,
    store: &mut Store,
    storage: &Storage,
) -> Result<(), CliError> {
    let goal_type = goal_type.parse::<GoalType>().map_err(CliError::InvalidValue)?;

    let subject_id = match (goal_type, subject) {
        (GoalType::Subject, Some(reference)) => Some(resolve_subject(store.state(), &reference)?),
        (GoalType::Subject, None) => {
            return Err(CliError::InvalidValue(
                "Subject goals require --subject".to_string(),
            ));
        }
        (_, _) => None,
    };

    if target_time.unwrap_or(0) == 0 && target_tasks.unwrap_or(0) == 0 {
        return Err(CliError::InvalidValue(
            "Set a positive --target-time or --target-tasks".to_string(),
        ));
    }

    let mut goal = Goal::new(title, goal_type);
    goal.subject_id = subject_id;
    goal.target_time = target_time;
    goal.target_tasks = target_tasks;
    goal.due_date = validated_due_date(due)?;

    let id = goal.id.clone();
    store.dispatch(Action::AddGoal(goal));
    storage.save(store.state())?;
    println!("Goal created successfully (ID: {})", id);

    Ok(())
}

/// Handle the add-subject command
pub fn handle_add_subject(
    name: String,
    color: String,
    store: &mut Store,
    storage: &Storage,
) -> Result<(), CliError> {
    if name.trim().is_empty() {
        return Err(CliError::InvalidValue("Subject name must not be empty".to_string()));
    }

    let subject = Subject::new(name, color);
    let id = subject.id.clone();
    store.dispatch(Action::AddSubject(subject));
    storage.save(store.state())?;
    println!("Subject created successfully (ID: {})", id);

    Ok(())
}
